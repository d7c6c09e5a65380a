use crate::collision::{self, GridOccupant};
use crate::config::GameConfig;
use crate::game::types::{Direction, TILE_SIZE, delta_frames, grid_to_pixel, pixel_to_grid};
use crate::grid::{Grid, Tile};
use crate::player::Player;

/// Grid distance under which a monster touching the player counts as a hit.
/// Tighter than a full tile so near-misses are forgiven.
const PLAYER_HIT_RADIUS: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterKind {
    Basic,
    Fast,
}

/// A tunnel-dwelling monster. Movement and AI are frozen while inflated;
/// ghost mode is a transient, purely time-driven traversal mode, not a kind.
pub struct Monster {
    pub id: u32,
    pub kind: MonsterKind,

    pub grid_x: i32,
    pub grid_y: i32,
    pub x: f64,
    pub y: f64,
    target_x: f64,
    target_y: f64,
    pub direction: Direction,
    pub moving: bool,
    speed: f64,

    pub alive: bool,
    pub ghost: bool,
    last_ghost_toggle_ms: f64,

    pub inflate_stage: u32,
    pub inflating: bool,
    inflate_started_ms: f64,

    last_path_update_ms: f64,
}

impl Monster {
    pub fn new(
        id: u32,
        kind: MonsterKind,
        grid_x: i32,
        grid_y: i32,
        now_ms: f64,
        config: &GameConfig,
    ) -> Self {
        let (x, y) = grid_to_pixel(grid_x, grid_y);
        Monster {
            id,
            kind,
            grid_x,
            grid_y,
            x,
            y,
            target_x: x,
            target_y: y,
            direction: Direction::Down,
            moving: false,
            speed: Self::base_speed(kind, config),
            alive: true,
            ghost: false,
            // First ghost phase is pushed back so fresh levels start tame
            last_ghost_toggle_ms: now_ms + config.ghost_first_delay_ms,
            inflate_stage: 0,
            inflating: false,
            inflate_started_ms: 0.0,
            last_path_update_ms: 0.0,
        }
    }

    fn base_speed(kind: MonsterKind, config: &GameConfig) -> f64 {
        match kind {
            MonsterKind::Basic => config.monster_speed,
            MonsterKind::Fast => config.monster_speed * config.fast_monster_multiplier,
        }
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        delta_ms: f64,
        player: &Player,
        grid: &mut Grid,
        config: &GameConfig,
    ) {
        if !self.alive {
            return;
        }

        self.update_ghost_mode(now_ms, grid, config);

        if self.inflating {
            self.update_inflation(now_ms, config);
            // Frozen while pumped up
            return;
        }

        if !self.moving {
            self.update_ai(now_ms, player, grid, config);
        } else {
            self.update_movement(delta_ms);
        }

        // Grid membership follows the sprite center
        let (gx, gy) = pixel_to_grid(
            self.x + TILE_SIZE as f64 / 2.0,
            self.y + TILE_SIZE as f64 / 2.0,
        );
        self.grid_x = gx;
        self.grid_y = gy;
    }

    fn update_ghost_mode(&mut self, now_ms: f64, grid: &mut Grid, config: &GameConfig) {
        let since_toggle = now_ms - self.last_ghost_toggle_ms;

        if self.ghost {
            if since_toggle > config.ghost_duration_ms {
                self.exit_ghost_mode(now_ms, grid, config);
            }
        } else if since_toggle > config.ghost_interval_ms {
            self.enter_ghost_mode(now_ms, config);
        }
    }

    fn enter_ghost_mode(&mut self, now_ms: f64, config: &GameConfig) {
        self.ghost = true;
        self.last_ghost_toggle_ms = now_ms;
        self.speed = config.monster_ghost_speed;
    }

    fn exit_ghost_mode(&mut self, now_ms: f64, grid: &mut Grid, config: &GameConfig) {
        self.ghost = false;
        self.last_ghost_toggle_ms = now_ms;
        self.speed = Self::base_speed(self.kind, config);

        // Never revert inside solid dirt
        if grid.get_tile(self.grid_x, self.grid_y) == Some(Tile::Dirt) {
            grid.set_tile(self.grid_x, self.grid_y, Tile::Tunnel);
        }
    }

    /// Greedy chase, re-evaluated on a fixed cadence rather than every tick
    fn update_ai(&mut self, now_ms: f64, player: &Player, grid: &Grid, config: &GameConfig) {
        if now_ms - self.last_path_update_ms < config.ai_interval_ms {
            return;
        }
        self.last_path_update_ms = now_ms;

        let direction = self.choose_direction(player, grid);
        if direction != Direction::None {
            self.start_moving(direction);
        }
    }

    /// Pick the cardinal neighbor that minimizes Manhattan distance to the
    /// player. Ties keep the earlier candidate (up, down, left, right order).
    /// Greedy by design; symmetric dead ends can trap it.
    fn choose_direction(&self, player: &Player, grid: &Grid) -> Direction {
        let mut best = Direction::None;
        let mut best_dist = i32::MAX;

        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let Some((nx, ny)) = grid.neighbor(self.grid_x, self.grid_y, dir) else {
                continue;
            };

            let passable = if self.ghost {
                grid.get_tile(nx, ny) != Some(Tile::Rock)
            } else {
                grid.is_walkable(nx, ny)
            };
            if !passable {
                continue;
            }

            let dist = collision::manhattan_distance((nx, ny), (player.grid_x, player.grid_y));
            if dist < best_dist {
                best_dist = dist;
                best = dir;
            }
        }

        best
    }

    fn start_moving(&mut self, direction: Direction) {
        self.direction = direction;
        let (dx, dy) = direction.vector();
        let (tx, ty) = grid_to_pixel(self.grid_x + dx, self.grid_y + dy);
        self.target_x = tx;
        self.target_y = ty;
        self.moving = true;
    }

    fn update_movement(&mut self, delta_ms: f64) {
        let dx = self.target_x - self.x;
        let dy = self.target_y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();
        let step = self.speed * delta_frames(delta_ms);

        if dist <= step {
            self.x = self.target_x;
            self.y = self.target_y;
            self.moving = false;
        } else {
            self.x += dx / dist * step;
            self.y += dy / dist * step;
        }
    }

    /// Enter the inflating state. Called by the player's pump, not by the
    /// monster's own tick.
    pub fn start_inflate(&mut self, now_ms: f64) {
        if self.inflating {
            return;
        }
        self.inflating = true;
        self.inflate_started_ms = now_ms;
    }

    /// One pump hit: bump the stage and restart the decay window
    pub fn inflate(&mut self, now_ms: f64) {
        self.inflate_stage += 1;
        self.inflate_started_ms = now_ms;
    }

    /// Deflate one stage per decay window without a fresh pump hit
    fn update_inflation(&mut self, now_ms: f64, config: &GameConfig) {
        let elapsed = now_ms - self.inflate_started_ms;

        if elapsed > config.inflate_decay_ms && self.inflate_stage > 0 {
            self.inflate_stage -= 1;
            self.inflate_started_ms = now_ms;

            if self.inflate_stage == 0 {
                self.inflating = false;
            }
        }
    }

    /// Idempotent: reports whether this call actually killed the monster, so
    /// a rock crush and a pump finishing in the same tick score only once.
    pub fn defeat(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    pub fn check_collision_with_player(&self, player: &Player) -> bool {
        if !self.alive || !player.alive || player.invincible {
            return false;
        }

        let dist = collision::grid_distance(
            (self.grid_x, self.grid_y),
            (player.grid_x, player.grid_y),
        );
        dist < PLAYER_HIT_RADIUS
    }
}

impl GridOccupant for Monster {
    fn grid_pos(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
