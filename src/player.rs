use crate::collision::{self, GridOccupant};
use crate::config::GameConfig;
use crate::game::types::{Direction, GameEvent, delta_frames, grid_to_pixel};
use crate::grid::{Grid, Tile};
use crate::input_system::InputState;
use crate::monster::Monster;

/// The digging player. Grid membership commits at move start; the pixel
/// position interpolates toward the committed cell afterwards.
pub struct Player {
    pub grid_x: i32,
    pub grid_y: i32,
    pub x: f64,
    pub y: f64,
    target_x: f64,
    target_y: f64,
    pub direction: Direction,
    pub moving: bool,
    speed: f64,

    pub pumping: bool,
    pump_target: Option<u32>,
    pump_started_ms: f64,
    pub pump_stage: u32,

    pub alive: bool,
    pub invincible: bool,
    invincible_until_ms: f64,
}

impl Player {
    pub fn new(grid_x: i32, grid_y: i32, config: &GameConfig) -> Self {
        let (x, y) = grid_to_pixel(grid_x, grid_y);
        Player {
            grid_x,
            grid_y,
            x,
            y,
            target_x: x,
            target_y: y,
            direction: Direction::Right,
            moving: false,
            speed: config.player_speed,
            pumping: false,
            pump_target: None,
            pump_started_ms: 0.0,
            pump_stage: 0,
            alive: true,
            invincible: false,
            invincible_until_ms: 0.0,
        }
    }

    /// Per-tick update. Returns the id of a monster defeated by the pump
    /// this tick, if any; the caller owns scoring and removal.
    pub fn update(
        &mut self,
        now_ms: f64,
        delta_ms: f64,
        input: &InputState,
        grid: &mut Grid,
        monsters: &mut [Monster],
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Option<u32> {
        if !self.alive {
            return None;
        }

        if self.invincible && now_ms >= self.invincible_until_ms {
            self.invincible = false;
        }

        let mut defeated = None;
        if input.pump {
            if self.pumping {
                defeated = self.update_pump(now_ms, monsters, config, events);
            } else {
                self.start_pump(now_ms, monsters, config, events);
            }
        } else if self.pumping {
            self.stop_pump();
        }

        // Pumping roots the player in place
        if !self.pumping {
            if self.moving {
                self.update_movement(delta_ms);
            } else {
                let direction = input.direction();
                if direction != Direction::None {
                    self.start_moving(direction, grid, events);
                }
            }
        }

        defeated
    }

    fn start_moving(&mut self, direction: Direction, grid: &mut Grid, events: &mut Vec<GameEvent>) {
        self.direction = direction;

        let Some((nx, ny)) = grid.neighbor(self.grid_x, self.grid_y, direction) else {
            return;
        };
        if grid.get_tile(nx, ny) == Some(Tile::Rock) {
            return;
        }

        if grid.dig(nx, ny) {
            events.push(GameEvent::Dug { x: nx, y: ny });
        }

        // Commit the destination cell immediately so collision and pump
        // range use where the player is headed, not where the sprite is
        self.grid_x = nx;
        self.grid_y = ny;
        let (tx, ty) = grid_to_pixel(nx, ny);
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

    /// Latch onto the nearest pumpable monster and land the first hit
    fn start_pump(
        &mut self,
        now_ms: f64,
        monsters: &mut [Monster],
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) {
        let own = (self.grid_x, self.grid_y);
        let target = monsters
            .iter_mut()
            .filter(|m| m.alive && !m.ghost)
            .map(|m| {
                let dist = collision::grid_distance(own, (m.grid_x, m.grid_y));
                (m, dist)
            })
            .filter(|&(_, dist)| dist <= config.pump_range)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((monster, _)) = target else {
            return;
        };

        self.pumping = true;
        self.pump_target = Some(monster.id);
        self.pump_started_ms = now_ms;
        self.pump_stage = 1;

        monster.start_inflate(now_ms);
        monster.inflate(now_ms);
        events.push(GameEvent::PumpStage(1));
    }

    fn update_pump(
        &mut self,
        now_ms: f64,
        monsters: &mut [Monster],
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Option<u32> {
        let Some(target_id) = self.pump_target else {
            self.stop_pump();
            return None;
        };
        let Some(monster) = monsters.iter_mut().find(|m| m.id == target_id) else {
            self.stop_pump();
            return None;
        };

        if !monster.alive
            || monster.ghost
            || collision::grid_distance(
                (self.grid_x, self.grid_y),
                (monster.grid_x, monster.grid_y),
            ) > config.pump_range
        {
            self.stop_pump();
            return None;
        }

        // Stages accrue on a fixed cadence while the key stays held
        let new_stage = 1 + ((now_ms - self.pump_started_ms) / config.pump_interval_ms) as u32;
        if new_stage > self.pump_stage {
            self.pump_stage = new_stage;
            monster.inflate(now_ms);
            events.push(GameEvent::PumpStage(new_stage));
        }

        if monster.inflate_stage >= config.pump_stages && monster.defeat() {
            self.stop_pump();
            return Some(target_id);
        }

        None
    }

    fn stop_pump(&mut self) {
        self.pumping = false;
        self.pump_target = None;
        self.pump_stage = 0;
    }

    /// Id of the monster the hose is attached to, for rendering
    pub fn pump_target(&self) -> Option<u32> {
        self.pump_target
    }

    /// Apply a hit. Returns false if shrugged off by invincibility.
    pub fn take_damage(&mut self, now_ms: f64, config: &GameConfig) -> bool {
        if self.invincible {
            return false;
        }
        self.invincible = true;
        self.invincible_until_ms = now_ms + config.invincibility_ms;
        true
    }

    /// Respawn at a grid cell with a fresh invincibility window
    pub fn reset(&mut self, grid_x: i32, grid_y: i32, now_ms: f64, config: &GameConfig) {
        self.grid_x = grid_x;
        self.grid_y = grid_y;
        let (x, y) = grid_to_pixel(grid_x, grid_y);
        self.x = x;
        self.y = y;
        self.target_x = x;
        self.target_y = y;
        self.moving = false;
        self.direction = Direction::Right;
        self.alive = true;
        self.stop_pump();
        self.invincible = true;
        self.invincible_until_ms = now_ms + config.invincibility_ms;
    }
}

impl GridOccupant for Player {
    fn grid_pos(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
