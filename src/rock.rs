use crate::collision::GridOccupant;
use crate::config::GameConfig;
use crate::game::types::{GameEvent, TILE_SIZE, delta_frames, grid_to_pixel};
use crate::grid::{Grid, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RockState {
    Settled,
    Wobbling,
    Falling,
}

/// A boulder embedded in the dirt. Settled until undermined, then wobbles
/// for a grace period and falls, crushing anything in its column.
pub struct Rock {
    pub grid_x: i32,
    pub grid_y: i32,
    pub x: f64,
    pub y: f64,
    pub state: RockState,
    wobble_started_ms: f64,
    last_settle_check_ms: f64,
    pub destroyed: bool,
}

impl Rock {
    /// Creates the rock and marks its cell on the grid
    pub fn new(grid_x: i32, grid_y: i32, grid: &mut Grid) -> Self {
        grid.set_tile(grid_x, grid_y, Tile::Rock);
        let (x, y) = grid_to_pixel(grid_x, grid_y);
        Rock {
            grid_x,
            grid_y,
            x,
            y,
            state: RockState::Settled,
            wobble_started_ms: 0.0,
            last_settle_check_ms: 0.0,
            destroyed: false,
        }
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        delta_ms: f64,
        grid: &mut Grid,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) {
        if self.destroyed {
            return;
        }

        match self.state {
            RockState::Settled => self.check_support(now_ms, grid, config),
            RockState::Wobbling => {
                if now_ms - self.wobble_started_ms > config.rock_wobble_ms {
                    self.start_fall(grid);
                }
            }
            RockState::Falling => self.update_fall(delta_ms, grid, config, events),
        }
    }

    /// Support is polled on a cadence, not every tick
    fn check_support(&mut self, now_ms: f64, grid: &Grid, config: &GameConfig) {
        if now_ms - self.last_settle_check_ms < config.rock_settle_check_ms {
            return;
        }
        self.last_settle_check_ms = now_ms;

        if !grid.has_support(self.grid_x, self.grid_y) {
            self.state = RockState::Wobbling;
            self.wobble_started_ms = now_ms;
        }
    }

    fn start_fall(&mut self, grid: &mut Grid) {
        self.state = RockState::Falling;
        // The origin cell opens up the moment the rock lets go
        grid.set_tile(self.grid_x, self.grid_y, Tile::Empty);
    }

    fn update_fall(
        &mut self,
        delta_ms: f64,
        grid: &mut Grid,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) {
        // Clamp to one tile per tick so a long frame can never skip the
        // landing check past a solid cell
        let step = (config.rock_fall_speed * delta_frames(delta_ms)).min(TILE_SIZE as f64);
        self.y += step;

        let new_row = ((self.y + TILE_SIZE as f64) / TILE_SIZE as f64).floor() as i32;
        if new_row == self.grid_y {
            return;
        }

        if new_row >= grid.height {
            self.destroy(grid);
            return;
        }

        match grid.get_tile(self.grid_x, new_row) {
            Some(Tile::Dirt) | Some(Tile::Rock) => self.land(new_row - 1, grid, events),
            _ => self.grid_y = new_row,
        }
    }

    fn land(&mut self, row: i32, grid: &mut Grid, events: &mut Vec<GameEvent>) {
        self.grid_y = row;
        let (_, y) = grid_to_pixel(self.grid_x, row);
        self.y = y;
        grid.set_tile(self.grid_x, row, Tile::Rock);
        self.state = RockState::Settled;
        events.push(GameEvent::RockLanded);
    }

    /// Remove the rock from play, clearing its cell if it still owns it
    fn destroy(&mut self, grid: &mut Grid) {
        if grid.get_tile(self.grid_x, self.grid_y) == Some(Tile::Rock) {
            grid.set_tile(self.grid_x, self.grid_y, Tile::Empty);
        }
        self.destroyed = true;
    }

    /// A falling rock crushes an occupant sharing its column within one row
    pub fn check_collision(&self, occupant: &dyn GridOccupant) -> bool {
        if self.state != RockState::Falling || self.destroyed || !occupant.is_alive() {
            return false;
        }
        let (ox, oy) = occupant.grid_pos();
        ox == self.grid_x && (self.grid_y - oy).abs() < 1
    }
}

impl GridOccupant for Rock {
    fn grid_pos(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn is_alive(&self) -> bool {
        !self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    struct Dummy {
        pos: (i32, i32),
        alive: bool,
    }

    impl GridOccupant for Dummy {
        fn grid_pos(&self) -> (i32, i32) {
            self.pos
        }
        fn is_alive(&self) -> bool {
            self.alive
        }
    }

    #[test]
    fn test_new_rock_marks_grid() {
        let mut grid = Grid::new(14, 15);
        let rock = Rock::new(5, 6, &mut grid);
        assert_eq!(grid.get_tile(5, 6), Some(Tile::Rock));
        assert_eq!(rock.state, RockState::Settled);
    }

    #[test]
    fn test_supported_rock_stays_settled() {
        let cfg = config();
        let mut grid = Grid::new(14, 15);
        let mut events = Vec::new();
        let mut rock = Rock::new(5, 6, &mut grid);
        let start_y = rock.y;

        // Dirt below the whole time; a hundred cadenced checks change nothing
        for i in 0..100 {
            rock.update(i as f64 * cfg.rock_settle_check_ms, 16.0, &mut grid, &cfg, &mut events);
        }
        assert_eq!(rock.state, RockState::Settled);
        assert_eq!(rock.y, start_y);
        assert!(events.is_empty());
    }

    #[test]
    fn test_undermined_rock_wobbles_then_falls() {
        let cfg = config();
        let mut grid = Grid::new(14, 15);
        let mut events = Vec::new();
        let mut rock = Rock::new(5, 6, &mut grid);

        grid.dig(5, 7);
        rock.update(cfg.rock_settle_check_ms + 1.0, 16.0, &mut grid, &cfg, &mut events);
        assert_eq!(rock.state, RockState::Wobbling);

        // Still wobbling inside the grace window
        let mid = cfg.rock_settle_check_ms + cfg.rock_wobble_ms / 2.0;
        rock.update(mid, 16.0, &mut grid, &cfg, &mut events);
        assert_eq!(rock.state, RockState::Wobbling);

        let after = cfg.rock_settle_check_ms + cfg.rock_wobble_ms + 2.0;
        rock.update(after, 16.0, &mut grid, &cfg, &mut events);
        assert_eq!(rock.state, RockState::Falling);
        // Origin cell released on fall start
        assert_eq!(grid.get_tile(5, 6), Some(Tile::Empty));
    }

    #[test]
    fn test_falling_rock_lands_on_dirt_and_remarks_grid() {
        let cfg = config();
        let mut grid = Grid::new(14, 15);
        let mut events = Vec::new();
        let mut rock = Rock::new(5, 6, &mut grid);

        // One open cell below, dirt at row 8
        grid.dig(5, 7);
        let mut now = 0.0;
        for _ in 0..600 {
            now += 16.0;
            rock.update(now, 16.0, &mut grid, &cfg, &mut events);
            if rock.state == RockState::Settled && rock.grid_y != 6 {
                break;
            }
        }

        assert_eq!(rock.grid_y, 7);
        assert_eq!(rock.y, (7 * TILE_SIZE) as f64);
        assert_eq!(grid.get_tile(5, 7), Some(Tile::Rock));
        assert!(events.contains(&GameEvent::RockLanded));
    }

    #[test]
    fn test_long_frame_cannot_skip_a_row() {
        let cfg = config();
        let mut grid = Grid::new(14, 15);
        let mut events = Vec::new();
        let mut rock = Rock::new(5, 6, &mut grid);
        grid.dig(5, 7);

        // Force the fall, then feed one enormous delta
        rock.update(cfg.rock_settle_check_ms + 1.0, 16.0, &mut grid, &cfg, &mut events);
        let t = cfg.rock_settle_check_ms + cfg.rock_wobble_ms + 2.0;
        rock.update(t, 16.0, &mut grid, &cfg, &mut events);
        assert_eq!(rock.state, RockState::Falling);

        rock.update(t + 5000.0, 5000.0, &mut grid, &cfg, &mut events);
        // One tile of travel at most, which lands it on the dirt at row 8
        assert_eq!(rock.state, RockState::Settled);
        assert_eq!(rock.grid_y, 7);
    }

    #[test]
    fn test_rock_falling_off_grid_is_destroyed() {
        let cfg = config();
        let mut grid = Grid::new(14, 15);
        let mut events = Vec::new();
        let mut rock = Rock::new(5, 12, &mut grid);

        // Clear everything below so there is nothing to land on
        for y in 13..15 {
            grid.set_tile(5, y, Tile::Empty);
        }
        rock.update(cfg.rock_settle_check_ms + 1.0, 16.0, &mut grid, &cfg, &mut events);
        let fall_start = cfg.rock_settle_check_ms + cfg.rock_wobble_ms + 2.0;
        rock.update(fall_start, 16.0, &mut grid, &cfg, &mut events);

        let mut now = fall_start;
        for _ in 0..600 {
            now += 16.0;
            rock.update(now, 16.0, &mut grid, &cfg, &mut events);
            if rock.destroyed {
                break;
            }
        }
        assert!(rock.destroyed);
        assert!(!events.contains(&GameEvent::RockLanded));
    }

    #[test]
    fn test_collision_only_while_falling_same_column() {
        let mut grid = Grid::new(14, 15);
        let mut rock = Rock::new(5, 6, &mut grid);

        let under = Dummy { pos: (5, 6), alive: true };
        assert!(!rock.check_collision(&under));

        rock.state = RockState::Falling;
        assert!(rock.check_collision(&under));

        let beside = Dummy { pos: (6, 6), alive: true };
        assert!(!rock.check_collision(&beside));

        let below = Dummy { pos: (5, 8), alive: true };
        assert!(!rock.check_collision(&below));

        let dead = Dummy { pos: (5, 6), alive: false };
        assert!(!rock.check_collision(&dead));
    }
}
