use crate::collision;
use crate::game::types::{TILE_SIZE, grid_to_pixel};
use crate::player::Player;

/// Pixel distance under which the player scoops up a bonus item
const PICKUP_RADIUS: f64 = TILE_SIZE as f64 * 0.8;

/// How long one blink phase lasts
const BLINK_PERIOD_MS: f64 = 200.0;

/// A collectible buried in the dirt. Inert until the player digs close
/// enough; collection is decided by pixel centers so a passing sprite
/// grabs it mid-move.
pub struct BonusItem {
    pub grid_x: i32,
    pub grid_y: i32,
    pub x: f64,
    pub y: f64,
    pub collected: bool,
    timer_ms: f64,
}

impl BonusItem {
    pub fn new(grid_x: i32, grid_y: i32) -> Self {
        let (x, y) = grid_to_pixel(grid_x, grid_y);
        BonusItem {
            grid_x,
            grid_y,
            x,
            y,
            collected: false,
            timer_ms: 0.0,
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        if !self.collected {
            self.timer_ms += delta_ms;
        }
    }

    pub fn check_collision(&self, player: &Player) -> bool {
        if self.collected || !player.alive {
            return false;
        }
        let half = TILE_SIZE as f64 / 2.0;
        let dist = collision::distance(
            self.x + half,
            self.y + half,
            player.x + half,
            player.y + half,
        );
        dist < PICKUP_RADIUS
    }

    pub fn collect(&mut self) {
        self.collected = true;
    }

    /// Blink phase for rendering
    pub fn blink_on(&self) -> bool {
        (self.timer_ms / BLINK_PERIOD_MS).floor() as i64 % 2 == 0
    }
}
