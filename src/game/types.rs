// Shared enums and helper types used throughout the game

/// Size of one grid cell in pixels
pub const TILE_SIZE: i32 = 48;

/// Reference frame length used to scale per-frame speeds by elapsed time
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Game flow state for tracking the current screen/mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Title,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// Cardinal movement direction (None = standing still)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid vector for this direction
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }
}

/// How a monster was defeated, for scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefeatMethod {
    Pump,
    Rock,
}

/// Fire-and-forget notifications from the simulation to the presentation
/// layer (audio, particles). The core never waits on these; main.rs drains
/// them once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Dug { x: i32, y: i32 },
    PumpStage(u32),
    MonsterDefeated { x: f64, y: f64, method: DefeatMethod },
    RockLanded,
    PlayerHit { x: f64, y: f64 },
    BonusCollected { x: f64, y: f64 },
    LevelComplete,
    GameOver,
}

/// Convert grid coordinates to the pixel position of the cell's top-left corner
pub fn grid_to_pixel(grid_x: i32, grid_y: i32) -> (f64, f64) {
    ((grid_x * TILE_SIZE) as f64, (grid_y * TILE_SIZE) as f64)
}

/// Convert a pixel position to the grid cell containing it
pub fn pixel_to_grid(x: f64, y: f64) -> (i32, i32) {
    (
        (x / TILE_SIZE as f64).floor() as i32,
        (y / TILE_SIZE as f64).floor() as i32,
    )
}

/// Number of reference frames covered by an elapsed-time slice. Per-frame
/// speeds are multiplied by this so motion is frame-rate independent.
pub fn delta_frames(delta_ms: f64) -> f64 {
    delta_ms / FRAME_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pixel_round_trip() {
        let (px, py) = grid_to_pixel(7, 1);
        assert_eq!((px, py), (336.0, 48.0));
        assert_eq!(pixel_to_grid(px, py), (7, 1));
        // Anywhere inside the cell maps back to the same cell
        assert_eq!(pixel_to_grid(px + 47.0, py + 47.0), (7, 1));
    }

    #[test]
    fn test_direction_vectors() {
        assert_eq!(Direction::Up.vector(), (0, -1));
        assert_eq!(Direction::Down.vector(), (0, 1));
        assert_eq!(Direction::Left.vector(), (-1, 0));
        assert_eq!(Direction::Right.vector(), (1, 0));
        assert_eq!(Direction::None.vector(), (0, 0));
    }

    #[test]
    fn test_delta_frames_at_sixty_fps() {
        assert!((delta_frames(FRAME_MS) - 1.0).abs() < 1e-9);
        assert!((delta_frames(FRAME_MS * 2.0) - 2.0).abs() < 1e-9);
    }
}
