// Collision helpers shared by the entity state machines. Anything with a
// grid position and a liveness flag can be tested against a falling rock,
// without the caller knowing the concrete entity type.

/// Capability trait for entities that occupy a grid cell.
pub trait GridOccupant {
    fn grid_pos(&self) -> (i32, i32);
    fn is_alive(&self) -> bool;
}

/// Euclidean distance between two points
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Euclidean distance between two grid cells
pub fn grid_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    distance(a.0 as f64, a.1 as f64, b.0 as f64, b.1 as f64)
}

/// Manhattan distance between two grid cells
pub fn manhattan_distance(a: (i32, i32), b: (i32, i32)) -> i32 {
    (b.0 - a.0).abs() + (b.1 - a.1).abs()
}
