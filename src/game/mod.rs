// Core simulation: shared types and the world that ties the entities
// together. Everything in here is presentation-free and runs headless in
// tests.

pub mod types;
pub mod world;

pub use types::{DefeatMethod, Direction, GameEvent, GameState, TILE_SIZE};
pub use world::GameWorld;
