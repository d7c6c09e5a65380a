use serde::{Deserialize, Serialize};

/// Gameplay tuning values, loadable from assets/config/game.json.
///
/// Every field has a default matching the shipped balance, so a partial
/// config file (or none at all) still produces a playable game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Grid
    pub grid_width: i32,
    pub grid_height: i32,

    // Player
    pub player_speed: f64,
    pub player_start_x: i32,
    pub player_start_y: i32,
    pub pump_range: f64,
    pub pump_interval_ms: f64,

    // Monsters
    pub monster_speed: f64,
    pub monster_ghost_speed: f64,
    pub fast_monster_multiplier: f64,
    pub ghost_interval_ms: f64,
    pub ghost_duration_ms: f64,
    pub ghost_first_delay_ms: f64,
    pub pump_stages: u32,
    pub inflate_decay_ms: f64,
    pub ai_interval_ms: f64,

    // Rocks
    pub rock_fall_speed: f64,
    pub rock_wobble_ms: f64,
    pub rock_settle_check_ms: f64,

    // Game
    pub starting_lives: i32,
    pub invincibility_ms: f64,

    // Scoring
    pub score_monster_pump: u32,
    pub score_monster_rock: u32,
    pub score_bonus_item: u32,
    pub score_level_complete: u32,

    // Level generation
    pub monsters_per_level: u32,
    pub rocks_per_level: u32,
    pub bonus_items_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 14,
            grid_height: 15,

            player_speed: 4.0,
            player_start_x: 7,
            player_start_y: 1,
            pump_range: 1.5,
            pump_interval_ms: 300.0,

            monster_speed: 2.0,
            monster_ghost_speed: 1.0,
            fast_monster_multiplier: 1.5,
            ghost_interval_ms: 8000.0,
            ghost_duration_ms: 3000.0,
            ghost_first_delay_ms: 10000.0,
            pump_stages: 4,
            inflate_decay_ms: 800.0,
            ai_interval_ms: 800.0,

            rock_fall_speed: 6.0,
            rock_wobble_ms: 1000.0,
            rock_settle_check_ms: 100.0,

            starting_lives: 3,
            invincibility_ms: 2000.0,

            score_monster_pump: 200,
            score_monster_rock: 300,
            score_bonus_item: 500,
            score_level_complete: 1000,

            monsters_per_level: 4,
            rocks_per_level: 8,
            bonus_items_per_level: 2,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.grid_width, config.grid_width);
        assert_eq!(parsed.pump_stages, config.pump_stages);
        assert_eq!(parsed.score_monster_rock, config.score_monster_rock);
    }

    #[test]
    fn test_partial_json_fills_missing_fields_from_defaults() {
        let parsed: GameConfig =
            serde_json::from_str(r#"{ "starting_lives": 5, "rock_fall_speed": 9.0 }"#).unwrap();
        assert_eq!(parsed.starting_lives, 5);
        assert_eq!(parsed.rock_fall_speed, 9.0);
        // Untouched fields keep their defaults
        assert_eq!(parsed.grid_width, 14);
        assert_eq!(parsed.pump_interval_ms, 300.0);
    }
}
