use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bonus::BonusItem;
use crate::collision;
use crate::config::GameConfig;
use crate::game::types::{DefeatMethod, GameEvent, GameState};
use crate::grid::{Grid, SKY_ROWS, Tile};
use crate::input_system::InputState;
use crate::monster::{Monster, MonsterKind};
use crate::player::Player;
use crate::rock::Rock;

/// Defeats inside this window keep the score chain alive
const CHAIN_WINDOW_MS: f64 = 1000.0;

/// Chain bonus added per consecutive defeat
const CHAIN_STEP: f64 = 0.5;

/// One third of the playfield, used to spread spawn placement
struct Zone {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    used: u32,
}

/// Placement constraints for one entity category
struct Placement {
    min_dist: f64,
    player_min_dist: f64,
    needs_support: bool,
}

/// The whole simulation: grid, entities, score, lives and flow state.
/// Advanced by `update` with wall-clock deltas; time only moves while
/// the state is Playing, so pausing freezes every timer for free.
pub struct GameWorld {
    pub grid: Grid,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub rocks: Vec<Rock>,
    pub bonus_items: Vec<BonusItem>,

    pub state: GameState,
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub monsters_defeated: u32,
    pub total_monsters: u32,

    chain_multiplier: f64,
    last_chain_ms: Option<f64>,

    now_ms: f64,
    next_monster_id: u32,
    events: Vec<GameEvent>,
    rng: StdRng,
    config: GameConfig,
}

impl GameWorld {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let player = Player::new(config.player_start_x, config.player_start_y, &config);
        GameWorld {
            grid,
            player,
            monsters: Vec::new(),
            rocks: Vec::new(),
            bonus_items: Vec::new(),
            state: GameState::Title,
            score: 0,
            lives: config.starting_lives,
            level: 1,
            monsters_defeated: 0,
            total_monsters: 0,
            chain_multiplier: 1.0,
            last_chain_ms: None,
            now_ms: 0.0,
            next_monster_id: 0,
            events: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Simulation clock, for render effects that animate over time
    pub fn time_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level = 1;
        self.chain_multiplier = 1.0;
        self.last_chain_ms = None;
        self.load_level(1);
    }

    pub fn next_level(&mut self) {
        self.level += 1;
        let level = self.level;
        self.load_level(level);
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
    }

    fn load_level(&mut self, level: u32) {
        self.grid.generate_level(level, &mut self.rng);
        self.monsters.clear();
        self.rocks.clear();
        self.bonus_items.clear();
        self.monsters_defeated = 0;

        let now = self.now_ms;
        let (sx, sy) = (self.config.player_start_x, self.config.player_start_y);
        self.player.reset(sx, sy, now, &self.config);

        let mut zones = self.create_placement_zones();

        // Monsters: one more per level, spread across zones, away from spawn
        let monster_count = self.config.monsters_per_level + (level - 1);
        self.total_monsters = monster_count;
        let monster_rules = Placement {
            min_dist: 4.0,
            player_min_dist: 8.0,
            needs_support: false,
        };
        let mut monster_positions: Vec<(i32, i32)> = Vec::new();
        for i in 0..monster_count {
            let pos = self.find_spread_position(&mut zones, &monster_positions, &monster_rules);
            monster_positions.push(pos);
            self.carve_starter_pocket(pos);

            let kind = Self::monster_kind_for_level(level, i);
            let id = self.next_monster_id;
            self.next_monster_id += 1;
            self.monsters
                .push(Monster::new(id, kind, pos.0, pos.1, now, &self.config));
        }

        // Rocks: need solid ground below and some depth to fall from
        let rock_rules = Placement {
            min_dist: 3.0,
            player_min_dist: 0.0,
            needs_support: true,
        };
        let mut rock_positions: Vec<(i32, i32)> = Vec::new();
        for _ in 0..self.config.rocks_per_level {
            let pos = self.find_spread_position(&mut zones, &rock_positions, &rock_rules);
            rock_positions.push(pos);
            self.rocks.push(Rock::new(pos.0, pos.1, &mut self.grid));
        }

        let bonus_rules = Placement {
            min_dist: 5.0,
            player_min_dist: 0.0,
            needs_support: false,
        };
        let mut bonus_positions: Vec<(i32, i32)> = Vec::new();
        for _ in 0..self.config.bonus_items_per_level {
            let pos = self.find_spread_position(&mut zones, &bonus_positions, &bonus_rules);
            bonus_positions.push(pos);
            // The cell stays dirt; the item is scooped up when the player
            // digs through it
            self.bonus_items.push(BonusItem::new(pos.0, pos.1));
        }

        self.state = GameState::Playing;
    }

    /// Level 1 seeds every fourth monster fast; later levels every second
    fn monster_kind_for_level(level: u32, index: u32) -> MonsterKind {
        let fast = if level == 1 {
            index % 4 == 0
        } else {
            index % 2 == 0
        };
        if fast { MonsterKind::Fast } else { MonsterKind::Basic }
    }

    /// Open a small tunnel pocket around a monster spawn so it can move
    /// immediately instead of waiting for ghost mode
    fn carve_starter_pocket(&mut self, (x, y): (i32, i32)) {
        self.grid.set_tile(x, y, Tile::Tunnel);
        if self.rng.random_bool(0.5) {
            self.grid.dig(x - 1, y);
            self.grid.dig(x + 1, y);
        } else {
            self.grid.dig(x, y - 1);
            self.grid.dig(x, y + 1);
        }
    }

    /// 3x3 partition of the diggable area below the sky rows
    fn create_placement_zones(&self) -> Vec<Zone> {
        let zone_w = self.grid.width / 3;
        let zone_h = (self.grid.height - SKY_ROWS) / 3;
        let mut zones = Vec::with_capacity(9);
        for zy in 0..3 {
            for zx in 0..3 {
                zones.push(Zone {
                    x1: zx * zone_w,
                    y1: SKY_ROWS + zy * zone_h,
                    x2: (zx + 1) * zone_w - 1,
                    y2: SKY_ROWS + (zy + 1) * zone_h - 1,
                    used: 0,
                });
            }
        }
        zones
    }

    /// Pick a dirt cell, preferring the least-used zone so spawns spread
    /// out. Falls back to unconstrained random dirt; placement never fails.
    fn find_spread_position(
        &mut self,
        zones: &mut [Zone],
        existing: &[(i32, i32)],
        rules: &Placement,
    ) -> (i32, i32) {
        let mut order: Vec<usize> = (0..zones.len()).collect();
        order.sort_by_key(|&i| zones[i].used);

        for zi in order {
            let zone = &zones[zi];
            for _ in 0..20 {
                let x = self.rng.random_range(zone.x1..=zone.x2);
                let y = self.rng.random_range(zone.y1..=zone.y2);
                if self.position_valid((x, y), existing, rules) {
                    zones[zi].used += 1;
                    return (x, y);
                }
            }
        }

        // Constrained zones exhausted; relax the zone spreading first, then
        // the distance rules
        for _ in 0..50 {
            let pos = self.grid.find_random_dirt_position(&mut self.rng);
            if self.position_valid(pos, existing, rules) {
                return pos;
            }
        }
        self.grid.find_random_dirt_position(&mut self.rng)
    }

    fn position_valid(
        &self,
        pos: (i32, i32),
        existing: &[(i32, i32)],
        rules: &Placement,
    ) -> bool {
        if self.grid.get_tile(pos.0, pos.1) != Some(Tile::Dirt) {
            return false;
        }
        if existing
            .iter()
            .any(|&other| collision::grid_distance(pos, other) < rules.min_dist)
        {
            return false;
        }
        if rules.player_min_dist > 0.0 {
            let start = (self.config.player_start_x, self.config.player_start_y);
            if collision::grid_distance(pos, start) < rules.player_min_dist {
                return false;
            }
        }
        if rules.needs_support && (!self.grid.has_support(pos.0, pos.1) || pos.1 < 5) {
            return false;
        }
        true
    }

    /// One simulation tick. No-op outside the Playing state.
    pub fn update(&mut self, delta_ms: f64, input: &InputState) {
        if self.state != GameState::Playing {
            return;
        }
        self.now_ms += delta_ms;
        let now = self.now_ms;

        // Player: movement, digging, pumping
        let pumped = self.player.update(
            now,
            delta_ms,
            input,
            &mut self.grid,
            &mut self.monsters,
            &self.config,
            &mut self.events,
        );
        if let Some(id) = pumped {
            if let Some(m) = self.monsters.iter().find(|m| m.id == id) {
                let (x, y) = (m.x, m.y);
                self.on_monster_defeated(DefeatMethod::Pump, x, y);
            }
        }
        self.monsters.retain(|m| m.alive);

        // Monsters: AI, ghost phases, contact damage
        let mut player_hit = false;
        for monster in &mut self.monsters {
            monster.update(now, delta_ms, &self.player, &mut self.grid, &self.config);
            if monster.check_collision_with_player(&self.player) {
                player_hit = true;
            }
        }

        // Rocks: settling, falling, crushing
        for rock in &mut self.rocks {
            rock.update(now, delta_ms, &mut self.grid, &self.config, &mut self.events);
        }
        let mut crushed: Vec<(f64, f64)> = Vec::new();
        for rock in &self.rocks {
            for monster in &mut self.monsters {
                if rock.check_collision(&*monster) && monster.defeat() {
                    crushed.push((monster.x, monster.y));
                }
            }
            if rock.check_collision(&self.player) {
                player_hit = true;
            }
        }
        for (x, y) in crushed {
            self.on_monster_defeated(DefeatMethod::Rock, x, y);
        }
        self.monsters.retain(|m| m.alive);
        self.rocks.retain(|r| !r.destroyed);

        if player_hit {
            self.on_player_hit();
        }

        // Bonus items
        for bonus in &mut self.bonus_items {
            bonus.update(delta_ms);
            if bonus.check_collision(&self.player) {
                bonus.collect();
                self.score += self.config.score_bonus_item;
                self.events.push(GameEvent::BonusCollected {
                    x: bonus.x,
                    y: bonus.y,
                });
            }
        }
        self.bonus_items.retain(|b| !b.collected);

        if self.state == GameState::Playing && self.monsters_defeated >= self.total_monsters {
            self.score += self.config.score_level_complete * self.level;
            self.state = GameState::LevelComplete;
            self.events.push(GameEvent::LevelComplete);
        }
    }

    /// Score a defeat, growing the chain multiplier for quick follow-ups
    fn on_monster_defeated(&mut self, method: DefeatMethod, x: f64, y: f64) {
        let base = match method {
            DefeatMethod::Pump => self.config.score_monster_pump,
            DefeatMethod::Rock => self.config.score_monster_rock,
        };

        match self.last_chain_ms {
            Some(last) if self.now_ms - last < CHAIN_WINDOW_MS => {
                self.chain_multiplier += CHAIN_STEP;
            }
            _ => self.chain_multiplier = 1.0,
        }
        self.last_chain_ms = Some(self.now_ms);

        let award = (base as f64 * self.chain_multiplier).floor() as u32;
        self.score += award;
        self.monsters_defeated += 1;
        self.events
            .push(GameEvent::MonsterDefeated { x, y, method });
    }

    fn on_player_hit(&mut self) {
        if !self.player.take_damage(self.now_ms, &self.config) {
            return;
        }

        self.lives -= 1;
        self.events.push(GameEvent::PlayerHit {
            x: self.player.x,
            y: self.player.y,
        });

        if self.lives <= 0 {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        } else {
            let (sx, sy) = (self.config.player_start_x, self.config.player_start_y);
            let now = self.now_ms;
            self.player.reset(sx, sy, now, &self.config);
        }
    }

    /// Hand the accumulated events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
