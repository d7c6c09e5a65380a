mod audio;
mod bonus;
mod collision;
mod config;
mod game;
mod grid;
mod input_system;
mod monster;
mod particles;
mod player;
mod render;
mod rock;

use std::time::{Duration, Instant};

use log::{info, warn};
use rand::Rng;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::render::BlendMode;

use crate::audio::{AudioManager, Sound};
use crate::config::GameConfig;
use crate::game::types::{GameEvent, GameState, TILE_SIZE};
use crate::game::world::GameWorld;
use crate::input_system::read_input;
use crate::particles::ParticleSystem;

const CONFIG_PATH: &str = "assets/config/game.json";

/// Frames longer than this are clamped so a stall never teleports entities
const MAX_DELTA_MS: f64 = 100.0;

fn main() -> Result<(), String> {
    env_logger::init();

    let config = match GameConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            warn!("could not load {}: {}, using defaults", CONFIG_PATH, e);
            GameConfig::default()
        }
    };

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window_w = (config.grid_width * TILE_SIZE) as u32;
    let window_h = (config.grid_height * TILE_SIZE) as u32;
    let window = video_subsystem
        .window("Digger", window_w, window_h)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas.set_blend_mode(BlendMode::Blend);

    // The game stays playable without a sound device
    let mut audio = match sdl_context.audio().and_then(|a| AudioManager::new(&a)) {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("audio unavailable: {}", e);
            None
        }
    };

    let seed: u64 = rand::rng().random();
    let mut world = GameWorld::new(config, seed);
    let mut particles = ParticleSystem::new();

    info!("starting up (seed {})", seed);

    let mut event_pump = sdl_context.event_pump()?;
    let mut last_frame = Instant::now();

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::Return),
                    repeat: false,
                    ..
                } => match world.state {
                    GameState::Title | GameState::GameOver => world.start_game(),
                    GameState::LevelComplete => world.next_level(),
                    _ => {}
                },
                Event::KeyDown {
                    keycode: Some(Keycode::Escape) | Some(Keycode::P),
                    repeat: false,
                    ..
                } => world.toggle_pause(),
                _ => {}
            }
        }

        let now = Instant::now();
        let delta_ms = (now.duration_since(last_frame).as_secs_f64() * 1000.0).min(MAX_DELTA_MS);
        last_frame = now;

        let input = read_input(&event_pump.keyboard_state());
        world.update(delta_ms, &input);

        for event in world.drain_events() {
            dispatch_event(&event, audio.as_mut(), &mut particles);
        }
        particles.update(delta_ms);

        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();
        if world.state != GameState::Title {
            render::draw_world(&mut canvas, &world)?;
            particles.render(&mut canvas)?;
            render::draw_hud(&mut canvas, &world)?;
        }
        render::draw_overlay(&mut canvas, &world)?;
        canvas.present();

        std::thread::sleep(Duration::from_millis(16));
    }

    Ok(())
}

/// Route one simulation event to the audio and particle sinks
fn dispatch_event(
    event: &GameEvent,
    audio: Option<&mut AudioManager>,
    particles: &mut ParticleSystem,
) {
    let half = TILE_SIZE as f64 / 2.0;
    let sound = match *event {
        GameEvent::Dug { .. } => Some(Sound::Dig),
        GameEvent::PumpStage(stage) => Some(Sound::Pump(stage)),
        GameEvent::MonsterDefeated { x, y, .. } => {
            particles.create_explosion(x + half, y + half, Color::RGB(255, 0, 255), 30);
            Some(Sound::MonsterDefeat)
        }
        GameEvent::RockLanded => Some(Sound::RockFall),
        GameEvent::PlayerHit { x, y } => {
            particles.create_explosion(x + half, y + half, Color::RGB(255, 255, 255), 20);
            Some(Sound::Damage)
        }
        GameEvent::BonusCollected { x, y } => {
            particles.create_explosion(x + half, y + half, Color::RGB(255, 215, 0), 16);
            Some(Sound::Collect)
        }
        GameEvent::LevelComplete => Some(Sound::LevelComplete),
        GameEvent::GameOver => Some(Sound::GameOver),
    };

    if let (Some(audio), Some(sound)) = (audio, sound) {
        audio.play(sound);
    }
}
