// Lightweight particle bursts for defeats, hits and pickups. Purely
// cosmetic; the simulation never reads back from here.

use rand::Rng;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::game::types::delta_frames;

const GRAVITY: f64 = 0.12;
const FRICTION: f64 = 0.99;

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life_ms: f64,
    max_life_ms: f64,
    size: f64,
    color: Color,
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        ParticleSystem {
            particles: Vec::new(),
        }
    }

    /// Radial burst centered on a pixel position. The base color is mixed
    /// with white/yellow/orange sparks.
    pub fn create_explosion(&mut self, x: f64, y: f64, color: Color, count: u32) {
        let mut rng = rand::rng();
        let palette = [
            color,
            Color::RGB(255, 255, 255),
            Color::RGB(255, 255, 0),
            Color::RGB(255, 136, 0),
        ];

        for i in 0..count {
            let angle = (i as f64 / count as f64) * std::f64::consts::TAU;
            let speed = rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                // Slight upward bias so bursts fountain
                vy: angle.sin() * speed - 1.0,
                life_ms: 0.0,
                max_life_ms: rng.random_range(300.0..500.0),
                size: rng.random_range(3.0..6.0),
                color: palette[rng.random_range(0..palette.len())],
            });
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        let frames = delta_frames(delta_ms);
        for p in &mut self.particles {
            p.x += p.vx * frames;
            p.y += p.vy * frames;
            p.vy += GRAVITY * frames;
            p.vx *= FRICTION.powf(frames);
            p.vy *= FRICTION.powf(frames);
            p.life_ms += delta_ms;
        }
        self.particles.retain(|p| p.life_ms < p.max_life_ms);
    }

    /// Particles shrink and fade over their lifetime
    pub fn render(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        for p in &self.particles {
            let remaining = 1.0 - p.life_ms / p.max_life_ms;
            let size = (p.size * remaining).max(1.0) as u32;
            let alpha = (remaining * 255.0) as u8;

            let color = Color::RGBA(p.color.r, p.color.g, p.color.b, alpha);
            canvas.set_draw_color(color);
            canvas.fill_rect(Rect::new(
                (p.x - size as f64 / 2.0) as i32,
                (p.y - size as f64 / 2.0) as i32,
                size,
                size,
            ))?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_spawns_requested_count() {
        let mut system = ParticleSystem::new();
        system.create_explosion(100.0, 100.0, Color::RGB(255, 0, 255), 16);
        assert_eq!(system.particles.len(), 16);
    }

    #[test]
    fn test_particles_expire() {
        let mut system = ParticleSystem::new();
        system.create_explosion(0.0, 0.0, Color::RGB(255, 255, 255), 8);

        // Max lifetime is 500ms; well past that everything is gone
        for _ in 0..40 {
            system.update(16.0);
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_gravity_pulls_particles_down() {
        let mut system = ParticleSystem::new();
        system.create_explosion(0.0, 0.0, Color::RGB(255, 255, 255), 4);
        let before: f64 = system.particles.iter().map(|p| p.vy).sum();
        system.update(16.0);
        let after: f64 = system.particles.iter().map(|p| p.vy).sum();
        assert!(after > before);
    }
}
