// Pull-based draw pass: reads the world each frame and paints it with
// procedural rectangles. No sprite assets; everything is flat rects and a
// small bitmap font.

use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::game::types::{Direction, GameState, TILE_SIZE};
use crate::game::world::GameWorld;
use crate::grid::{SKY_ROWS, Tile};
use crate::monster::MonsterKind;
use crate::rock::RockState;

const COLOR_SKY: Color = Color::RGB(0, 0, 32);
const COLOR_TUNNEL: Color = Color::RGB(0, 0, 0);
const COLOR_ROCK: Color = Color::RGB(255, 184, 81);
const COLOR_BONUS: Color = Color::RGB(255, 215, 0);
const COLOR_PLAYER: Color = Color::RGB(255, 255, 255);
const COLOR_MONSTER_BASIC: Color = Color::RGB(255, 0, 0);
const COLOR_MONSTER_FAST: Color = Color::RGB(0, 255, 0);
const COLOR_HUD: Color = Color::RGB(255, 255, 255);

/// Dirt gets warmer to darker bands with depth
const DIRT_LAYERS: [Color; 4] = [
    Color::RGB(232, 160, 0),
    Color::RGB(208, 112, 0),
    Color::RGB(184, 64, 0),
    Color::RGB(144, 24, 0),
];

pub fn draw_world(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    draw_grid(canvas, world)?;
    draw_bonus_items(canvas, world)?;
    draw_rocks(canvas, world)?;
    draw_monsters(canvas, world)?;
    draw_player(canvas, world)?;
    Ok(())
}

fn draw_grid(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    let grid = &world.grid;
    let depth_span = (grid.height - SKY_ROWS).max(1);

    for y in 0..grid.height {
        for x in 0..grid.width {
            let color = match grid.get_tile(x, y) {
                Some(Tile::Dirt) => {
                    let band = ((y - SKY_ROWS) * DIRT_LAYERS.len() as i32 / depth_span)
                        .clamp(0, DIRT_LAYERS.len() as i32 - 1);
                    DIRT_LAYERS[band as usize]
                }
                Some(Tile::Tunnel) => COLOR_TUNNEL,
                Some(Tile::Rock) => continue, // drawn per-entity with wobble
                Some(Tile::Bonus) => COLOR_BONUS,
                Some(Tile::Empty) | None => {
                    if y < SKY_ROWS {
                        COLOR_SKY
                    } else {
                        COLOR_TUNNEL
                    }
                }
            };
            canvas.set_draw_color(color);
            canvas.fill_rect(tile_rect(x, y))?;
        }
    }
    Ok(())
}

fn draw_rocks(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    for rock in &world.rocks {
        // Wobbling rocks jitter side to side
        let jitter = if rock.state == RockState::Wobbling {
            if (world.time_ms() / 50.0) as i64 % 2 == 0 { 2 } else { -2 }
        } else {
            0
        };
        canvas.set_draw_color(COLOR_ROCK);
        canvas.fill_rect(Rect::new(
            rock.x as i32 + 4 + jitter,
            rock.y as i32 + 4,
            (TILE_SIZE - 8) as u32,
            (TILE_SIZE - 8) as u32,
        ))?;
    }
    Ok(())
}

fn draw_monsters(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    for monster in &world.monsters {
        // Inflation grows the body past the tile edges
        let grow = monster.inflate_stage as i32 * 4;
        let inset = (8 - grow).max(-8);
        let size = (TILE_SIZE - 2 * inset) as u32;

        let color = if monster.ghost {
            Color::RGBA(255, 255, 255, 140)
        } else {
            match monster.kind {
                MonsterKind::Basic => COLOR_MONSTER_BASIC,
                MonsterKind::Fast => COLOR_MONSTER_FAST,
            }
        };
        canvas.set_draw_color(color);
        canvas.fill_rect(Rect::new(
            monster.x as i32 + inset,
            monster.y as i32 + inset,
            size,
            size,
        ))?;

        // Eyes
        canvas.set_draw_color(Color::RGB(255, 255, 255));
        let eye_y = monster.y as i32 + TILE_SIZE / 3;
        canvas.fill_rect(Rect::new(monster.x as i32 + 14, eye_y, 6, 6))?;
        canvas.fill_rect(Rect::new(monster.x as i32 + TILE_SIZE - 20, eye_y, 6, 6))?;
    }
    Ok(())
}

fn draw_player(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    let player = &world.player;
    if !player.alive {
        return Ok(());
    }
    // Invincibility flicker
    if player.invincible && (world.time_ms() / 100.0) as i64 % 2 == 0 {
        return Ok(());
    }

    // Pump hose to the latched monster
    if player.pumping {
        if let Some(target) = player
            .pump_target()
            .and_then(|id| world.monsters.iter().find(|m| m.id == id))
        {
            let half = TILE_SIZE / 2;
            canvas.set_draw_color(Color::RGB(200, 200, 200));
            canvas.draw_line(
                (player.x as i32 + half, player.y as i32 + half),
                (target.x as i32 + half, target.y as i32 + half),
            )?;
        }
    }

    canvas.set_draw_color(COLOR_PLAYER);
    canvas.fill_rect(Rect::new(
        player.x as i32 + 8,
        player.y as i32 + 8,
        (TILE_SIZE - 16) as u32,
        (TILE_SIZE - 16) as u32,
    ))?;

    // Facing eye
    let half = TILE_SIZE / 2;
    let (ex, ey) = match player.direction {
        Direction::Up => (half - 3, 10),
        Direction::Down => (half - 3, TILE_SIZE - 16),
        Direction::Left => (10, half - 3),
        Direction::Right | Direction::None => (TILE_SIZE - 16, half - 3),
    };
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.fill_rect(Rect::new(player.x as i32 + ex, player.y as i32 + ey, 6, 6))?;
    Ok(())
}

fn draw_bonus_items(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    for bonus in &world.bonus_items {
        if !bonus.blink_on() {
            continue;
        }
        // Diamond built from shrinking slices
        canvas.set_draw_color(COLOR_BONUS);
        let cx = bonus.x as i32 + TILE_SIZE / 2;
        let cy = bonus.y as i32 + TILE_SIZE / 2;
        let radius = TILE_SIZE / 2 - 6;
        for dy in -radius..=radius {
            let w = radius - dy.abs();
            canvas.fill_rect(Rect::new(cx - w, cy + dy, (w * 2).max(1) as u32, 1))?;
        }
    }
    Ok(())
}

pub fn draw_hud(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    let score = format!("SCORE {:06}", world.score);
    draw_text(canvas, &score, 8, 8, COLOR_HUD, 2)?;

    let lives = format!("LIVES {}", world.lives.max(0));
    draw_text(canvas, &lives, 8, 26, COLOR_HUD, 2)?;

    let level = format!("LEVEL {}", world.level);
    let x = world.grid.width * TILE_SIZE - text_width(&level, 2) - 8;
    draw_text(canvas, &level, x, 8, COLOR_HUD, 2)?;
    Ok(())
}

/// Full-screen overlay for the non-playing states
pub fn draw_overlay(canvas: &mut Canvas<Window>, world: &GameWorld) -> Result<(), String> {
    let (w, h) = (world.grid.width * TILE_SIZE, world.grid.height * TILE_SIZE);

    match world.state {
        GameState::Title => {
            canvas.set_draw_color(Color::RGB(0, 0, 0));
            canvas.clear();
            draw_text_centered(canvas, "DIGGER", w, h / 2 - 60, COLOR_BONUS, 6)?;
            draw_text_centered(canvas, "ARROWS OR WASD TO DIG", w, h / 2 + 10, COLOR_HUD, 2)?;
            draw_text_centered(canvas, "SPACE TO PUMP", w, h / 2 + 30, COLOR_HUD, 2)?;
            draw_text_centered(canvas, "PRESS ENTER TO START", w, h / 2 + 70, COLOR_HUD, 2)?;
        }
        GameState::Paused => {
            dim(canvas, w, h)?;
            draw_text_centered(canvas, "PAUSED", w, h / 2 - 10, COLOR_HUD, 4)?;
        }
        GameState::LevelComplete => {
            dim(canvas, w, h)?;
            draw_text_centered(canvas, "LEVEL COMPLETE", w, h / 2 - 20, COLOR_BONUS, 4)?;
            draw_text_centered(canvas, "PRESS ENTER", w, h / 2 + 30, COLOR_HUD, 2)?;
        }
        GameState::GameOver => {
            dim(canvas, w, h)?;
            draw_text_centered(canvas, "GAME OVER", w, h / 2 - 20, Color::RGB(255, 0, 0), 4)?;
            let score = format!("SCORE {:06}", world.score);
            draw_text_centered(canvas, &score, w, h / 2 + 30, COLOR_HUD, 2)?;
            draw_text_centered(canvas, "PRESS ENTER", w, h / 2 + 50, COLOR_HUD, 2)?;
        }
        GameState::Playing => {}
    }
    Ok(())
}

fn dim(canvas: &mut Canvas<Window>, w: i32, h: i32) -> Result<(), String> {
    canvas.set_draw_color(Color::RGBA(0, 0, 0, 170));
    canvas.fill_rect(Rect::new(0, 0, w as u32, h as u32))?;
    Ok(())
}

fn tile_rect(x: i32, y: i32) -> Rect {
    Rect::new(x * TILE_SIZE, y * TILE_SIZE, TILE_SIZE as u32, TILE_SIZE as u32)
}

fn text_width(text: &str, scale: u32) -> i32 {
    text.chars().count() as i32 * 6 * scale as i32
}

fn draw_text_centered(
    canvas: &mut Canvas<Window>,
    text: &str,
    screen_w: i32,
    y: i32,
    color: Color,
    scale: u32,
) -> Result<(), String> {
    let x = (screen_w - text_width(text, scale)) / 2;
    draw_text(canvas, text, x, y, color, scale)
}

/// Render text with a procedural 5x5 bitmap font (uppercase + digits)
pub fn draw_text(
    canvas: &mut Canvas<Window>,
    text: &str,
    x: i32,
    y: i32,
    color: Color,
    scale: u32,
) -> Result<(), String> {
    canvas.set_draw_color(color);
    let px = scale as i32;

    for (i, c) in text.chars().enumerate() {
        let glyph = glyph(c.to_ascii_uppercase());
        let cx = x + i as i32 * 6 * px;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..5 {
                if bits & (0b10000 >> col) != 0 {
                    canvas.fill_rect(Rect::new(
                        cx + col * px,
                        y + row as i32 * px,
                        scale,
                        scale,
                    ))?;
                }
            }
        }
    }
    Ok(())
}

fn glyph(c: char) -> [u8; 5] {
    match c {
        'A' => [0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
        'C' => [0b01111, 0b10000, 0b10000, 0b10000, 0b01111],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000],
        'G' => [0b01111, 0b10000, 0b10011, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b11100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b11110, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'Y' => [0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00110, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00110, 0b00001, 0b11110],
        '4' => [0b10001, 0b10001, 0b11111, 0b00001, 0b00001],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b00100],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b01111, 0b00001, 0b01110],
        ' ' => [0, 0, 0, 0, 0],
        _ => [0b11111, 0b11111, 0b11111, 0b11111, 0b11111],
    }
}
