//! Frame compositor. Turns a `GameState` into RGB565 pixels.
//!
//! No game logic lives here; every function only reads the state.  The
//! output buffer is reused frame to frame.

use crate::entities::{
    GameState, BULLET_HEIGHT, BULLET_WIDTH, ENEMY_BULLET_HEIGHT, ENEMY_BULLET_WIDTH,
    ENEMY_HEIGHT, ENEMY_WIDTH, MYSTERY_SHIP_HEIGHT, MYSTERY_SHIP_WIDTH,
};
use crate::font::{draw_string, Font, FONT_5X7};
use crate::framebuffer::PixelBuffer;
use crate::sprite::TRANSPARENT_KEY;

// ── Colour palette ────────────────────────────────────────────────────────────

/// Background per level; levels past the end reuse the last entry.
pub const LEVEL_BACKGROUNDS: [u16; 5] = [0x0000, 0x0008, 0x2004, 0x0140, 0x3000];
pub const C_BOUNDARY: u16 = 0xFFFF;
pub const C_HUD: u16 = 0xFFFF;
/// Player bullets, indexed by player.
pub const C_PLAYER_BULLETS: [u16; 2] = [0xFFE0, 0x07FF];
pub const C_ENEMY_BULLET: u16 = 0xF800;
pub const C_GAME_OVER: u16 = 0xF800;

const HUD_FONT: &Font = &FONT_5X7;
const HUD_SCALE: u32 = 2;
const HUD_MARGIN: i32 = 10;
const HUD_OFFSET_Y: i32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

pub fn background_for_level(level: u32) -> u16 {
    let index = (level.max(1) - 1) as usize;
    LEVEL_BACKGROUNDS[index.min(LEVEL_BACKGROUNDS.len() - 1)]
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Compose one complete frame into `fb`.
pub fn render(state: &GameState, fb: &mut PixelBuffer) {
    fb.clear(background_for_level(state.level));
    fb.hline(state.boundary_y, C_BOUNDARY);

    draw_enemies(fb, state);
    draw_mystery_ship(fb, state);
    draw_ships(fb, state);
    draw_bullets(fb, state);
    draw_hud(fb, state);

    if state.is_over() {
        draw_game_over(fb, state);
    }
}

/// Compose a frame into a fresh buffer sized to the state's screen.
pub fn render_frame(state: &GameState) -> PixelBuffer {
    let mut fb = PixelBuffer::new(state.width as u32, state.height as u32);
    render(state, &mut fb);
    fb
}

/// Draw `text` on row `y`, aligned against the screen edges with `margin`.
pub fn draw_anchored(
    fb: &mut PixelBuffer,
    y: i32,
    text: &str,
    anchor: Anchor,
    margin: i32,
    color: u16,
    scale: u32,
) {
    let text_width = HUD_FONT.string_width(text, scale) as i32;
    let x = match anchor {
        Anchor::Left => margin,
        Anchor::Center => (fb.width() as i32 - text_width) / 2,
        Anchor::Right => fb.width() as i32 - margin - text_width,
    };
    draw_string(fb, x, y, text, HUD_FONT, color, scale);
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_enemies(fb: &mut PixelBuffer, state: &GameState) {
    for enemy in state.formation.alive() {
        let sprite = &state.sprites.enemies[enemy.kind.index()];
        fb.blit_scaled(
            sprite,
            enemy.x,
            enemy.y,
            ENEMY_WIDTH as u32,
            ENEMY_HEIGHT as u32,
            Some(TRANSPARENT_KEY),
        );
    }
}

fn draw_mystery_ship(fb: &mut PixelBuffer, state: &GameState) {
    let m = &state.mystery;
    if m.active {
        fb.blit_scaled(
            &state.sprites.mystery,
            m.x,
            m.y,
            MYSTERY_SHIP_WIDTH as u32,
            MYSTERY_SHIP_HEIGHT as u32,
            Some(TRANSPARENT_KEY),
        );
    }
}

fn draw_ships(fb: &mut PixelBuffer, state: &GameState) {
    for ship in state.ships.iter().filter(|s| s.is_alive()) {
        fb.blit_scaled(
            &ship.sprite,
            ship.x,
            ship.y,
            ship.width as u32,
            ship.height as u32,
            Some(TRANSPARENT_KEY),
        );
    }
}

fn draw_bullets(fb: &mut PixelBuffer, state: &GameState) {
    for (player, ship) in state.ships.iter().enumerate() {
        let color = C_PLAYER_BULLETS[player.min(C_PLAYER_BULLETS.len() - 1)];
        for b in ship.bullets.active() {
            fb.fill_rect(b.x, b.y, BULLET_WIDTH, BULLET_HEIGHT, color);
        }
    }
    for b in state.formation.bullets.active() {
        fb.fill_rect(b.x, b.y, ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT, C_ENEMY_BULLET);
    }
}

// ── HUD (under the boundary line) ─────────────────────────────────────────────

fn draw_hud(fb: &mut PixelBuffer, state: &GameState) {
    let y = state.boundary_y + HUD_OFFSET_Y;
    let level = format!("LEVEL {}", state.level);
    draw_anchored(fb, y, &level, Anchor::Center, HUD_MARGIN, C_HUD, HUD_SCALE);

    if state.multiplayer() {
        for (player, (ship, anchor)) in state
            .ships
            .iter()
            .zip([Anchor::Left, Anchor::Right])
            .enumerate()
        {
            let text = format!("P{} {} L{}", player + 1, ship.score, ship.lives);
            let color = C_PLAYER_BULLETS[player];
            draw_anchored(fb, y, &text, anchor, HUD_MARGIN, color, HUD_SCALE);
        }
    } else if let Some(ship) = state.ships.first() {
        let score = format!("SCORE: {}", ship.score);
        let lives = format!("LIVES: {}", ship.lives);
        draw_anchored(fb, y, &score, Anchor::Left, HUD_MARGIN, C_HUD, HUD_SCALE);
        draw_anchored(fb, y, &lives, Anchor::Right, HUD_MARGIN, C_HUD, HUD_SCALE);
    }
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over(fb: &mut PixelBuffer, state: &GameState) {
    let cy = state.boundary_y / 2;
    draw_anchored(fb, cy - 30, "GAME OVER", Anchor::Center, 0, C_GAME_OVER, 4);
    let score = format!("SCORE {}", state.best_score());
    draw_anchored(fb, cy + 10, &score, Anchor::Center, 0, C_HUD, 2);
}
