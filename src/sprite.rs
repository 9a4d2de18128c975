//! Sprite store: decoded RGB565 images shared by reference-counted handle.
//!
//! Sprites are loaded once at setup.  Every enemy cell of a kind draws the
//! same `Rc<Sprite>`; nothing is duplicated and the last handle dropped frees
//! the image.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{GameError, SpriteError};

/// Pixel value treated as "do not draw" when blitting sprites.
pub const TRANSPARENT_KEY: u16 = 0x0000;

/// A decoded image in RGB565, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u16>,
}

pub type SpriteHandle = Rc<Sprite>;

impl Sprite {
    pub fn new(width: u32, height: u32, pixels: Vec<u16>) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::Empty);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .unwrap_or(usize::MAX);
        if pixels.len() != expected {
            return Err(SpriteError::Truncated {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a sprite from ASCII art: `#` is `color`, anything else transparent.
    /// Rows shorter than the first are padded with transparency.
    pub fn from_art(rows: &[&str], color: u16) -> Self {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for row in rows {
            let mut chars = row.chars();
            for _ in 0..width {
                let px = match chars.next() {
                    Some('#') => color,
                    _ => TRANSPARENT_KEY,
                };
                pixels.push(px);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u16 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Convert 8-bit-per-channel RGB to the LCD's 5/6/5 format.
#[inline]
pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Expand an RGB565 value back to 8-bit channels (low bits replicated).
#[inline]
pub fn rgb565_to_rgb888(c: u16) -> (u8, u8, u8) {
    let r = ((c >> 11) & 0x1F) as u8;
    let g = ((c >> 5) & 0x3F) as u8;
    let b = (c & 0x1F) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

// ── Loaders ───────────────────────────────────────────────────────────────────

/// Source of named sprites.
pub trait SpriteLoader {
    fn load(&self, name: &str) -> Result<Sprite, SpriteError>;
}

/// Reads `<dir>/<name>.ppm` files.
#[derive(Clone, Debug)]
pub struct PpmLoader {
    dir: PathBuf,
}

impl PpmLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SpriteLoader for PpmLoader {
    fn load(&self, name: &str) -> Result<Sprite, SpriteError> {
        read_ppm(self.dir.join(format!("{name}.ppm")))
    }
}

pub fn read_ppm(path: impl AsRef<Path>) -> Result<Sprite, SpriteError> {
    let bytes = fs::read(path.as_ref())?;
    decode_ppm(&bytes)
}

/// Decode a binary (P6) PPM.  `#` comments are allowed between header fields.
pub fn decode_ppm(bytes: &[u8]) -> Result<Sprite, SpriteError> {
    let mut header = PpmHeader { bytes, pos: 0 };

    if header.token()? != b"P6" {
        return Err(SpriteError::BadMagic);
    }
    let width = header.number("width")?;
    let height = header.number("height")?;
    let max_color = header.number("max color")?;
    if max_color == 0 || max_color > 255 {
        return Err(SpriteError::BadHeader(format!(
            "unsupported max color {max_color}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(SpriteError::Empty);
    }
    // exactly one whitespace byte separates the header from the raster
    let data = bytes.get(header.pos + 1..).unwrap_or(&[]);

    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| SpriteError::BadHeader(format!("{width}x{height} is too large")))?;
    let actual = data.len() / 3;
    if actual < expected {
        return Err(SpriteError::Truncated { expected, actual });
    }

    let scale = |v: u8| -> u8 {
        if max_color == 255 {
            v
        } else {
            ((v as u32 * 255) / max_color).min(255) as u8
        }
    };
    let pixels = data
        .chunks_exact(3)
        .take(expected)
        .map(|p| rgb888_to_rgb565(scale(p[0]), scale(p[1]), scale(p[2])))
        .collect();

    Sprite::new(width, height, pixels)
}

struct PpmHeader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PpmHeader<'a> {
    fn token(&mut self) -> Result<&'a [u8], SpriteError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => {
                    while let Some(&b) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                Some(_) => break,
                None => return Err(SpriteError::BadHeader("unexpected end of header".into())),
            }
        }
        let start = self.pos;
        while let Some(b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self, field: &str) -> Result<u32, SpriteError> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SpriteError::BadHeader(format!("{field} is not a number")))
    }
}

// ── Built-in art ──────────────────────────────────────────────────────────────

const SHIP_ART: &[&str] = &[
    "......#......",
    ".....###.....",
    ".....###.....",
    ".###########.",
    "#############",
    "#############",
    "#############",
    "#############",
];

const SQUID_ART: &[&str] = &[
    "...##...",
    "..####..",
    ".######.",
    "##.##.##",
    "########",
    "..#..#..",
    ".#.##.#.",
    "#.#..#.#",
];

const CRAB_ART: &[&str] = &[
    "..#.....#..",
    "...#...#...",
    "..#######..",
    ".##.###.##.",
    "###########",
    "#.#######.#",
    "#.#.....#.#",
    "...##.##...",
];

const OCTOPUS_ART: &[&str] = &[
    "....####....",
    ".##########.",
    "############",
    "###..##..###",
    "############",
    "...##..##...",
    "..##.##.##..",
    "##........##",
];

const MYSTERY_ART: &[&str] = &[
    ".....######.....",
    "...##########...",
    "..############..",
    ".##.##.##.##.##.",
    "################",
    "..###..##..###..",
    "...#........#...",
];

/// Sprites drawn from ASCII art, so the game runs without asset files.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinSprites;

impl SpriteLoader for BuiltinSprites {
    fn load(&self, name: &str) -> Result<Sprite, SpriteError> {
        let sprite = match name {
            SHIP => Sprite::from_art(SHIP_ART, 0x07E0),
            SHIP2 => Sprite::from_art(SHIP_ART, 0x07FF),
            ENEMY_TOP => Sprite::from_art(SQUID_ART, 0xF81F),
            ENEMY_MID => Sprite::from_art(CRAB_ART, 0x07FF),
            ENEMY_BOTTOM => Sprite::from_art(OCTOPUS_ART, 0xFFFF),
            MYSTERY => Sprite::from_art(MYSTERY_ART, 0xF800),
            other => return Err(SpriteError::Unknown(other.to_string())),
        };
        Ok(sprite)
    }
}

// ── Sprite set ────────────────────────────────────────────────────────────────

pub const SHIP: &str = "ship";
pub const SHIP2: &str = "ship2";
pub const ENEMY_TOP: &str = "enemy_top";
pub const ENEMY_MID: &str = "enemy_mid";
pub const ENEMY_BOTTOM: &str = "enemy_bottom";
pub const MYSTERY: &str = "mystery";

/// Every sprite a game needs, loaded once at setup.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    /// Indexed by player; player 2 may share player 1's handle.
    pub ships: [SpriteHandle; 2],
    /// Indexed by `EnemyKind::index()`: top, middle, bottom.
    pub enemies: [SpriteHandle; 3],
    pub mystery: SpriteHandle,
}

impl SpriteSet {
    /// Load all required sprites.  Any missing required sprite is fatal; a
    /// missing second-player sprite falls back to the first player's.
    pub fn load(loader: &impl SpriteLoader, players: usize) -> Result<Self, GameError> {
        let required = |name: &str| -> Result<SpriteHandle, GameError> {
            loader
                .load(name)
                .map(Rc::new)
                .map_err(|source| GameError::SpriteLoad {
                    name: name.to_string(),
                    source,
                })
        };

        let ship = required(SHIP)?;
        let enemies = [
            required(ENEMY_TOP)?,
            required(ENEMY_MID)?,
            required(ENEMY_BOTTOM)?,
        ];
        let mystery = required(MYSTERY)?;

        let ship2 = if players > 1 {
            match loader.load(SHIP2) {
                Ok(sprite) => Rc::new(sprite),
                Err(e) => {
                    log::warn!("player 2 sprite unavailable ({e}), sharing player 1's");
                    Rc::clone(&ship)
                }
            }
        } else {
            Rc::clone(&ship)
        };

        log::info!(
            "sprites loaded: ship {}x{}, mystery {}x{}",
            ship.width,
            ship.height,
            mystery.width,
            mystery.height
        );

        Ok(Self {
            ships: [ship, ship2],
            enemies,
            mystery,
        })
    }
}
