//! Fixed-width bitmap font.
//!
//! A glyph is `height` bytes, one per row, one bit per pixel column with the
//! leftmost column in the most significant bit.  Glyphs are stored in
//! character order starting at `first_char`.

use crate::framebuffer::PixelBuffer;

#[derive(Clone, Copy, Debug)]
pub struct Font {
    pub first_char: u8,
    pub glyph_count: u8,
    pub width: u32,
    pub height: u32,
    pub bits: &'static [u8],
}

impl Font {
    /// Row bitmasks for `ch`, or `None` if the font has no such glyph.
    /// Lowercase letters use the uppercase glyphs.
    pub fn glyph(&self, ch: char) -> Option<&'static [u8]> {
        let code = u32::from(ch.to_ascii_uppercase());
        let first = u32::from(self.first_char);
        if code < first || code >= first + u32::from(self.glyph_count) {
            return None;
        }
        let start = (code - first) as usize * self.height as usize;
        self.bits.get(start..start + self.height as usize)
    }

    /// Advance of one character, zero for characters outside the font.
    pub fn char_width(&self, ch: char) -> u32 {
        if self.glyph(ch).is_some() {
            self.width
        } else {
            0
        }
    }

    /// Pixel width of the first line of `text` at `scale`, one-pixel gaps
    /// between glyphs included.
    pub fn string_width(&self, text: &str, scale: u32) -> u32 {
        let width: u32 = text
            .chars()
            .take_while(|&c| c != '\n')
            .map(|c| (self.char_width(c) + 1) * scale)
            .sum();
        width.saturating_sub(scale)
    }
}

/// Draw one glyph with its top-left corner at (x, y).
pub fn draw_char(
    fb: &mut PixelBuffer,
    x: i32,
    y: i32,
    ch: char,
    font: &Font,
    color: u16,
    scale: u32,
) {
    let Some(rows) = font.glyph(ch) else {
        return;
    };
    let s = scale as i32;
    for (j, row) in rows.iter().enumerate() {
        let mut mask = 0x80u8;
        for i in 0..font.width.min(8) as i32 {
            if row & mask != 0 {
                fb.fill_rect(x + i * s, y + j as i32 * s, s, s, color);
            }
            mask >>= 1;
        }
    }
}

/// Draw `text`; `\n` returns to `x` on the next line.
pub fn draw_string(
    fb: &mut PixelBuffer,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    color: u16,
    scale: u32,
) {
    let (mut cx, mut cy) = (x, y);
    for ch in text.chars() {
        if ch == '\n' {
            cx = x;
            cy += (font.height * scale) as i32;
            continue;
        }
        draw_char(fb, cx, cy, ch, font, color, scale);
        cx += ((font.char_width(ch) + 1) * scale) as i32;
    }
}

/// 5×7 glyphs for `' '..='Z'`.
pub const FONT_5X7: Font = Font {
    first_char: b' ',
    glyph_count: 59,
    width: 5,
    height: 7,
    bits: &FONT_5X7_BITS,
};

#[rustfmt::skip]
const FONT_5X7_BITS: [u8; 59 * 7] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // ' '
    0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x20, // '!'
    0x50, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, // '"'
    0x50, 0x50, 0xF8, 0x50, 0xF8, 0x50, 0x50, // '#'
    0x20, 0x78, 0xA0, 0x70, 0x28, 0xF0, 0x20, // '$'
    0xC0, 0xC8, 0x10, 0x20, 0x40, 0x98, 0x18, // '%'
    0x60, 0x90, 0xA0, 0x40, 0xA8, 0x90, 0x68, // '&'
    0x20, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, // '\''
    0x10, 0x20, 0x40, 0x40, 0x40, 0x20, 0x10, // '('
    0x40, 0x20, 0x10, 0x10, 0x10, 0x20, 0x40, // ')'
    0x00, 0x20, 0xA8, 0x70, 0xA8, 0x20, 0x00, // '*'
    0x00, 0x20, 0x20, 0xF8, 0x20, 0x20, 0x00, // '+'
    0x00, 0x00, 0x00, 0x00, 0x60, 0x20, 0x40, // ','
    0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, // '-'
    0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x60, // '.'
    0x00, 0x08, 0x10, 0x20, 0x40, 0x80, 0x00, // '/'
    0x70, 0x88, 0x98, 0xA8, 0xC8, 0x88, 0x70, // '0'
    0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70, // '1'
    0x70, 0x88, 0x08, 0x10, 0x20, 0x40, 0xF8, // '2'
    0xF8, 0x10, 0x20, 0x10, 0x08, 0x88, 0x70, // '3'
    0x10, 0x30, 0x50, 0x90, 0xF8, 0x10, 0x10, // '4'
    0xF8, 0x80, 0xF0, 0x08, 0x08, 0x88, 0x70, // '5'
    0x30, 0x40, 0x80, 0xF0, 0x88, 0x88, 0x70, // '6'
    0xF8, 0x08, 0x10, 0x20, 0x40, 0x40, 0x40, // '7'
    0x70, 0x88, 0x88, 0x70, 0x88, 0x88, 0x70, // '8'
    0x70, 0x88, 0x88, 0x78, 0x08, 0x10, 0x60, // '9'
    0x00, 0x60, 0x60, 0x00, 0x60, 0x60, 0x00, // ':'
    0x00, 0x60, 0x60, 0x00, 0x60, 0x20, 0x40, // ';'
    0x10, 0x20, 0x40, 0x80, 0x40, 0x20, 0x10, // '<'
    0x00, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, // '='
    0x40, 0x20, 0x10, 0x08, 0x10, 0x20, 0x40, // '>'
    0x70, 0x88, 0x08, 0x10, 0x20, 0x00, 0x20, // '?'
    0x70, 0x88, 0x08, 0x68, 0xA8, 0xA8, 0x70, // '@'
    0x70, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, // 'A'
    0xF0, 0x88, 0x88, 0xF0, 0x88, 0x88, 0xF0, // 'B'
    0x70, 0x88, 0x80, 0x80, 0x80, 0x88, 0x70, // 'C'
    0xE0, 0x90, 0x88, 0x88, 0x88, 0x90, 0xE0, // 'D'
    0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0xF8, // 'E'
    0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0x80, // 'F'
    0x70, 0x88, 0x80, 0xB8, 0x88, 0x88, 0x78, // 'G'
    0x88, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, // 'H'
    0x70, 0x20, 0x20, 0x20, 0x20, 0x20, 0x70, // 'I'
    0x38, 0x10, 0x10, 0x10, 0x10, 0x90, 0x60, // 'J'
    0x88, 0x90, 0xA0, 0xC0, 0xA0, 0x90, 0x88, // 'K'
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xF8, // 'L'
    0x88, 0xD8, 0xA8, 0xA8, 0x88, 0x88, 0x88, // 'M'
    0x88, 0x88, 0xC8, 0xA8, 0x98, 0x88, 0x88, // 'N'
    0x70, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, // 'O'
    0xF0, 0x88, 0x88, 0xF0, 0x80, 0x80, 0x80, // 'P'
    0x70, 0x88, 0x88, 0x88, 0xA8, 0x90, 0x68, // 'Q'
    0xF0, 0x88, 0x88, 0xF0, 0xA0, 0x90, 0x88, // 'R'
    0x78, 0x80, 0x80, 0x70, 0x08, 0x08, 0xF0, // 'S'
    0xF8, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, // 'T'
    0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, // 'U'
    0x88, 0x88, 0x88, 0x88, 0x88, 0x50, 0x20, // 'V'
    0x88, 0x88, 0x88, 0xA8, 0xA8, 0xA8, 0x50, // 'W'
    0x88, 0x88, 0x50, 0x20, 0x50, 0x88, 0x88, // 'X'
    0x88, 0x88, 0x50, 0x20, 0x20, 0x20, 0x20, // 'Y'
    0xF8, 0x08, 0x10, 0x20, 0x40, 0x80, 0xF8, // 'Z'
];
