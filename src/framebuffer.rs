//! RGB565 pixel buffer and the primitive drawing operations the compositor
//! and the image viewer share.

use crate::sprite::Sprite;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel at (x, y); `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<u16> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn clear(&mut self, color: u16) {
        self.pixels.fill(color);
    }

    /// Write one pixel; off-buffer writes are dropped.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u16) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn hline(&mut self, y: i32, color: u16) {
        self.fill_rect(0, y, self.width as i32, 1, color);
    }

    /// Draw `sprite` stretched into the `w`×`h` box at (x, y).  Destination
    /// pixel (dx, dy) samples source `(dx*sw/w, dy*sh/h)`; pixels equal to
    /// `key` are skipped.
    pub fn blit_scaled(
        &mut self,
        sprite: &Sprite,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        key: Option<u16>,
    ) {
        if w == 0 || h == 0 {
            return;
        }
        for dy in 0..h {
            let sy = (u64::from(dy) * u64::from(sprite.height) / u64::from(h)) as u32;
            for dx in 0..w {
                let sx = (u64::from(dx) * u64::from(sprite.width) / u64::from(w)) as u32;
                let color = sprite.pixel(sx, sy);
                if Some(color) != key {
                    self.draw_pixel(x + dx as i32, y + dy as i32, color);
                }
            }
        }
    }
}

/// Where and how large an image lands when scaled to fit a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Largest uniform scale that fits `image_w`×`image_h` on the screen,
/// centred.
pub fn fit_box(image_w: u32, image_h: u32, screen_w: u32, screen_h: u32) -> FitBox {
    let scale = (screen_w as f32 / image_w as f32).min(screen_h as f32 / image_h as f32);
    let width = ((image_w as f32 * scale) as u32).clamp(1, screen_w);
    let height = ((image_h as f32 * scale) as u32).clamp(1, screen_h);
    FitBox {
        x: (screen_w - width) as i32 / 2,
        y: (screen_h - height) as i32 / 2,
        width,
        height,
    }
}

/// Render `image` scale-to-fit on a black screen.
pub fn scale_to_fit(image: &Sprite, screen_w: u32, screen_h: u32) -> PixelBuffer {
    let mut frame = PixelBuffer::new(screen_w, screen_h);
    let fit = fit_box(image.width, image.height, screen_w, screen_h);
    frame.blit_scaled(image, fit.x, fit.y, fit.width, fit.height, None);
    frame
}
