//! The physical I/O provider, seen from the game core.
//!
//! The board exposes a knob register, an LCD, an RGB LED strip and a
//! millisecond clock.  The core only talks to these traits; `terminal`
//! implements them on top of crossterm and the tests use scripted fakes.

use std::io;
use std::time::Instant;

use crate::framebuffer::PixelBuffer;

/// The 32-bit knobs register: three 8-bit rotation counters and three
/// push-button bits.
pub trait KnobPanel {
    fn read_knobs(&self) -> u32;
}

/// Full-screen RGB565 output.
pub trait DisplaySink {
    fn present(&mut self, frame: &PixelBuffer) -> io::Result<()>;
}

/// Status LEDs.  Called as a side channel; never part of game state.
pub trait LedStrip {
    /// Briefly light the LEDs in an RGB565 colour.
    fn flash(&mut self, color: u16);
    fn all_off(&mut self);
}

/// Wall-clock milliseconds, read once per tick.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
