//! Terminal emulation of the board. All terminal I/O lives here.
//!
//! Keys turn emulated knob counters, the 480×320 frame is drawn with
//! half-block cells (two pixels per cell), and the LED strip is a coloured
//! block on the status row.
//!
//! Input model: a dedicated thread does blocking `event::read()` calls and
//! forwards events over a channel.  Each frame the board drains the channel
//! and records the frame number of the last press/repeat of every key.  A key
//! counts as held while that record is fresher than `HOLD_WINDOW` frames,
//! which covers terminals that never send key-release events.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::board::{Clock, DisplaySink, KnobPanel, LedStrip, SystemClock};
use crate::framebuffer::PixelBuffer;
use crate::input::KnobId;
use crate::sprite::rgb565_to_rgb888;

/// Frames a key stays held after its last press/repeat event.
const HOLD_WINDOW: u64 = 4;
/// Knob detents per frame while a turn key is held.
const KNOB_STEP: u8 = 2;
/// How long an LED flash stays lit.
const LED_FLASH_MS: u64 = 120;

const HINT: &str = "P1: A/D turn, W/Space fire   P2: \u{2190}/\u{2192} turn, \u{2191} fire   R restart   Q quit";

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn to_color(c: u16) -> Color {
    let (r, g, b) = rgb565_to_rgb888(c);
    Color::Rgb { r, g, b }
}

// ── Terminal lifecycle ────────────────────────────────────────────────────────

/// Raw mode, alternate screen, hidden cursor.  Returns whether the terminal
/// accepted key-release reporting.
pub fn enter<W: Write>(out: &mut W) -> io::Result<bool> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    Ok(out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok())
}

/// Undo `enter`.  Errors are ignored: this runs on the way out.
pub fn leave<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Spawn the blocking event reader.
pub fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });
    rx
}

// ── Board ─────────────────────────────────────────────────────────────────────

pub struct TerminalBoard<W: Write> {
    out: W,
    rx: mpsc::Receiver<Event>,
    clock: SystemClock,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    /// Emulated 8-bit rotation counters, indexed red, green, blue.
    counters: [u8; 3],
    buttons: u32,
    led: Option<(u16, u64)>,
    quit: bool,
    restart: bool,
}

impl<W: Write> TerminalBoard<W> {
    pub fn new(out: W, rx: mpsc::Receiver<Event>) -> Self {
        Self {
            out,
            rx,
            clock: SystemClock::new(),
            key_frame: HashMap::new(),
            frame: 0,
            counters: [0; 3],
            buttons: 0,
            led: None,
            quit: false,
            restart: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// True once per press of R.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }

    /// Drain pending key events and update knobs and buttons.  Call once
    /// per frame before the game samples input.
    pub fn pump(&mut self) {
        self.frame += 1;
        let frame = self.frame;

        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    self.key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.quit = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            self.quit = true;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => self.restart = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }

        let held = |keys: &[KeyCode]| keys.iter().any(|k| is_held(&self.key_frame, k, frame));

        let mut turns = [0i32; 3];
        if held(&[KeyCode::Char('a'), KeyCode::Char('A')]) {
            turns[0] -= 1;
        }
        if held(&[KeyCode::Char('d'), KeyCode::Char('D')]) {
            turns[0] += 1;
        }
        if held(&[KeyCode::Left]) {
            turns[2] -= 1;
        }
        if held(&[KeyCode::Right]) {
            turns[2] += 1;
        }

        let mut buttons = 0;
        if held(&[KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')]) {
            buttons |= KnobId::Red.button_mask();
        }
        if held(&[KeyCode::Up]) {
            buttons |= KnobId::Blue.button_mask();
        }

        for (counter, turn) in self.counters.iter_mut().zip(turns) {
            match turn.signum() {
                1 => *counter = counter.wrapping_add(KNOB_STEP),
                -1 => *counter = counter.wrapping_sub(KNOB_STEP),
                _ => {}
            }
        }
        self.buttons = buttons;
    }

    fn led_color(&self) -> Option<u16> {
        let now = self.clock.now_ms();
        self.led
            .and_then(|(color, until)| (now < until).then_some(color))
    }

    fn draw_status_row(&mut self, row: u16) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, row))?;
        self.out.queue(style::ResetColor)?;
        self.out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        match self.led_color() {
            Some(c) => self.out.queue(style::SetForegroundColor(to_color(c)))?,
            None => self.out.queue(style::SetForegroundColor(Color::DarkGrey))?,
        };
        self.out.queue(Print("LED \u{2588}\u{2588}  "))?;
        self.out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        self.out.queue(Print(HINT))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }
}

impl<W: Write> KnobPanel for TerminalBoard<W> {
    fn read_knobs(&self) -> u32 {
        let [red, green, blue] = self.counters;
        self.buttons | (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue)
    }
}

impl<W: Write> DisplaySink for TerminalBoard<W> {
    /// Each terminal cell shows two vertically stacked pixels with '▀':
    /// foreground is the upper one, background the lower.  Cells sample the
    /// frame nearest-neighbour, the same rule sprites are scaled with.
    fn present(&mut self, frame: &PixelBuffer) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let cell_rows = rows.saturating_sub(1).max(1);
        let (cols_u, pix_rows) = (u32::from(cols.max(1)), u32::from(cell_rows) * 2);
        let (fw, fh) = (frame.width(), frame.height());

        let mut last: Option<(u16, u16)> = None;
        for cy in 0..cell_rows {
            self.out.queue(cursor::MoveTo(0, cy))?;
            let top_y = (u32::from(cy) * 2 * fh / pix_rows) as i32;
            let bottom_y = ((u32::from(cy) * 2 + 1) * fh / pix_rows) as i32;
            for cx in 0..cols_u {
                let x = (cx * fw / cols_u) as i32;
                let top = frame.get(x, top_y).unwrap_or(0);
                let bottom = frame.get(x, bottom_y).unwrap_or(0);
                if last != Some((top, bottom)) {
                    self.out.queue(style::SetForegroundColor(to_color(top)))?;
                    self.out.queue(style::SetBackgroundColor(to_color(bottom)))?;
                    last = Some((top, bottom));
                }
                self.out.queue(Print('\u{2580}'))?;
            }
        }

        self.draw_status_row(cell_rows)?;
        self.out.flush()
    }
}

impl<W: Write> LedStrip for TerminalBoard<W> {
    fn flash(&mut self, color: u16) {
        self.led = Some((color, self.clock.now_ms() + LED_FLASH_MS));
    }

    fn all_off(&mut self) {
        self.led = None;
    }
}

impl<W: Write> Clock for TerminalBoard<W> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
