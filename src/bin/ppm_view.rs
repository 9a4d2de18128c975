//! Show a PPM image scaled to fit the 480×320 board screen.
//!
//! Usage:
//!   ppm_view <image.ppm>
//!
//! Q, Esc or R closes the viewer.

use std::io::{self, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use knob_invaders::board::DisplaySink;
use knob_invaders::entities::{SCREEN_HEIGHT, SCREEN_WIDTH};
use knob_invaders::error::GameError;
use knob_invaders::framebuffer::{scale_to_fit, PixelBuffer};
use knob_invaders::sprite::read_ppm;
use knob_invaders::terminal::{self, TerminalBoard};

#[derive(Parser)]
#[command(name = "ppm_view")]
#[command(about = "Display a PPM image on the emulated board screen")]
struct Args {
    /// Path to a binary (P6) PPM file
    image: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("ppm_view: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let image = read_ppm(&args.image).map_err(|source| GameError::SpriteLoad {
        name: args.image.display().to_string(),
        source,
    })?;
    let frame = scale_to_fit(&image, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = terminal::enter(&mut out)?;
    let rx = terminal::spawn_event_reader();
    let mut board = TerminalBoard::new(out, rx);

    let result = show(&mut board, &frame);

    terminal::leave(&mut std::io::stdout(), keyboard_enhanced);
    Ok(result?)
}

/// Redraw every wake so a resized terminal is refilled, until closed.
fn show<W: Write>(board: &mut TerminalBoard<W>, frame: &PixelBuffer) -> io::Result<()> {
    loop {
        board.present(frame)?;
        std::thread::sleep(Duration::from_millis(100));
        board.pump();
        if board.quit_requested() || board.take_restart() {
            return Ok(());
        }
    }
}
