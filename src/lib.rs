//! Space-invaders style shooter for a knob-controlled LCD board.
//!
//! The simulation core (`entities`, `compute`, `render`) knows nothing about
//! hardware: the board is reached only through the traits in `board`, and the
//! terminal emulation in `terminal` is one implementation of them.

pub mod board;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod highscore;
pub mod input;
pub mod render;
pub mod session;
pub mod sprite;
pub mod terminal;
