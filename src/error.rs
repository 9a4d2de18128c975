//! Error types for game setup.
//!
//! Once a session is running every tick is infallible; only setup (config,
//! sprites) and the terminal/display I/O can fail.

use thiserror::Error;

/// Failure to decode a sprite image.
#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a binary PPM (expected P6 magic)")]
    BadMagic,

    #[error("malformed PPM header: {0}")]
    BadHeader(String),

    #[error("pixel data truncated: expected {expected} pixels, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("image has zero width or height")]
    Empty,

    #[error("no built-in sprite named {0:?}")]
    Unknown(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level error: anything that prevents a game session from starting.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("failed to load sprite {name:?}: {source}")]
    SpriteLoad {
        name: String,
        #[source]
        source: SpriteError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
