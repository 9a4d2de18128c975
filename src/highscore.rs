//! High-score persistence: a single integer in a plain-text file.

use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored score, or 0 if the file is missing or unreadable.
    pub fn read(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                log::warn!("high score file {} is corrupt", self.path.display());
                0
            }),
            Err(_) => {
                log::info!("no high score file at {} yet", self.path.display());
                0
            }
        }
    }

    pub fn write(&self, score: u32) -> bool {
        match std::fs::write(&self.path, score.to_string()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("could not write high score to {}: {e}", self.path.display());
                false
            }
        }
    }
}
