//! Game configuration, read from a TOML file and threaded into setup.
//!
//! Only the shape of the game is configurable (players, grid, pools, files);
//! movement speeds and timings are fixed in `entities`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::MAX_PLAYERS;
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 1 or 2.
    pub players: usize,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    pub high_score_file: PathBuf,
    pub log_file: PathBuf,
    pub formation: FormationConfig,
    pub pools: PoolConfig,
    pub assets: AssetConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Bullet slots per player.
    pub player_bullets: usize,
    /// Bullet slots shared by the formation.
    pub enemy_bullets: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory of `.ppm` sprites; built-in art when absent.
    pub sprite_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 1,
            seed: None,
            high_score_file: PathBuf::from("score.txt"),
            log_file: PathBuf::from("knob_invaders.log"),
            formation: FormationConfig::default(),
            pools: PoolConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self { rows: 5, cols: 10 }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            player_bullets: 10,
            enemy_bullets: 5,
        }
    }
}

pub const MAX_ROWS: usize = 6;
pub const MAX_COLS: usize = 11;
pub const MAX_POOL: usize = 16;

/// Where a loaded config came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file did not exist.
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "config {}", path.display()),
            ConfigSource::Defaults(path) => {
                write!(f, "no config at {}, using defaults", path.display())
            }
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.  Runs before
    /// logging is set up, so the source is returned for the caller to report.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok((Self::from_toml(&text)?, ConfigSource::File(path.to_path_buf()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok((Self::default(), ConfigSource::Defaults(path.to_path_buf())))
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::Invalid {
                field: "players",
                reason: format!("must be 1..={MAX_PLAYERS}, got {}", self.players),
            });
        }
        if !(1..=MAX_ROWS).contains(&self.formation.rows) {
            return Err(ConfigError::Invalid {
                field: "formation.rows",
                reason: format!("must be 1..={MAX_ROWS}, got {}", self.formation.rows),
            });
        }
        if !(1..=MAX_COLS).contains(&self.formation.cols) {
            return Err(ConfigError::Invalid {
                field: "formation.cols",
                reason: format!("must be 1..={MAX_COLS}, got {}", self.formation.cols),
            });
        }
        for (field, value) in [
            ("pools.player_bullets", self.pools.player_bullets),
            ("pools.enemy_bullets", self.pools.enemy_bullets),
        ] {
            if !(1..=MAX_POOL).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be 1..={MAX_POOL}, got {value}"),
                });
            }
        }
        Ok(())
    }
}
