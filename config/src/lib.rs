//! Configuration for Gambit, read from `~/.gambit/config.toml`.
//!
//! Every section and key is optional. Environment overrides
//! (`GAMBIT_ENGINE`, `GAMBIT_DEPTH`) are applied on top of the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use gambit_core::{DEFAULT_SEARCH_DEPTH, GameSettings, TurnTimeouts};
use gambit_types::Side;
use gambit_uci::EngineConfig;

pub const ENGINE_ENV: &str = "GAMBIT_ENGINE";
pub const DEPTH_ENV: &str = "GAMBIT_DEPTH";

const DEFAULT_ENGINE: &str = "stockfish";
const SKILL_LEVEL_OPTION: &str = "Skill Level";
const MAX_SKILL_LEVEL: u8 = 20;

const DEFAULT_STARTUP_MS: u64 = 5_000;
const DEFAULT_ACCEPT_MS: u64 = 3_000;
const DEFAULT_SEARCH_MS: u64 = 10_000;
const DEFAULT_PROBE_MS: u64 = 1_500;

#[derive(Debug, Default, Deserialize)]
pub struct GambitConfig {
    pub engine: Option<EngineSection>,
    pub timeouts: Option<TimeoutsSection>,
    pub game: Option<GameSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EngineSection {
    /// Executable name or path. Default: "stockfish".
    pub path: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Search depth for the engine's moves. Default: 10.
    pub depth: Option<u32>,
    pub difficulty: Option<Difficulty>,
    /// Explicit UCI `Skill Level` (0-20); overrides `difficulty`.
    pub skill_level: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeoutsSection {
    pub startup_ms: Option<u64>,
    pub accept_ms: Option<u64>,
    pub search_ms: Option<u64>,
    pub probe_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameSection {
    pub human_side: Option<Side>,
    pub results_log: Option<PathBuf>,
}

/// Bot strength, sent to the engine as a `Skill Level` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn skill_level(self) -> u8 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 10,
            Difficulty::Hard => 20,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl GambitConfig {
    /// Load `~/.gambit/config.toml`. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Apply `GAMBIT_ENGINE` and `GAMBIT_DEPTH` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let engine = self.engine.get_or_insert_with(EngineSection::default);
        if let Some(path) = lookup(ENGINE_ENV).filter(|p| !p.trim().is_empty()) {
            engine.path = Some(path.trim().to_string());
        }
        if let Some(raw) = lookup(DEPTH_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(depth) => engine.depth = Some(depth),
                Err(_) => tracing::warn!("Ignoring {DEPTH_ENV}={raw:?}: not a number"),
            }
        }
        self
    }

    #[must_use]
    pub fn engine_command(&self) -> &str {
        self.engine
            .as_ref()
            .and_then(|e| e.path.as_deref())
            .unwrap_or(DEFAULT_ENGINE)
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.engine
            .as_ref()
            .and_then(|e| e.difficulty)
            .unwrap_or_default()
    }

    /// `skill_level` if set (capped at 20), otherwise the difficulty's level.
    #[must_use]
    pub fn skill_level(&self) -> u8 {
        self.engine
            .as_ref()
            .and_then(|e| e.skill_level)
            .map_or_else(
                || self.difficulty().skill_level(),
                |level| level.min(MAX_SKILL_LEVEL),
            )
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.engine
            .as_ref()
            .and_then(|e| e.depth)
            .unwrap_or(DEFAULT_SEARCH_DEPTH)
    }

    #[must_use]
    pub fn human_side(&self) -> Side {
        self.game
            .as_ref()
            .and_then(|g| g.human_side)
            .unwrap_or_default()
    }

    /// Configured result log, or `~/.gambit/results.txt`.
    #[must_use]
    pub fn results_log_path(&self) -> Option<PathBuf> {
        self.game
            .as_ref()
            .and_then(|g| g.results_log.clone())
            .or_else(|| gambit_dir().map(|dir| dir.join("results.txt")))
    }

    /// How to spawn and greet the engine.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        let args = self
            .engine
            .as_ref()
            .map(|e| e.args.clone())
            .unwrap_or_default();
        EngineConfig::new(self.engine_command())
            .with_args(args)
            .with_startup_timeout(Duration::from_millis(self.timeout_ms(
                |t| t.startup_ms,
                DEFAULT_STARTUP_MS,
            )))
            .with_option(SKILL_LEVEL_OPTION, self.skill_level().to_string())
    }

    #[must_use]
    pub fn game_settings(&self) -> GameSettings {
        let timeouts = TurnTimeouts::new(
            Duration::from_millis(self.timeout_ms(|t| t.accept_ms, DEFAULT_ACCEPT_MS)),
            Duration::from_millis(self.timeout_ms(|t| t.search_ms, DEFAULT_SEARCH_MS)),
            Duration::from_millis(self.timeout_ms(|t| t.probe_ms, DEFAULT_PROBE_MS)),
        );
        GameSettings::default()
            .with_human_side(self.human_side())
            .with_depth(self.depth())
            .with_timeouts(timeouts)
    }

    fn timeout_ms(&self, field: impl Fn(&TimeoutsSection) -> Option<u64>, default: u64) -> u64 {
        self.timeouts.as_ref().and_then(field).unwrap_or(default)
    }
}

/// `~/.gambit`, home of the config file, logs and the result log.
#[must_use]
pub fn gambit_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gambit"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    gambit_dir().map(|dir| dir.join("config.toml"))
}
