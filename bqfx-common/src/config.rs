//! Bootstrap configuration loading
//!
//! TOML bootstrap only: tick interval, event channel capacity, logging.
//! These settings cannot change during runtime; the process must restart to
//! pick up changes.
//!
//! Resolution follows the usual priority order:
//! 1. Command-line argument (highest priority)
//! 2. `BQFX_CONFIG` environment variable
//! 3. `~/.config/bqfx/config.toml`
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable naming an explicit config file path
pub const CONFIG_ENV_VAR: &str = "BQFX_CONFIG";

/// Deck configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct DeckConfig {
    /// Wall-clock milliseconds per simulated playback second
    ///
    /// Default: 1000 (one tick per real second). Tests shrink this to run
    /// playback in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Event channel capacity per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_event_capacity() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            event_capacity: default_event_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DeckConfig {
    /// Load configuration from an explicit TOML file path
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Resolve and load configuration following the priority order
    ///
    /// An explicitly named file (CLI argument or environment variable) must
    /// exist; a missing default-location file just means built-in defaults.
    pub fn resolve(cli_arg: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_arg {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Tick interval as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bqfx").join("config.toml"))
}
