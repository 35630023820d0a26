//! Configuration loading and config file resolution
//!
//! The game client is configured by a small TOML bootstrap file. The file is
//! located in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SONGUESS_CONFIG`)
//! 3. Per-user config directory (`<config_dir>/songuess/config.toml`)
//! 4. Compiled defaults (fallback, no file)
//!
//! A missing file never prevents startup: a warning is logged and compiled
//! defaults are used. A file that exists but cannot be parsed or validated is
//! a configuration error.

use crate::model::GameSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SONGUESS_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// EventBus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Guess evaluation tuning (optional)
    #[serde(default)]
    pub guess: GuessConfig,

    /// Initial player settings (optional)
    #[serde(default)]
    pub settings: GameSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Guess evaluation tuning
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GuessConfig {
    /// Similarity a guess must reach to count as a match (all fields)
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Grace window between round completion and skipping to the next track
    #[serde(default = "default_skip_delay_ms")]
    pub skip_delay_ms: u64,
}

fn default_port() -> u16 {
    5780
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_event_capacity() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_match_threshold() -> f64 {
    0.97
}

fn default_skip_delay_ms() -> u64 {
    4000
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            skip_delay_ms: default_skip_delay_ms(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            event_capacity: default_event_capacity(),
            logging: LoggingConfig::default(),
            guess: GuessConfig::default(),
            settings: GameSettings::default(),
        }
    }
}

impl TomlConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let threshold = self.guess.match_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(Error::Config(format!(
                "guess.match_threshold must be within (0.0, 1.0], got {}",
                threshold
            )));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be greater than 0".to_string()));
        }
        self.settings
            .validate()
            .map_err(|e| Error::Config(format!("settings: {}", e)))?;
        Ok(())
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserConfigDir(PathBuf),
    CompiledDefaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CommandLine(p) => write!(f, "{} (from command line)", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} (from {})", p.display(), CONFIG_ENV_VAR),
            ConfigSource::UserConfigDir(p) => write!(f, "{} (from user config dir)", p.display()),
            ConfigSource::CompiledDefaults => write!(f, "compiled defaults"),
        }
    }
}

/// Config file resolution following the documented priority order
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve which config file to use, without reading it
    pub fn resolve(&self) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return ConfigSource::CommandLine(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        // Priority 3: User config directory, only if the file exists
        if let Some(path) = default_config_path() {
            if path.exists() {
                return ConfigSource::UserConfigDir(path);
            }
        }

        // Priority 4: Compiled defaults
        ConfigSource::CompiledDefaults
    }

    /// Resolve and load the configuration
    ///
    /// An explicitly named file (CLI or environment) that does not exist is
    /// logged and replaced by defaults; a file that fails to parse is an error.
    pub fn load(&self) -> Result<(TomlConfig, ConfigSource)> {
        let source = self.resolve();
        let path = match &source {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserConfigDir(p) => p.clone(),
            ConfigSource::CompiledDefaults => {
                info!("No config file found, using compiled defaults");
                return Ok((TomlConfig::default(), source));
            }
        };

        if !path.exists() {
            warn!(
                "Config file {} does not exist, using compiled defaults",
                path.display()
            );
            return Ok((TomlConfig::default(), ConfigSource::CompiledDefaults));
        }

        let config = TomlConfig::from_file(&path)?;
        info!("Loaded configuration from {}", source);
        Ok((config, source))
    }
}

/// Per-user config file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songuess").join("config.toml"))
}
