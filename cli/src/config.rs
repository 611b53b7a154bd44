//! Configuration Management
//!
//! Settings come from environment variables, each with a default:
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | `TODAY_HOME` | `$HOME/.today` | data directory |
//! | `TODAY_SERVER_URL` | the public today server | remote provider base URL, `off` to disable |
//! | `TODAY_LOG` | `warn` | log level when `RUST_LOG` is unset |
//!
//! # Example
//!
//! ```no_run
//! use today::config::TodayConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodayConfig::from_env()?;
//! println!("Events file: {}", config.events_csv().display());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server queried by the `web` provider unless configured otherwise.
pub const DEFAULT_SERVER_URL: &str = "https://todayserver-89bb2a1b2e80.herokuapp.com/";

/// Value of `TODAY_SERVER_URL` that disables the remote provider.
pub const SERVER_DISABLED: &str = "off";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `TODAY_HOME` and no home directory to derive it from
    #[error("Cannot determine data directory: set TODAY_HOME")]
    NoHomeDirectory,

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Runtime configuration of the `today` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayConfig {
    /// Data directory holding the CSV files and the database
    pub home: PathBuf,
    /// Base URL of the remote event server, `None` when disabled
    pub server_url: Option<String>,
    /// Default log level
    pub log_level: String,
}

impl TodayConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if no data directory can be determined or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Load configuration from `lookup`, falling back to `home_dir` for the
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns error if no data directory can be determined or a value is invalid
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let home = match lookup("TODAY_HOME").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => home_dir.ok_or(ConfigError::NoHomeDirectory)?.join(".today"),
        };

        let server_url = match lookup("TODAY_SERVER_URL") {
            Some(url) if url.trim().eq_ignore_ascii_case(SERVER_DISABLED) => None,
            Some(url) if !url.trim().is_empty() => Some(url.trim().to_string()),
            _ => Some(DEFAULT_SERVER_URL.to_string()),
        };

        let log_level = lookup("TODAY_LOG")
            .map_or_else(|| "warn".to_string(), |level| level.trim().to_lowercase());

        let config = Self {
            home,
            server_url,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if the log level is unknown or the server URL is not http(s)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log level must be one of {}, got '{}'",
                LOG_LEVELS.join("|"),
                self.log_level
            )));
        }
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "server URL must start with http:// or https://, got '{url}'"
                )));
            }
        }
        Ok(())
    }

    /// Annual events, provider `standard`.
    #[must_use]
    pub fn events_csv(&self) -> PathBuf {
        self.home.join("events.csv")
    }

    /// Singular events, provider `singular`.
    #[must_use]
    pub fn singular_csv(&self) -> PathBuf {
        self.home.join("singular-events.csv")
    }

    /// Database, provider `sqlite`.
    #[must_use]
    pub fn sqlite_path(&self) -> PathBuf {
        self.home.join("events.sqlite3")
    }

    /// The data directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }
}
