//! Viewer configuration: TOML file, then environment, then command line.

use derive_getters::Getters;
use derive_setters::Setters;
use derive_more::{Display, Error};
use gomoku_engine::Dimensions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ViewerConfig::server_url`].
pub const SERVER_URL_ENV: &str = "GOMOKU_SERVER_URL";

/// Environment variable overriding [`ViewerConfig::timeout_ms`].
pub const TIMEOUT_ENV: &str = "GOMOKU_TIMEOUT_MS";

/// Settings for talking to the server and sizing live games.
///
/// The board settings are used when the authority does not report its own
/// board size for a new game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "set_", borrow_self)]
pub struct ViewerConfig {
    /// Base URL of the record store and game authority.
    #[serde(default = "default_server_url")]
    #[setters(into)]
    server_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,

    /// Columns on a live board.
    #[serde(default = "default_board_size")]
    board_width: usize,

    /// Rows on a live board.
    #[serde(default = "default_board_size")]
    board_height: usize,

    /// Marks in a row needed to win a live game.
    #[serde(default = "default_win_length")]
    win_length: usize,
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_board_size() -> usize {
    15
}

fn default_win_length() -> usize {
    5
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_ms: default_timeout_ms(),
            board_width: default_board_size(),
            board_height: default_board_size(),
            win_length: default_win_length(),
        }
    }
}

impl ViewerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists (defaults otherwise), then applies
    /// environment overrides. A `.env` file is honoured.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("Config file not found, using defaults");
            Self::default()
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(SERVER_URL_ENV) {
            debug!(%url, "Server URL overridden from environment");
            self.server_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::new(format!("{} must be milliseconds, got '{}'", TIMEOUT_ENV, raw))
            })?;
        }
        Ok(self)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validated live board dimensions.
    pub fn dimensions(&self) -> Result<Dimensions, ConfigError> {
        Dimensions::new(self.board_width, self.board_height)
            .map_err(|e| ConfigError::new(e.to_string()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(&path, "server_url = \"http://games.local:8080\"\nwin_length = 4\n").unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.server_url(), "http://games.local:8080");
        assert_eq!(*config.win_length(), 4);
        assert_eq!(*config.board_width(), 15);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_bad_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(&path, "timeout_ms = \"soon\"").unwrap();
        let err = ViewerConfig::from_file(&path).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ViewerConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(*config.board_width(), 15);
        assert_eq!(*config.board_height(), 15);
        assert_eq!(*config.win_length(), 5);
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(SERVER_URL_ENV, "http://override:1"), (TIMEOUT_ENV, "250")]);
        let config = ViewerConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server_url(), "http://override:1");
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_bad_timeout_override_rejected() {
        let result = ViewerConfig::default().with_overrides(|k| {
            (k == TIMEOUT_ENV).then(|| "later".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_board_rejected() {
        let mut config = ViewerConfig::default();
        config.set_board_width(0);
        assert!(config.dimensions().is_err());
    }

    #[test]
    fn test_setters_chain() {
        let mut config = ViewerConfig::default();
        config
            .set_server_url("http://games.local:9000")
            .set_board_width(9)
            .set_board_height(7)
            .set_win_length(4);
        assert_eq!(config.server_url(), "http://games.local:9000");
        assert_eq!(config.dimensions().unwrap(), Dimensions::new(9, 7).unwrap());
        assert_eq!(*config.win_length(), 4);
    }
}
