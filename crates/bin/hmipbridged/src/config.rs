//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hmipbridge.toml` in the working directory. Everything except
//! the HomematicIP credentials has a default, so the file is optional when
//! the credentials come from the environment. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use hmipbridge_adapter_hmip_reqwest::HmipConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// HomematicIP cloud access.
    pub hmip: HmipConfig,
    /// Snapshot polling and event fan-out.
    pub bridge: BridgeConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Bridge runtime settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Seconds between two `getCurrentState` polls.
    pub poll_interval_secs: u64,
    /// Capacity of the characteristic event channel.
    pub event_capacity: usize,
}

impl Config {
    /// Load configuration from `hmipbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hmipbridge.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HMIPBRIDGE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("HMIPBRIDGE_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("HMIPBRIDGE_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("HMIPBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("HMIPBRIDGE_REST_URL") {
            self.hmip.rest_url = val;
        }
        if let Some(val) = var("HMIPBRIDGE_AUTH_TOKEN") {
            self.hmip.auth_token = val;
        }
        if let Some(val) = var("HMIPBRIDGE_CLIENT_AUTH") {
            self.hmip.client_auth = val;
        }
        if let Some(val) = var("HMIPBRIDGE_ACCESS_POINT") {
            self.hmip.access_point_id = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.bridge.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.bridge.event_capacity == 0 {
            return Err(ConfigError::Validation(
                "event_capacity must be non-zero".to_string(),
            ));
        }
        if self.hmip.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "hmip.request_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.hmip.rest_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hmip.rest_url must be set".to_string(),
            ));
        }
        if self.hmip.auth_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hmip.auth_token must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Delay between two snapshot polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.bridge.poll_interval_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hmipbridged=info,hmipbridge=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            event_capacity: 256,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
