//! Server configuration.
//!
//! Configuration can be loaded from:
//! - TOML configuration file
//! - An explicit file path in `HUDDLE_CONFIG`
//!
//! `HUDDLE_HOST`, `HUDDLE_PORT` and `HUDDLE_TELEGRAM_TOKEN` override whatever
//! the file says.

use anyhow::{bail, Context, Result};
use huddle_core::RoomDefaults;
use huddle_feed::TelegramConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host the health endpoint binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the health endpoint listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Telegram feed configuration.
    #[serde(default)]
    pub telegram: TelegramSection,

    /// Poll loop configuration.
    #[serde(default)]
    pub poll: PollConfig,

    /// Room defaults.
    #[serde(default)]
    pub rooms: RoomsConfig,

    /// Canned reply configuration.
    #[serde(default)]
    pub replies: RepliesConfig,

    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Telegram feed configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramSection {
    /// Bot API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bot token.
    #[serde(default)]
    pub token: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Long-polling wait for updates in seconds (0 = short polling).
    #[serde(default)]
    pub long_poll_secs: u32,
}

/// Poll loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between poll cycles in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
}

/// Room defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsConfig {
    /// Name given to rooms created without one.
    #[serde(default = "default_room_name")]
    pub default_name: String,

    /// Capacity given to rooms created without one.
    #[serde(default = "default_room_capacity")]
    pub default_capacity: usize,

    /// Whether rooms are private unless stated otherwise.
    #[serde(default = "default_true")]
    pub private_by_default: bool,
}

/// Canned reply configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepliesConfig {
    /// Fixed seed for picking canned replies.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Serve `/health`.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable metrics export.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    huddle_feed::telegram::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_poll_interval() -> u64 {
    3_000 // 3 seconds
}

fn default_room_name() -> String {
    huddle_core::room::DEFAULT_ROOM_NAME.to_string()
}

fn default_room_capacity() -> usize {
    huddle_core::room::DEFAULT_ROOM_CAPACITY
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            telegram: TelegramSection::default(),
            poll: PollConfig::default(),
            rooms: RoomsConfig::default(),
            replies: RepliesConfig::default(),
            health: HealthConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            request_timeout_ms: default_request_timeout(),
            long_poll_secs: 0,
        }
    }
}

impl std::fmt::Debug for TelegramSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.feed_config(), f)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
        }
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            default_name: default_room_name(),
            default_capacity: default_room_capacity(),
            private_by_default: true,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_metrics_port(),
        }
    }
}

impl TelegramSection {
    /// Build the feed configuration.
    #[must_use]
    pub fn feed_config(&self) -> TelegramConfig {
        TelegramConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            long_poll_secs: self.long_poll_secs,
        }
    }
}

impl PollConfig {
    /// Get the delay between poll cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl RoomsConfig {
    /// Build the room defaults.
    #[must_use]
    pub fn defaults(&self) -> RoomDefaults {
        RoomDefaults {
            name: self.default_name.clone(),
            capacity: self.default_capacity,
            private: self.private_by_default,
        }
    }
}

impl Config {
    /// Load configuration from file or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        if let Ok(path) = std::env::var("HUDDLE_CONFIG") {
            let expanded = shellexpand::tilde(&path);
            return Self::from_file(expanded.as_ref());
        }

        // Try to load from default paths
        let config_paths = [
            "huddle.toml",
            "/etc/huddle/huddle.toml",
            "~/.config/huddle/huddle.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Apply `HUDDLE_*` overrides looked up through `var`.
    ///
    /// # Errors
    ///
    /// Returns an error if `HUDDLE_PORT` is not a port number.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = var("HUDDLE_HOST") {
            self.host = host;
        }
        if let Some(port) = var("HUDDLE_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("Invalid HUDDLE_PORT: {port}"))?;
        }
        if let Some(token) = var("HUDDLE_TELEGRAM_TOKEN") {
            self.telegram.token = token;
        }
        Ok(())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check values that would make the bot unusable.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.trim().is_empty() {
            bail!("No bot token configured: set telegram.token or HUDDLE_TELEGRAM_TOKEN");
        }
        if self.poll.interval_ms == 0 {
            bail!("poll.interval_ms must be greater than zero");
        }
        if self.rooms.default_capacity == 0 {
            bail!("rooms.default_capacity must be greater than zero");
        }
        Ok(())
    }

    /// Get the socket address the health endpoint binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid host:port {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll.interval_ms, 3_000);
        assert_eq!(config.rooms.default_capacity, 10);
        assert!(config.rooms.private_by_default);
        assert!(config.replies.seed.is_none());
        assert!(config.health.enabled);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            host = "0.0.0.0"
            port = 9000

            [telegram]
            token = "123:abc"
            long_poll_secs = 25

            [rooms]
            default_name = "Den"
            default_capacity = 4

            [replies]
            seed = 7
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.telegram.feed_config().long_poll_secs, 25);
        assert_eq!(config.telegram.request_timeout_ms, 10_000);

        let defaults = config.rooms.defaults();
        assert_eq!(defaults.name, "Den");
        assert_eq!(defaults.capacity, 4);
        assert!(defaults.private);
        assert_eq!(config.replies.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config: Config = toml::from_str("[telegram]\ntoken = \"t\"").unwrap();
        assert!(config.validate().is_ok());

        config.rooms.default_capacity = 0;
        assert!(config.validate().is_err());

        config.rooms.default_capacity = 1;
        config.poll.interval_ms = 0;
        assert!(config.validate().is_err());

        config.poll.interval_ms = 10;
        config.telegram.token = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let vars = |key: &str| match key {
            "HUDDLE_TELEGRAM_TOKEN" => Some("123:fromenv".to_string()),
            "HUDDLE_PORT" => Some("9100".to_string()),
            _ => None,
        };

        let example = include_str!("../../../huddle.toml.example");
        let mut config: Config = toml::from_str(example).unwrap();
        config.apply_overrides(vars).unwrap();
        assert_eq!(config.telegram.token, "123:fromenv");
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.validate().is_ok());

        let mut config: Config =
            toml::from_str("port = 7000\n[telegram]\ntoken = \"123:fromfile\"").unwrap();
        config.apply_overrides(vars).unwrap();
        assert_eq!(config.telegram.token, "123:fromenv");
        assert_eq!(config.port, 9100);

        let mut config = Config::default();
        config.apply_overrides(|_| None).unwrap();
        assert!(config.telegram.token.is_empty());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_env_override_bad_port() {
        let mut config = Config::default();
        let result =
            config.apply_overrides(|key| (key == "HUDDLE_PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config: Config = toml::from_str("[telegram]\ntoken = \"123:secret\"").unwrap();
        assert!(!format!("{:?}", config).contains("123:secret"));
    }
}
