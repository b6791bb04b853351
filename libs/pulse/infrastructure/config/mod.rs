use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Monitor service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tick period of the refresh loop
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Minimum spacing between weather checks
    #[serde(default = "default_weather_check_interval_ms")]
    pub weather_check_interval_ms: u64,

    /// Absolute 24h change (percent) at which a price alert fires
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,

    /// Minimum spacing between two fires of the same alert key
    #[serde(default = "default_alert_cooldown_ms")]
    pub alert_cooldown_ms: u64,

    /// Tracked asset ids (CoinGecko ids)
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Tracked location names
    #[serde(default)]
    pub locations: Vec<String>,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Stats heartbeat period for the binary
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Upstream request timeout; client default when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub coingecko: CoinGeckoConfig,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinGeckoConfig {
    #[serde(default = "default_coingecko_url")]
    pub base_url: String,

    /// When false the engine runs on simulated prices only
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_coingecko_url(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    #[serde(default = "default_openweather_url")]
    pub base_url: String,

    /// API key from .env (OPENWEATHER_API_KEY) takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_openweather_url(),
            api_key: None,
        }
    }
}

fn default_update_interval_ms() -> u64 {
    10_000
}

fn default_weather_check_interval_ms() -> u64 {
    60_000
}

fn default_alert_threshold() -> f64 {
    2.0
}

fn default_alert_cooldown_ms() -> u64 {
    300_000
}

fn default_assets() -> Vec<String> {
    vec![
        "bitcoin".to_string(),
        "ethereum".to_string(),
        "solana".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_heartbeat_interval_secs() -> u64 {
    300
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            weather_check_interval_ms: default_weather_check_interval_ms(),
            alert_threshold: default_alert_threshold(),
            alert_cooldown_ms: default_alert_cooldown_ms(),
            assets: default_assets(),
            locations: Vec::new(),
            log_level: default_log_level(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            request_timeout_secs: None,
            coingecko: CoinGeckoConfig::default(),
            openweather: OpenWeatherConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from YAML file and .env
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: MonitorConfig = serde_yaml::from_str(&yaml_content)?;

        // Don't fail if .env doesn't exist
        dotenv::dotenv().ok();

        if let Ok(api_key) = std::env::var("OPENWEATHER_API_KEY") {
            info!("Using OpenWeather API key from environment variable");
            config.openweather.api_key = Some(api_key);
        }

        config.validate()?;
        Ok(config)
    }

    /// API key for the weather client, required when locations are tracked
    pub fn openweather_api_key(&self) -> Result<&str> {
        self.openweather
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::EnvVarMissing("OPENWEATHER_API_KEY".to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "update_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.weather_check_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "weather_check_interval_ms must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("weather_check_interval_ms", self.weather_check_interval_ms),
            ("alert_cooldown_ms", self.alert_cooldown_ms),
        ] {
            if i64::try_from(value).is_err() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not exceed {}",
                    name,
                    i64::MAX
                )));
            }
        }

        if !self.alert_threshold.is_finite() || self.alert_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "alert_threshold must be a non-negative number".to_string(),
            ));
        }

        if let Some(dup) = first_duplicate(&self.assets) {
            return Err(ConfigError::ValidationError(format!(
                "asset '{}' is listed more than once",
                dup
            )));
        }

        if let Some(dup) = first_duplicate(&self.locations) {
            return Err(ConfigError::ValidationError(format!(
                "location '{}' is listed more than once",
                dup
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Saturates at the largest representable span; `validate` rejects such values
    pub fn weather_check_interval(&self) -> chrono::Duration {
        millis_to_duration(self.weather_check_interval_ms)
    }

    pub fn alert_cooldown(&self) -> chrono::Duration {
        millis_to_duration(self.alert_cooldown_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Update interval: {} ms", self.update_interval_ms);
        info!("  Weather check interval: {} ms", self.weather_check_interval_ms);
        info!("  Alert threshold: {}%", self.alert_threshold);
        info!("  Alert cooldown: {} ms", self.alert_cooldown_ms);
        info!("  Assets: {}", self.assets.join(", "));
        info!("  Locations: {}", self.locations.join(", "));
        info!(
            "  Live prices: {}",
            if self.coingecko.enabled { "coingecko" } else { "simulated only" }
        );
        info!("  Log level: {}", self.log_level);
    }
}

fn millis_to_duration(ms: u64) -> chrono::Duration {
    i64::try_from(ms)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .unwrap_or(chrono::Duration::MAX)
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(|name| name.as_str())
}
