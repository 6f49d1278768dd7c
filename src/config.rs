//! Configuration management for the `SentinelX` service
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before the server starts.

use crate::SentinelError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `SentinelX` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// News provider settings
    #[serde(default)]
    pub news: NewsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Maximum accepted request body in KB
    #[serde(default = "default_body_limit")]
    pub body_limit_kb: u32,
    /// PEM certificate, enables TLS together with `tls_key_path`
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    pub tls_key_path: Option<PathBuf>,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; the mock provider is used when absent
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Days of forecast requested from the provider
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// News provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// NewsAPI key
    pub newsapi_key: Option<String>,
    /// GNews key
    pub gnews_key: Option<String>,
    #[serde(default = "default_newsapi_base_url")]
    pub newsapi_base_url: String,
    #[serde(default = "default_gnews_base_url")]
    pub gnews_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    9000
}

fn default_body_limit() -> u32 {
    64
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_newsapi_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_gnews_base_url() -> String {
    "https://gnews.io/api/v4".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_forecast_days() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            body_limit_kb: default_body_limit(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            gnews_key: None,
            newsapi_base_url: default_newsapi_base_url(),
            gnews_base_url: default_gnews_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SentinelConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("SENTINELX_CONFIG").map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SENTINELX__WEATHER__API_KEY and friends
        builder = builder.add_source(
            Environment::with_prefix("SENTINELX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SentinelConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_conventional_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sentinelx").join("config.toml"))
    }

    /// Pick up the provider keys under their customary variable names
    fn apply_conventional_env(&mut self) {
        fn non_empty(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        if self.weather.api_key.is_none() {
            self.weather.api_key = non_empty("OPENWEATHERMAP_API_KEY");
        }
        if self.news.newsapi_key.is_none() {
            self.news.newsapi_key = non_empty("NEWS_API_KEY");
        }
        if self.news.gnews_key.is_none() {
            self.news.gnews_key = non_empty("GNEWS_API_KEY");
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.body_limit_kb == 0 {
            self.server.body_limit_kb = default_body_limit();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.news.newsapi_base_url.is_empty() {
            self.news.newsapi_base_url = default_newsapi_base_url();
        }
        if self.news.gnews_base_url.is_empty() {
            self.news.gnews_base_url = default_gnews_base_url();
        }
        if self.news.timeout_seconds == 0 {
            self.news.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys; every key is optional but must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Weather API key", &self.weather.api_key),
            ("NewsAPI key", &self.news.newsapi_key),
            ("GNews key", &self.news.gnews_key),
        ];

        for (label, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(SentinelError::config(format!(
                        "{label} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
                if key.len() > 200 {
                    return Err(SentinelError::config(format!(
                        "{label} appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SentinelError::config("Server port cannot be 0").into());
        }

        if self.weather.timeout_seconds > 300 || self.news.timeout_seconds > 300 {
            return Err(
                SentinelError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.forecast_days > 5 {
            return Err(SentinelError::config("Forecast days cannot exceed 5").into());
        }

        if self.server.body_limit_kb > 10_240 {
            return Err(SentinelError::config("Body limit cannot exceed 10240 KB").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SentinelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SentinelError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Weather API base URL", &self.weather.base_url),
            ("NewsAPI base URL", &self.news.newsapi_base_url),
            ("GNews base URL", &self.news.gnews_base_url),
        ];
        for (label, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SentinelError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(SentinelError::config(
                "TLS needs both tls_cert_path and tls_key_path",
            )
            .into());
        }

        Ok(())
    }

    /// Socket address the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
