//! Configuration management for `AirMap`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirMapError;
use crate::models::{BoundingBox, LocaleKeywords, Region};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "airmap.toml";

/// Environment variable prefix, e.g. `AIRMAP_UPSTREAM__TOKEN`
pub const ENV_PREFIX: &str = "AIRMAP";

/// Root configuration structure for the `AirMap` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirMapConfig {
    /// WAQI API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Area served by this process
    #[serde(default)]
    pub region: RegionConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// WAQI API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for the WAQI API
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    /// WAQI access token
    #[serde(default = "default_upstream_token")]
    pub token: String,
    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
}

/// Bounding box and locale keywords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    #[serde(default = "default_lon_min")]
    pub lon_min: f64,
    #[serde(default = "default_lon_max")]
    pub lon_max: f64,
    /// Station-name fragments that mark a station as belonging to the region
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory holding the map page and its assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
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
fn default_upstream_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_upstream_token() -> String {
    "demo".to_string()
}

fn default_upstream_timeout() -> u32 {
    6
}

fn default_lat_min() -> f64 {
    24.0
}

fn default_lat_max() -> f64 {
    46.0
}

fn default_lon_min() -> f64 {
    123.0
}

fn default_lon_max() -> f64 {
    146.0
}

fn default_keywords() -> Vec<String> {
    [
        "japan", "tokyo", "osaka", "kyoto", "nagoya", "sapporo", "fukuoka", "yokohama", "nara",
        "kobe", "hiroshima", "sendai", "okinawa",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            token: default_upstream_token(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lon_min: default_lon_min(),
            lon_max: default_lon_max(),
            keywords: default_keywords(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
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

impl AirMapConfig {
    /// Load configuration from `config_path`, or `airmap.toml` when present,
    /// then environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = &config_path {
            if !path.exists() {
                return Err(AirMapError::config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
        }

        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.as_path())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("region.keywords")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Fill in values that were supplied but left empty
    pub fn apply_defaults(&mut self) {
        if self.upstream.base_url.is_empty() {
            self.upstream.base_url = default_upstream_base_url();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
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
        self.validate_upstream()?;
        self.validate_region()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_upstream(&self) -> Result<()> {
        if self.upstream.token.trim().is_empty() {
            return Err(AirMapError::config(
                "WAQI token cannot be empty. Use `demo` or request a token at https://aqicn.org/data-platform/token/",
            )
            .into());
        }

        if self.upstream.timeout_seconds == 0 || self.upstream.timeout_seconds > 60 {
            return Err(AirMapError::config(
                "WAQI timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            return Err(AirMapError::config(
                "WAQI base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    fn validate_region(&self) -> Result<()> {
        let region = &self.region;

        for (label, value) in [("lat_min", region.lat_min), ("lat_max", region.lat_max)] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(AirMapError::config(format!(
                    "Region {label} must be between -90 and 90, got: {value}"
                ))
                .into());
            }
        }

        for (label, value) in [("lon_min", region.lon_min), ("lon_max", region.lon_max)] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(AirMapError::config(format!(
                    "Region {label} must be between -180 and 180, got: {value}"
                ))
                .into());
            }
        }

        if region.lat_min >= region.lat_max || region.lon_min >= region.lon_max {
            return Err(AirMapError::config(
                "Region minimum coordinates must be below the maximum coordinates",
            )
            .into());
        }

        if LocaleKeywords::new(&region.keywords).is_empty() {
            return Err(AirMapError::config(
                "Region needs at least one non-empty locale keyword",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// The immutable region value handed to the filter and fallback
    #[must_use]
    pub fn region(&self) -> Region {
        Region {
            bounds: BoundingBox::new(
                self.region.lat_min,
                self.region.lat_max,
                self.region.lon_min,
                self.region.lon_max,
            ),
            keywords: LocaleKeywords::new(&self.region.keywords),
        }
    }

    /// Socket address string the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn static_dir(&self) -> &Path {
        Path::new(&self.server.static_dir)
    }
}
