//! Configuration management for the skycast application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the skycast application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Weather provider configuration
    pub provider: ProviderConfig,
    /// Ambient-location fallback configuration
    pub location: LocationConfig,
    /// Result cache configuration
    pub cache: CacheConfig,
    /// Refresh and search timing configuration
    pub refresh: RefreshConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for the geocoding, forecast and air-pollution endpoints
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// URL of the ambient IP-geolocation endpoint
    #[serde(default = "default_geolocate_url")]
    pub geolocate_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Fallback coordinates used when ambient geolocation fails
///
/// An explicit configuration value rather than a literal buried in the
/// resolution code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fallback latitude
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,
    /// Fallback longitude
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
}

/// Result cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached fetch results, in minutes
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
}

/// Refresh-cycle and search timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Auto-refresh interval in seconds
    #[serde(default = "default_update_interval")]
    pub update_interval_seconds: u32,
    /// Debounce delay for search-as-you-type, in milliseconds
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u32,
    /// Minimum query length before a debounced search is scheduled
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: u32,
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
fn default_api_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_geolocate_url() -> String {
    "https://ipinfo.io/json".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_fallback_latitude() -> f64 {
    47.2529
}

fn default_fallback_longitude() -> f64 {
    -122.4443
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_update_interval() -> u32 {
    300
}

fn default_search_debounce() -> u32 {
    800
}

fn default_min_query_chars() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                api_key: None,
                api_base_url: default_api_base_url(),
                geolocate_url: default_geolocate_url(),
                timeout_seconds: default_timeout(),
            },
            location: LocationConfig {
                fallback_latitude: default_fallback_latitude(),
                fallback_longitude: default_fallback_longitude(),
            },
            cache: CacheConfig {
                ttl_minutes: default_cache_ttl(),
            },
            refresh: RefreshConfig {
                update_interval_seconds: default_update_interval(),
                search_debounce_ms: default_search_debounce(),
                min_query_chars: default_min_query_chars(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
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

        // Environment variable overrides with SKYCAST_ prefix, e.g.
        // SKYCAST_PROVIDER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// The configured fallback coordinates
    #[must_use]
    pub fn fallback_coordinates(&self) -> Coordinates {
        Coordinates::new(
            self.location.fallback_latitude,
            self.location.fallback_longitude,
        )
    }

    /// Cache TTL as a duration
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.cache.ttl_minutes) * 60)
    }

    /// Search debounce delay as a duration
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.refresh.search_debounce_ms))
    }

    /// Auto-refresh interval as a duration
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh.update_interval_seconds))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.api_base_url.is_empty() {
            self.provider.api_base_url = default_api_base_url();
        }
        if self.provider.geolocate_url.is_empty() {
            self.provider.geolocate_url = default_geolocate_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_timeout();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.refresh.update_interval_seconds == 0 {
            self.refresh.update_interval_seconds = default_update_interval();
        }
        if self.refresh.search_debounce_ms == 0 {
            self.refresh.search_debounce_ms = default_search_debounce();
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
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key, when one is provided
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.provider.api_key {
            if api_key.is_empty() {
                return Err(SkycastError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(SkycastError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 100 {
                return Err(SkycastError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(SkycastError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.cache.ttl_minutes > 1440 {
            return Err(
                SkycastError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into(),
            );
        }

        if self.refresh.update_interval_seconds < 30 {
            return Err(
                SkycastError::config("Auto-refresh interval cannot be below 30 seconds").into(),
            );
        }

        if self.refresh.search_debounce_ms > 10_000 {
            return Err(
                SkycastError::config("Search debounce cannot exceed 10000 milliseconds").into(),
            );
        }

        if !(-90.0..=90.0).contains(&self.location.fallback_latitude) {
            return Err(
                SkycastError::config("Fallback latitude must be between -90 and 90").into(),
            );
        }

        if !(-180.0..=180.0).contains(&self.location.fallback_longitude) {
            return Err(
                SkycastError::config("Fallback longitude must be between -180 and 180").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.provider.api_base_url, &self.provider.geolocate_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkycastError::config(
                    "Provider URLs must be valid HTTP or HTTPS URLs",
                )
                .into());
            }
        }

        Ok(())
    }
}
