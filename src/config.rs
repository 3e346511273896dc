//! Configuration management for the `Wanderlust` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WanderlustError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `Wanderlust` service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WanderlustConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Itinerary generation settings
    #[serde(default)]
    pub ai: AiConfig,
    /// Simulated latency of the travel data service
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Vehicle tracking animation settings
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Payment wizard timings
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Preference storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Itinerary generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Credential for the completion endpoint. Falls back to `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the credential
    #[serde(default = "default_ai_api_key_env")]
    pub api_key_env: String,
    /// Base URL of the generative language API
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u32,
}

/// Artificial delays of the mock travel service, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_packages_latency")]
    pub packages_ms: u64,
    #[serde(default = "default_package_latency")]
    pub package_ms: u64,
    #[serde(default = "default_user_latency")]
    pub user_ms: u64,
    #[serde(default = "default_bookings_latency")]
    pub bookings_ms: u64,
}

/// Vehicle tracking animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Timer interval in milliseconds
    #[serde(default = "default_tracking_tick")]
    pub tick_ms: u64,
    /// Progress added per tick, in percent
    #[serde(default = "default_tracking_step")]
    pub step: u32,
}

/// Payment wizard timings. Processing and redirect are measured from
/// submission, retention from the redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_payment_processing")]
    pub processing_ms: u64,
    #[serde(default = "default_payment_redirect")]
    pub redirect_ms: u64,
    /// How long a finished checkout stays readable before it is dropped
    #[serde(default = "default_payment_retention")]
    pub retention_ms: u64,
}

/// Preference storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the preference database
    #[serde(default = "default_storage_path")]
    pub path: String,
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
    8080
}

fn default_ai_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_ai_timeout() -> u32 {
    60
}

fn default_packages_latency() -> u64 {
    500
}

fn default_package_latency() -> u64 {
    300
}

fn default_user_latency() -> u64 {
    200
}

fn default_bookings_latency() -> u64 {
    400
}

fn default_tracking_tick() -> u64 {
    200
}

fn default_tracking_step() -> u32 {
    1
}

fn default_payment_processing() -> u64 {
    3000
}

fn default_payment_redirect() -> u64 {
    6000
}

fn default_payment_retention() -> u64 {
    60_000
}

fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("wanderlust").join("preferences"))
        .unwrap_or_else(|| PathBuf::from("wanderlust-preferences"))
        .to_string_lossy()
        .into_owned()
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
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_ai_api_key_env(),
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_seconds: default_ai_timeout(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            packages_ms: default_packages_latency(),
            package_ms: default_package_latency(),
            user_ms: default_user_latency(),
            bookings_ms: default_bookings_latency(),
        }
    }
}

impl LatencyConfig {
    /// No artificial delay at all
    #[must_use]
    pub fn none() -> Self {
        Self {
            packages_ms: 0,
            package_ms: 0,
            user_ms: 0,
            bookings_ms: 0,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tracking_tick(),
            step: default_tracking_step(),
        }
    }
}

impl TrackingConfig {
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_ms: default_payment_processing(),
            redirect_ms: default_payment_redirect(),
            retention_ms: default_payment_retention(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
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

impl AiConfig {
    /// The configured credential, or the one found in `api_key_env`.
    /// Blank values count as missing.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(present)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(present))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WanderlustConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides, e.g. WANDERLUST_SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("WANDERLUST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WanderlustConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wanderlust").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.ai.api_key_env.is_empty() {
            self.ai.api_key_env = default_ai_api_key_env();
        }
        if self.ai.base_url.is_empty() {
            self.ai.base_url = default_ai_base_url();
        }
        if self.ai.model.is_empty() {
            self.ai.model = default_ai_model();
        }
        if self.ai.timeout_seconds == 0 {
            self.ai.timeout_seconds = default_ai_timeout();
        }
        if self.tracking.tick_ms == 0 {
            self.tracking.tick_ms = default_tracking_tick();
        }
        if self.tracking.step == 0 {
            self.tracking.step = default_tracking_step();
        }
        if self.storage.path.is_empty() {
            self.storage.path = default_storage_path();
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
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.ai.timeout_seconds > 300 {
            return Err(
                WanderlustError::config("AI request timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(10..=10_000).contains(&self.tracking.tick_ms) {
            return Err(WanderlustError::config(
                "Tracking tick must be between 10 and 10000 milliseconds",
            )
            .into());
        }

        if !(1..=100).contains(&self.tracking.step) {
            return Err(
                WanderlustError::config("Tracking step must be between 1 and 100 percent").into(),
            );
        }

        if self.payment.redirect_ms < self.payment.processing_ms {
            return Err(WanderlustError::config(
                "Payment redirect delay cannot be shorter than the processing delay",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WanderlustError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WanderlustError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://")
        {
            return Err(
                WanderlustError::config("AI base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}
