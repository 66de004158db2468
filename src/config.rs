// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gateway.
//!
//! Values come from an optional file named by `CONTACT_CONFIG`, overridden by
//! `CONTACT__<SECTION>__<KEY>` environment variables, e.g.
//! `CONTACT__RATE_LIMIT__MAX_ATTEMPTS=10`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable naming an optional configuration file.
pub const CONFIG_PATH_ENV: &str = "CONTACT_CONFIG";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CONTACT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration for the contact gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Largest request body the contact endpoint reads, in bytes (default: 65536)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Submission sink configuration
    #[serde(default)]
    pub sink: SinkConfig,

    /// Cross-origin configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Accepted attempts per client per window (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired entries in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Prefix prepended to every client key (default: "contact-form:")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Which sink receives accepted submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Log the submission and report success
    Log,
    /// POST the submission to `webhook_url`
    Webhook,
}

/// Submission sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink implementation (default: log)
    #[serde(default = "default_sink_kind")]
    pub kind: SinkKind,

    /// Target URL for the webhook sink
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Upper bound on a single delivery in milliseconds (default: 10000)
    #[serde(default = "default_sink_timeout_ms")]
    pub timeout_ms: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty disables the CORS layer.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_key_prefix() -> String {
    "contact-form:".to_string()
}

fn default_sink_kind() -> SinkKind {
    SinkKind::Log
}

fn default_sink_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            rate_limit: RateLimitConfig::default(),
            sink: SinkConfig::default(),
            cors: CorsConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: default_sink_kind(),
            webhook_url: None,
            timeout_ms: default_sink_timeout_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl SinkConfig {
    /// Get the delivery timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from the optional file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(::config::File::with_name(&path).required(false));
        }

        Self::build(builder.add_source(Self::environment()))
    }

    /// `CONTACT__SECTION__KEY` overrides; `cors.allowed_origins` is comma-separated.
    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("cors.allowed_origins")
            .try_parsing(true)
    }

    fn build(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_body_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.rate_limit.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "rate_limit.max_attempts",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "rate_limit.window_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "rate_limit.sweep_interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.sink.kind == SinkKind::Webhook {
            let raw = self.sink.webhook_url.as_deref().ok_or(ConfigError::Invalid {
                field: "sink.webhook_url",
                reason: "required when sink.kind is webhook".to_string(),
            })?;

            let parsed = Url::parse(raw).map_err(|e| ConfigError::Invalid {
                field: "sink.webhook_url",
                reason: e.to_string(),
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    field: "sink.webhook_url",
                    reason: format!("unsupported scheme {}", parsed.scheme()),
                });
            }
        }

        Ok(())
    }
}
