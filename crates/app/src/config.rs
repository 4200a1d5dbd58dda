//! Storefront configuration.

use std::{path::PathBuf, time::Duration};

use agroverse::environment::Environment;
use clap::{Args, ValueEnum};

use crate::service::{DEFAULT_TIMEOUT, ServiceConfig};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Commerce scripting endpoint URL
    #[arg(long, env = "AGROVERSE_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Backend environment; derived from --hostname when omitted
    #[arg(long, env = "AGROVERSE_ENVIRONMENT", value_enum)]
    pub environment: Option<Environment>,

    /// Host the storefront is served from
    #[arg(long, env = "AGROVERSE_HOSTNAME")]
    pub hostname: Option<String>,

    /// Directory holding the cart, saved form and order history
    #[arg(long, env = "AGROVERSE_DATA_DIR", default_value = ".agroverse")]
    pub data_dir: PathBuf,

    /// Product catalog JSON file
    #[arg(long, env = "AGROVERSE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Timeout for remote calls, in seconds
    #[arg(long, env = "AGROVERSE_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,
}

impl StorefrontConfig {
    /// The explicit environment, else the one implied by the hostname.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_else(|| {
            self.hostname
                .as_deref()
                .map(Environment::from_hostname)
                .unwrap_or_default()
        })
    }

    /// Settings for the commerce service client.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            url: self.service_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
