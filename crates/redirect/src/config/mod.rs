//! Server configuration module

use clap::Parser;

use crate::config::{logging::LoggingConfig, platform::PlatformConfig, server::ServerRuntimeConfig};

pub(crate) mod logging;
pub(crate) mod platform;
pub(crate) mod server;

/// Agroverse checkout redirect server configuration
#[derive(Debug, Parser)]
#[command(name = "agroverse-redirect", about = "Agroverse checkout redirect server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Commerce platform settings.
    #[command(flatten)]
    pub platform: PlatformConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
