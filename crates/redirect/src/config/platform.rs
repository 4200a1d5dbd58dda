//! Commerce Platform Config

use std::time::Duration;

use clap::Args;

/// Commerce platform settings.
#[derive(Debug, Args)]
pub struct PlatformConfig {
    /// Commerce platform REST base URL
    #[arg(long, env = "PLATFORM_URL", default_value = "https://www.wixapis.com")]
    pub platform_url: String,

    /// Commerce platform API key
    #[arg(long, env = "PLATFORM_API_KEY", hide_env_values = true)]
    pub platform_api_key: String,

    /// Catalog app id the product ids belong to
    #[arg(
        long,
        env = "CATALOG_APP_ID",
        default_value = "215238eb-22a5-4c36-9e7b-e7c08025e04e"
    )]
    pub catalog_app_id: String,

    /// Timeout for platform calls, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15u64)]
    pub request_timeout_secs: u64,
}

impl PlatformConfig {
    /// Timeout applied to every platform call.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
