//! Deployment Environment

use std::fmt::{Display, Formatter, Result as FmtResult};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Environment passed to remote calls so they can route to test or live backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local and beta hosts.
    Development,

    /// Everything else.
    #[default]
    Production,
}

impl Environment {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Environment implied by the host the storefront is served from.
    #[must_use]
    pub fn from_hostname(hostname: &str) -> Self {
        let hostname = hostname.trim().to_ascii_lowercase();

        let local = hostname == "localhost"
            || hostname == "127.0.0.1"
            || hostname.contains("localhost:")
            || hostname.contains("127.0.0.1:");

        let beta = hostname == "beta.agroverse.shop" || hostname == "www.beta.agroverse.shop";

        if local || beta {
            Self::Development
        } else {
            Self::Production
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
