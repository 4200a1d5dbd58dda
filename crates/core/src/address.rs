//! Shipping Addresses

use serde::{Deserialize, Serialize};

/// Country used when a form leaves it blank.
pub const DEFAULT_COUNTRY: &str = "US";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Shipping address derived from checkout form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street address
    #[serde(default)]
    pub address: String,

    /// City
    #[serde(default)]
    pub city: String,

    /// State or region
    #[serde(default)]
    pub state: String,

    /// Postal code
    #[serde(default)]
    pub zip: String,

    /// Country code
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: default_country(),
        }
    }
}

impl ShippingAddress {
    /// Build an address from raw field values, trimming each and defaulting the country.
    pub fn from_fields(
        address: &str,
        city: &str,
        state: &str,
        zip: &str,
        country: Option<&str>,
    ) -> Self {
        let country = country
            .map(str::trim)
            .filter(|country| !country.is_empty())
            .unwrap_or(DEFAULT_COUNTRY);

        Self {
            address: address.trim().to_string(),
            city: city.trim().to_string(),
            state: state.trim().to_string(),
            zip: zip.trim().to_string(),
            country: country.to_string(),
        }
    }

    /// Whether street, city, state and zip are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.address, &self.city, &self.state, &self.zip]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Deterministic fingerprint used to de-duplicate rate lookups.
    #[must_use]
    pub fn fingerprint(&self) -> AddressFingerprint {
        AddressFingerprint(format!(
            "{}{}{}{}",
            self.address, self.city, self.state, self.zip
        ))
    }
}

/// Concatenation of the address fields that determine shipping rates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressFingerprint(String);

impl AddressFingerprint {
    /// Borrow the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
