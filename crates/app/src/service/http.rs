//! HTTP client for the commerce scripting endpoint.

use std::time::Duration;

use agroverse::{
    environment::Environment, orders::Order, quotes::QuoteRequest,
    shipping::{ShippingRateQuote, format_weight_oz},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::service::{CheckoutRequest, CommerceService, RateRequest, ServiceError};

/// Client-side limit on every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PLACEHOLDER_MARKER: &str = "YOUR_";

/// Connection settings for the scripting endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Endpoint URL; unset or placeholder values disable remote calls.
    pub url: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// The endpoint, when it is set to a real value.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when the URL is missing, blank or still a placeholder.
    pub fn endpoint(&self) -> Result<&str, ServiceError> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && !url.contains(PLACEHOLDER_MARKER))
            .ok_or(ServiceError::NotConfigured)
    }
}

/// `CommerceService` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCommerceService {
    config: ServiceConfig,
    http: Client,
}

impl HttpCommerceService {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let url = self.config.endpoint()?;

        debug!(action, "calling commerce service");

        let response = self
            .http
            .get(url)
            .query(&[("action", action)])
            .query(params)
            .send()
            .await?;

        read_body(action, response).await
    }
}

async fn read_body<T: DeserializeOwned>(action: &str, response: Response) -> Result<T, ServiceError> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        return Err(ServiceError::UnexpectedResponse(format!(
            "{action} request failed with status {status}: {text}"
        )));
    }

    Ok(response.json().await?)
}

fn encode<T: Serialize>(value: &T) -> Result<String, ServiceError> {
    serde_json::to_string(value).map_err(ServiceError::Encode)
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    status: Option<String>,

    #[serde(default)]
    rates: Option<Vec<ShippingRateQuote>>,

    #[serde(default)]
    error: Option<String>,
}

impl RatesResponse {
    fn into_rates(self) -> Result<Vec<ShippingRateQuote>, ServiceError> {
        if let Some(error) = self.error {
            return Err(ServiceError::Remote(error));
        }

        match (self.status.as_deref(), self.rates) {
            (Some("success"), rates) => Ok(rates.unwrap_or_default()),
            (status, _) => Err(ServiceError::UnexpectedResponse(format!(
                "shipping rates response with status {status:?}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    #[serde(default)]
    checkout_url: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

impl CheckoutResponse {
    fn into_url(self) -> Result<String, ServiceError> {
        if let Some(error) = self.error {
            return Err(ServiceError::Remote(error));
        }

        self.checkout_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServiceError::UnexpectedResponse("no checkout URL received".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    #[serde(default)]
    order: Option<Order>,

    #[serde(default)]
    error: Option<String>,
}

impl OrderStatusResponse {
    fn into_order(self) -> Result<Option<Order>, ServiceError> {
        match self.error {
            Some(error) => Err(ServiceError::Remote(error)),
            None => Ok(self.order),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl CommerceService for HttpCommerceService {
    async fn calculate_shipping_rates(
        &self,
        request: RateRequest,
    ) -> Result<Vec<ShippingRateQuote>, ServiceError> {
        let params = [
            ("environment", request.environment.to_string()),
            ("weightOz", format_weight_oz(request.weight_oz)),
            ("shippingAddress", encode(&request.address)?),
        ];

        self.get::<RatesResponse>("calculateShippingRates", &params)
            .await?
            .into_rates()
    }

    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<String, ServiceError> {
        let mut params = vec![
            ("environment", request.environment.to_string()),
            ("cart", encode(&request.cart)?),
            ("shippingAddress", encode(&request.customer)?),
        ];

        if let Some(rate_id) = request.selected_rate_id {
            params.push(("selectedShippingRateId", rate_id));
        }

        self.get::<CheckoutResponse>("createCheckoutSession", &params)
            .await?
            .into_url()
    }

    async fn get_order_status(&self, session_id: String) -> Result<Option<Order>, ServiceError> {
        self.get::<OrderStatusResponse>("getOrderStatus", &[("sessionId", session_id)])
            .await?
            .into_order()
    }

    async fn submit_quote_request(
        &self,
        environment: Environment,
        request: QuoteRequest,
    ) -> Result<(), ServiceError> {
        let url = self.config.endpoint()?;

        let form = [
            ("action", "submitQuoteRequest".to_string()),
            ("environment", environment.to_string()),
            ("quoteData", encode(&request)?),
        ];

        let response = self.http.post(url).form(&form).send().await?;

        match read_body::<AckResponse>("submitQuoteRequest", response).await?.error {
            Some(error) => Err(ServiceError::Remote(error)),
            None => Ok(()),
        }
    }
}
