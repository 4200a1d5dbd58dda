//! REST client for the hosted commerce platform.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header::AUTHORIZATION};
use serde::{
    Deserialize, Serialize,
    de::{DeserializeOwned, IgnoredAny},
};
use tracing::debug;

use crate::{
    config::platform::PlatformConfig,
    platform::{CartLine, CommercePlatform, PlatformError},
};

const CHANNEL_TYPE: &str = "WEB";
const CHANNEL_SUBTYPE: &str = "EXTERNAL";

/// `CommercePlatform` over the platform's REST API.
#[derive(Debug, Clone)]
pub(crate) struct HttpCommercePlatform {
    base_url: String,
    api_key: String,
    app_id: String,
    http: Client,
}

impl HttpCommercePlatform {
    pub(crate) fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            base_url: config.platform_url.trim_end_matches('/').to_string(),
            api_key: config.platform_api_key.clone(),
            app_id: config.catalog_app_id.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/ecom/v1/{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> Result<T, PlatformError> {
        debug!(action, "calling commerce platform");

        let response = request.header(AUTHORIZATION, &self.api_key).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PlatformError::UnexpectedResponse(format!(
                "{action} request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelInfo {
    channel_type: &'static str,
    channel_subtype: &'static str,
}

impl ChannelInfo {
    const EXTERNAL_WEB: Self = Self {
        channel_type: CHANNEL_TYPE,
        channel_subtype: CHANNEL_SUBTYPE,
    };
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogReference<'a> {
    catalog_item_id: &'a str,
    app_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LineItem<'a> {
    catalog_reference: CatalogReference<'a>,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCartRequest<'a> {
    line_items: Vec<LineItem<'a>>,
    checkout_info: ChannelInfo,
}

#[derive(Debug, Serialize)]
struct Coupon<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateCartRequest<'a> {
    coupons: [Coupon<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutRequest<'a> {
    cart_id: &'a str,
    options: ChannelInfo,
}

#[derive(Debug, Deserialize)]
struct Identified {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CartResponse {
    #[serde(default)]
    cart: Option<Identified>,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    #[serde(default)]
    checkout: Option<Identified>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutUrlResponse {
    #[serde(default)]
    checkout_url: Option<String>,
}

fn required(value: Option<String>, what: &str) -> Result<String, PlatformError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PlatformError::UnexpectedResponse(format!("no {what} received")))
}

#[async_trait]
impl CommercePlatform for HttpCommercePlatform {
    async fn create_cart(&self, lines: Vec<CartLine>) -> Result<String, PlatformError> {
        let body = CreateCartRequest {
            line_items: lines
                .iter()
                .map(|line| LineItem {
                    catalog_reference: CatalogReference {
                        catalog_item_id: &line.product_id,
                        app_id: &self.app_id,
                    },
                    quantity: line.quantity,
                })
                .collect(),
            checkout_info: ChannelInfo::EXTERNAL_WEB,
        };

        let response: CartResponse = self
            .send("createCart", self.http.post(self.url("carts")).json(&body))
            .await?;

        required(response.cart.and_then(|cart| cart.id), "cart id")
    }

    async fn apply_coupon(&self, cart_id: &str, code: &str) -> Result<(), PlatformError> {
        let body = UpdateCartRequest {
            coupons: [Coupon { code }],
        };

        let _: IgnoredAny = self
            .send(
                "updateCart",
                self.http
                    .patch(self.url(&format!("carts/{cart_id}")))
                    .json(&body),
            )
            .await?;

        Ok(())
    }

    async fn create_checkout(&self, cart_id: &str) -> Result<String, PlatformError> {
        let body = CreateCheckoutRequest {
            cart_id,
            options: ChannelInfo::EXTERNAL_WEB,
        };

        let response: CheckoutResponse = self
            .send(
                "createCheckout",
                self.http.post(self.url("checkouts")).json(&body),
            )
            .await?;

        required(
            response.checkout.and_then(|checkout| checkout.id),
            "checkout id",
        )
    }

    async fn checkout_url(&self, checkout_id: &str) -> Result<String, PlatformError> {
        let response: CheckoutUrlResponse = self
            .send(
                "getCheckoutUrl",
                self.http
                    .get(self.url(&format!("checkouts/{checkout_id}/checkout-url"))),
            )
            .await?;

        required(response.checkout_url, "checkout URL")
    }
}
