//! Checkout redirect handler.
//!
//! `GET /checkout?products=id:qty,id2:qty2&coupon=CODE` builds a hosted cart and
//! answers with a redirect to its payment page.

use salvo::{oapi::extract::QueryParam, prelude::*};
use tracing::{error, info, warn};

use crate::{
    extensions::*,
    platform::{CartLine, CommercePlatform, PlatformError},
};

pub(crate) const NO_VALID_PRODUCTS: &str = "No valid products provided";

/// Parse `id:qty` pairs separated by commas.
///
/// A missing or blank quantity means one. Entries with an empty id, a quantity
/// that is not a positive integer, or no content at all are dropped.
pub(crate) fn parse_products(raw: &str) -> Vec<CartLine> {
    raw.split(',')
        .filter_map(|entry| {
            let (id, quantity) = match entry.split_once(':') {
                Some((id, quantity)) => (id.trim(), quantity.trim()),
                None => (entry.trim(), ""),
            };

            let quantity = if quantity.is_empty() {
                1
            } else {
                quantity.parse::<u32>().ok()?
            };

            (!id.is_empty() && quantity > 0).then(|| CartLine::new(id, quantity))
        })
        .collect()
}

async fn start_checkout(
    platform: &dyn CommercePlatform,
    lines: Vec<CartLine>,
    coupon: Option<&str>,
) -> Result<String, PlatformError> {
    let cart_id = platform.create_cart(lines).await?;

    if let Some(code) = coupon
        && let Err(error) = platform.apply_coupon(&cart_id, code).await
    {
        warn!(cart_id = cart_id.as_str(), "invalid coupon, continuing without: {error}");
    }

    let checkout_id = platform.create_checkout(&cart_id).await?;

    platform.checkout_url(&checkout_id).await
}

/// Checkout redirect handler
///
/// Creates a cart for the requested products and redirects to the hosted payment page.
#[endpoint(
    tags("checkout"),
    summary = "Redirect to hosted checkout",
    responses(
        (status_code = StatusCode::FOUND, description = "Redirect to the payment page"),
        (status_code = StatusCode::BAD_REQUEST, description = "No valid products, or the platform rejected the request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    products: QueryParam<String, false>,
    coupon: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let platform = depot.platform_or_500()?;

    let lines = parse_products(products.into_inner().as_deref().unwrap_or_default());

    if lines.is_empty() {
        res.bad_request_text(NO_VALID_PRODUCTS.to_string());

        return Ok(());
    }

    let coupon = coupon
        .into_inner()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());

    match start_checkout(platform.as_ref(), lines, coupon.as_deref()).await {
        Ok(url) => {
            info!(url = url.as_str(), "redirecting to checkout");

            res.redirect_found(url)
        }
        Err(platform_error) => {
            error!("checkout redirect failed: {platform_error}");

            res.bad_request_text(format!("Error: {platform_error}"));

            Ok(())
        }
    }
}
