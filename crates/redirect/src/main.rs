//! Agroverse checkout redirect server
//!
//! Turns a product link into a hosted checkout: builds a cart on the commerce
//! platform and answers with a redirect to its payment page.

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use crate::{config::ServerConfig, platform::HttpCommercePlatform, state::State};

mod checkout;
mod config;
mod extensions;
mod healthcheck;
mod logging;
mod platform;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Redirect server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("failed to initialize logging: {init_error}");
        }

        process::exit(1);
    }

    let platform = match HttpCommercePlatform::new(&config.platform) {
        Ok(platform) => platform,
        Err(init_error) => {
            error!("failed to build commerce platform client: {init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_platform(platform)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("checkout").get(checkout::handler));

    let doc =
        OpenApi::new("Agroverse Checkout Redirect", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}
