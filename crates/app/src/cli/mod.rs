use agroverse_app::{
    config::{LoggingConfig, StorefrontConfig},
    context::AppContext,
    logging,
};
use clap::{Parser, Subcommand};

mod cart;
mod checkout;
mod history;
mod order_status;
mod quote;
mod shipping;

#[derive(Debug, Parser)]
#[command(name = "agroverse", about = "Agroverse storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    storefront: StorefrontConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show or change the cart
    Cart(cart::CartCommand),

    /// Quote shipping for the cart
    Shipping(shipping::ShippingArgs),

    /// Create a checkout session for the cart
    Checkout(checkout::CheckoutArgs),

    /// Look up an order after checkout
    OrderStatus(order_status::OrderStatusArgs),

    /// List orders looked up on this device
    History(history::HistoryArgs),

    /// Request a wholesale quote
    Quote(quote::QuoteArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        logging::init(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.storefront)
            .map_err(|error| format!("failed to start: {error}"))?;

        let _reconciliation = context.spawn_weight_reconciliation();

        match self.command {
            Commands::Cart(command) => cart::run(command, &context),
            Commands::Shipping(args) => shipping::run(args, &context).await,
            Commands::Checkout(args) => checkout::run(args, &context).await,
            Commands::OrderStatus(args) => order_status::run(args, &context).await,
            Commands::History(args) => history::run(&args, &context),
            Commands::Quote(args) => quote::run(args, &context).await,
        }
    }
}
