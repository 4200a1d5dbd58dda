use agroverse::{address::ShippingAddress, money::format_usd};
use agroverse_app::{context::AppContext, shipping::ShippingView};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ShippingArgs {
    /// Street address
    #[arg(long)]
    address: String,

    /// City
    #[arg(long)]
    city: String,

    /// State or region
    #[arg(long)]
    state: String,

    /// Postal code
    #[arg(long)]
    zip: String,

    /// Country code
    #[arg(long)]
    country: Option<String>,
}

pub(crate) async fn run(args: ShippingArgs, context: &AppContext) -> Result<(), String> {
    let address = ShippingAddress::from_fields(
        &args.address,
        &args.city,
        &args.state,
        &args.zip,
        args.country.as_deref(),
    );

    context.shipping.calculate(address).await;

    let view = context.shipping.view();

    print_view(&view);

    match view.status.message() {
        Some(message) if view.quotes.is_empty() => Err(message.to_string()),
        _ => Ok(()),
    }
}

pub(crate) fn print_view(view: &ShippingView) {
    if view.quotes.is_empty() {
        return;
    }

    println!("shipping options:");

    for quote in &view.quotes {
        let marker = if view.selected.as_ref().is_some_and(|chosen| chosen.id == quote.id) {
            "*"
        } else {
            " "
        };

        println!(
            "{marker} {}: {} {} ({})",
            quote.id,
            quote.name,
            format_usd(quote.amount),
            quote.delivery_days
        );
    }

    if let Some(note) = view.gate.note() {
        println!("{note}");
    }
}
