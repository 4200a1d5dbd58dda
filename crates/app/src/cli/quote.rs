use agroverse::quotes::{QuoteProduct, QuoteRequest};
use agroverse_app::context::AppContext;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Product to price as `id` or `id:quantity`; repeatable
    #[arg(long = "product")]
    products: Vec<String>,

    /// Business name
    #[arg(long)]
    business_name: String,

    /// Contact name
    #[arg(long)]
    contact_name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Contact phone
    #[arg(long)]
    phone: String,

    /// Kind of business
    #[arg(long, default_value = "")]
    company_type: String,

    /// Delivery address
    #[arg(long)]
    shipping_address: String,

    /// Expected ordering frequency
    #[arg(long, default_value = "")]
    expected_frequency: String,

    /// Anything else
    #[arg(long, default_value = "")]
    notes: String,
}

fn parse_product(entry: &str) -> Result<QuoteProduct, String> {
    let (id, quantity) = entry.split_once(':').unwrap_or((entry, "1"));

    let quantity = quantity
        .trim()
        .parse()
        .map_err(|error| format!("invalid quantity in {entry}: {error}"))?;

    Ok(QuoteProduct::new(id.trim(), quantity))
}

pub(crate) async fn run(args: QuoteArgs, context: &AppContext) -> Result<(), String> {
    let products = args
        .products
        .iter()
        .map(String::as_str)
        .map(parse_product)
        .collect::<Result<Vec<_>, _>>()?;

    let request = QuoteRequest {
        products,
        business_name: args.business_name,
        contact_name: args.contact_name,
        email: args.email,
        phone: args.phone,
        company_type: args.company_type,
        shipping_address: args.shipping_address,
        expected_frequency: args.expected_frequency,
        notes: args.notes,
    };

    context
        .quotes()
        .submit(request)
        .await
        .map_err(|error| error.user_messages().join("\n"))?;

    println!("quote request sent; we will be in touch within one business day");

    Ok(())
}
