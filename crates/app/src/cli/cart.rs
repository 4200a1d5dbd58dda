use agroverse::{
    cart::{Cart, NewCartLine},
    catalog::Category,
    money::format_usd,
};
use agroverse_app::context::AppContext;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart
    Show,

    /// Add a catalog product
    Add(AddArgs),

    /// Remove a product
    Remove(RemoveArgs),

    /// Set a product's quantity; zero or less removes it
    Set(SetArgs),

    /// Empty the cart and start a new session
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Catalog product id
    product_id: String,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    product_id: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product id
    product_id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    let cart = match command.command {
        CartSubcommand::Show => context.cart.get_cart(),
        CartSubcommand::Add(args) => add(args, context)?,
        CartSubcommand::Remove(args) => context
            .cart
            .remove_item(&args.product_id)
            .map_err(|error| error.user_message())?,
        CartSubcommand::Set(args) => context
            .cart
            .set_quantity(&args.product_id, args.quantity)
            .map_err(|error| error.user_message())?,
        CartSubcommand::Clear => context
            .cart
            .clear()
            .map_err(|error| error.user_message())?,
    };

    print_cart(&cart);

    Ok(())
}

fn add(args: AddArgs, context: &AppContext) -> Result<Cart, String> {
    let catalog = context
        .catalog
        .current()
        .ok_or("no product catalog loaded; pass --catalog")?;

    let product = catalog
        .get(&args.product_id)
        .ok_or_else(|| format!("unknown product {}", args.product_id))?;

    if product.category == Category::Wholesale {
        return Err(format!(
            "{} is priced on request; use `agroverse quote` instead",
            product.name
        ));
    }

    let mut line = NewCartLine::new(&product.product_id, &product.name, product.price)
        .quantity(args.quantity)
        .image(&product.image)
        .external_price_ref(&product.external_price_ref);

    if let Some(weight) = product.weight {
        line = line.weight(weight);
    }

    context
        .cart
        .add_item(line)
        .map_err(|error| error.user_message())
}

pub(crate) fn print_cart(cart: &Cart) {
    println!("session_id: {}", cart.session_id);

    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    for line in &cart.items {
        println!(
            "{} x {} ({}): {}",
            line.quantity,
            line.name,
            line.product_id,
            format_usd(line.line_total())
        );
    }

    println!("items: {}", cart.item_count());
    println!("subtotal: {}", format_usd(cart.subtotal()));
}
