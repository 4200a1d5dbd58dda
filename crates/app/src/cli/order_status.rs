use agroverse::{
    money::format_money,
    orders::{Order, display_date},
};
use agroverse_app::context::AppContext;
use clap::Args;

const RECENT_ORDERS: usize = 3;

#[derive(Debug, Args)]
pub(crate) struct OrderStatusArgs {
    /// Checkout session id from the confirmation email
    session_id: String,
}

pub(crate) async fn run(args: OrderStatusArgs, context: &AppContext) -> Result<(), String> {
    let lookup = context.order_status();

    let order = lookup
        .lookup(&args.session_id)
        .await
        .map_err(|error| error.user_message())?;

    print_order(&order);

    let recent = lookup
        .history()
        .recent(Some(order.session_id.as_str()), RECENT_ORDERS);

    if !recent.is_empty() {
        println!();
        println!("recent orders:");

        for entry in recent {
            println!(
                "  {} {} {} {}",
                entry.session_id,
                entry.display_date(),
                entry.status,
                format_money(entry.amount, &entry.currency)
            );
        }
    }

    Ok(())
}

fn print_order(order: &Order) {
    let currency = order.currency();

    println!("order: {}", order.session_id);
    println!("status: {}", order.status());
    println!("date: {}", display_date(order.date.as_deref()));

    for item in &order.items {
        println!(
            "  {} x {}: {}",
            item.quantity,
            item.name,
            format_money(item.line_total(), currency)
        );
    }

    println!("subtotal: {}", format_money(order.subtotal_or_amount(), currency));

    if let Some(shipping) = order.shipping_cost {
        println!("shipping: {}", format_money(shipping, currency));
    }

    println!("total: {}", format_money(order.amount, currency));

    if let Some(address) = &order.shipping_address {
        println!(
            "ship to: {}, {}, {}, {} {} {}",
            address.full_name, address.address, address.city, address.state, address.zip, address.country
        );
    }

    if let Some(number) = &order.tracking_number {
        match order.tracking_url() {
            Some(url) => println!("tracking: {number} {url}"),
            None => println!("tracking: {number}"),
        }
    }
}
