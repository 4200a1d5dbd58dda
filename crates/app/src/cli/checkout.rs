use std::sync::Arc;

use agroverse::{address::DEFAULT_COUNTRY, checkout::CheckoutForm, money::format_usd};
use agroverse_app::{checkout::PrintNavigator, context::AppContext, forms::populate};
use clap::Args;

use crate::cli::shipping::print_view;

/// Fields left out are taken from the details saved at the last checkout.
#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    full_name: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Phone number
    #[arg(long)]
    phone: Option<String>,

    /// Street address
    #[arg(long)]
    address: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// State or region
    #[arg(long)]
    state: Option<String>,

    /// Postal code
    #[arg(long)]
    zip: Option<String>,

    /// Country code
    #[arg(long)]
    country: Option<String>,

    /// Shipping option id; the cheapest is used when omitted
    #[arg(long)]
    rate: Option<String>,
}

impl CheckoutArgs {
    fn form(&self, context: &AppContext) -> CheckoutForm {
        let mut form = CheckoutForm::default();

        if let Some(saved) = context.forms.store().load() {
            populate(&mut form, &saved);
        }

        let overrides = [
            (&mut form.full_name, &self.full_name),
            (&mut form.email, &self.email),
            (&mut form.phone, &self.phone),
            (&mut form.address, &self.address),
            (&mut form.city, &self.city),
            (&mut form.state, &self.state),
            (&mut form.zip, &self.zip),
            (&mut form.country, &self.country),
        ];

        for (field, value) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }

        if form.country.trim().is_empty() {
            form.country = DEFAULT_COUNTRY.to_string();
        }

        form
    }
}

pub(crate) async fn run(args: CheckoutArgs, context: &AppContext) -> Result<(), String> {
    let form = args.form(context);

    context.shipping.calculate(form.shipping_address()).await;

    if let Some(rate) = args.rate.as_deref() {
        context
            .shipping
            .set_selected_rate(Some(rate))
            .await
            .map_err(|error| error.to_string())?;
    }

    let view = context.shipping.view();

    print_view(&view);

    if let Some(message) = view.status.message() {
        println!("{message}");
    }

    if let Some(selected) = &view.selected {
        let total = context.cart.subtotal() + selected.amount;

        println!("shipping: {} {}", selected.name, format_usd(selected.amount));
        println!("total: {}", format_usd(total));
    }

    context
        .checkout(Arc::new(PrintNavigator))
        .submit(&form)
        .await
        .map(|_url| ())
        .map_err(|error| error.user_messages().join("\n"))
}
