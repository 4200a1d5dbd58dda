use agroverse::money::format_money;
use agroverse_app::context::AppContext;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct HistoryArgs {
    /// Forget every order instead of listing them
    #[arg(long)]
    clear: bool,
}

pub(crate) fn run(args: &HistoryArgs, context: &AppContext) -> Result<(), String> {
    if args.clear {
        context
            .history
            .clear()
            .map_err(|error| format!("failed to clear order history: {error}"))?;

        println!("order history cleared");
        return Ok(());
    }

    let entries = context.history.entries();

    if entries.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    for entry in entries {
        println!("session_id: {}", entry.session_id);
        println!("date: {}", entry.display_date());
        println!("items: {}", entry.headline());
        println!("status: {}", entry.status);
        println!("amount: {} {}", format_money(entry.amount, &entry.currency), entry.currency);
        println!();
    }

    Ok(())
}
