//! Agroverse storefront CLI

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run().await {
        #[expect(clippy::print_stderr, reason = "command failures are reported to the user")]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
