use mockall::automock;
use tracing::info;

/// Sends the shopper to the hosted payment page.
#[automock]
pub trait Navigator: Send + Sync {
    /// Leave the storefront for `url`.
    fn navigate(&self, url: &str);
}

/// Navigator for terminal use: prints the URL to follow.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    #[expect(clippy::print_stdout, reason = "the URL is the command's output")]
    fn navigate(&self, url: &str) {
        info!(url, "redirecting to checkout");

        println!("Continue to payment: {url}");
    }
}
