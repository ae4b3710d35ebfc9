use colored::Colorize;

use super::{Delivery, Notifier};

/// Prints the message to stderr. Used for `--dry-run` and when no remote
/// channel is configured.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    async fn notify(&self, text: &str) -> Delivery {
        eprintln!("\n {}\n", "── notification ──".dimmed());
        for line in text.lines() {
            eprintln!(" {}", line);
        }
        eprintln!();
        Delivery::Sent
    }
}
