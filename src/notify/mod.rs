//! Outbound notification channels.
//!
//! Delivery never fails the cycle: every channel reports a [`Delivery`] and
//! the caller decides whether to log it.

pub mod console;
pub mod telegram;

use serde::Serialize;

/// Outcome of a single notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum Delivery {
    Sent,
    Failed(String),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent)
    }
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delivery::Sent => write!(f, "sent"),
            Delivery::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, text: &str) -> Delivery;
}

/// Channel selected at startup from config and CLI flags.
pub enum Channel {
    Telegram(telegram::TelegramNotifier),
    Console(console::ConsoleNotifier),
}

impl Notifier for Channel {
    async fn notify(&self, text: &str) -> Delivery {
        match self {
            Channel::Telegram(n) => n.notify(text).await,
            Channel::Console(n) => n.notify(text).await,
        }
    }
}
