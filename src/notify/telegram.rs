use reqwest::Client;
use serde::Serialize;
use tracing::warn;

use super::{Delivery, Notifier};
use crate::config::TelegramConfig;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API `sendMessage` channel.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: TelegramConfig) -> Self {
        Self {
            client,
            config,
            api_base: API_BASE.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token)
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id: &self.config.chat_id,
                text,
            })
            .send()
            .await
            // The bot token is part of the URL; keep it out of errors and logs.
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let data: serde_json::Value = response.json().await.unwrap_or_default();
            let description = data
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("no description");
            anyhow::bail!("HTTP {}: {}", status, description);
        }
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Delivery {
        match self.send(text).await {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                let reason = e.to_string();
                warn!(error = %reason, "telegram delivery failed");
                Delivery::Failed(reason)
            }
        }
    }
}
