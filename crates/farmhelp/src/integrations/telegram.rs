use serde::Serialize;
use tracing::info;

use super::{endpoint, http_client, BoxFuture, IntegrationError};
use crate::config::TelegramConfig;

pub const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

/// Best-effort chat notifications for new form submissions.
pub trait Notifier: Send + Sync {
    fn notify<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), IntegrationError>>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Telegram Bot API client. Without credentials every notification is skipped.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<TelegramConfig>,
}

impl TelegramNotifier {
    pub fn new(credentials: Option<TelegramConfig>) -> Result<Self, IntegrationError> {
        Self::with_base_url(credentials, DEFAULT_TELEGRAM_BASE_URL)
    }

    pub fn with_base_url(
        credentials: Option<TelegramConfig>,
        base_url: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send(&self, message: &str) -> Result<(), IntegrationError> {
        let Some(credentials) = &self.credentials else {
            info!("telegram credentials not found; skipping notification");
            return Ok(());
        };

        let payload = SendMessage {
            chat_id: &credentials.chat_id,
            text: message,
            parse_mode: "Markdown",
        };

        self.http
            .post(endpoint(
                &self.base_url,
                &format!("bot{}/sendMessage", credentials.bot_token),
            ))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), IntegrationError>> {
        Box::pin(self.send(message))
    }
}
