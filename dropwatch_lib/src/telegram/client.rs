//! Telegram Bot API client. Sends plain-text messages to one chat.

use super::error::TelegramError;
use super::types::ApiResponse;
use std::time::Duration;
use tracing::debug;

/// Request timeout for Telegram API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API client bound to one bot and one target chat.
pub struct TelegramClient {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramClient {
    /// Create a new TelegramClient against the production endpoint.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, TelegramError> {
        Self::with_base_url("https://api.telegram.org", bot_token, chat_id)
    }

    /// Create a new TelegramClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(
        base_url: &str,
        bot_token: String,
        chat_id: String,
    ) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            bot_token,
            chat_id,
            base_url: base_url.to_string(),
        })
    }

    /// Send a plain-text message to the configured chat.
    ///
    /// The Bot API pairs error statuses with a JSON envelope carrying a
    /// `description`; that description is surfaced as `Rejected` when present.
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);

        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<ApiResponse>(&body) {
                if !parsed.ok {
                    return Err(TelegramError::Rejected(parsed.description.unwrap_or_else(
                        || format!("HTTP {} with no description", status.as_u16()),
                    )));
                }
            }
            let snippet = if body.len() > 200 { &body[..200] } else { &body };
            return Err(TelegramError::Status {
                status: status.as_u16(),
                body: snippet.to_string(),
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            let snippet = if body.len() > 200 { &body[..200] } else { &body };
            TelegramError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e, snippet
            ))
        })?;

        if !parsed.ok {
            return Err(TelegramError::Rejected(
                parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }

        debug!(chars = text.len(), "sent telegram message");
        Ok(())
    }
}
