//! CLI subcommand implementations.

pub mod check;
pub mod run;

use anyhow::{bail, Result};
use dropwatch_lib::config::{Config, TELEGRAM_TOKEN_ENV};
use dropwatch_lib::telegram::TelegramClient;
use dropwatch_lib::yahoo::YahooClient;

/// Points the Yahoo client at a different endpoint, e.g. a mock server.
const YAHOO_BASE_URL_ENV: &str = "DROPWATCH_YAHOO_BASE_URL";
/// Points the Telegram client at a different endpoint, e.g. a mock server.
const TELEGRAM_BASE_URL_ENV: &str = "DROPWATCH_TELEGRAM_BASE_URL";

fn yahoo_client() -> Result<YahooClient> {
    let client = match std::env::var(YAHOO_BASE_URL_ENV).ok() {
        Some(url) => YahooClient::with_base_url(&url)?,
        None => YahooClient::new()?,
    };
    Ok(client)
}

/// Build the Telegram client, preferring the env token over the config file.
fn telegram_client(config: &Config) -> Result<TelegramClient> {
    let token = std::env::var(TELEGRAM_TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| config.telegram.bot_token.clone());

    if token.trim().is_empty() {
        bail!(
            "No Telegram bot token: set telegram.bot_token in the config file or the {} environment variable",
            TELEGRAM_TOKEN_ENV
        );
    }

    let chat_id = config.telegram.chat_id.clone();
    let client = match std::env::var(TELEGRAM_BASE_URL_ENV).ok() {
        Some(url) => TelegramClient::with_base_url(&url, token, chat_id)?,
        None => TelegramClient::new(token, chat_id)?,
    };
    Ok(client)
}
