//! Error types for Telegram Bot API operations.

use thiserror::Error;

/// Errors from Telegram Bot API operations.
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
    #[error("Telegram returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    #[error("Network error")]
    Network(#[from] reqwest::Error),
}
