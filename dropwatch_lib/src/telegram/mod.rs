//! Telegram Bot API client for pushing alert messages.
//!
//! Only `sendMessage` is used. The bot must already be a member of the target
//! chat; getting the chat id is a one-time manual step (message the bot, then
//! check `getUpdates`).

pub mod client;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
