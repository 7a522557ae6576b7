//! Response types for the Telegram Bot API.

use serde::Deserialize;

/// Envelope returned by every Bot API method.
///
/// We only need `ok` and the error fields; the `result` payload (the sent
/// message object) is ignored.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
