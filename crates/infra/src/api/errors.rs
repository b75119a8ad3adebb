//! Response classification for the Onshape API
//!
//! Non-success responses carry either a JSON error body with a `message`
//! field, a plain-text body, or nothing at all. The detail is surfaced
//! verbatim where possible so a row's failure message matches what the
//! server actually said.

use reqwest::Response;
use serde_json::Value;

use partsync_domain::PartSyncError;

/// Build a transport error from a non-success response.
///
/// Prefers the JSON `message` field, then the raw body text, then the
/// status line.
pub(crate) async fn transport_error(response: Response) -> PartSyncError {
    let status = response.status();
    let fallback = status.canonical_reason().unwrap_or("unknown status").to_string();

    let message = match response.text().await {
        Ok(text) if !text.trim().is_empty() => extract_message(&text),
        _ => fallback,
    };

    PartSyncError::Transport { status: status.as_u16(), message }
}

/// Pull the human-readable detail out of an error body.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| body.to_string(), str::to_string),
        Err(_) => body.to_string(),
    }
}
