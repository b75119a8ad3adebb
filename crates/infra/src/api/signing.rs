//! Request signing for the Onshape HMAC authentication scheme
//!
//! Every request carries an `Authorization: On <accessKey>:HmacSHA256:<sig>`
//! header where the signature is the base64 HMAC-SHA256 of a canonical
//! string over the request. The canonical string must be reproduced
//! byte-for-byte; a single wrong byte invalidates every request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use partsync_domain::{PartSyncError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Content type sent with (and signed into) every request
pub const CONTENT_TYPE: &str = "application/json";

const NONCE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const NONCE_RANDOM_LEN: usize = 15;

/// Compute the raw HMAC-SHA256 of `message` keyed by the secret key.
///
/// Pure and deterministic; the caller base64-encodes the result.
///
/// # Errors
/// Returns `PartSyncError::Signing` if the MAC cannot be keyed, which
/// cannot happen for HMAC (any key length is accepted) short of
/// allocation failure.
pub fn sign(message: &str, secret_key: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|err| PartSyncError::Signing(format!("invalid HMAC key: {err}")))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Build the canonical string a request signature covers.
///
/// Seven newline-joined fields, each lower-cased before joining: method,
/// nonce, date, content type, URL path, query string (no leading `?`),
/// and a trailing empty field reserved for a content hash the protocol
/// never uses.
pub fn string_to_sign(method: &str, nonce: &str, date: &str, path: &str, query: &str) -> String {
    [method, nonce, date, CONTENT_TYPE, path, query, ""]
        .iter()
        .map(|field| field.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Base64 authorization signature for one request.
///
/// # Errors
/// Propagates `PartSyncError::Signing` from [`sign`].
pub fn request_signature(
    method: &str,
    nonce: &str,
    date: &str,
    path: &str,
    query: &str,
    secret_key: &str,
) -> Result<String> {
    let mac = sign(&string_to_sign(method, nonce, date, path, query), secret_key)?;
    Ok(STANDARD.encode(mac))
}

/// Generate a per-request nonce.
///
/// Random base36 characters plus the current time in milliseconds,
/// roughly 28 characters total, unique per call to prevent replay and
/// signature collision.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..NONCE_RANDOM_LEN)
        .map(|_| {
            let index = rng.gen_range(0..NONCE_ALPHABET.len());
            NONCE_ALPHABET[index] as char
        })
        .collect();
    format!("{random}{}", Utc::now().timestamp_millis())
}

/// Current date as an RFC 1123 HTTP-date in UTC, used for both the
/// `Date` header and the signed string.
pub fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
