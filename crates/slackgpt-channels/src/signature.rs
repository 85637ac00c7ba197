//! Slack request signing (`v0`).
//!
//! Slack signs every Events API request with
//! `v0=hex(HMAC-SHA256(signing_secret, "v0:{timestamp}:{raw_body}"))`
//! in `X-Slack-Signature`, and sends the timestamp in
//! `X-Slack-Request-Timestamp`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Requests older (or newer) than this are rejected as replays.
pub const MAX_CLOCK_SKEW_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("invalid request timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("request timestamp is {0}s away from local clock")]
    Stale(i64),

    #[error("signature must use v0=<hex> format")]
    Malformed,

    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a request against the signing secret.
///
/// `now` is the current Unix time in seconds; passed in so tests can pin it.
pub fn verify(
    secret: &str,
    timestamp: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let timestamp = timestamp
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(SignatureError::MissingHeader("X-Slack-Request-Timestamp"))?;
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingHeader("X-Slack-Signature"))?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_string()))?;
    let skew = (now - ts).abs();
    if skew > MAX_CLOCK_SKEW_SECS {
        return Err(SignatureError::Stale(skew));
    }

    let digest = signature
        .strip_prefix("v0=")
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(digest).map_err(|_| SignatureError::Malformed)?;

    // `verify_slice` compares in constant time.
    signing_mac(secret, timestamp, body)
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the `v0=...` header value for a request (used by tests and tooling).
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mac = signing_mac(secret, timestamp, body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

fn signing_mac(secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}
