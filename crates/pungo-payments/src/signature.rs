//! Webhook Signature Verification
//!
//! Stripe signs webhook deliveries with a `Stripe-Signature` header of the
//! form `t=<unix>,v1=<hex hmac>`. The signed payload is `"{t}.{body}"`,
//! keyed with the shared webhook secret. This is the only integrity check
//! in the whole system, so it runs before anything touches the store.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between the signed timestamp and now
pub const TOLERANCE_SECS: i64 = 300;

/// Verify a `Stripe-Signature` header against the raw request body.
pub fn verify(secret: &str, header: &str, payload: &str) -> Result<()> {
    verify_at(secret, header, payload, chrono::Utc::now().timestamp())
}

fn verify_at(secret: &str, header: &str, payload: &str, now: i64) -> Result<()> {
    let parsed = parse_header(header)?;

    if (now - parsed.timestamp).abs() > TOLERANCE_SECS {
        return Err(PaymentError::Signature(format!(
            "Timestamp {} outside tolerance",
            parsed.timestamp
        )));
    }

    let signed_payload = format!("{}.{}", parsed.timestamp, payload);

    // A header may carry several v1 entries during secret rotation;
    // any one of them matching is enough. verify_slice compares in
    // constant time.
    for candidate in &parsed.v1_signatures {
        let digest = hex::decode(candidate)
            .map_err(|_| PaymentError::Signature("Signature is not valid hex".into()))?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| PaymentError::Signature("Invalid webhook secret".into()))?;
        mac.update(signed_payload.as_bytes());

        if mac.verify_slice(&digest).is_ok() {
            return Ok(());
        }
    }

    Err(PaymentError::Signature("No matching v1 signature".into()))
}

/// Compute a `Stripe-Signature` header value for a payload.
///
/// Used by tests and local webhook replay tooling.
pub fn sign(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{timestamp}.{payload}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_payload.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={digest}")
}

struct ParsedHeader {
    timestamp: i64,
    v1_signatures: Vec<String>,
}

fn parse_header(header: &str) -> Result<ParsedHeader> {
    let mut timestamp = None;
    let mut v1_signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| {
                    PaymentError::Signature("Timestamp is not an integer".into())
                })?);
            }
            Some(("v1", value)) => v1_signatures.push(value.to_string()),
            // v0 and unknown schemes are ignored
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| PaymentError::Signature("Header is missing t=".into()))?;
    if v1_signatures.is_empty() {
        return Err(PaymentError::Signature("Header is missing v1=".into()));
    }

    Ok(ParsedHeader {
        timestamp,
        v1_signatures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"type":"checkout.session.completed"}"#;

    #[test]
    fn test_signed_payload_verifies() {
        let now = 1_700_000_000;
        let header = sign(SECRET, now, PAYLOAD);
        assert!(verify_at(SECRET, &header, PAYLOAD, now).is_ok());
    }

    #[test]
    fn test_modified_payload_rejected() {
        let now = 1_700_000_000;
        let header = sign(SECRET, now, PAYLOAD);
        let tampered = PAYLOAD.replace("completed", "expired");
        assert!(verify_at(SECRET, &header, &tampered, now).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = 1_700_000_000;
        let header = sign("whsec_other", now, PAYLOAD);
        assert!(verify_at(SECRET, &header, PAYLOAD, now).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let signed_at = 1_700_000_000;
        let header = sign(SECRET, signed_at, PAYLOAD);
        let now = signed_at + TOLERANCE_SECS + 1;
        assert!(verify_at(SECRET, &header, PAYLOAD, now).is_err());
    }

    #[test]
    fn test_rotated_secret_second_v1_accepted() {
        let now = 1_700_000_000;
        let old = sign("whsec_old", now, PAYLOAD);
        let current = sign(SECRET, now, PAYLOAD);
        let stale_v1 = old.split("v1=").nth(1).unwrap();
        let fresh_v1 = current.split("v1=").nth(1).unwrap();
        let header = format!("t={now},v1={stale_v1},v1={fresh_v1}");
        assert!(verify_at(SECRET, &header, PAYLOAD, now).is_ok());
    }

    #[test]
    fn test_garbage_header_rejected() {
        assert!(verify_at(SECRET, "not-a-signature", PAYLOAD, 0).is_err());
        assert!(verify_at(SECRET, "t=abc,v1=00", PAYLOAD, 0).is_err());
        assert!(verify_at(SECRET, "t=0", PAYLOAD, 0).is_err());
    }
}
