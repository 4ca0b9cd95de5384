//! HMAC-SHA256 signature helpers for the payment gateway boundary.
//!
//! The gateway signs payment confirmations with `HMAC(key_secret,
//! "{order_id}|{payment_id}")` and webhook bodies with
//! `HMAC(webhook_secret, body)`, both hex-encoded. Verification compares
//! in constant time so signature checks don't leak prefix length.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 of `payload` under `secret`.
pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex_encode(mac.finalize().into_bytes())
}

/// Compute the signature the gateway attaches to a payment confirmation.
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    hmac_sha256_hex(secret, format!("{order_id}|{payment_id}").as_bytes())
}

/// Constant-time equality for hex signature strings.
pub fn verify_signature(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in expected.iter().zip(provided.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes
        .as_ref()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic_and_hex() {
        let sig = payment_signature("secret", "order_1", "pay_1");
        assert_eq!(sig, payment_signature("secret", "order_1", "pay_1"));
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_inputs_produce_different_signatures() {
        let base = payment_signature("secret", "order_1", "pay_1");
        assert_ne!(base, payment_signature("secret", "order_1", "pay_2"));
        assert_ne!(base, payment_signature("secret", "order_2", "pay_1"));
        assert_ne!(base, payment_signature("other", "order_1", "pay_1"));
    }

    #[test]
    fn verify_accepts_exact_match_only() {
        let sig = payment_signature("secret", "order_1", "pay_1");
        assert!(verify_signature(&sig, &sig));
        assert!(!verify_signature(&sig, &sig[..sig.len() - 1]));
        let mut tampered = sig.clone();
        tampered.replace_range(0..1, if &sig[0..1] == "a" { "b" } else { "a" });
        assert!(!verify_signature(&sig, &tampered));
    }

    #[test]
    fn webhook_body_signature_round_trips() {
        let body = br#"{"event":"payment.captured"}"#;
        let sig = hmac_sha256_hex("webhook-secret", body);
        assert!(verify_signature(&hmac_sha256_hex("webhook-secret", body), &sig));
        assert!(!verify_signature(&hmac_sha256_hex("wrong", body), &sig));
    }
}
