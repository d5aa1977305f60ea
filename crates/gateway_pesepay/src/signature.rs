//! Webhook signature verification
//!
//! PesePay signs each webhook with HMAC-SHA256 over the raw request body
//! using the shared webhook secret, hex-encoded in the
//! `X-Pesepay-Signature` header. Verification is constant-time; a
//! malformed header never matches.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 signature for a payload
pub fn compute_signature(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a webhook signature in constant time
///
/// Returns false for malformed hex, wrong length, or mismatch; the
/// comparison itself goes through `Mac::verify_slice`, which is
/// constant-time.
pub fn verify_signature(payload: &[u8], header_signature: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Ok(signature_bytes) = hex::decode(header_signature.trim()) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    mac.verify_slice(&signature_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn test_valid_signature_verifies() {
        let body = br#"{"referenceNumber":"PSP-1","transactionStatus":"SUCCESS"}"#;
        let signature = compute_signature(body, SECRET);

        assert!(verify_signature(body, &signature, SECRET));
    }

    #[test]
    fn test_tampered_body_fails() {
        let body = br#"{"referenceNumber":"PSP-1","transactionStatus":"SUCCESS"}"#;
        let signature = compute_signature(body, SECRET);

        let tampered = br#"{"referenceNumber":"PSP-2","transactionStatus":"SUCCESS"}"#;
        assert!(!verify_signature(tampered, &signature, SECRET));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = b"payload";
        let signature = compute_signature(body, SECRET);

        assert!(!verify_signature(body, &signature, "other_secret"));
    }

    #[test]
    fn test_malformed_header_fails() {
        let body = b"payload";

        assert!(!verify_signature(body, "not-hex!", SECRET));
        assert!(!verify_signature(body, "", SECRET));
        assert!(!verify_signature(body, "abcd", SECRET));
    }

    #[test]
    fn test_empty_secret_never_verifies() {
        let body = b"payload";
        let signature = compute_signature(body, "");

        assert!(!verify_signature(body, &signature, ""));
    }
}
