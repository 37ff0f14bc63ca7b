//! Webhook signature verification (GitHub `X-Hub-Signature-256` scheme).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Computes the signature header value the hosting service would send for
/// `payload`: "sha256=" followed by the lowercase hex HMAC-SHA256 of the
/// raw body bytes.
pub fn expected_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload);
    format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verifies a webhook signature header against the raw request body.
///
/// The presented header must match "sha256=<lowercase hex digest>"
/// byte-for-byte: a missing prefix, uppercase hex, or a digest that does
/// not match the HMAC-SHA256 of `payload` under `secret` all count as a
/// mismatch. The full formatted strings are compared in constant time;
/// a partial match leaks nothing.
pub fn verify_signature(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    let expected = expected_signature(secret, payload);
    expected
        .as_bytes()
        .ct_eq(signature_header.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "abc123";
    const BODY: &[u8] = br#"{"ref":"refs/heads/main"}"#;

    #[test]
    fn accepts_matching_signature() {
        let header = expected_signature(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &header));
    }

    #[test]
    fn signature_has_prefix_and_lowercase_hex_digest() {
        let header = expected_signature(SECRET, BODY);
        assert!(header.starts_with("sha256="));

        let digest = &header["sha256=".len()..];
        assert_eq!(digest.len(), 64); // SHA256 hex is 64 chars
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn rejects_signature_for_different_payload() {
        let header = expected_signature(SECRET, BODY);
        assert!(!verify_signature(
            SECRET,
            br#"{"ref":"refs/heads/dev"}"#,
            &header
        ));
    }

    #[test]
    fn rejects_wrong_secret() {
        let header = expected_signature(SECRET, BODY);
        assert!(!verify_signature("abc124", BODY, &header));
    }

    #[test]
    fn rejects_single_character_perturbation() {
        let header = expected_signature(SECRET, BODY);

        // Flip every digest character in turn; none may be accepted.
        // Hex letters get their case bit flipped, which is a single-bit
        // perturbation of the header that still hex-decodes identically.
        for i in "sha256=".len()..header.len() {
            let mut bytes = header.clone().into_bytes();
            bytes[i] = match bytes[i] {
                b @ b'a'..=b'f' => b ^ 0x20,
                b'0' => b'1',
                _ => b'0',
            };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                !verify_signature(SECRET, BODY, &tampered),
                "tampered digest char {} was accepted",
                i
            );
        }
    }

    #[test]
    fn rejects_case_flipped_digest() {
        let header = expected_signature(SECRET, BODY);
        let digest = &header["sha256=".len()..];
        let tampered = format!("sha256={}", digest.to_uppercase());
        assert!(!verify_signature(SECRET, BODY, &tampered));
    }

    #[test]
    fn empty_body_is_a_valid_payload() {
        let header = expected_signature(SECRET, b"");
        assert!(verify_signature(SECRET, b"", &header));
        assert!(!verify_signature(SECRET, b"x", &header));
    }

    #[test]
    fn rejects_missing_prefix() {
        let header = expected_signature(SECRET, BODY);
        assert!(!verify_signature(SECRET, BODY, &header["sha256=".len()..]));
    }

    #[test]
    fn rejects_non_hex_digest() {
        assert!(!verify_signature(SECRET, BODY, "sha256=not-hex-at-all"));
    }

    #[test]
    fn rejects_truncated_digest() {
        let header = expected_signature(SECRET, BODY);
        assert!(!verify_signature(SECRET, BODY, &header[..header.len() - 2]));
    }
}
