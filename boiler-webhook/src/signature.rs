//! Webhook signature verification
//!
//! The hosting provider signs every delivery with HMAC-SHA1 over the raw
//! request body and sends the result as `X-Hub-Signature: sha1=<hex>`.
//! Verification uses a constant-time comparison; the digest is never
//! compared byte-by-byte with `==`.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Signature scheme this endpoint accepts
const SIGNATURE_SCHEME: &str = "sha1";

/// Verifies a delivery signature against the shared secret
///
/// The header value is split on the first `=`; the scheme must literally
/// equal `sha1` and the hex digest must match HMAC-SHA1(secret, body).
/// Any malformed header fails verification rather than erroring.
pub fn verify(secret: &[u8], body: &[u8], signature_header: &str) -> bool {
    let Some((scheme, digest_hex)) = signature_header.split_once('=') else {
        return false;
    };

    if scheme != SIGNATURE_SCHEME {
        return false;
    }

    let Ok(provided) = hex::decode(digest_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&provided).is_ok()
}

/// Computes the signature header value the provider would send
#[cfg(test)]
pub(crate) fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    format!("{}={}", SIGNATURE_SCHEME, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"hunter2";
    const BODY: &[u8] = br#"{"action":"released"}"#;

    #[test]
    fn test_valid_signature_verifies() {
        let header = sign(SECRET, BODY);
        assert!(verify(SECRET, BODY, &header));
    }

    #[test]
    fn test_any_body_bit_flip_fails() {
        let header = sign(SECRET, BODY);

        for byte in 0..BODY.len() {
            for bit in 0..8 {
                let mut mutated = BODY.to_vec();
                mutated[byte] ^= 1 << bit;
                assert!(
                    !verify(SECRET, &mutated, &header),
                    "bit {} of byte {} accepted",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn test_wrong_secret_fails() {
        let header = sign(SECRET, BODY);
        assert!(!verify(b"hunter3", BODY, &header));
    }

    #[test]
    fn test_wrong_scheme_fails() {
        let header = sign(SECRET, BODY).replace("sha1=", "sha256=");
        assert!(!verify(SECRET, BODY, &header));
    }

    #[test]
    fn test_header_without_separator_fails() {
        assert!(!verify(SECRET, BODY, "sha1deadbeef"));
    }

    #[test]
    fn test_non_hex_digest_fails() {
        assert!(!verify(SECRET, BODY, "sha1=not-hex-at-all"));
    }

    #[test]
    fn test_truncated_digest_fails() {
        let header = sign(SECRET, BODY);
        assert!(!verify(SECRET, BODY, &header[..header.len() - 2]));
    }
}
