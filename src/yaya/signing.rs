//! Request signing for the YaYa Wallet API.
//!
//! Every call is authenticated with an HMAC-SHA256 over the pre-hash string
//! `timestamp + METHOD + path + body`, base64 encoded.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "YAYA-API-KEY";
pub const HEADER_TIMESTAMP: &str = "YAYA-API-TIMESTAMP";
pub const HEADER_SIGNATURE: &str = "YAYA-API-SIGN";

/// Timestamp and signature pair attached to one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp: String,
    pub signature: String,
}

#[derive(Clone)]
pub struct RequestSigner {
    secret: Vec<u8>,
}

impl RequestSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    pub fn prehash(method: &str, path: &str, body: &str, timestamp: &str) -> String {
        format!("{}{}{}{}", timestamp, method.to_uppercase(), path, body)
    }

    pub fn sign(&self, method: &str, path: &str, body: &str, timestamp: &str) -> SignedRequest {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(Self::prehash(method, path, body, timestamp).as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        SignedRequest {
            timestamp: timestamp.to_string(),
            signature,
        }
    }

    /// Signs with the current time in Unix milliseconds.
    pub fn sign_now(&self, method: &str, path: &str, body: &str) -> SignedRequest {
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        self.sign(method, path, body, &timestamp)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prehash_layout() {
        let prehash = RequestSigner::prehash("get", "/api/en/transaction/find-by-user", "", "1700000000000");
        assert_eq!(prehash, "1700000000000GET/api/en/transaction/find-by-user");
    }

    #[test]
    fn test_known_signature() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog"), base64.
        let signer = RequestSigner::new("key");
        let signed = signer.sign("", "The quick brown fox jumps over the lazy dog", "", "");
        assert_eq!(signed.signature, "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg=");
    }

    #[test]
    fn test_method_is_uppercased_before_signing() {
        let signer = RequestSigner::new("secret");
        let lower = signer.sign("post", "/p", "{}", "1");
        let upper = signer.sign("POST", "/p", "{}", "1");
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_sign_now_uses_millisecond_timestamp() {
        let signer = RequestSigner::new("secret");
        let signed = signer.sign_now("GET", "/p", "");
        assert_eq!(signed.timestamp.len(), 13);
        assert!(signed.timestamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(signed, signer.sign("GET", "/p", "", &signed.timestamp));
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = RequestSigner::new("super-secret");
        assert!(!format!("{:?}", signer).contains("super-secret"));
    }

    proptest! {
        #[test]
        fn prop_signature_is_deterministic(
            method in "(GET|POST)",
            path in "/[a-z/-]{0,30}",
            body in ".{0,40}",
            ts in "[0-9]{13}",
        ) {
            let signer = RequestSigner::new("secret");
            prop_assert_eq!(
                signer.sign(&method, &path, &body, &ts),
                signer.sign(&method, &path, &body, &ts)
            );
        }

        #[test]
        fn prop_changing_any_input_changes_signature(
            path in "/[a-z]{1,20}",
            body in "[a-z]{0,20}",
            ts in 1_000_000_000_000u64..2_000_000_000_000u64,
        ) {
            let signer = RequestSigner::new("secret");
            let ts_str = ts.to_string();
            let base = signer.sign("GET", &path, &body, &ts_str).signature;

            prop_assert_ne!(&base, &signer.sign("POST", &path, &body, &ts_str).signature);
            prop_assert_ne!(&base, &signer.sign("GET", &format!("{}x", path), &body, &ts_str).signature);
            prop_assert_ne!(&base, &signer.sign("GET", &path, &format!("{}x", body), &ts_str).signature);
            prop_assert_ne!(&base, &signer.sign("GET", &path, &body, &(ts + 1).to_string()).signature);
            prop_assert_ne!(&base, &RequestSigner::new("other").sign("GET", &path, &body, &ts_str).signature);
        }
    }
}
