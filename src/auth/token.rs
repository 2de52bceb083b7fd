//! Access token claim decoding.
//!
//! The guard only ever reads the expiry claim out of the access token's
//! payload; the signature is never checked here. The claims are advisory,
//! used to decide when to refresh - the backend re-validates the signature
//! on every API call, so no authorization decision rests on this decode.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;

/// An access/refresh token pair as issued by `/api/token/` and
/// `/api/token/refresh/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Claims carried in the access token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying its signature.
/// Returns `None` for anything that is not a well-formed token; the guard
/// treats that the same as an expired token.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = Base64UrlUnpadded::decode_vec(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry timestamp of a token, if it decodes.
pub fn expiry(token: &str) -> Option<i64> {
    decode_claims(token).map(|claims| claims.exp)
}

#[cfg(test)]
pub(crate) fn encode_unsigned(payload: &str) -> String {
    // Test helper: header.payload.signature with a junk signature, which is
    // all the decoder ever looks at.
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(payload.as_bytes());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_token() {
        let token = encode_unsigned(r#"{"exp": 1890000000, "user_id": 42}"#);
        let claims = decode_claims(&token).expect("claims should decode");
        assert_eq!(claims.exp, 1_890_000_000);
        assert_eq!(claims.user_id, Some(42));
        assert_eq!(expiry(&token), Some(1_890_000_000));
    }

    #[test]
    fn test_decode_token_without_user_id() {
        let token = encode_unsigned(r#"{"exp": 1700000000}"#);
        let claims = decode_claims(&token).expect("claims should decode");
        assert_eq!(claims.user_id, None);
    }

    #[test]
    fn test_malformed_tokens_decode_to_none() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("not-a-token").is_none());
        assert!(decode_claims("one.segment").is_none());
        // Payload segment is not base64
        assert!(decode_claims("aaa.!!!.ccc").is_none());
        // Payload decodes but is not JSON
        let garbage = format!("h.{}.s", Base64UrlUnpadded::encode_string(b"garbage"));
        assert!(decode_claims(&garbage).is_none());
    }

    #[test]
    fn test_missing_exp_claim_decodes_to_none() {
        let token = encode_unsigned(r#"{"user_id": 1}"#);
        assert!(decode_claims(&token).is_none());
        assert!(expiry(&token).is_none());
    }
}
