//! JWT decoding logic.
//!
//! Handles splitting a raw compact token into its parts (header,
//! payload, signature), base64url-decoding the header and payload
//! segments, and parsing each of them as a JSON object. No signature
//! validation happens here.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use crate::error::JwtInspectError;

/// A decoded JSON object (header or claims).
pub type JsonObject = Map<String, Value>;

/// The decoded parts of a compact token.
///
/// Implements a custom `Debug` that redacts `payload` and `signature`
/// to prevent accidental leakage of sensitive claim data.
#[derive(Clone, PartialEq)]
pub struct DecodedToken {
    /// The parsed header (typically contains `alg`, `typ` and `kid`).
    pub header: JsonObject,
    /// The parsed payload (claims).
    pub payload: JsonObject,
    /// The raw base64url-encoded signature segment. Empty for unsigned tokens.
    pub signature: String,
}

/// Custom `Debug` that redacts payload and signature to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// The raw segments of a compact token, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSegments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl TokenSegments<'_> {
    /// The JWS signing input: `header.payload` exactly as transmitted.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

/// Split a compact token into its segments.
///
/// Accepts `header.payload` and `header.payload.signature`. The header
/// and payload segments must be non-empty; the signature may be empty
/// or absent. Anything with more than three segments is rejected.
///
/// # Errors
///
/// Returns [`JwtInspectError::MalformedToken`] when the structure is wrong.
pub fn split_token(token: &str) -> Result<TokenSegments<'_>, JwtInspectError> {
    let mut parts = token.split('.');
    let header = parts.next().unwrap_or_default();
    let payload = parts.next().unwrap_or_default();
    let signature = parts.next().unwrap_or_default();

    if header.is_empty() || payload.is_empty() || parts.next().is_some() {
        return Err(JwtInspectError::MalformedToken);
    }

    Ok(TokenSegments {
        header,
        payload,
        signature,
    })
}

/// Decode a raw compact token into its constituent parts.
///
/// Surrounding whitespace is ignored. The signature is returned as its
/// raw base64url-encoded string.
///
/// # Errors
///
/// Returns an error if the token structure is wrong, if a segment is not
/// valid base64url or UTF-8, or if a segment is not a JSON object.
pub fn decode_token(token: &str) -> Result<DecodedToken, JwtInspectError> {
    let segments = split_token(token.trim())?;

    let header = decode_segment(segments.header, "header")?;
    let payload = decode_segment(segments.payload, "payload")?;

    Ok(DecodedToken {
        header,
        payload,
        signature: segments.signature.to_string(),
    })
}

/// Base64url-decode a segment and parse it as a JSON object.
///
/// # Errors
///
/// Returns [`JwtInspectError::InvalidEncoding`] or
/// [`JwtInspectError::InvalidJson`] naming `segment_name`.
pub fn decode_segment(encoded: &str, segment_name: &str) -> Result<JsonObject, JwtInspectError> {
    let bytes = base64url_to_bytes(encoded).ok_or_else(|| JwtInspectError::InvalidEncoding {
        segment: segment_name.to_string(),
        reason: "invalid base64url encoding".to_string(),
    })?;

    let text = String::from_utf8(bytes).map_err(|_| JwtInspectError::InvalidEncoding {
        segment: segment_name.to_string(),
        reason: "decoded bytes are not valid UTF-8".to_string(),
    })?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtInspectError::InvalidJson {
            segment: segment_name.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(JwtInspectError::InvalidJson {
            segment: segment_name.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Decode base64url text to raw bytes.
///
/// Maps the URL-safe alphabet onto the standard one, restores `=`
/// padding to a multiple of four and decodes with the standard engine.
/// Returns `None` for anything that is not valid base64.
pub fn base64url_to_bytes(encoded: &str) -> Option<Vec<u8>> {
    let mut standard: String = encoded
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    STANDARD.decode(standard.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXAMPLE_TOKEN: &str =
        "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0.signature";

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_decoded_token_debug_redacts_sensitive_fields() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
                     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
        let decoded = decode_token(token).unwrap();
        let debug_output = format!("{:?}", decoded);

        // Header is shown (not sensitive, contains algorithm info)
        assert!(debug_output.contains("HS256"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("1234567890"));
        assert!(!debug_output.contains("Test User"));
        assert!(!debug_output.contains("SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c"));
    }

    #[test]
    fn test_decode_example_token() {
        let decoded = decode_token(EXAMPLE_TOKEN).unwrap();

        assert_eq!(decoded.header, object(json!({"alg": "HS256"})));
        assert_eq!(decoded.payload, object(json!({"sub": "1234567890"})));
        assert_eq!(decoded.signature, "signature");
    }

    #[test]
    fn test_decode_valid_hs256_token() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
                     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

        let decoded = decode_token(token).unwrap();

        assert_eq!(decoded.header["alg"], "HS256");
        assert_eq!(decoded.header["typ"], "JWT");
        assert_eq!(decoded.payload["sub"], "1234567890");
        assert_eq!(decoded.payload["name"], "Test User");
        assert_eq!(decoded.payload["iat"], 1516239022);
    }

    #[test]
    fn test_decode_round_trips_url_safe_and_unicode_segments() {
        // {"sub":"a?b>"} encodes with a '-' in base64url
        // {"name":"Jöhn ✓"} carries multi-byte UTF-8
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhP2I-In0.";
        let decoded = decode_token(token).unwrap();
        assert_eq!(decoded.payload, object(json!({"sub": "a?b>"})));

        let token = "eyJhbGciOiJIUzI1NiJ9.eyJuYW1lIjoiSsO2aG4g4pyTIn0.";
        let decoded = decode_token(token).unwrap();
        assert_eq!(decoded.payload["name"], "Jöhn ✓");
    }

    #[test]
    fn test_decode_two_segment_token_has_empty_signature() {
        let decoded = decode_token("eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0").unwrap();
        assert_eq!(decoded.payload["sub"], "1234567890");
        assert_eq!(decoded.signature, "");
    }

    #[test]
    fn test_decode_trims_surrounding_whitespace() {
        let decoded = decode_token(&format!("  {EXAMPLE_TOKEN}\n")).unwrap();
        assert_eq!(decoded.signature, "signature");
    }

    #[test]
    fn test_decode_token_without_separator_fails() {
        let err = decode_token("just-one-part").unwrap_err();
        assert!(matches!(err, JwtInspectError::MalformedToken));
    }

    #[test]
    fn test_decode_token_with_empty_segments_fails() {
        for token in ["", ".", "..", ".eyJzdWIiOiIxMjM0In0.sig", "eyJhbGciOiJIUzI1NiJ9..sig"] {
            let err = decode_token(token).unwrap_err();
            assert!(matches!(err, JwtInspectError::MalformedToken), "{token:?}");
        }
    }

    #[test]
    fn test_decode_token_with_four_parts_fails() {
        let err = decode_token("a.b.c.d").unwrap_err();
        assert!(matches!(err, JwtInspectError::MalformedToken));
    }

    #[test]
    fn test_decode_token_invalid_base64_header_fails() {
        let err = decode_token("!!!invalid!!!.eyJzdWIiOiIxMjM0In0.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidEncoding { segment, .. } if segment == "header"
        ));
    }

    #[test]
    fn test_decode_token_invalid_base64_payload_fails() {
        let err = decode_token("eyJhbGciOiJIUzI1NiJ9.!!!invalid!!!.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidEncoding { segment, .. } if segment == "payload"
        ));
    }

    #[test]
    fn test_decode_token_invalid_utf8_payload_fails() {
        // "__4" is base64url for the bytes 0xFF 0xFE
        let err = decode_token("eyJhbGciOiJIUzI1NiJ9.__4.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidEncoding { segment, reason }
                if segment == "payload" && reason.contains("UTF-8")
        ));
    }

    #[test]
    fn test_decode_token_invalid_json_header_fails() {
        // base64url("not json")
        let err = decode_token("bm90IGpzb24.eyJzdWIiOiIxMjM0In0.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidJson { segment, .. } if segment == "header"
        ));
    }

    #[test]
    fn test_decode_token_invalid_json_payload_fails() {
        let err = decode_token("eyJhbGciOiJIUzI1NiJ9.bm90IGpzb24.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidJson { segment, .. } if segment == "payload"
        ));
    }

    #[test]
    fn test_decode_token_non_object_payload_fails() {
        // base64url("[1,2]")
        let err = decode_token("eyJhbGciOiJIUzI1NiJ9.WzEsMl0.sig").unwrap_err();
        assert!(matches!(
            err,
            JwtInspectError::InvalidJson { segment, reason }
                if segment == "payload" && reason.contains("object")
        ));
    }

    #[test]
    fn test_decode_token_with_empty_payload_object() {
        // {"alg":"none"} . {} . (empty signature)
        let decoded = decode_token("eyJhbGciOiJub25lIn0.e30.").unwrap();
        assert_eq!(decoded.header["alg"], "none");
        assert!(decoded.payload.is_empty());
        assert_eq!(decoded.signature, "");
    }

    #[test]
    fn test_base64url_to_bytes_accepts_padded_and_unpadded() {
        assert_eq!(base64url_to_bytes("e30").unwrap(), b"{}");
        assert_eq!(base64url_to_bytes("e30=").unwrap(), b"{}");
        assert_eq!(base64url_to_bytes("__4").unwrap(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn test_base64url_to_bytes_rejects_impossible_length() {
        // A single leftover character can never encode a whole byte.
        assert!(base64url_to_bytes("e30ab").is_none());
    }

    #[test]
    fn test_split_token_signing_input() {
        let segments = split_token(EXAMPLE_TOKEN).unwrap();
        assert_eq!(
            segments.signing_input(),
            "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0"
        );
        assert_eq!(segments.signature, "signature");
    }
}
