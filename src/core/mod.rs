//! Core business logic for JWT operations.
//!
//! This module contains the domain logic separated from CLI concerns.
//! All types and functions here are testable without the CLI layer.

pub mod algorithm;
pub mod claims;
pub mod decoder;
pub mod jwks;
pub mod time_travel;
pub mod validator;

/// Maximum length, in bytes, of an untrusted value echoed in a message.
const MAX_ECHOED_VALUE_LEN: usize = 128;

/// Sanitize an untrusted header or key value for inclusion in messages.
///
/// Replaces control characters (including ANSI escape sequences) with
/// the Unicode replacement character to prevent terminal injection,
/// then truncates to 128 bytes. Uses `floor_char_boundary` to avoid
/// panicking on multi-byte UTF-8.
pub(crate) fn sanitize_untrusted(value: &str) -> String {
    let clean: String = value
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect();
    if clean.len() > MAX_ECHOED_VALUE_LEN {
        let end = clean.floor_char_boundary(MAX_ECHOED_VALUE_LEN);
        format!("{}...(truncated)", &clean[..end])
    } else {
        clean
    }
}

/// Map a `jsonwebtoken` error kind to a generic, user-facing reason.
///
/// Raw library messages are not forwarded since they may include
/// details of the key material.
pub(crate) fn sanitize_jwt_error(kind: &jsonwebtoken::errors::ErrorKind) -> String {
    use jsonwebtoken::errors::ErrorKind;

    match kind {
        ErrorKind::InvalidToken => "invalid token structure",
        ErrorKind::InvalidSignature => "signature does not match the selected key",
        ErrorKind::InvalidEcdsaKey => "invalid ECDSA key",
        ErrorKind::InvalidRsaKey(_) => "invalid RSA key",
        ErrorKind::InvalidKeyFormat => "unsupported key format",
        ErrorKind::InvalidAlgorithm => "algorithm mismatch between token and key",
        ErrorKind::Base64(_) => "malformed signature",
        ErrorKind::Json(_) | ErrorKind::Utf8(_) => "token segment is not valid JSON",
        _ => "unexpected validation error",
    }
    .to_string()
}
