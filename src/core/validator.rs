//! JWT signature validation logic.
//!
//! Checks a token's signature against one selected JWK. RSA, P-256 and
//! P-384 keys go through `jsonwebtoken`; P-521 (`ES512`), which that
//! crate does not implement, is verified directly with `aws-lc-rs`.

use std::collections::HashSet;
use std::fmt;

use aws_lc_rs::signature::{ECDSA_P521_SHA512_FIXED, UnparsedPublicKey};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::Value;
use tracing::{debug, warn};

use super::algorithm::SigningAlgorithm;
use super::decoder::{TokenSegments, base64url_to_bytes};
use super::jwks::KeyRecord;
use super::sanitize_jwt_error;

/// Reason reported when the signature does not verify under the key.
pub const REASON_SIGNATURE_MISMATCH: &str = "signature does not match the selected key";

/// Reason reported when the signature segment is not base64url.
pub const REASON_MALFORMED_SIGNATURE: &str = "malformed signature";

/// Reason reported when a header field has a type `jsonwebtoken` rejects.
pub const REASON_UNSUPPORTED_HEADER: &str = "unsupported header field";

/// Coordinate size of a P-521 public key, in bytes.
const P521_COORDINATE_LEN: usize = 66;

/// The result of a signature validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The signature is cryptographically valid and the token is current.
    Verified {
        /// The algorithm the token was verified with.
        algorithm: SigningAlgorithm,
        /// The header's key identifier, if it carried one.
        key_id: Option<String>,
    },
    /// The token was rejected.
    Failed {
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl VerificationOutcome {
    /// Whether the token was verified.
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// The key identifier as displayed: the header `kid`, or `none`.
    pub fn key_id_display(&self) -> Option<&str> {
        match self {
            Self::Verified { key_id, .. } => Some(key_id.as_deref().unwrap_or("none")),
            Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified { algorithm, key_id } => write!(
                f,
                "signature verified with {algorithm} (kid: {})",
                key_id.as_deref().unwrap_or("none")
            ),
            Self::Failed { reason } => write!(f, "signature verification failed: {reason}"),
        }
    }
}

/// Check the token's signature against one candidate key.
///
/// Temporal claims are not evaluated here. Returns a human-readable
/// reason on rejection.
pub(crate) fn check_signature(
    segments: &TokenSegments<'_>,
    key: &KeyRecord,
    algorithm: SigningAlgorithm,
) -> Result<(), String> {
    match algorithm.jsonwebtoken_algorithm() {
        Some(jwt_algorithm) => {
            debug!(%algorithm, backend = "jsonwebtoken", "checking signature");
            check_with_jsonwebtoken(segments, key, jwt_algorithm)
        }
        None => {
            debug!(%algorithm, backend = "aws-lc-rs", "checking signature");
            check_p521(segments, key)
        }
    }
}

/// Verify with `jsonwebtoken`, pinning validation to exactly one algorithm.
///
/// `exp`, `nbf` and `aud` checks are disabled here: temporal claims are
/// evaluated by the caller with zero leeway once the signature holds.
fn check_with_jsonwebtoken(
    segments: &TokenSegments<'_>,
    key: &KeyRecord,
    algorithm: jsonwebtoken::Algorithm,
) -> Result<(), String> {
    let jwk = key.to_jwk().map_err(|reason| malformed_key(key, &reason))?;
    let decoding_key =
        DecodingKey::from_jwk(&jwk).map_err(|e| malformed_key(key, &sanitize_jwt_error(e.kind())))?;

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims = HashSet::new();

    let token = format!(
        "{}.{}.{}",
        segments.header, segments.payload, segments.signature
    );

    match decode::<Value>(&token, &decoding_key, &validation) {
        Ok(_) => Ok(()),
        Err(e) => Err(match e.kind() {
            ErrorKind::InvalidSignature => REASON_SIGNATURE_MISMATCH.to_string(),
            ErrorKind::Base64(_) => REASON_MALFORMED_SIGNATURE.to_string(),
            // The payload is already known to be a JSON object, so this is the typed header.
            ErrorKind::Json(_) | ErrorKind::Utf8(_) => REASON_UNSUPPORTED_HEADER.to_string(),
            ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                malformed_key(key, &sanitize_jwt_error(e.kind()))
            }
            other => sanitize_jwt_error(other),
        }),
    }
}

/// Verify an `ES512` signature over the P-521 point taken from the JWK.
///
/// JWS ECDSA signatures are the fixed-width `r || s` form, not DER.
fn check_p521(segments: &TokenSegments<'_>, key: &KeyRecord) -> Result<(), String> {
    let point = key
        .ec_uncompressed_point(P521_COORDINATE_LEN)
        .map_err(|reason| malformed_key(key, &reason))?;
    let signature = base64url_to_bytes(segments.signature)
        .ok_or_else(|| REASON_MALFORMED_SIGNATURE.to_string())?;

    UnparsedPublicKey::new(&ECDSA_P521_SHA512_FIXED, &point)
        .verify(segments.signing_input().as_bytes(), &signature)
        .map_err(|_| REASON_SIGNATURE_MISMATCH.to_string())
}

fn malformed_key(key: &KeyRecord, reason: &str) -> String {
    warn!(kty = %key.kty, %reason, "skipping malformed key");
    format!("malformed key: {reason}")
}
