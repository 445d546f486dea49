//! JWK Set parsing, key matching and the verification entry point.
//!
//! The key set is caller-supplied JSON text. Nothing is fetched from the
//! network and nothing is cached between calls: every verification
//! parses its own key set, selects candidate keys by `kid` and algorithm
//! family, and checks the signature against each candidate in order.

use chrono::{DateTime, Utc};
use jsonwebtoken::jwk::Jwk;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::algorithm::{KeyFamily, SigningAlgorithm};
use super::claims::{ExpiryStatus, NotBeforeStatus, check_expiry, check_not_before};
use super::decoder::{JsonObject, base64url_to_bytes, decode_segment, split_token};
use super::sanitize_untrusted;
use super::validator::{self, VerificationOutcome};
use crate::error::JwtInspectError;

/// Reason reported when the signature verifies but `exp` has passed.
pub const REASON_EXPIRED: &str = "token has expired";

/// Reason reported when the signature verifies but `nbf` is in the future.
pub const REASON_NOT_YET_VALID: &str = "token is not yet valid";

/// The fields of a JWK used for key selection.
#[derive(Debug, Deserialize)]
struct KeySelectors {
    kty: String,
    kid: Option<String>,
    alg: Option<String>,
    #[serde(rename = "use")]
    key_use: Option<String>,
    crv: Option<String>,
}

/// A single key record from a JWK Set.
///
/// Keeps the selection fields parsed and the full JSON object around so
/// key material is only interpreted once the key is actually selected.
#[derive(Debug, Clone)]
pub struct KeyRecord {
    /// Key type (`RSA`, `EC`, `oct`, ...).
    pub kty: String,
    /// Key identifier.
    pub kid: Option<String>,
    /// Algorithm the key is restricted to, if any.
    pub alg: Option<String>,
    /// Intended key use (`sig` or `enc`), if declared.
    pub key_use: Option<String>,
    /// Curve name for elliptic-curve keys.
    pub crv: Option<String>,
    raw: Value,
}

impl KeyRecord {
    fn from_value(index: usize, raw: Value) -> Result<Self, JwtInspectError> {
        if !raw.is_object() {
            return Err(JwtInspectError::InvalidKeySet {
                reason: format!("key at index {index} is not a JSON object"),
            });
        }
        let selectors = KeySelectors::deserialize(&raw).map_err(|e| {
            JwtInspectError::InvalidKeySet {
                reason: format!("key at index {index} is invalid: {e}"),
            }
        })?;

        Ok(Self {
            kty: selectors.kty,
            kid: selectors.kid,
            alg: selectors.alg,
            key_use: selectors.key_use,
            crv: selectors.crv,
            raw,
        })
    }

    /// Whether this key can verify a token with the given algorithm and `kid`.
    ///
    /// The key must belong to the algorithm's family (and curve), must not
    /// be restricted to encryption or to another algorithm, and must carry
    /// exactly the requested `kid` when one is given.
    pub fn is_candidate(&self, algorithm: SigningAlgorithm, kid: Option<&str>) -> bool {
        let family_matches = match algorithm.key_family() {
            KeyFamily::Rsa => self.kty == "RSA",
            KeyFamily::Ec(curve) => self.kty == "EC" && self.crv.as_deref() == Some(curve),
        };
        let use_matches = self.key_use.as_deref().is_none_or(|u| u == "sig");
        let alg_matches = self
            .alg
            .as_deref()
            .is_none_or(|alg| alg == algorithm.as_str());
        let kid_matches = kid.is_none_or(|kid| self.kid.as_deref() == Some(kid));

        family_matches && use_matches && alg_matches && kid_matches
    }

    /// Interpret the record as a `jsonwebtoken` JWK.
    pub(crate) fn to_jwk(&self) -> Result<Jwk, String> {
        serde_json::from_value(self.raw.clone()).map_err(|e| e.to_string())
    }

    /// Build the uncompressed SEC1 point `0x04 || x || y` for an EC key.
    ///
    /// `coordinate_len` is the fixed coordinate size of the curve.
    pub(crate) fn ec_uncompressed_point(&self, coordinate_len: usize) -> Result<Vec<u8>, String> {
        let mut point = Vec::with_capacity(1 + 2 * coordinate_len);
        point.push(0x04);
        for name in ["x", "y"] {
            let encoded = self
                .raw
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| format!("missing '{name}' coordinate"))?;
            let bytes = base64url_to_bytes(encoded)
                .ok_or_else(|| format!("'{name}' coordinate is not valid base64url"))?;
            if bytes.len() != coordinate_len {
                return Err(format!(
                    "'{name}' coordinate must be {coordinate_len} bytes, got {}",
                    bytes.len()
                ));
            }
            point.extend_from_slice(&bytes);
        }
        Ok(point)
    }
}

/// An ordered, in-memory JWK Set.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: Vec<KeyRecord>,
}

impl KeySet {
    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys, in key-set order.
    pub fn keys(&self) -> &[KeyRecord] {
        &self.keys
    }

    /// Keys that may verify a token with `algorithm` and `kid`, in key-set order.
    pub fn candidates(&self, algorithm: SigningAlgorithm, kid: Option<&str>) -> Vec<&KeyRecord> {
        self.keys
            .iter()
            .filter(|key| key.is_candidate(algorithm, kid))
            .collect()
    }
}

/// Parse JWK Set JSON text into a [`KeySet`].
///
/// # Errors
///
/// Returns [`JwtInspectError::InvalidKeySet`] if the text is not JSON,
/// lacks an array-valued `keys` field, or contains a key that is not an
/// object with a string `kty`.
pub fn parse_key_set(key_set_json: &str) -> Result<KeySet, JwtInspectError> {
    let document: Value =
        serde_json::from_str(key_set_json).map_err(|e| JwtInspectError::InvalidKeySet {
            reason: format!("not valid JSON: {e}"),
        })?;

    let Some(entries) = document.get("keys").and_then(Value::as_array) else {
        return Err(JwtInspectError::InvalidKeySet {
            reason: "missing 'keys' array".to_string(),
        });
    };

    let keys = entries
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, raw)| KeyRecord::from_value(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeySet { keys })
}

/// The parts of the protected header that drive verification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProtectedHeader {
    alg: Option<String>,
    kid: Option<String>,
}

impl ProtectedHeader {
    fn from_object(header: &JsonObject) -> Self {
        let text = |name: &str| header.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            alg: text("alg"),
            kid: text("kid"),
        }
    }
}

/// Verify a token's signature against a JWK Set at the current time.
///
/// # Errors
///
/// See [`verify_with_key_set_at`].
pub fn verify_with_key_set(
    token: &str,
    key_set_json: &str,
) -> Result<VerificationOutcome, JwtInspectError> {
    verify_with_key_set_at(token, key_set_json, Utc::now())
}

/// Verify a token's signature against a JWK Set, evaluating temporal
/// claims at `now`.
///
/// Steps: parse the key set, re-parse the protected header, check `alg`
/// against the asymmetric allow-list, select candidate keys, decode the
/// payload, verify the signature with each candidate in order, then check
/// `exp` and `nbf`.
/// A cryptographic rejection is returned as
/// [`VerificationOutcome::Failed`], never as an error.
///
/// # Errors
///
/// Returns [`JwtInspectError::InvalidKeySet`] for unusable key-set text,
/// a decoding error if the token itself cannot be parsed,
/// [`JwtInspectError::UnsupportedAlgorithm`] for an `alg` outside the
/// allow-list, and [`JwtInspectError::NoMatchingKey`] when no key in the
/// set is a candidate.
pub fn verify_with_key_set_at(
    token: &str,
    key_set_json: &str,
    now: DateTime<Utc>,
) -> Result<VerificationOutcome, JwtInspectError> {
    let key_set = parse_key_set(key_set_json)?;
    debug!(keys = key_set.len(), "parsed key set");

    let segments = split_token(token.trim())?;
    let header = ProtectedHeader::from_object(&decode_segment(segments.header, "header")?);

    let algorithm = SigningAlgorithm::from_header(header.alg.as_deref().unwrap_or("(missing)"))?;
    let kid = header.kid.as_deref();

    let candidates = key_set.candidates(algorithm, kid);
    debug!(
        algorithm = algorithm.as_str(),
        has_kid = kid.is_some(),
        candidates = candidates.len(),
        "selected candidate keys"
    );
    if candidates.is_empty() {
        return Err(JwtInspectError::NoMatchingKey {
            criteria: match kid {
                Some(kid) => format!("kid '{}' with algorithm {algorithm}", sanitize_untrusted(kid)),
                None => format!("algorithm {algorithm}"),
            },
        });
    }

    // The payload is only needed once a key has been selected.
    let payload = decode_segment(segments.payload, "payload")?;

    let mut last_reason = String::new();
    for (index, key) in candidates.into_iter().enumerate() {
        match validator::check_signature(&segments, key, algorithm) {
            Ok(()) => {
                debug!(candidate = index, "signature verified");
                return Ok(evaluate_temporal_claims(&payload, now, algorithm, header.kid));
            }
            Err(reason) => {
                debug!(candidate = index, %reason, "candidate key rejected");
                last_reason = reason;
            }
        }
    }

    Ok(VerificationOutcome::Failed {
        reason: last_reason,
    })
}

/// Turn a cryptographically valid token into an outcome, rejecting it
/// when it is expired, not yet valid, or carries a non-numeric `exp`/`nbf`.
fn evaluate_temporal_claims(
    payload: &JsonObject,
    now: DateTime<Utc>,
    algorithm: SigningAlgorithm,
    key_id: Option<String>,
) -> VerificationOutcome {
    if let Some(name) = ["exp", "nbf"]
        .into_iter()
        .find(|name| payload.get(*name).is_some_and(|value| !value.is_number()))
    {
        return VerificationOutcome::Failed {
            reason: format!("'{name}' claim is not a number"),
        };
    }
    if check_expiry(payload, now) == ExpiryStatus::Expired {
        return VerificationOutcome::Failed {
            reason: REASON_EXPIRED.to_string(),
        };
    }
    if check_not_before(payload, now) == NotBeforeStatus::NotYetValid {
        return VerificationOutcome::Failed {
            reason: REASON_NOT_YET_VALID.to_string(),
        };
    }
    VerificationOutcome::Verified { algorithm, key_id }
}
