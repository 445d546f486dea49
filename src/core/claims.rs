//! Temporal claim evaluation.
//!
//! `exp`, `nbf` and `iat` are Unix-epoch seconds. Comparisons are done in
//! milliseconds against a caller-supplied "now" so that time-travel and
//! tests stay deterministic. Expiry is advisory during decoding; the
//! verifier reuses the same checks to reject expired tokens.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use super::decoder::JsonObject;

/// Temporal claims annotated for display.
pub const TEMPORAL_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// Outcome of comparing `exp` against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// `now` is later than the expiry instant.
    Expired,
    /// The token has an `exp` that has not passed yet.
    Valid,
    /// The payload carries no numeric `exp`.
    NoExpiry,
}

impl ExpiryStatus {
    /// Stable lowercase name used in machine-readable output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Valid => "valid",
            Self::NoExpiry => "no_expiry",
        }
    }
}

/// Outcome of comparing `nbf` against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotBeforeStatus {
    /// `now` is earlier than the not-before instant.
    NotYetValid,
    /// The not-before instant has been reached.
    Active,
    /// The payload carries no numeric `nbf`.
    NoNotBefore,
}

/// Read a numeric claim as milliseconds since the epoch.
fn claim_millis(payload: &JsonObject, name: &str) -> Option<f64> {
    payload.get(name)?.as_f64().map(|seconds| seconds * 1000.0)
}

#[allow(clippy::cast_precision_loss)]
fn now_millis(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64
}

/// Compare the payload's `exp` claim against `now`.
///
/// A missing or non-numeric `exp` is not an error: such tokens are
/// simply never flagged.
pub fn check_expiry(payload: &JsonObject, now: DateTime<Utc>) -> ExpiryStatus {
    match claim_millis(payload, "exp") {
        Some(expires_at) if now_millis(now) > expires_at => ExpiryStatus::Expired,
        Some(_) => ExpiryStatus::Valid,
        None => ExpiryStatus::NoExpiry,
    }
}

/// Compare the payload's `nbf` claim against `now`.
pub fn check_not_before(payload: &JsonObject, now: DateTime<Utc>) -> NotBeforeStatus {
    match claim_millis(payload, "nbf") {
        Some(not_before) if now_millis(now) < not_before => NotBeforeStatus::NotYetValid,
        Some(_) => NotBeforeStatus::Active,
        None => NotBeforeStatus::NoNotBefore,
    }
}

/// Render an epoch-seconds value in the given time zone.
///
/// Returns `None` for values outside the range chrono can represent.
pub fn format_timestamp<Tz>(seconds: f64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !seconds.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (seconds * 1000.0).round() as i64;
    let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(
        utc.with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
    )
}

/// Return a copy of `payload` with temporal claims annotated for display.
///
/// Numeric `exp`, `iat` and `nbf` values become strings of the form
/// `"1516239022 (2018-01-18 01:30:22 +00:00)"`. Every other claim is
/// copied verbatim, and `payload` itself is left untouched.
pub fn annotate_temporal_claims<Tz>(payload: &JsonObject, tz: &Tz) -> JsonObject
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut annotated = payload.clone();
    for name in TEMPORAL_CLAIMS {
        let Some(raw) = payload.get(name) else {
            continue;
        };
        let Some(rendered) = raw.as_f64().and_then(|seconds| format_timestamp(seconds, tz)) else {
            continue;
        };
        annotated.insert(name.to_string(), Value::String(format!("{raw} ({rendered})")));
    }
    annotated
}
