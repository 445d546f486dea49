//! Time-travel debugging for JWT temporal claims.
//!
//! Parses time expressions (relative like "+7d" or absolute like RFC 3339)
//! into the simulated "now" used by expiry checks and verification.

use chrono::{DateTime, Duration, Utc};

use crate::error::JwtInspectError;

/// A parsed time target for time-travel evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

/// Parse a time-travel expression relative to the current time.
///
/// See [`parse_time_expression_at`] for the accepted formats.
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, JwtInspectError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Parse a time-travel expression into an absolute timestamp.
///
/// Supports the following formats:
/// - Relative: `+7d`, `-1h`, `+30m`, `+2w`, `+1y`, `-5s` (a year is 365 days)
/// - Absolute RFC 3339 / ISO 8601: `2024-01-15T14:30:00Z`
/// - Absolute Unix epoch seconds: `1705312200`
///
/// # Errors
///
/// Returns an error if the expression doesn't match any known format.
pub fn parse_time_expression_at(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<TimeTarget, JwtInspectError> {
    let trimmed = expression.trim();
    let invalid = |reason: &str| JwtInspectError::InvalidTimeExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("expression is empty"));
    }

    let timestamp = if let Some(rest) = trimmed.strip_prefix('+') {
        let offset = parse_offset(rest).map_err(|reason| invalid(&reason))?;
        now.checked_add_signed(offset)
            .ok_or_else(|| invalid("resulting time is out of range"))?
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        let offset = parse_offset(rest).map_err(|reason| invalid(&reason))?;
        now.checked_sub_signed(offset)
            .ok_or_else(|| invalid("resulting time is out of range"))?
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let seconds: i64 = trimmed
            .parse()
            .map_err(|_| invalid("epoch value is out of range"))?;
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(|| invalid("epoch value is out of range"))?
    } else {
        DateTime::parse_from_rfc3339(trimmed)
            .map_err(|_| invalid("expected a relative offset, an RFC 3339 timestamp, or epoch seconds"))?
            .with_timezone(&Utc)
    };

    Ok(TimeTarget {
        timestamp,
        expression: expression.to_string(),
    })
}

/// Parse the `<amount><unit>` part of a relative expression.
fn parse_offset(text: &str) -> Result<Duration, String> {
    let Some(unit) = text.chars().last() else {
        return Err("missing amount and unit".to_string());
    };
    let amount_text = &text[..text.len() - unit.len_utf8()];
    if amount_text.is_empty() || !amount_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid amount '{amount_text}'"));
    }
    let amount: i64 = amount_text
        .parse()
        .map_err(|_| format!("amount '{amount_text}' is too large"))?;

    let seconds_per_unit = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        'w' => 604_800,
        'y' => 31_536_000,
        other => return Err(format!("unknown unit '{other}'")),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| format!("amount '{amount_text}' is too large"))
}
