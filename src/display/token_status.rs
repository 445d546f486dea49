//! Token status display for temporal claims.
//!
//! Renders human-readable status information for JWT temporal claims
//! (`exp`, `iat`, `nbf`) including expiry status with color coding.

use chrono::{DateTime, Local, TimeZone, Utc};
use colored::Colorize;

use jwt_inspect::core::claims::{
    ExpiryStatus, NotBeforeStatus, check_expiry, check_not_before, format_timestamp,
};
use jwt_inspect::core::decoder::JsonObject;

/// How a status line should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Ok,
    Warning,
    Error,
}

/// One labelled line of the token status section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub label: &'static str,
    pub text: String,
    pub severity: Severity,
}

/// Display the temporal status of a JWT's claims.
///
/// Examines `exp`, `iat`, and `nbf` claims in the payload and prints
/// human-readable status information:
/// - Expired tokens: red "EXPIRED (X ago)"
/// - Valid tokens: green "VALID (expires in X)"
/// - Not-yet-valid tokens: yellow "NOT YET VALID (valid in X)"
pub fn display_token_status(payload: &JsonObject, now: DateTime<Utc>, use_color: bool) {
    let title = "--- Token Status ---";
    if use_color {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }

    for line in token_status_lines(payload, now, &Local) {
        let text = if use_color {
            match line.severity {
                Severity::Info => line.text.normal(),
                Severity::Ok => line.text.green(),
                Severity::Warning => line.text.yellow(),
                Severity::Error => line.text.red().bold(),
            }
            .to_string()
        } else {
            line.text
        };
        println!("{:<12}{text}", format!("{}:", line.label));
    }

    if check_expiry(payload, now) == ExpiryStatus::Expired {
        let warning = "WARNING: this token has expired";
        if use_color {
            println!("{}", warning.red().bold());
        } else {
            println!("{warning}");
        }
    }
}

/// Build the status lines for `payload` evaluated at `now`.
pub fn token_status_lines<Tz>(payload: &JsonObject, now: DateTime<Utc>, tz: &Tz) -> Vec<StatusLine>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::new();

    for (claim, label) in [("iat", "Issued at"), ("nbf", "Not before"), ("exp", "Expires")] {
        if let Some(rendered) = claim_seconds(payload, claim).and_then(|s| format_timestamp(s, tz)) {
            lines.push(StatusLine {
                label,
                text: rendered,
                severity: Severity::Info,
            });
        }
    }

    let status = match (
        check_not_before(payload, now),
        check_expiry(payload, now),
    ) {
        (_, ExpiryStatus::Expired) => StatusLine {
            label: "Status",
            text: format!("EXPIRED ({} ago)", relative_to(payload, "exp", now)),
            severity: Severity::Error,
        },
        (NotBeforeStatus::NotYetValid, _) => StatusLine {
            label: "Status",
            text: format!("NOT YET VALID (valid in {})", relative_to(payload, "nbf", now)),
            severity: Severity::Warning,
        },
        (_, ExpiryStatus::Valid) => StatusLine {
            label: "Status",
            text: format!("VALID (expires in {})", relative_to(payload, "exp", now)),
            severity: Severity::Ok,
        },
        (_, ExpiryStatus::NoExpiry) => StatusLine {
            label: "Status",
            text: "VALID (no expiry)".to_string(),
            severity: Severity::Ok,
        },
    };
    lines.push(status);
    lines
}

fn claim_seconds(payload: &JsonObject, name: &str) -> Option<f64> {
    payload.get(name)?.as_f64().filter(|seconds| seconds.is_finite())
}

/// Distance between the claim instant and `now`, as a duration string.
fn relative_to(payload: &JsonObject, name: &str, now: DateTime<Utc>) -> String {
    let Some(seconds) = claim_seconds(payload, name) else {
        return "unknown".to_string();
    };
    #[allow(clippy::cast_precision_loss)]
    let now_seconds = now.timestamp_millis() as f64 / 1000.0;
    #[allow(clippy::cast_possible_truncation)]
    let delta = (seconds - now_seconds).abs().round() as i64;
    format_duration(delta)
}

/// Format a number of seconds as its two most significant units.
///
/// `90061` becomes `"1d 1h"`, `59` becomes `"59s"`.
pub fn format_duration(total_seconds: i64) -> String {
    const UNITS: [(i64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let mut remaining = total_seconds.max(0);
    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        let count = remaining / size;
        if count > 0 || (parts.is_empty() && size == 1) {
            parts.push(format!("{count}{suffix}"));
            remaining %= size;
        } else if !parts.is_empty() {
            break;
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.join(" ")
}
