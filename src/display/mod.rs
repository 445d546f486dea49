//! Terminal display and formatting utilities.
//!
//! Handles colorized JSON output, token status rendering and the
//! verification banner for human-readable terminal output.

pub mod banner;
pub mod json_printer;
pub mod token_status;

use std::io::{self, IsTerminal};

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde_json::Value;

use jwt_inspect::core::claims::annotate_temporal_claims;
use jwt_inspect::core::decoder::DecodedToken;

/// Whether stdout should receive ANSI colors.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
}

/// Print the header, payload and token status sections.
///
/// Temporal claims in the payload are annotated with local time for
/// display only; `decoded` itself is not modified.
pub fn print_decoded(decoded: &DecodedToken, now: DateTime<Utc>) {
    let use_color = stdout_supports_color();

    println!("{}", section_title("Header", use_color));
    json_printer::print_json(&Value::Object(decoded.header.clone()), use_color);
    println!();

    println!("{}", section_title("Payload", use_color));
    let annotated = annotate_temporal_claims(&decoded.payload, &Local);
    json_printer::print_json(&Value::Object(annotated), use_color);
    println!();

    token_status::display_token_status(&decoded.payload, now, use_color);
}

fn section_title(title: &str, use_color: bool) -> String {
    let text = format!("--- {title} ---");
    if use_color {
        text.bold().to_string()
    } else {
        text
    }
}
