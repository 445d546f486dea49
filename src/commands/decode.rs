//! Handler for the `decode` subcommand.
//!
//! Decodes and pretty-prints a JWT's header and payload without
//! verifying its signature. Expiry is reported as an advisory only and
//! never changes the exit code.

use anyhow::Result;
use serde_json::{Value, json};

use jwt_inspect::core::claims::check_expiry;
use jwt_inspect::core::decoder::decode_token;

use super::{resolve_now, resolve_token};
use crate::cli::DecodeArgs;
use crate::display;

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let now = resolve_now(args.time_travel.as_deref())?;

    let decoded = decode_token(&token)?;
    let expiry = check_expiry(&decoded.payload, now);
    tracing::debug!(expiry = expiry.as_str(), "decoded token");

    if args.json {
        let document = json!({
            "header": Value::Object(decoded.header),
            "payload": Value::Object(decoded.payload),
            "expiry": expiry.as_str(),
        });
        display::json_printer::print_json(&document, false);
    } else {
        display::print_decoded(&decoded, now);
    }

    Ok(())
}
