//! Handler for the `verify` subcommand.
//!
//! Decodes the token, then verifies its signature against a JWK Set read
//! from a file, an environment variable, or the command line. Decoding
//! failures abort before anything is shown; verification failures are
//! rendered next to the decoded header and payload.

use anyhow::Result;
use serde_json::{Value, json};

use jwt_inspect::core::claims::check_expiry;
use jwt_inspect::core::decoder::decode_token;
use jwt_inspect::core::jwks::verify_with_key_set_at;
use jwt_inspect::core::validator::VerificationOutcome;
use jwt_inspect::error::JwtInspectError;

use super::{read_env_var, read_key_set_file, resolve_now, resolve_token};
use crate::cli::VerifyArgs;
use crate::display;

/// `kind` of a token whose signature or temporal claims were rejected.
const FAILURE_KIND_REJECTED: &str = "rejected";

/// Execute the `verify` subcommand with the given arguments.
///
/// Returns whether the token was verified, which decides the exit code.
pub fn execute(args: &VerifyArgs) -> Result<bool> {
    let token = resolve_token(args.token.as_deref(), args.token_env.as_deref())?;
    let now = resolve_now(args.time_travel.as_deref())?;
    let key_set = read_key_set(args)?;

    let decoded = decode_token(&token)?;
    let expiry = check_expiry(&decoded.payload, now);

    let (outcome, failure_kind) = match verify_with_key_set_at(&token, &key_set, now) {
        Ok(outcome) => (outcome, FAILURE_KIND_REJECTED),
        Err(e) => {
            let kind = e.kind();
            (
                VerificationOutcome::Failed {
                    reason: e.to_string(),
                },
                kind,
            )
        }
    };
    tracing::debug!(verified = outcome.is_verified(), "verification finished");

    if args.json {
        let document = json!({
            "header": Value::Object(decoded.header),
            "payload": Value::Object(decoded.payload),
            "expiry": expiry.as_str(),
            "verification": verification_json(&outcome, failure_kind),
        });
        display::json_printer::print_json(&document, false);
    } else {
        display::print_decoded(&decoded, now);
        display::banner::print_banner(&outcome, display::stdout_supports_color());
    }

    Ok(outcome.is_verified())
}

/// Load the JWK Set text from whichever source was given.
fn read_key_set(args: &VerifyArgs) -> Result<String, JwtInspectError> {
    if let Some(path) = &args.jwks_file {
        return read_key_set_file(path);
    }
    if let Some(name) = &args.jwks_env {
        return read_env_var(name).map(|value| value.as_str().to_owned());
    }
    Ok(args.jwks.clone().unwrap_or_default())
}

/// Machine-readable form of a verification outcome.
///
/// Failures carry a stable `kind`: `rejected` for a cryptographic or
/// temporal rejection, otherwise the error category.
fn verification_json(outcome: &VerificationOutcome, failure_kind: &str) -> Value {
    match outcome {
        VerificationOutcome::Verified { algorithm, .. } => json!({
            "status": "verified",
            "algorithm": algorithm.as_str(),
            "kid": outcome.key_id_display(),
        }),
        VerificationOutcome::Failed { reason } => json!({
            "status": "failed",
            "kind": failure_kind,
            "reason": reason,
        }),
    }
}
