//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments.
//! Input resolution shared by both commands lives here.

pub mod decode;
pub mod verify;

use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use jwt_inspect::core::time_travel::parse_time_expression;
use jwt_inspect::error::JwtInspectError;

/// Maximum key-set file size in bytes (1 MB).
const KEY_SET_MAX_SIZE: u64 = 1_048_576;

/// Resolve the token from the positional argument, an environment
/// variable, or stdin, in that order.
///
/// The token is held in a zeroizing buffer since bearer tokens are
/// credentials.
pub(crate) fn resolve_token(
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<Zeroizing<String>, JwtInspectError> {
    let raw = match (token, token_env) {
        (Some(token), _) => Zeroizing::new(token.to_string()),
        (None, Some(name)) => read_env_var(name)?,
        (None, None) => read_stdin()?,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JwtInspectError::NoTokenProvided);
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}

/// Read an environment variable after validating its name.
pub(crate) fn read_env_var(name: &str) -> Result<Zeroizing<String>, JwtInspectError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(JwtInspectError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }
    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| JwtInspectError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Read all of stdin unless it is an interactive terminal.
fn read_stdin() -> Result<Zeroizing<String>, JwtInspectError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(JwtInspectError::NoTokenProvided);
    }
    let mut buffer = Zeroizing::new(String::new());
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .map_err(|_| JwtInspectError::NoTokenProvided)?;
    Ok(buffer)
}

/// Resolve the evaluation time: the time-travel target, or now.
pub(crate) fn resolve_now(time_travel: Option<&str>) -> Result<DateTime<Utc>, JwtInspectError> {
    match time_travel {
        Some(expression) => Ok(parse_time_expression(expression)?.timestamp),
        None => Ok(Utc::now()),
    }
}

/// Read a JWK Set file with a size limit to prevent resource exhaustion.
///
/// Uses `std::io::Read::take` to bound the read to
/// [`KEY_SET_MAX_SIZE`] + 1 bytes. If the read exceeds the limit,
/// returns a size error.
pub(crate) fn read_key_set_file(path: &Path) -> Result<String, JwtInspectError> {
    let display_path = path.display().to_string();
    let read_error = |reason: String| JwtInspectError::KeySetReadError {
        path: display_path.clone(),
        reason,
    };

    let file = File::open(path).map_err(|e| read_error(e.to_string()))?;
    let mut contents = String::new();
    file.take(KEY_SET_MAX_SIZE + 1)
        .read_to_string(&mut contents)
        .map_err(|e| read_error(e.to_string()))?;

    if contents.len() as u64 > KEY_SET_MAX_SIZE {
        return Err(read_error(format!(
            "file exceeds maximum size of {KEY_SET_MAX_SIZE} bytes"
        )));
    }

    Ok(contents)
}
