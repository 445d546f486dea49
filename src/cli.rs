//! CLI argument definitions for jwt-inspect.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! `DecodeArgs` and `VerifyArgs` implement custom `Debug` to redact the
//! token and prevent accidental leakage through debug formatting, error
//! chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// An offline inspector for JSON Web Tokens: decode claims and verify
/// signatures against a local JWK Set.
#[derive(Debug, Parser)]
#[command(name = "jwt-inspect")]
#[command(version, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode and inspect a JWT without verifying its signature.
    Decode(DecodeArgs),

    /// Verify a JWT's signature against a JWK Set (RS256/384/512, ES256/384/512).
    Verify(VerifyArgs),
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// The JWT token to decode. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Evaluate expiry against a simulated current time.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in RFC 3339 or Unix epoch format.
    #[arg(long, value_name = "EXPR")]
    pub time_travel: Option<String>,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Custom `Debug` that redacts the token field to prevent accidental leakage.
impl fmt::Debug for DecodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("time_travel", &self.time_travel)
            .field("json", &self.json)
            .finish()
    }
}

/// Arguments for the `verify` subcommand.
#[derive(clap::Args)]
#[command(group(
    ArgGroup::new("key_set")
        .required(true)
        .args(["jwks_file", "jwks_env", "jwks"])
))]
pub struct VerifyArgs {
    /// The JWT token to verify. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Path to a JWK Set JSON file (`{"keys": [...]}`).
    #[arg(long, value_name = "FILE")]
    pub jwks_file: Option<PathBuf>,

    /// Read the JWK Set JSON from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub jwks_env: Option<String>,

    /// The JWK Set JSON text itself.
    #[arg(long, value_name = "JSON")]
    pub jwks: Option<String>,

    /// Simulate a different current time for expiry/nbf checks.
    ///
    /// Accepts relative expressions like "+7d", "-1h", "+30m" or
    /// absolute timestamps in RFC 3339 or Unix epoch format.
    #[arg(long, value_name = "EXPR")]
    pub time_travel: Option<String>,

    /// Output raw JSON without colors (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Custom `Debug` that redacts the token field to prevent accidental
/// leakage through debug formatting or error chains.
impl fmt::Debug for VerifyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("jwks_file", &self.jwks_file)
            .field("jwks_env", &self.jwks_env)
            .field("jwks", &self.jwks.as_ref().map(|json| json.len()))
            .field("time_travel", &self.time_travel)
            .field("json", &self.json)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_about_comes_from_doc_comment() {
        let about = Cli::command().get_about().map(ToString::to_string);
        assert!(about.is_some_and(|text| text.contains("offline inspector")));
    }

    #[test]
    fn test_decode_args_debug_redacts_token() {
        let cli = Cli::parse_from(["jwt-inspect", "decode", "secret.token.value"]);
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        let debug_output = format!("{args:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret.token.value"));
    }

    #[test]
    fn test_verify_requires_exactly_one_key_set_source() {
        assert!(Cli::try_parse_from(["jwt-inspect", "verify", "a.b.c"]).is_err());
        assert!(
            Cli::try_parse_from([
                "jwt-inspect",
                "verify",
                "a.b.c",
                "--jwks",
                "{}",
                "--jwks-env",
                "KEYS"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["jwt-inspect", "verify", "a.b.c", "--jwks", "{}"]).is_ok());
    }

    #[test]
    fn test_verify_args_debug_redacts_token() {
        let cli = Cli::parse_from([
            "jwt-inspect",
            "verify",
            "secret.token.value",
            "--jwks-file",
            "keys.json",
        ]);
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        let debug_output = format!("{args:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("keys.json"));
        assert!(!debug_output.contains("secret.token.value"));
    }
}
