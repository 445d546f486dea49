//! Domain error types for jwt-inspect.
//!
//! All business-logic errors are defined here using `thiserror`.
//! Cryptographic rejections are not errors: they are reported as
//! [`VerificationOutcome::Failed`](crate::core::validator::VerificationOutcome::Failed).
//! These errors are converted to user-friendly messages at the CLI boundary.

use thiserror::Error;

/// Errors that can occur while decoding or verifying a token.
#[derive(Debug, Error)]
pub enum JwtInspectError {
    /// The token does not have the compact `header.payload[.signature]` shape.
    #[error("invalid token format: expected 'header.payload.signature' structure")]
    MalformedToken,

    /// A token segment is not valid base64url or does not decode to UTF-8.
    #[error("failed to decode {segment}: {reason}")]
    InvalidEncoding {
        /// Which segment failed to decode (e.g., "header", "payload").
        segment: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// A decoded segment is not a JSON object.
    #[error("failed to parse {segment} as JSON: {reason}")]
    InvalidJson {
        /// Which segment failed to parse (e.g., "header", "payload").
        segment: String,
        /// Description of the parsing failure.
        reason: String,
    },

    /// The supplied key-set text is not a usable JWK Set.
    #[error("invalid key set: {reason}")]
    InvalidKeySet {
        /// Description of what is wrong with the key set.
        reason: String,
    },

    /// No key in the key set is a candidate for the token.
    #[error("no matching key found in key set for {criteria}")]
    NoMatchingKey {
        /// What the selection was looking for (kid and/or algorithm).
        criteria: String,
    },

    /// The token declares an algorithm outside the asymmetric allow-list.
    #[error("unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// The algorithm that was encountered.
        algorithm: String,
    },

    /// Failed to read the key-set file.
    #[error("failed to read key set file '{path}': {reason}")]
    KeySetReadError {
        /// Path to the key-set file.
        path: String,
        /// Description of the read failure.
        reason: String,
    },

    /// Failed to parse a time-travel expression.
    #[error("invalid time expression '{expression}': {reason}")]
    InvalidTimeExpression {
        /// The time expression that failed to parse.
        expression: String,
        /// Description of the parsing failure.
        reason: String,
    },

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The environment variable name cannot be looked up.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },
}

impl JwtInspectError {
    /// Stable snake_case name of the error category, for machine-readable output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::InvalidJson { .. } => "invalid_json",
            Self::InvalidKeySet { .. } => "invalid_key_set",
            Self::NoMatchingKey { .. } => "no_matching_key",
            Self::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            Self::KeySetReadError { .. } => "key_set_read_error",
            Self::InvalidTimeExpression { .. } => "invalid_time_expression",
            Self::NoTokenProvided => "no_token_provided",
            Self::EnvVarNotFound { .. } => "env_var_not_found",
            Self::InvalidEnvVarName { .. } => "invalid_env_var_name",
        }
    }
}
