//! jwt-inspect: offline JWT decoding and JWK Set signature verification.
//!
//! The library exposes two independent pieces:
//!
//! - [`core::decoder`] and [`core::claims`] turn a compact token into its
//!   header and payload objects and evaluate temporal claims, without any
//!   cryptography.
//! - [`core::jwks`] verifies a token against caller-supplied JWK Set text,
//!   restricted to an asymmetric algorithm allow-list
//!   ([`core::algorithm`]). No keys are ever fetched from the network.
//!
//! ```no_run
//! use jwt_inspect::core::{decoder, jwks};
//!
//! # fn main() -> Result<(), jwt_inspect::error::JwtInspectError> {
//! let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0.signature";
//! let decoded = decoder::decode_token(token)?;
//! assert_eq!(decoded.payload["sub"], "1234567890");
//!
//! let outcome = jwks::verify_with_key_set(token, r#"{"keys":[]}"#);
//! assert!(outcome.is_err()); // HS256 is not on the allow-list
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;
