//! Asymmetric signature algorithms accepted for verification.
//!
//! Only public-key algorithms are allowed: a JWK Set supplies public
//! verification material, so accepting `HS*` would let a token pick a
//! public key as its HMAC secret, and `none` would skip the check
//! entirely.

use std::fmt;

use crate::error::JwtInspectError;

/// Key family an algorithm verifies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    /// RSA keys (`kty: "RSA"`).
    Rsa,
    /// Elliptic-curve keys on the named curve (`kty: "EC"`, `crv`).
    Ec(&'static str),
}

/// An allow-listed signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
}

impl SigningAlgorithm {
    /// Every algorithm on the allow-list.
    pub const ALL: [Self; 6] = [
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// Parse a header `alg` value against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`JwtInspectError::UnsupportedAlgorithm`] for anything not
    /// on the list, including `none` and every HMAC variant.
    pub fn from_header(alg: &str) -> Result<Self, JwtInspectError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == alg)
            .ok_or_else(|| JwtInspectError::UnsupportedAlgorithm {
                algorithm: super::sanitize_untrusted(alg),
            })
    }

    /// The JOSE name of the algorithm.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        }
    }

    /// The key family a JWK must belong to for this algorithm.
    pub const fn key_family(self) -> KeyFamily {
        match self {
            Self::RS256 | Self::RS384 | Self::RS512 => KeyFamily::Rsa,
            Self::ES256 => KeyFamily::Ec("P-256"),
            Self::ES384 => KeyFamily::Ec("P-384"),
            Self::ES512 => KeyFamily::Ec("P-521"),
        }
    }

    /// The matching `jsonwebtoken` algorithm, if that crate can verify it.
    ///
    /// `jsonwebtoken` has no P-521 support, so `ES512` returns `None`.
    pub const fn jsonwebtoken_algorithm(self) -> Option<jsonwebtoken::Algorithm> {
        match self {
            Self::RS256 => Some(jsonwebtoken::Algorithm::RS256),
            Self::RS384 => Some(jsonwebtoken::Algorithm::RS384),
            Self::RS512 => Some(jsonwebtoken::Algorithm::RS512),
            Self::ES256 => Some(jsonwebtoken::Algorithm::ES256),
            Self::ES384 => Some(jsonwebtoken::Algorithm::ES384),
            Self::ES512 => None,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
