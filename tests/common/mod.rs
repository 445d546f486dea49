//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens with known claims and helpers that mint
//! asymmetric tokens from the key fixtures under `tests/fixtures/`.
//! Each integration test binary uses a different subset.
#![allow(dead_code)]

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{ECDSA_P521_SHA512_FIXED_SIGNING, EcdsaKeyPair};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

/// A valid HS256-signed JWT for testing.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"Test User","iat":1516239022}`
/// Secret: `"test-secret"`
pub const VALID_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// A token with only two parts (no signature segment).
pub const TWO_PART_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A token whose payload expired at `1000` (1970-01-01T00:16:40Z).
///
/// Header: `{"alg":"HS256"}`
/// Payload: `{"sub":"x","exp":1000}`
pub const EXPIRED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ4IiwiZXhwIjoxMDAwfQ.c2ln";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// JWK Set holding the public halves of every private key fixture.
pub const JWKS_PATH: &str = "tests/fixtures/jwks.json";

/// JWK Set with a different RSA key that reuses the `rsa-key-1` kid.
pub const UNRELATED_JWKS_PATH: &str = "tests/fixtures/jwks_unrelated.json";

pub const RSA_PRIVATE_KEY_PATH: &str = "tests/fixtures/rsa_private.pem";
pub const EC_P256_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec_p256_private.pem";
pub const EC_P384_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec_p384_private.pem";
/// PKCS#8 DER, since the P-521 key is loaded by `aws-lc-rs` directly.
pub const EC_P521_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec_p521_private.der";

/// Key ids used in [`JWKS_PATH`].
pub const RSA_KID: &str = "rsa-key-1";
pub const EC_P256_KID: &str = "ec-p256-key";
pub const EC_P384_KID: &str = "ec-p384-key";
pub const EC_P521_KID: &str = "ec-p521-key";

/// Read the main JWK Set fixture.
pub fn jwks() -> String {
    std::fs::read_to_string(JWKS_PATH).unwrap()
}

/// Read the unrelated JWK Set fixture.
pub fn unrelated_jwks() -> String {
    std::fs::read_to_string(UNRELATED_JWKS_PATH).unwrap()
}

/// The key id that matches `alg` in [`JWKS_PATH`].
pub fn kid_for(alg: &str) -> &'static str {
    match alg {
        "RS256" | "RS384" | "RS512" => RSA_KID,
        "ES256" => EC_P256_KID,
        "ES384" => EC_P384_KID,
        "ES512" => EC_P521_KID,
        other => panic!("no fixture key for {other}"),
    }
}

/// Sign `claims` with the fixture key for `alg`, optionally setting `kid`.
///
/// `ES512` is signed with `aws-lc-rs` since `jsonwebtoken` lacks it.
pub fn sign_token(alg: &str, kid: Option<&str>, claims: &Value) -> String {
    if alg == "ES512" {
        return sign_es512(kid, claims);
    }

    let (algorithm, key) = match alg {
        "RS256" | "RS384" | "RS512" => {
            let pem = std::fs::read(RSA_PRIVATE_KEY_PATH).unwrap();
            let algorithm = match alg {
                "RS256" => Algorithm::RS256,
                "RS384" => Algorithm::RS384,
                _ => Algorithm::RS512,
            };
            (algorithm, EncodingKey::from_rsa_pem(&pem).unwrap())
        }
        "ES256" => {
            let pem = std::fs::read(EC_P256_PRIVATE_KEY_PATH).unwrap();
            (Algorithm::ES256, EncodingKey::from_ec_pem(&pem).unwrap())
        }
        "ES384" => {
            let pem = std::fs::read(EC_P384_PRIVATE_KEY_PATH).unwrap();
            (Algorithm::ES384, EncodingKey::from_ec_pem(&pem).unwrap())
        }
        other => panic!("no fixture key for {other}"),
    };

    let mut header = Header::new(algorithm);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &key).unwrap()
}

fn sign_es512(kid: Option<&str>, claims: &Value) -> String {
    let der = std::fs::read(EC_P521_PRIVATE_KEY_PATH).unwrap();
    let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P521_SHA512_FIXED_SIGNING, &der).unwrap();

    let mut header = json!({"alg": "ES512", "typ": "JWT"});
    if let Some(kid) = kid {
        header["kid"] = json!(kid);
    }
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );
    let signature = key_pair
        .sign(&SystemRandom::new(), signing_input.as_bytes())
        .unwrap();
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature.as_ref()))
}

/// Replace the payload of a signed token, keeping its signature.
pub fn with_payload(token: &str, claims: &Value) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    format!(
        "{}.{}.{}",
        parts[0],
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        parts[2]
    )
}

/// Standard test claims used across verify tests.
pub fn standard_claims() -> Value {
    json!({
        "sub": "1234567890",
        "name": "Test User",
        "iat": 1516239022
    })
}
