//! Bearer token generation and hashing.
//!
//! Tokens are shown once at creation; only their SHA-256 digest is stored.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Bearer token prefix.
pub const API_TOKEN_PREFIX: &str = "cw";

/// Number of random bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a new random bearer token.
#[must_use]
pub fn generate_api_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    let token = format!("{API_TOKEN_PREFIX}_{}", hex::encode(secret));

    secret.zeroize();

    token
}

/// Hex-encoded SHA-256 digest of a bearer token, as stored in `users.token_hash`.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
