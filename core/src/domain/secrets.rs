//! Generation and hashing of the secrets handed out to users.
//!
//! Every secret that leaves the server (refresh tokens, mailed link tokens,
//! two-factor codes, backup codes, trusted-device cookies) is persisted only as
//! its SHA-256 hex digest.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

const ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Hashes a secret for storage
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compares two hex digests without leaking the mismatch position
pub fn hashes_match(stored_hash: &str, candidate_hash: &str) -> bool {
    constant_time_eq(stored_hash.as_bytes(), candidate_hash.as_bytes())
}

/// Random bytes encoded as URL-safe base64 without padding
pub fn random_url_token(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

/// Random alphanumeric string (refresh tokens)
pub fn random_alphanumeric(length: usize) -> String {
    random_from_alphabet(ALPHANUMERIC, length)
}

/// Random string drawn uniformly from `alphabet`
pub fn random_from_alphabet(alphabet: &[u8], length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Random zero-padded numeric code of `digits` length
pub fn random_numeric_code(digits: u32) -> String {
    let upper = 10u32.pow(digits);
    let code = OsRng.gen_range(0..upper);
    format!("{:0width$}", code, width = digits as usize)
}
