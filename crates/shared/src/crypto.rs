//! Cryptographic utilities for session token generation and hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix carried by every session token.
pub const SESSION_TOKEN_PREFIX: &str = "chs_";

/// Number of random characters following the prefix.
const SESSION_TOKEN_RANDOM_LEN: usize = 32;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new opaque session token (`chs_` + 32 alphanumerics).
///
/// Only the SHA-256 of the token is kept server-side; the raw token lives
/// in the client's cookie.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();

    let random: String = (0..SESSION_TOKEN_RANDOM_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    format!("{}{}", SESSION_TOKEN_PREFIX, random)
}

/// Returns true if the value has the shape of a session token.
///
/// Used to reject obviously forged cookies before touching the session store.
pub fn is_session_token(value: &str) -> bool {
    value
        .strip_prefix(SESSION_TOKEN_PREFIX)
        .map(|rest| rest.len() == SESSION_TOKEN_RANDOM_LEN && rest.bytes().all(|b| b.is_ascii_alphanumeric()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_generate_session_token_format() {
        let token = generate_session_token();
        assert!(token.starts_with(SESSION_TOKEN_PREFIX));
        assert_eq!(token.len(), SESSION_TOKEN_PREFIX.len() + SESSION_TOKEN_RANDOM_LEN);
        assert!(is_session_token(&token));
    }

    #[test]
    fn test_generate_session_token_unique() {
        let first = generate_session_token();
        let second = generate_session_token();
        assert_ne!(first, second);
    }

    #[test]
    fn test_is_session_token_rejects_malformed() {
        assert!(!is_session_token(""));
        assert!(!is_session_token("chs_short"));
        assert!(!is_session_token("pm_abcdefghijklmnopqrstuvwxyz012345"));
        assert!(!is_session_token("chs_abcdefghijklmnopqrstuvwxyz01234!"));
    }
}
