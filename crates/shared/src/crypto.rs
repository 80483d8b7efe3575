//! Hashing utilities for API key verification and rollout bucketing.

use sha2::{Digest, Sha256};

/// Number of buckets a rollout percentage is measured against.
pub const ROLLOUT_BUCKETS: u32 = 100;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Maps a user onto a stable bucket in `0..100` for a given flag.
///
/// The bucket is the first four bytes of `SHA-256(user_id + flag_key)` read as a
/// big-endian integer, reduced modulo 100. Salting with the flag key keeps a
/// user's buckets independent across flags.
pub fn rollout_bucket(user_id: &str, flag_key: &str) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(flag_key.as_bytes());
    let digest = hasher.finalize();

    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (prefix % ROLLOUT_BUCKETS) as u8
}

/// Compares a presented API key with a stored SHA-256 hex digest.
///
/// Both digests are compared over their full length so that the comparison
/// time does not depend on the position of the first mismatch.
pub fn verify_key_hash(presented_key: &str, expected_hash: &str) -> bool {
    let actual = sha256_hex(presented_key);
    let expected = expected_hash.trim().to_ascii_lowercase();

    if actual.len() != expected.len() {
        return false;
    }

    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
