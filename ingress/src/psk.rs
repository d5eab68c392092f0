use sha2::{Digest, Sha256};

/// Compares a submitted key against the configured secret.
///
/// Both sides are hashed first so the comparison runs over fixed-length
/// digests and its timing does not depend on where the inputs diverge.
pub fn keys_match(expected: &str, submitted: &str) -> bool {
    Sha256::digest(expected.as_bytes()) == Sha256::digest(submitted.as_bytes())
}
