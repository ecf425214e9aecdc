use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `input`.
///
/// Used for the one-time code and the signup password consistency check.
/// This is a fast unsalted digest and never a credential store; real
/// passwords go through [`super::hash`].
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
