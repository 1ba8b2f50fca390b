//! Version tokens for downloaded stylesheets
//!
//! A direct-URL mod has no upstream version, so its token is the SHA-256 of
//! the body in the form `sha256:<hex>`. Two downloads compare equal exactly
//! when their bodies do.

use sha2::{Digest, Sha256};

/// Prefix of every token produced here.
pub const CHECKSUM_PREFIX: &str = "sha256:";

/// `sha256:<hex>` of `bytes`.
pub fn compute_bytes_checksum(bytes: &[u8]) -> String {
    format!("{CHECKSUM_PREFIX}{:x}", Sha256::digest(bytes))
}

pub fn compute_content_checksum(content: &str) -> String {
    compute_bytes_checksum(content.as_bytes())
}

/// Whether `token` looks like a checksum rather than a commit SHA.
pub fn is_checksum(token: &str) -> bool {
    token
        .strip_prefix(CHECKSUM_PREFIX)
        .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}
