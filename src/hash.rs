// Hash computation utilities

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex-encoded SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash an existing file, `None` if it cannot be read
pub fn file_sha256(path: &Path) -> Option<String> {
    std::fs::read(path).ok().map(|data| sha256_hex(&data))
}
