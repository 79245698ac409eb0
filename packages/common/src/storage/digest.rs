use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact payload bytes.
///
/// Must match `sha256sum` over the same bytes; content keys and client-visible
/// digests are both built from it.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
