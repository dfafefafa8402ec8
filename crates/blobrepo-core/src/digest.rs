//! Hex digests written to checksum sidecars

use crate::ChecksumKind;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Lowercase hex MD5
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Lowercase hex SHA-1
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Lowercase hex SHA-256
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Digest matching a sidecar kind
pub fn hex_digest(kind: ChecksumKind, data: &[u8]) -> String {
    match kind {
        ChecksumKind::Md5 => md5_hex(data),
        ChecksumKind::Sha1 => sha1_hex(data),
        ChecksumKind::Sha2 => sha256_hex(data),
    }
}
