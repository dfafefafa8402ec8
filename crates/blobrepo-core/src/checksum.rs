//! Shape validation of uploaded checksum sidecars.
//!
//! Only the length of the hex text is checked. The digest is never
//! recomputed or compared against the artifact it describes, so a
//! well-formed but wrong checksum is accepted.

use crate::{CoreError, Result};

/// Checksum sidecar kinds recognized by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecksumKind {
    /// `.md5`
    Md5,
    /// `.sha1`
    Sha1,
    /// `.sha2` (SHA-256)
    Sha2,
}

impl ChecksumKind {
    /// All kinds, in the order sidecars are written
    pub const ALL: [ChecksumKind; 3] = [Self::Md5, Self::Sha1, Self::Sha2];

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Md5 => ".md5",
            Self::Sha1 => ".sha1",
            Self::Sha2 => ".sha2",
        }
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha2 => 64,
        }
    }

    /// Detect the kind from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| filename.ends_with(kind.extension()))
    }
}

/// Reject checksum uploads whose payload is not the hex length of the digest.
/// Non-checksum files always pass.
pub fn validate_checksum(filename: &str, payload: &[u8]) -> Result<()> {
    match ChecksumKind::from_filename(filename) {
        Some(kind) if payload.len() != kind.hex_len() => Err(CoreError::InvalidChecksum {
            filename: filename.to_string(),
            expected: kind.hex_len(),
            actual: payload.len(),
        }),
        _ => Ok(()),
    }
}
