//! Basic-auth gate against per-repository shared secrets

use crate::{CoreError, Repository, Result};
use base64::{engine::general_purpose, Engine as _};
use subtle::ConstantTimeEq;

/// The operation a request performs, selecting which secret applies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Fetch (GET), checked against the read secret
    Read,
    /// Publish (PUT), checked against the write secret
    Write,
}

impl Operation {
    /// The repository secret guarding this operation
    pub fn secret<'r>(&self, repository: &'r Repository) -> Option<&'r str> {
        match self {
            Self::Read => repository.read_secret(),
            Self::Write => repository.write_secret(),
        }
    }
}

/// Decides whether an `Authorization` header satisfies a configured secret.
///
/// There is no notion of users: in `Basic base64(user:secret)` the user part
/// is ignored, and `Basic base64(secret)` is accepted as well.
pub struct AuthGate;

impl AuthGate {
    /// Check the header against `repository`'s secret for `operation`
    pub fn authorize(
        repository: &Repository,
        operation: Operation,
        header: Option<&str>,
    ) -> Result<()> {
        Self::check(header, operation.secret(repository))
    }

    /// Check the header against an optional secret
    pub fn check(header: Option<&str>, secret: Option<&str>) -> Result<()> {
        let Some(secret) = secret else {
            return Ok(());
        };

        let header = header.ok_or(CoreError::Unauthorized("missing Authorization header"))?;
        let credential = extract_basic_credential(header)?;

        if constant_time_eq(&credential, secret) {
            Ok(())
        } else {
            Err(CoreError::Unauthorized("invalid credentials"))
        }
    }
}

/// Decode a `Basic` header and return the secret part.
///
/// Everything after the first `:` is the credential; without a colon the
/// whole decoded text is.
pub fn extract_basic_credential(header: &str) -> Result<String> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(CoreError::Unauthorized("invalid Authorization header"))?;

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| CoreError::Unauthorized("invalid Authorization header"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| CoreError::Unauthorized("invalid Authorization header"))?;

    Ok(match decoded.split_once(':') {
        Some((_user, credential)) => credential.to_string(),
        None => decoded,
    })
}

/// Compare without leaking the position of the first mismatch.
///
/// Lengths still differ observably; a dummy comparison keeps the work done
/// roughly the same in that case.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}
