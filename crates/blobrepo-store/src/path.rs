//! Logical path validation shared by all backends

use crate::{Result, StoreError};

/// Validate a logical blob path.
///
/// Interior empty segments (`a//b`) are tolerated, everything that could
/// climb out of the store root is not.
pub fn validate(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(StoreError::InvalidPath("empty path".to_string()));
    }
    if path.starts_with('/') || path.contains('\\') || path.contains('\0') {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    if path.split('/').any(|segment| segment == ".." || segment == ".") {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Normalize a listing prefix so that `a/b` and `a/b/` list the same blobs
pub fn list_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
