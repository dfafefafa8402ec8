//! Parsing of the path remainder into a coordinate and filename

use crate::{Coordinate, CoreError, Result};

/// Name of the per-artifact metadata descriptor
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// Segments required before the filename of a versioned artifact:
/// at least one group segment, the artifact id and the version.
const VERSIONED_MIN_SEGMENTS: usize = 3;

/// Segments required before a metadata filename: at least one group
/// segment and the artifact id.
const METADATA_MIN_SEGMENTS: usize = 2;

/// Output of [`parse_path`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPath {
    pub coordinate: Coordinate,
    pub filename: String,
    pub is_metadata: bool,
}

/// Parse the part of a request path that follows the repository prefix.
///
/// ```text
/// com/example/lib/1.0/lib-1.0.jar      → com.example:lib:1.0, lib-1.0.jar
/// com/example/lib/maven-metadata.xml   → com.example:lib,     maven-metadata.xml
/// ```
///
/// Trailing empty segments are dropped, interior ones are kept so that the
/// group id joins back to the same path.
pub fn parse_path(remainder: &str) -> Result<ParsedPath> {
    let mut segments: Vec<&str> = remainder.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let Some((filename, leading)) = segments.split_last() else {
        return Err(CoreError::MalformedPath(remainder.to_string()));
    };

    let is_metadata = filename.starts_with(METADATA_FILE);
    let required = if is_metadata {
        METADATA_MIN_SEGMENTS
    } else {
        VERSIONED_MIN_SEGMENTS
    };
    if leading.len() < required {
        return Err(CoreError::MalformedPath(remainder.to_string()));
    }

    let (group, artifact_id, version) = if is_metadata {
        let (artifact_id, group) = leading
            .split_last()
            .ok_or_else(|| CoreError::MalformedPath(remainder.to_string()))?;
        (group, *artifact_id, None)
    } else {
        let n = leading.len();
        (
            &leading[..n - 2],
            leading[n - 2],
            Some(leading[n - 1].to_string()),
        )
    };

    Ok(ParsedPath {
        coordinate: Coordinate::new(group.join("."), artifact_id, version),
        filename: (*filename).to_string(),
        is_metadata,
    })
}
