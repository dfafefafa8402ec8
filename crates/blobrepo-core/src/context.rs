//! Per-request bundle threaded from resolution to the handler

use crate::{parse_path, Coordinate, RepoResolver, Repository, Result};
use std::sync::Arc;

/// A resolved and parsed artifact request.
///
/// Only built through [`RequestContext::resolve`], so every instance has
/// passed both repository resolution and the minimum segment check.
#[derive(Clone, Debug)]
pub struct RequestContext {
    repository: Arc<Repository>,
    coordinate: Coordinate,
    filename: String,
    is_metadata: bool,
}

impl RequestContext {
    /// Resolve the repository for `path` and parse the remainder
    pub fn resolve(resolver: &RepoResolver, path: &str) -> Result<Self> {
        let (repository, remainder) = resolver.resolve(path)?;
        let parsed = parse_path(remainder)?;

        Ok(Self {
            repository,
            coordinate: parsed.coordinate,
            filename: parsed.filename,
            is_metadata: parsed.is_metadata,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// The requested filename (last path segment)
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether the filename starts with `maven-metadata.xml`
    pub fn is_metadata(&self) -> bool {
        self.is_metadata
    }

    /// Directory the requested file lives in: the artifact root for
    /// metadata, the version directory otherwise.
    pub fn storage_dir(&self) -> String {
        if self.is_metadata {
            self.coordinate.root_dir(&self.repository)
        } else {
            self.coordinate.version_dir(&self.repository)
        }
    }

    /// Full storage path of the requested file
    pub fn storage_path(&self) -> String {
        format!("{}/{}", self.storage_dir(), self.filename)
    }
}
