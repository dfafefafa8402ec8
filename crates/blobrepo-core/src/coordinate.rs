//! Repository and artifact coordinate value types

use std::fmt;

/// A configured repository: a URL prefix plus optional read and write secrets.
///
/// An absent secret makes the corresponding operation public.
#[derive(Clone, PartialEq, Eq)]
pub struct Repository {
    id: String,
    prefix: String,
    read_secret: Option<String>,
    write_secret: Option<String>,
}

impl Repository {
    /// Create a repository, normalizing the prefix to start and end with `/`
    pub fn new(
        id: impl Into<String>,
        prefix: &str,
        read_secret: Option<String>,
        write_secret: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prefix: normalize_prefix(prefix),
            read_secret,
            write_secret,
        }
    }

    /// Repository identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// URL path prefix, always starting and ending with `/`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Secret required to fetch, if any
    pub fn read_secret(&self) -> Option<&str> {
        self.read_secret.as_deref()
    }

    /// Secret required to publish, if any
    pub fn write_secret(&self) -> Option<&str> {
        self.write_secret.as_deref()
    }

    /// The prefix as a relative storage directory (`/releases/` → `releases/`)
    pub fn storage_prefix(&self) -> &str {
        &self.prefix[1..]
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .field("read_secret", &self.read_secret.as_ref().map(|_| "[REDACTED]"))
            .field("write_secret", &self.write_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Normalize a configured path so it starts and ends with `/`
pub fn normalize_prefix(path: &str) -> String {
    let mut prefix = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        prefix.push('/');
    }
    prefix.push_str(path);
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// An artifact coordinate.
///
/// `version` is `None` for metadata requests, which address the artifact root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl Coordinate {
    /// Create a coordinate
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version,
        }
    }

    /// Group id as path segments (`com.example` → `com/example`)
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Storage directory holding metadata and version directories:
    /// `<repo prefix><group path>/<artifact id>`
    pub fn root_dir(&self, repository: &Repository) -> String {
        format!(
            "{}{}/{}",
            repository.storage_prefix(),
            self.group_path(),
            self.artifact_id
        )
    }

    /// Storage directory of this version; the root directory when unversioned
    pub fn version_dir(&self, repository: &Repository) -> String {
        match &self.version {
            Some(version) => format!("{}/{}", self.root_dir(repository), version),
            None => self.root_dir(repository),
        }
    }

    /// Request path relative to the repository prefix for `filename`
    pub fn request_path(&self, filename: &str) -> String {
        match &self.version {
            Some(version) => format!(
                "{}/{}/{}/{}",
                self.group_path(),
                self.artifact_id,
                version,
                filename
            ),
            None => format!("{}/{}/{}", self.group_path(), self.artifact_id, filename),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}
