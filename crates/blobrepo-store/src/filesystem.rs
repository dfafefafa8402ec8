//! Local filesystem blob store

use crate::{path, BlobStore, Result, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Marker embedded in temporary file names; such files are never listed.
const TEMP_MARKER: &str = ".tmp.";

/// Blob store rooted at a local directory.
///
/// Writes go to a uniquely named sibling file which is synced and then
/// renamed over the target, so concurrent readers see either the old or the
/// new content, never a torn write. Concurrent writers to the same path race
/// and the last rename wins.
#[derive(Clone, Debug)]
pub struct FilesystemBlobStore {
    root: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a new filesystem store, creating the root directory if needed
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// The root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, logical: &str) -> Result<PathBuf> {
        path::validate(logical)?;
        Ok(self.root.join(logical))
    }

    fn not_found_or_io(logical: &str, err: std::io::Error) -> StoreError {
        if err.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(logical.to_string())
        } else {
            StoreError::Io(err)
        }
    }

    fn logical_path(&self, full: &Path) -> Option<String> {
        let relative = full.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, logical: &str, data: Bytes) -> Result<()> {
        let target = self.full_path(logical)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StoreError::InvalidPath(logical.to_string()))?;
        let temp_path = target.with_file_name(format!("{}{}{}", file_name, TEMP_MARKER, Uuid::new_v4()));

        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(e));
        }

        debug!(path = %logical, "Stored blob");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, logical: &str) -> Result<Bytes> {
        let path = self.full_path(logical)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| Self::not_found_or_io(logical, e))?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound(logical.to_string()));
        }
        let data = fs::read(&path)
            .await
            .map_err(|e| Self::not_found_or_io(logical, e))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, logical: &str) -> Result<bool> {
        let path = self.full_path(logical)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = path::list_prefix(prefix);
        let start = if prefix.is_empty() {
            self.root.clone()
        } else {
            self.full_path(prefix.trim_end_matches('/'))?
        };

        let mut found = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => continue,
                Err(e) => return Err(StoreError::Io(e)),
            };
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let entry_path = entry.path();
                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if file_type.is_file()
                    && !entry.file_name().to_string_lossy().contains(TEMP_MARKER)
                {
                    if let Some(logical) = self.logical_path(&entry_path) {
                        found.push(logical);
                    }
                }
            }
        }

        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, FilesystemBlobStore) {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path().join("public")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let (_dir, store) = store().await;
        let data = Bytes::from_static(b"jar bytes");

        store.put("releases/com/example/lib/1.0/lib-1.0.jar", data.clone()).await.unwrap();

        assert!(store.exists("releases/com/example/lib/1.0/lib-1.0.jar").await.unwrap());
        assert_eq!(store.get("releases/com/example/lib/1.0/lib-1.0.jar").await.unwrap(), data);
        assert!(store.root().join("releases/com/example/lib/1.0/lib-1.0.jar").is_file());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.get("com/example/nothing.jar").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.exists("com/example/nothing.jar").await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_blob() {
        let (_dir, store) = store().await;
        store.put("com/example/lib/1.0/lib.jar", Bytes::new()).await.unwrap();

        assert!(!store.exists("com/example/lib").await.unwrap());
        assert!(store.get("com/example/lib").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let (_dir, store) = store().await;
        store.put("a/b.txt", Bytes::from_static(b"one")).await.unwrap();
        store.put("a/b.txt", Bytes::from_static(b"two")).await.unwrap();

        assert_eq!(store.get("a/b.txt").await.unwrap(), Bytes::from_static(b"two"));
        let names: Vec<_> = std::fs::read_dir(store.root().join("a"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_list() {
        let (_dir, store) = store().await;
        store.put("com/example/lib/maven-metadata.xml", Bytes::new()).await.unwrap();
        store.put("com/example/lib/1.0/lib-1.0.jar", Bytes::new()).await.unwrap();
        store.put("org/other/x/1/x-1.jar", Bytes::new()).await.unwrap();

        let listed = store.list("com/example/lib/").await.unwrap();
        assert_eq!(
            listed,
            vec![
                "com/example/lib/1.0/lib-1.0.jar".to_string(),
                "com/example/lib/maven-metadata.xml".to_string(),
            ]
        );
        assert_eq!(store.list("").await.unwrap().len(), 3);
        assert!(store.list("does/not/exist").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (_dir, store) = store().await;
        let err = store.put("../outside.txt", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        let err = store.get("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }
}
