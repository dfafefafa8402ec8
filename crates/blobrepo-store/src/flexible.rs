//! Runtime-selected blob store backend

use crate::{BlobStore, FilesystemBlobStore, MemoryBlobStore, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use tracing::info;

/// Either a filesystem or an in-memory store, chosen at startup
#[derive(Clone)]
pub enum FlexibleBlobStore {
    /// Durable storage on local disk
    Filesystem(FilesystemBlobStore),
    /// In-memory storage (data is lost on restart)
    Memory(MemoryBlobStore),
}

impl FlexibleBlobStore {
    /// Open a filesystem store rooted at `root`
    pub async fn filesystem(root: impl AsRef<Path>) -> Result<Self> {
        let store = FilesystemBlobStore::new(root).await?;
        info!(root = %store.root().display(), "Using filesystem blob store");
        Ok(Self::Filesystem(store))
    }

    /// Create an empty in-memory store
    pub fn memory() -> Self {
        Self::Memory(MemoryBlobStore::new())
    }

    /// Check if data survives a restart
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Filesystem(_))
    }
}

#[async_trait]
impl BlobStore for FlexibleBlobStore {
    async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        match self {
            Self::Filesystem(store) => store.put(path, data).await,
            Self::Memory(store) => store.put(path, data).await,
        }
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        match self {
            Self::Filesystem(store) => store.get(path).await,
            Self::Memory(store) => store.get(path).await,
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self {
            Self::Filesystem(store) => store.exists(path).await,
            Self::Memory(store) => store.exists(path).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        match self {
            Self::Filesystem(store) => store.list(prefix).await,
            Self::Memory(store) => store.list(prefix).await,
        }
    }
}
