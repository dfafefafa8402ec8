//! # Blobrepo Store
//!
//! Blob storage layer for the blobrepo artifact server.
//!
//! This crate provides:
//! - **BlobStore trait**: Put, get, exists and list blobs by logical path
//! - **Filesystem backend**: Durable storage with atomic write-then-rename
//! - **Memory backend**: Volatile storage for tests and development
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Request Pipeline (core)         │
//! ├─────────────────────────────────────────┤
//! │             BlobStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │ FilesystemBlobStore│  MemoryBlobStore   │
//! └────────────────────┴────────────────────┘
//! ```
//!
//! Logical paths are `/`-separated and relative, e.g.
//! `releases/com/example/lib/1.0/lib-1.0.jar`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use blobrepo_store::{BlobStore, MemoryBlobStore};
//!
//! let store = MemoryBlobStore::new();
//! store.put("com/example/lib/1.0/lib-1.0.jar", data).await?;
//! let bytes = store.get("com/example/lib/1.0/lib-1.0.jar").await?;
//! ```

pub mod error;
pub mod filesystem;
pub mod flexible;
pub mod memory;
pub mod path;

pub use error::{Result, StoreError};
pub use filesystem::FilesystemBlobStore;
pub use flexible::FlexibleBlobStore;
pub use memory::MemoryBlobStore;

use async_trait::async_trait;
use bytes::Bytes;

/// Trait for blob storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob, replacing any existing one at the same path
    async fn put(&self, path: &str, data: Bytes) -> Result<()>;

    /// Retrieve a blob
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// Check if a blob exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// List every blob path below a prefix, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
