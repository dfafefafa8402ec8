//! Application state

use crate::config::ServerConfig;
use blobrepo_core::RepoResolver;
use blobrepo_store::FlexibleBlobStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers.
///
/// Everything except the store is read-only after startup.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Repository resolver built from the configuration
    pub resolver: RepoResolver,
    /// Blob store (filesystem or memory)
    pub store: Arc<FlexibleBlobStore>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let resolver = config.resolver()?;

        let store = if config.memory_store {
            FlexibleBlobStore::memory()
        } else {
            FlexibleBlobStore::filesystem(&config.storage_dir).await?
        };

        if store.is_persistent() {
            info!("✓ Storage mode: filesystem (persistent)");
        } else {
            warn!("⚠ Storage mode: in-memory (NOT persistent - for development only)");
        }

        for repo in resolver.repositories() {
            info!(
                repo = %repo.id(),
                prefix = %repo.prefix(),
                read_auth = repo.read_secret().is_some(),
                write_auth = repo.write_secret().is_some(),
                "Serving repository"
            );
        }

        Ok(Self::with_store(config, resolver, store))
    }

    /// Assemble state around an existing store
    pub fn with_store(config: ServerConfig, resolver: RepoResolver, store: FlexibleBlobStore) -> Self {
        Self {
            config,
            resolver,
            store: Arc::new(store),
        }
    }

    /// `Cache-Control` value for fetched artifacts
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.config.expiry_time)
    }
}
