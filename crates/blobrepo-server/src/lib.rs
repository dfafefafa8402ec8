//! # Blob Repository Server
//!
//! HTTP front end for a minimal Maven-layout artifact repository.
//!
//! This crate provides:
//! - **Routing**: `GET`/`PUT` over any path, plus an optional landing page
//! - **Authentication**: per-repository HTTP Basic secrets for read and write
//! - **Allow-list**: optional peer IP filtering
//! - **Configuration**: YAML file with environment overrides
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │            (Maven, Gradle, curl, etc.)              │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  blobrepo-server                    │
//! ├─────────────────────────────────────────────────────┤
//! │  IP Allow-list │ Request Id │ Logging │ Compression │
//! ├─────────────────────────────────────────────────────┤
//! │            Fetch / Publish Handlers                 │
//! ├─────────────────────────────────────────────────────┤
//! │                  blobrepo-core                      │
//! │   (Resolver, Path Parser, Auth, Checksums, Meta)    │
//! ├─────────────────────────────────────────────────────┤
//! │                  blobrepo-store                     │
//! │              (Filesystem, Memory)                   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::run_server_with_shutdown;
pub use state::AppState;
