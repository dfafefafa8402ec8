//! # Blobrepo Core
//!
//! The request pipeline of the blobrepo artifact server.
//!
//! This crate turns an arbitrary request path into a validated, authorized
//! artifact operation:
//! - **Coordinate model**: repositories and `(group, artifact, version)` coordinates
//! - **Repository resolution**: longest-prefix match of the request path
//! - **Path parsing**: remaining segments into a coordinate plus filename
//! - **Authentication**: Basic credentials against per-repository secrets
//! - **Checksum validation**: shape check of uploaded checksum sidecars
//! - **Metadata generation**: default `maven-metadata.xml` with digest sidecars
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Layer                 │
//! ├─────────────────────────────────────────┤
//! │  RepoResolver → PathParser → Context    │
//! ├─────────────────────────────────────────┤
//! │  AuthGate │ ChecksumValidator │ Metadata│
//! ├─────────────────────────────────────────┤
//! │              BlobStore                  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Everything except [`MetadataGenerator::generate_if_absent`] is pure and
//! synchronous.

pub mod auth;
pub mod checksum;
pub mod context;
pub mod coordinate;
pub mod digest;
pub mod error;
pub mod metadata;
pub mod path;
pub mod resolver;

pub use auth::{AuthGate, Operation};
pub use checksum::{validate_checksum, ChecksumKind};
pub use context::RequestContext;
pub use coordinate::{Coordinate, Repository};
pub use error::{CoreError, Result};
pub use metadata::{GeneratedMetadata, MetadataGenerator};
pub use path::{parse_path, ParsedPath, METADATA_FILE};
pub use resolver::RepoResolver;
