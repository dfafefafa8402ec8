//! Default `maven-metadata.xml` synthesis

use crate::digest::hex_digest;
use crate::{ChecksumKind, Coordinate, RequestContext, Result, METADATA_FILE};
use blobrepo_store::BlobStore;
use bytes::Bytes;
use quick_xml::escape::escape;
use tracing::{info, warn};

/// A synthesized descriptor plus the hex digests of its exact bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMetadata {
    pub document: Bytes,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl GeneratedMetadata {
    /// Digest for a sidecar kind
    pub fn digest(&self, kind: ChecksumKind) -> &str {
        match kind {
            ChecksumKind::Md5 => &self.md5,
            ChecksumKind::Sha1 => &self.sha1,
            ChecksumKind::Sha2 => &self.sha256,
        }
    }
}

/// Generates a placeholder metadata descriptor when a client asks for one
/// that has never been published.
pub struct MetadataGenerator;

impl MetadataGenerator {
    /// Render the descriptor document.
    ///
    /// The version element is left empty for unversioned coordinates rather
    /// than holding the literal text `null`; the descriptor does not
    /// enumerate published versions.
    pub fn render(coordinate: &Coordinate) -> String {
        format!(
            "<metadata modelVersion=\"1.1.0\">\
             \n    <groupId>{}</groupId>\
             \n    <artifactId>{}</artifactId>\
             \n    <version>{}</version>\
             \n</metadata>",
            escape(coordinate.group_id.as_str()),
            escape(coordinate.artifact_id.as_str()),
            escape(coordinate.version.as_deref().unwrap_or("")),
        )
    }

    /// Render the descriptor and digest it. Deterministic for a coordinate.
    pub fn generate(coordinate: &Coordinate) -> GeneratedMetadata {
        let document = Bytes::from(Self::render(coordinate));
        GeneratedMetadata {
            md5: hex_digest(ChecksumKind::Md5, &document),
            sha1: hex_digest(ChecksumKind::Sha1, &document),
            sha256: hex_digest(ChecksumKind::Sha2, &document),
            document,
        }
    }

    /// Synthesize and persist metadata if the request is for exactly
    /// `maven-metadata.xml` and none exists under the artifact root.
    ///
    /// Returns the generated document, or `None` when the caller should
    /// serve from the store as usual. The three sidecars are written before
    /// the document, so a stored document always has its sidecars. The
    /// writes are not transactional; a failure part way leaves orphan
    /// sidecars and the next fetch regenerates identical content over them.
    pub async fn generate_if_absent<S>(store: &S, ctx: &RequestContext) -> Result<Option<Bytes>>
    where
        S: BlobStore + ?Sized,
    {
        if ctx.filename() != METADATA_FILE {
            return Ok(None);
        }

        let root = ctx.coordinate().root_dir(ctx.repository());
        let document_path = format!("{}/{}", root, METADATA_FILE);
        if store.exists(&document_path).await? {
            return Ok(None);
        }

        let generated = Self::generate(ctx.coordinate());
        for kind in ChecksumKind::ALL {
            let sidecar = format!("{}{}", document_path, kind.extension());
            if let Err(e) = store
                .put(&sidecar, Bytes::from(generated.digest(kind).to_string()))
                .await
            {
                warn!(path = %sidecar, error = %e, "Failed to write metadata checksum, document not stored");
                return Err(e.into());
            }
        }
        store.put(&document_path, generated.document.clone()).await?;

        info!(
            repo = %ctx.repository().id(),
            coordinate = %ctx.coordinate(),
            "Generated default metadata"
        );
        Ok(Some(generated.document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{md5_hex, sha1_hex, sha256_hex};
    use crate::{RepoResolver, Repository};
    use async_trait::async_trait;
    use blobrepo_store::{MemoryBlobStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn ctx(path: &str) -> RequestContext {
        let resolver = RepoResolver::new(vec![Repository::new("r", "/", None, None)]).unwrap();
        RequestContext::resolve(&resolver, path).unwrap()
    }

    #[test]
    fn test_render_format() {
        let coordinate = Coordinate::new("com.example", "lib", None);
        assert_eq!(
            MetadataGenerator::render(&coordinate),
            "<metadata modelVersion=\"1.1.0\">\n    <groupId>com.example</groupId>\n    <artifactId>lib</artifactId>\n    <version></version>\n</metadata>"
        );
    }

    #[test]
    fn test_render_escapes_markup() {
        let coordinate = Coordinate::new("com.<evil>", "a&b", None);
        let xml = MetadataGenerator::render(&coordinate);
        assert!(xml.contains("<groupId>com.&lt;evil&gt;</groupId>"));
        assert!(xml.contains("<artifactId>a&amp;b</artifactId>"));
    }

    #[test]
    fn test_generate_is_idempotent_and_digests_match() {
        let coordinate = Coordinate::new("com.example", "lib", None);
        let first = MetadataGenerator::generate(&coordinate);
        let second = MetadataGenerator::generate(&coordinate);

        assert_eq!(first, second);
        assert_eq!(first.md5, md5_hex(&first.document));
        assert_eq!(first.sha1, sha1_hex(&first.document));
        assert_eq!(first.sha256, sha256_hex(&first.document));
    }

    #[tokio::test]
    async fn test_generate_if_absent_persists_all_files() {
        let store = MemoryBlobStore::new();
        let ctx = ctx("/com/example/lib/maven-metadata.xml");

        let document = MetadataGenerator::generate_if_absent(&store, &ctx)
            .await
            .unwrap()
            .expect("metadata should be generated");

        assert_eq!(store.get("com/example/lib/maven-metadata.xml").await.unwrap(), document);
        assert_eq!(
            store.get("com/example/lib/maven-metadata.xml.md5").await.unwrap(),
            Bytes::from(md5_hex(&document))
        );
        assert_eq!(
            store.get("com/example/lib/maven-metadata.xml.sha1").await.unwrap(),
            Bytes::from(sha1_hex(&document))
        );
        assert_eq!(
            store.get("com/example/lib/maven-metadata.xml.sha2").await.unwrap(),
            Bytes::from(sha256_hex(&document))
        );
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_existing_metadata_is_not_replaced() {
        let store = MemoryBlobStore::new();
        store
            .put("com/example/lib/maven-metadata.xml", Bytes::from_static(b"<published/>"))
            .await
            .unwrap();

        let result = MetadataGenerator::generate_if_absent(&store, &ctx("/com/example/lib/maven-metadata.xml"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sidecar_requests_do_not_generate() {
        let store = MemoryBlobStore::new();
        let result = MetadataGenerator::generate_if_absent(&store, &ctx("/com/example/lib/maven-metadata.xml.sha1"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.is_empty());
    }

    /// Memory store whose `.sha1` writes fail until healed
    struct FlakyStore {
        inner: MemoryBlobStore,
        failing: AtomicBool,
    }

    #[async_trait]
    impl BlobStore for FlakyStore {
        async fn put(&self, path: &str, data: Bytes) -> blobrepo_store::Result<()> {
            if self.failing.load(Ordering::SeqCst) && path.ends_with(".sha1") {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.put(path, data).await
        }

        async fn get(&self, path: &str) -> blobrepo_store::Result<Bytes> {
            self.inner.get(path).await
        }

        async fn exists(&self, path: &str) -> blobrepo_store::Result<bool> {
            self.inner.exists(path).await
        }

        async fn list(&self, prefix: &str) -> blobrepo_store::Result<Vec<String>> {
            self.inner.list(prefix).await
        }
    }

    #[tokio::test]
    async fn test_regeneration_after_failed_sidecar_write() {
        let store = FlakyStore {
            inner: MemoryBlobStore::new(),
            failing: AtomicBool::new(true),
        };
        let ctx = ctx("/com/example/lib/maven-metadata.xml");

        assert!(MetadataGenerator::generate_if_absent(&store, &ctx).await.is_err());
        assert!(!store.exists("com/example/lib/maven-metadata.xml").await.unwrap());

        store.failing.store(false, Ordering::SeqCst);
        let document = MetadataGenerator::generate_if_absent(&store, &ctx)
            .await
            .unwrap()
            .expect("metadata should be regenerated");

        assert_eq!(store.get("com/example/lib/maven-metadata.xml").await.unwrap(), document);
        assert_eq!(
            store.get("com/example/lib/maven-metadata.xml.sha1").await.unwrap(),
            Bytes::from(sha1_hex(&document))
        );
        assert_eq!(
            store.get("com/example/lib/maven-metadata.xml.sha2").await.unwrap(),
            Bytes::from(sha256_hex(&document))
        );
        assert_eq!(store.inner.len(), 4);
    }
}
