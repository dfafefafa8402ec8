//! Repository resolution by longest matching path prefix

use crate::{CoreError, Repository, Result};
use std::sync::Arc;

/// Maps request paths to configured repositories.
///
/// Repositories are kept sorted by descending prefix length, so the first
/// match is always the most specific one regardless of configuration order.
#[derive(Clone, Debug)]
pub struct RepoResolver {
    repositories: Vec<Arc<Repository>>,
}

impl RepoResolver {
    /// Build a resolver, rejecting repositories whose prefixes collide
    pub fn new(repositories: impl IntoIterator<Item = Repository>) -> Result<Self> {
        let mut repositories: Vec<Arc<Repository>> =
            repositories.into_iter().map(Arc::new).collect();

        repositories.sort_by(|a, b| {
            b.prefix()
                .len()
                .cmp(&a.prefix().len())
                .then_with(|| a.prefix().cmp(b.prefix()))
                .then_with(|| a.id().cmp(b.id()))
        });

        for pair in repositories.windows(2) {
            if pair[0].prefix() == pair[1].prefix() {
                return Err(CoreError::DuplicatePrefix {
                    prefix: pair[0].prefix().to_string(),
                    first: pair[0].id().to_string(),
                    second: pair[1].id().to_string(),
                });
            }
        }

        Ok(Self { repositories })
    }

    /// Resolve a raw request path to its repository and the path remainder
    /// following the prefix.
    pub fn resolve<'p>(&self, path: &'p str) -> Result<(Arc<Repository>, &'p str)> {
        self.repositories
            .iter()
            .find_map(|repo| {
                path.strip_prefix(repo.prefix())
                    .map(|rest| (Arc::clone(repo), rest))
            })
            .ok_or_else(|| CoreError::UnknownRepository(path.to_string()))
    }

    /// Configured repositories, most specific prefix first
    pub fn repositories(&self) -> &[Arc<Repository>] {
        &self.repositories
    }
}
