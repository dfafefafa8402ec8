//! Server configuration

use blobrepo_core::{CoreError, RepoResolver, Repository};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Placeholder secret replaced by a generated key on first load
pub const KEY_PLACEHOLDER: &str = "AUTH_KEY";

/// Length of generated secrets
const GENERATED_KEY_LEN: usize = 40;

const KEY_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-_.#";

/// Written when no configuration file exists yet
const DEFAULT_CONFIG: &str = include_str!("../config.default.yml");

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid environment override: {0}")]
    Env(#[from] ::config::ConfigError),

    #[error("invalid repositories: {0}")]
    Repositories(#[from] CoreError),
}

/// Server configuration, immutable once loaded
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Cache lifetime advertised for fetched artifacts (seconds)
    #[serde(alias = "expiryTime")]
    pub expiry_time: u64,
    /// Serve the landing page at `/`
    #[serde(alias = "displayInfo")]
    pub display_info: bool,
    /// Name shown on the landing page
    #[serde(alias = "repoName")]
    pub repo_name: String,
    /// Repository id shown in the Maven snippet
    #[serde(alias = "repoId")]
    pub repo_id: String,
    /// Public URL shown in the Maven and Gradle snippets
    #[serde(alias = "displayedUrl")]
    pub displayed_url: String,
    /// Peer address allow-list
    #[serde(alias = "ipWhitelist")]
    pub ip_whitelist: IpWhitelist,
    /// Repositories keyed by id
    pub repos: BTreeMap<String, RepoConfig>,
    /// Root directory of the filesystem store
    #[serde(alias = "storageDir")]
    pub storage_dir: PathBuf,
    /// Use in-memory storage instead of the filesystem
    #[serde(alias = "memoryStore")]
    pub memory_store: bool,
    /// Maximum request body size (bytes)
    #[serde(alias = "maxBodySize")]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            expiry_time: 600,
            display_info: true,
            repo_name: "Example Repo".to_string(),
            repo_id: "example-repo".to_string(),
            displayed_url: "https://repo.example.com".to_string(),
            ip_whitelist: IpWhitelist::default(),
            repos: BTreeMap::new(),
            storage_dir: PathBuf::from("public"),
            memory_store: false,
            max_body_size: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

/// One repository as written in the configuration file
#[derive(Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// URL path prefix; normalized to start and end with `/`
    #[serde(default = "default_repo_path")]
    pub path: String,
    /// Secret required to fetch
    #[serde(default, alias = "readAuth")]
    pub read_auth: Option<String>,
    /// Secret required to publish
    #[serde(default, alias = "writeAuth")]
    pub write_auth: Option<String>,
}

fn default_repo_path() -> String {
    "/".to_string()
}

impl std::fmt::Debug for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoConfig")
            .field("path", &self.path)
            .field("read_auth", &self.read_auth.as_ref().map(|_| "[REDACTED]"))
            .field("write_auth", &self.write_auth.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Peer address allow-list
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpWhitelist {
    pub enabled: bool,
    pub ips: Vec<IpAddr>,
}

impl IpWhitelist {
    /// Whether a peer may reach the server
    pub fn allows(&self, ip: IpAddr) -> bool {
        !self.enabled || self.ips.iter().any(|allowed| allowed.to_canonical() == ip.to_canonical())
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file plus `BLOBREPO_*` environment
    /// overrides.
    ///
    /// A missing file is created from the bundled default. Any `AUTH_KEY`
    /// placeholder in the file is replaced by a generated key and the file
    /// is rewritten so the key survives restarts.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if !path.exists() {
            info!(path = %path.display(), "Writing default configuration");
            std::fs::write(path, DEFAULT_CONFIG).map_err(io_err)?;
        }

        let mut text = std::fs::read_to_string(path).map_err(io_err)?;
        if text.contains('\t') {
            warn!("Configuration contains tabs, treating each as two spaces");
            text = text.replace('\t', "  ");
        }
        if text.contains(KEY_PLACEHOLDER) {
            text = replace_placeholders(&text);
            std::fs::write(path, &text).map_err(io_err)?;
            info!("Replaced '{}' placeholders with generated keys", KEY_PLACEHOLDER);
        }

        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text, applying environment overrides.
    ///
    /// Keys keep their case, so repository ids and camelCase keys survive.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mut config: Self = if value.is_null() {
            Self::default()
        } else {
            serde_yaml::from_value(value)?
        };

        EnvOverrides::from_env()?.apply(&mut config);
        config.ensure_repository();
        config.resolver()?;
        Ok(config)
    }

    /// Install the default `example` repository when none is configured
    fn ensure_repository(&mut self) {
        if !self.repos.is_empty() {
            return;
        }
        let write_key = generate_key();
        warn!(
            "No repositories configured, adding 'example' at '/' with no read auth and write key: {}",
            write_key
        );
        self.repos.insert(
            "example".to_string(),
            RepoConfig {
                path: default_repo_path(),
                read_auth: None,
                write_auth: Some(write_key),
            },
        );
    }

    /// Repositories with normalized prefixes
    pub fn repositories(&self) -> Vec<Repository> {
        self.repos
            .iter()
            .map(|(id, repo)| {
                Repository::new(
                    id.clone(),
                    &repo.path,
                    repo.read_auth.clone(),
                    repo.write_auth.clone(),
                )
            })
            .collect()
    }

    /// Build the path resolver, rejecting colliding prefixes
    pub fn resolver(&self) -> Result<RepoResolver, ConfigError> {
        Ok(RepoResolver::new(self.repositories())?)
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Scalar settings overridable from `BLOBREPO_*` variables
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvOverrides {
    host: Option<String>,
    port: Option<u16>,
    expiry_time: Option<u64>,
    display_info: Option<bool>,
    repo_name: Option<String>,
    repo_id: Option<String>,
    displayed_url: Option<String>,
    storage_dir: Option<PathBuf>,
    memory_store: Option<bool>,
    max_body_size: Option<usize>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(
            ::config::Environment::with_prefix("BLOBREPO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        Ok(::config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    fn apply(self, config: &mut ServerConfig) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    config.$field = value;
                })*
            };
        }
        overlay!(
            host,
            port,
            expiry_time,
            display_info,
            repo_name,
            repo_id,
            displayed_url,
            storage_dir,
            memory_store,
            max_body_size
        );
    }
}

/// Generate a random secret
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_KEY_LEN)
        .map(|_| KEY_CHARSET[rng.gen_range(0..KEY_CHARSET.len())] as char)
        .collect()
}

/// Replace every placeholder with its own freshly generated key
fn replace_placeholders(text: &str) -> String {
    let mut parts = text.split(KEY_PLACEHOLDER);
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        out.push_str(&generate_key());
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
port: 9090
expiry_time: 30
display_info: false
ip_whitelist:
  enabled: true
  ips:
    - 127.0.0.1
repos:
  releases:
    path: releases
    write_auth: writer
  private:
    path: /private/
    read_auth: reader
    write_auth: writer
"#;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8888);
        assert_eq!(config.expiry_time, 600);
        assert!(config.display_info);
        assert!(!config.ip_whitelist.enabled);
        assert_eq!(config.bind_addr(), "0.0.0.0:8888");
    }

    #[test]
    fn test_parse_sample() {
        let config = ServerConfig::from_yaml(SAMPLE).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.expiry_time, 30);
        assert!(!config.display_info);
        assert!(config.ip_whitelist.enabled);
        assert_eq!(config.ip_whitelist.ips, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
        // Unset fields keep their defaults
        assert_eq!(config.repo_name, "Example Repo");

        let repos = config.repositories();
        assert_eq!(repos.len(), 2);
        let releases = repos.iter().find(|r| r.id() == "releases").unwrap();
        assert_eq!(releases.prefix(), "/releases/");
        assert_eq!(releases.read_secret(), None);
        assert_eq!(releases.write_secret(), Some("writer"));
        let private = repos.iter().find(|r| r.id() == "private").unwrap();
        assert_eq!(private.read_secret(), Some("reader"));
    }

    #[test]
    fn test_camel_case_keys_keep_secrets_and_ids() {
        let yaml = "expiryTime: 30\ndisplayInfo: false\nrepoId: my-repo\nrepos:\n  MyRepo:\n    path: /r/\n    readAuth: r\n    writeAuth: w\n";
        let config = ServerConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.expiry_time, 30);
        assert!(!config.display_info);
        assert_eq!(config.repo_id, "my-repo");
        let repos = config.repositories();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id(), "MyRepo");
        assert_eq!(repos[0].read_secret(), Some("r"));
        assert_eq!(repos[0].write_secret(), Some("w"));
    }

    #[test]
    fn test_env_overrides_apply_to_scalars() {
        let mut env = std::collections::HashMap::new();
        env.insert("BLOBREPO_PORT".to_string(), "9999".to_string());
        env.insert("BLOBREPO_DISPLAY_INFO".to_string(), "false".to_string());
        let overrides = EnvOverrides::from_source(
            ::config::Environment::with_prefix("BLOBREPO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        )
        .unwrap();

        let mut config = ServerConfig::from_yaml(SAMPLE).unwrap();
        overrides.apply(&mut config);
        assert_eq!(config.port, 9999);
        assert!(!config.display_info);
        assert_eq!(config.expiry_time, 30);
    }

    #[test]
    fn test_comment_only_file_uses_defaults() {
        let config = ServerConfig::from_yaml("# nothing here\n").unwrap();
        assert_eq!(config.port, 8888);
        assert_eq!(config.repositories().len(), 1);
    }

    #[test]
    fn test_empty_config_gets_default_repository() {
        let config = ServerConfig::from_yaml("port: 8888\n").unwrap();
        let repos = config.repositories();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id(), "example");
        assert_eq!(repos[0].prefix(), "/");
        assert_eq!(repos[0].read_secret(), None);
        assert_eq!(repos[0].write_secret().map(str::len), Some(GENERATED_KEY_LEN));
    }

    #[test]
    fn test_duplicate_prefixes_rejected() {
        let yaml = "repos:\n  one:\n    path: shared\n  two:\n    path: /shared/\n";
        assert!(matches!(
            ServerConfig::from_yaml(yaml),
            Err(ConfigError::Repositories(CoreError::DuplicatePrefix { .. }))
        ));
    }

    #[test]
    fn test_load_writes_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        let config = ServerConfig::load(&path).unwrap();

        assert!(path.exists());
        assert!(!config.repos.is_empty());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains(KEY_PLACEHOLDER));
    }

    #[test]
    fn test_load_replaces_placeholders_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "repos:\n  releases:\n    path: /releases/\n    read_auth: AUTH_KEY\n    write_auth: AUTH_KEY\n",
        )
        .unwrap();

        let first = ServerConfig::load(&path).unwrap();
        let repo = &first.repos["releases"];
        let read = repo.read_auth.clone().unwrap();
        let write = repo.write_auth.clone().unwrap();
        assert_eq!(read.len(), GENERATED_KEY_LEN);
        assert_ne!(read, write);

        let second = ServerConfig::load(&path).unwrap();
        assert_eq!(second.repos["releases"].read_auth.as_deref(), Some(read.as_str()));
        assert_eq!(second.repos["releases"].write_auth.as_deref(), Some(write.as_str()));
    }

    #[test]
    fn test_generated_key_charset() {
        let key = generate_key();
        assert_eq!(key.len(), GENERATED_KEY_LEN);
        assert!(key.bytes().all(|b| KEY_CHARSET.contains(&b)));
    }

    #[test]
    fn test_whitelist() {
        let disabled = IpWhitelist::default();
        assert!(disabled.allows("10.1.2.3".parse().unwrap()));

        let enabled = IpWhitelist {
            enabled: true,
            ips: vec!["127.0.0.1".parse().unwrap()],
        };
        assert!(enabled.allows("127.0.0.1".parse().unwrap()));
        assert!(enabled.allows("::ffff:127.0.0.1".parse().unwrap()));
        assert!(!enabled.allows("10.1.2.3".parse().unwrap()));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig::from_yaml(SAMPLE).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("writer"));
        assert!(!debug.contains("reader"));
    }
}
