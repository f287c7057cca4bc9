//! Configuration loading and validation for vidtrend.
//!
//! Configuration is layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. A configuration file: the path given on the command line, otherwise
//!    `vidtrend.toml` in the platform config directory if it exists. TOML,
//!    YAML and JSON are recognised by extension.
//! 3. Environment variables prefixed with `VIDTREND_`, with `__` separating
//!    nested keys (`VIDTREND_SOURCE__API_KEY`, `VIDTREND_SERVER__LISTEN`).
//!
//! ```toml
//! database = "/var/lib/vidtrend/history.sqlite"
//!
//! [source]
//! api_key = "..."
//! max_results = 25
//!
//! [server]
//! listen = "0.0.0.0:8501"
//! default_region = "India"
//! default_category = "Music"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use vidtrend_source::{Category, Credential, DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, MAX_RESULTS, Region, SourceOptions};

pub const ENV_PREFIX: &str = "VIDTREND_";
const CONFIG_FILE: &str = "vidtrend.toml";
const DATABASE_FILE: &str = "history.sqlite";
const DEFAULT_PORT: u16 = 8501;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "vidtrend")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite history file. Its parent directory must exist.
    pub database: PathBuf,
    pub source: SourceConfig,
    pub server: ServerConfig,
}
impl Default for Config {
    fn default() -> Self {
        let database = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        Self { database, source: SourceConfig::default(), server: ServerConfig::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    /// Platform API key. Usually supplied through `VIDTREND_SOURCE__API_KEY`
    /// rather than written to a file.
    pub api_key: Option<String>,
    pub max_results: u8,
    pub timeout_secs: u64,
}
impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: 30,
        }
    }
}
impl SourceConfig {
    pub fn options(&self) -> SourceOptions {
        SourceOptions {
            base_url: self.base_url.clone(),
            max_results: self.max_results,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// The configured API key, if there is a non-blank one.
    pub fn credential(&self) -> Option<Credential> {
        self.api_key.as_deref().and_then(|key| Credential::new(key).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Region shown when the dashboard is opened without a selection.
    pub default_region: String,
    pub default_category: String,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            default_region: Region::UnitedStates.as_str().to_string(),
            default_category: Category::Trending.as_str().to_string(),
        }
    }
}
impl ServerConfig {
    pub fn region(&self) -> Result<Region> {
        self.default_region
            .parse::<Region>()
            .or_raise(|| ErrorKind::invalid("server.default_region", format!("unknown region {:?}", self.default_region)))
    }

    pub fn category(&self) -> Result<Category> {
        self.default_category.parse::<Category>().or_raise(|| {
            ErrorKind::invalid("server.default_category", format!("unknown category {:?}", self.default_category))
        })
    }
}

impl Config {
    /// Load and validate configuration from every layer.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::extract(Self::figment(path)?)
    }

    /// Build the layered provider without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path {
            Some(path) if !path.exists() => exn::bail!(ErrorKind::NotFound(path.display().to_string())),
            Some(path) => Self::merge_file(figment, path)?,
            None => match project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE)) {
                Some(path) if path.exists() => Self::merge_file(figment, &path)?,
                _ => figment,
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate configuration from an already-built provider.
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        debug!(path = %path.display(), "loading configuration file");
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default().to_lowercase();
        Ok(match extension.as_str() {
            "toml" => figment.merge(Toml::file_exact(path)),
            "yaml" | "yml" => figment.merge(Yaml::file_exact(path)),
            "json" => figment.merge(Json::file_exact(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.display().to_string())),
        })
    }

    /// Check values that parse but can't be used.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULTS).contains(&self.source.max_results) {
            exn::bail!(ErrorKind::invalid("source.max_results", format!("must be between 1 and {MAX_RESULTS}")));
        }
        if self.source.timeout_secs == 0 {
            exn::bail!(ErrorKind::invalid("source.timeout_secs", "must be at least one second"));
        }
        if !(self.source.base_url.starts_with("http://") || self.source.base_url.starts_with("https://")) {
            exn::bail!(ErrorKind::invalid("source.base_url", "must be an http(s) URL"));
        }
        if self.database.as_os_str().is_empty() {
            exn::bail!(ErrorKind::invalid("database", "must not be empty"));
        }
        self.server.region()?;
        self.server.category()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn load_file(path: &Path) -> Result<Config> {
        // Skip the environment layer so tests don't depend on the caller's shell.
        Config::extract(Config::merge_file(Figment::from(Serialized::defaults(Config::default())), path)?)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.source.max_results, 10);
        assert_eq!(config.source.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.server.listen.port(), 8501);
        assert_eq!(config.server.region().unwrap(), Region::UnitedStates);
        assert_eq!(config.server.category().unwrap(), Category::Trending);
        assert!(config.database.ends_with("history.sqlite"));
        assert!(config.source.credential().is_none());
    }

    #[rstest]
    #[case("config.toml", "database = \"/tmp/a.sqlite\"\n[source]\nmax_results = 25\napi_key = \"k\"\n")]
    #[case("config.yaml", "database: /tmp/a.sqlite\nsource:\n  max_results: 25\n  api_key: k\n")]
    #[case("config.json", r#"{"database": "/tmp/a.sqlite", "source": {"max_results": 25, "api_key": "k"}}"#)]
    fn test_file_formats(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file(&write(&dir, name, contents)).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/a.sqlite"));
        assert_eq!(config.source.max_results, 25);
        assert_eq!(config.source.credential().unwrap().expose(), "k");
        // Unset values keep their defaults.
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_later_layers_override() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default("server.default_region", "India"))
            .merge(Serialized::default("source.max_results", 5));
        let config = Config::extract(figment).unwrap();
        assert_eq!(config.server.region().unwrap(), Region::India);
        assert_eq!(config.source.options().max_results, 5);
    }

    #[rstest]
    #[case("[source]\nmax_results = 0\n", "source.max_results")]
    #[case("[source]\nmax_results = 51\n", "source.max_results")]
    #[case("[source]\ntimeout_secs = 0\n", "source.timeout_secs")]
    #[case("[source]\nbase_url = \"ftp://example.com\"\n", "source.base_url")]
    #[case("[server]\ndefault_region = \"Atlantis\"\n", "server.default_region")]
    #[case("[server]\ndefault_category = \"Cooking\"\n", "server.default_category")]
    fn test_invalid_values(#[case] contents: &str, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&write(&dir, "config.toml", contents)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field, .. } if *field == expected), "{err:?}");
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&write(&dir, "config.toml", "[source\nmax_results = ")).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::figment(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::figment(Some(&write(&dir, "config.ini", "a=b"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_blank_api_key_is_no_credential() {
        let source = SourceConfig { api_key: Some("   ".to_string()), ..SourceConfig::default() };
        assert!(source.credential().is_none());
    }
}
