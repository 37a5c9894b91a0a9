use anyhow::{Context, Result};
use serde::Deserialize;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the config looked up next to the executable.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Separator between the aliases of one config key (`"py|pyc"`).
pub const ALIAS_SEPARATOR: char = '|';

/// The value side of one config key, as written in the file.
///
/// Either a bare URL string or an object that may also pre-seed the cache.
/// A `null` value (JSON/YAML only) is read as `None` by [`SourceMap`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Url(String),
    Detailed {
        url: Option<String>,
        #[serde(default)]
        cache: Vec<String>,
    },
}

impl SourceSpec {
    pub fn url(&self) -> Option<&str> {
        match self {
            SourceSpec::Url(url) => Some(url),
            SourceSpec::Detailed { url, .. } => url.as_deref(),
        }
    }

    pub fn cache(&self) -> &[String] {
        match self {
            SourceSpec::Url(_) => &[],
            SourceSpec::Detailed { cache, .. } => cache,
        }
    }
}

/// The config file as read from disk, alias groups not yet expanded.
///
/// Keys keep the order they have in the file. When two groups define the same
/// alias, the group written last wins.
pub type SourceMap = IndexMap<String, Option<SourceSpec>>;

/// One runtime config entry: where to fetch a snippet from and what was
/// already fetched during this run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigEntry {
    pub url: Option<String>,
    pub cache: Vec<String>,
}

impl ConfigEntry {
    /// Creates an entry pointing at `url` with an empty cache.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            cache: Vec::new(),
        }
    }

    /// Pre-seeds the cache. A non-empty cache is served without any request.
    pub fn with_cache(mut self, cache: Vec<String>) -> Self {
        self.cache = cache;
        self
    }
}

/// Flat target key -> entry mapping used during a run.
///
/// This is the single owner of the snippet cache. The fetcher gets it by
/// `&mut` and fills the cache of an entry the first time its key is fetched.
/// Nothing is written back to disk.
#[derive(Debug, Clone, Default)]
pub struct SnippetConfig {
    entries: HashMap<String, ConfigEntry>,
}

impl SnippetConfig {
    /// Constructs an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands every alias group of `sources` into independent entries.
    ///
    /// `"py|pyc": url` becomes two entries with the same URL, each with its
    /// own cache. Aliases are trimmed and lowercased to line up with the keys
    /// produced by the classifier; empty aliases are dropped. Groups are
    /// applied in file order, so a later group overrides an earlier one.
    pub fn from_sources(sources: &SourceMap) -> Self {
        let mut config = Self::new();

        for (group, spec) in sources {
            let url = spec.as_ref().and_then(|s| s.url()).map(str::to_string);
            let cache = spec.as_ref().map(|s| s.cache().to_vec()).unwrap_or_default();

            for alias in split_aliases(group) {
                config.insert(
                    alias,
                    ConfigEntry {
                        url: url.clone(),
                        cache: cache.clone(),
                    },
                );
            }
        }

        config
    }

    /// Adds or replaces the entry of a single, already normalized key.
    ///
    /// # Arguments
    /// * `key`: The target key, as produced by the classifier (e.g. `.py`).
    /// * `entry`: The URL and cache for that key.
    pub fn insert(&mut self, key: impl Into<String>, entry: ConfigEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Returns `true` when `key` has an entry, with or without a URL.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    /// Mutable access to an entry; this is how the fetcher fills the cache.
    ///
    /// # Returns
    /// `None` when `key` is not configured.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigEntry> {
        self.entries.get_mut(key)
    }

    /// Number of keys after alias expansion.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a config key into its normalized aliases.
pub fn split_aliases(group: &str) -> impl Iterator<Item = String> + '_ {
    group
        .split(ALIAS_SEPARATOR)
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_lowercase)
}

/// Serialization formats accepted for the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from the file extension. Anything unknown is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parses the raw content of a config file.
pub fn parse_sources(content: &str, format: ConfigFormat) -> Result<SourceMap> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON config"),
        ConfigFormat::Toml => toml::from_str(content).context("Failed to parse TOML config"),
        ConfigFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML config"),
    }
}

pub trait ConfigProvider {
    fn load_sources(&self) -> Result<SourceMap>;
    fn get_config_path(&self) -> &Path;
}

/// Locates and reads the type -> URL mapping file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `config.json` from the directory holding the running executable.
    pub fn at_default_location() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let app_dir = exe
            .parent()
            .context("The running executable has no parent directory")?;
        Ok(Self::new(app_dir.join(DEFAULT_CONFIG_FILE)))
    }
}

impl ConfigProvider for ConfigManager {
    fn load_sources(&self) -> Result<SourceMap> {
        if !self.config_path.is_file() {
            anyhow::bail!(
                "The config file does not exist: {}",
                self.config_path.display()
            );
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        parse_sources(&content, ConfigFormat::from_path(&self.config_path))
            .with_context(|| format!("Invalid config file {}", self.config_path.display()))
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
