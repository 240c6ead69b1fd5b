//! Configuration management for the hub.
//!
//! Parses `hub.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The
//! `HUB_CONFIG` environment variable names an explicit file.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `notion.token` (default `${NOTION_TOKEN}`)
//! - `notion.database_id` (default `${NOTION_DATABASE_ID}`)
//! - `notion.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "hub.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "HUB_CONFIG";

/// Upper bound the remote API accepts for `page_size`.
const MAX_REMOTE_PAGE_SIZE: u32 = 100;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote workspace configuration.
    pub notion: NotionConfig,
    /// Public identifier format.
    pub ids: IdsConfig,
    /// Local directories (paths are relative strings from TOML).
    paths: PathsConfigRaw,
    /// Generated site configuration.
    site: SiteConfigRaw,

    /// Resolved directory layout (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Remote workspace configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Identifier of the collection to mirror.
    pub database_id: String,
    /// API base URL.
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Items requested per page (the API caps this at 100).
    pub page_size: u32,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Names of the fields the pipeline reads and writes.
    pub properties: PropertyNames,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: "${NOTION_TOKEN}".to_owned(),
            database_id: "${NOTION_DATABASE_ID}".to_owned(),
            base_url: "https://api.notion.com/v1".to_owned(),
            api_version: "2022-06-28".to_owned(),
            page_size: MAX_REMOTE_PAGE_SIZE,
            timeout_secs: 30,
            properties: PropertyNames::default(),
        }
    }
}

impl NotionConfig {
    /// Validate that credentials and limits are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.token, "notion.token")?;
        require_non_empty(&self.database_id, "notion.database_id")?;
        require_non_empty(&self.base_url, "notion.base_url")?;
        require_http_url(&self.base_url, "notion.base_url")?;
        require_non_empty(&self.api_version, "notion.api_version")?;
        if self.page_size == 0 || self.page_size > MAX_REMOTE_PAGE_SIZE {
            return Err(ConfigError::Validation(format!(
                "notion.page_size must be between 1 and {MAX_REMOTE_PAGE_SIZE}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "notion.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Names of remote fields with a fixed meaning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    /// Field holding the record title.
    pub title: String,
    /// Boolean field deciding whether the record is published.
    pub publish: String,
    /// Text field mirroring the assigned public ID.
    pub public_id: String,
    /// Listing column: category.
    pub category: String,
    /// Listing column: author.
    pub author: String,
    /// Listing column: version.
    pub version: String,
    /// Listing column: tags.
    pub tags: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "TITLE".to_owned(),
            publish: "PUBLISH".to_owned(),
            public_id: "DOC_ID".to_owned(),
            category: "CATEGORY".to_owned(),
            author: "AUTHOR".to_owned(),
            version: "VERSION".to_owned(),
            tags: "TAGS".to_owned(),
        }
    }
}

/// Public identifier format: `PREFIX-NNNN`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdsConfig {
    /// Prefix before the dash.
    pub prefix: String,
    /// Zero-padded width of the ordinal.
    pub width: usize,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            prefix: "DOC".to_owned(),
            width: 4,
        }
    }
}

/// Raw directory configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    data_dir: Option<String>,
    public_dir: Option<String>,
}

/// Resolved directory layout with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct PathsConfig {
    /// Local state root (counter, mapping, cache, metrics).
    pub data_dir: PathBuf,
    /// Generated site root.
    pub public_dir: PathBuf,
}

impl PathsConfig {
    /// Counter file (`data/doc_counter.json`).
    #[must_use]
    pub fn counter_file(&self) -> PathBuf {
        self.data_dir.join("doc_counter.json")
    }

    /// Identity mapping file (`data/doc_mapping.json`).
    #[must_use]
    pub fn mapping_file(&self) -> PathBuf {
        self.data_dir.join("doc_mapping.json")
    }

    /// Snapshot and manifest directory (`data/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    /// Metrics file (`data/metrics/metrics.json`).
    #[must_use]
    pub fn metrics_file(&self) -> PathBuf {
        self.data_dir.join("metrics").join("metrics.json")
    }

    /// Rendered document pages (`public/documents/`).
    #[must_use]
    pub fn documents_dir(&self) -> PathBuf {
        self.public_dir.join("documents")
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    page_size: Option<usize>,
    title: Option<String>,
    document_template: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Records per listing page.
    pub page_size: usize,
    /// Portal title shown on listing pages.
    pub title: String,
    /// Custom document page template.
    pub document_template: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            title: "INTRA-HUB".to_owned(),
            document_template: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`notion.token`").
        field: String,
        /// Error message (e.g., "${`NOTION_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise the
    /// `HUB_CONFIG` variable is consulted, then `hub.toml` is searched for in
    /// the current directory and its parents. Without any file the defaults
    /// apply, relative to the current directory.
    ///
    /// Environment references are expanded in every case, so missing
    /// credentials surface here as [`ConfigError::EnvVar`].
    ///
    /// # Errors
    ///
    /// Returns error if an explicit path doesn't exist, parsing fails, an
    /// environment variable is unset, or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let mut config = if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            Self::load_from_file(&path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let cwd = std::env::current_dir()?;
            let mut config = Self::default_with_base(&cwd);
            config.expand_env_vars()?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            notion: NotionConfig::default(),
            ids: IdsConfig::default(),
            paths: PathsConfigRaw::default(),
            site: SiteConfigRaw::default(),
            paths_resolved: PathsConfig {
                data_dir: base.join("data"),
                public_dir: base.join("public"),
            },
            site_resolved: SiteConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notion.validate()?;
        self.validate_ids()?;
        self.validate_site()?;
        Ok(())
    }

    fn validate_ids(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.ids.prefix, "ids.prefix")?;
        if self.ids.prefix.contains('-') {
            return Err(ConfigError::Validation(
                "ids.prefix cannot contain '-'".to_owned(),
            ));
        }
        if self.ids.width == 0 {
            return Err(ConfigError::Validation(
                "ids.width must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        if self.site_resolved.page_size == 0 {
            return Err(ConfigError::Validation(
                "site.page_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.notion.token = expand::expand_env(&self.notion.token, "notion.token")?;
        self.notion.database_id =
            expand::expand_env(&self.notion.database_id, "notion.database_id")?;
        self.notion.base_url = expand::expand_env(&self.notion.base_url, "notion.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            data_dir: resolve(self.paths.data_dir.as_deref(), "data"),
            public_dir: resolve(self.paths.public_dir.as_deref(), "public"),
        };

        let defaults = SiteConfig::default();
        self.site_resolved = SiteConfig {
            page_size: self.site.page_size.unwrap_or(defaults.page_size),
            title: self.site.title.clone().unwrap_or(defaults.title),
            document_template: self
                .site
                .document_template
                .as_deref()
                .map(|p| config_dir.join(p)),
        };
    }
}
