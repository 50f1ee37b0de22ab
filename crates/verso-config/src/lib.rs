//! Configuration management for verso.
//!
//! Parses `verso.toml` (or `verso.json`) site configuration files and
//! provides auto-discovery of config files in parent directories.
//!
//! The file holds the host site generator's configuration, left as an open
//! JSON tree, plus a `versioning` section parsed into [`VersioningConfig`]:
//!
//! ```toml
//! title = "My Docs"
//! lang = "en-US"
//!
//! [versioning]
//! current = "2.x"
//! sources = "src"
//! archive = "versions"
//!
//! [locales.root]
//! label = "English"
//! lang = "en-US"
//!
//! [locales.fr]
//! label = "Français"
//! lang = "fr-FR"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

mod merge;
mod versioning;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

pub use merge::{deep_merge, fill_missing};
pub use versioning::{
    VersionSwitcher, VersionSwitcherSettings, VersioningConfig, stock_defaults_value,
};

/// Configuration filenames to search for, in priority order.
const CONFIG_FILENAMES: [&str; 2] = ["verso.toml", "verso.json"];

/// Keys holding the versioning section. The second is a legacy alias.
const VERSIONING_KEYS: [&str; 2] = ["versioning", "versionsConfig"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override project root directory.
    pub root_dir: Option<PathBuf>,
    /// Override source directory name.
    pub sources: Option<String>,
    /// Override archive directory name.
    pub archive: Option<String>,
}

/// Config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`verso.toml`).
    Toml,
    /// JSON (`verso.json`).
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension. Anything but `.json` is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::Json
        } else {
            Self::Toml
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host generator configuration with the versioning section removed.
    pub site: Map<String, Value>,
    /// Versioning settings with stock defaults applied.
    pub versioning: VersioningConfig,
    /// Project root (directory of the config file).
    pub root_dir: PathBuf,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
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
    Toml(#[from] toml::de::Error),
    /// JSON parsing or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `verso.toml` / `verso.json` in the current
    /// directory and its parents, falling back to defaults rooted at the
    /// current directory.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.versioning.validate()?;
        }

        Ok(config)
    }

    /// Build configuration from an already-parsed JSON tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the tree is not a table, or any
    /// versioning error.
    pub fn from_value(value: Value, root_dir: &Path) -> Result<Self, ConfigError> {
        let Value::Object(mut site) = value else {
            return Err(ConfigError::Validation(
                "configuration root must be a table".to_owned(),
            ));
        };

        let mut raw_versioning = None;
        for key in VERSIONING_KEYS {
            if let Some(section) = site.remove(key) {
                raw_versioning.get_or_insert(section);
            }
        }
        let versioning = VersioningConfig::from_value(raw_versioning.as_ref())?;

        Ok(Self {
            site,
            versioning,
            root_dir: root_dir.to_path_buf(),
            config_path: None,
        })
    }

    /// Parse configuration text in the given format.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any error from [`Config::from_value`].
    pub fn parse(content: &str, format: ConfigFormat, root_dir: &Path) -> Result<Self, ConfigError> {
        let value: Value = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::from_value(value, root_dir)
    }

    /// User locale table (`locales`), if configured as a table.
    #[must_use]
    pub fn locales(&self) -> Option<&Map<String, Value>> {
        self.site.get("locales").and_then(Value::as_object)
    }

    /// Global theme settings (`themeConfig`), if configured as a table.
    #[must_use]
    pub fn theme_config(&self) -> Option<&Map<String, Value>> {
        self.site.get("themeConfig").and_then(Value::as_object)
    }

    /// Site-level language tag (`lang`).
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.site.get("lang").and_then(Value::as_str)
    }

    /// Glob patterns of source files excluded from the site (`srcExclude`).
    #[must_use]
    pub fn src_exclude(&self) -> Vec<String> {
        self.site
            .get("srcExclude")
            .and_then(Value::as_array)
            .map(|patterns| {
                patterns
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root_dir) = &settings.root_dir {
            self.root_dir.clone_from(root_dir);
        }
        if let Some(sources) = &settings.sources {
            self.versioning.sources.clone_from(sources);
        }
        if let Some(archive) = &settings.archive {
            self.versioning.archive.clone_from(archive);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for filename in CONFIG_FILENAMES {
                let candidate = current.join(filename);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config rooted at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config rooted at the given directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            site: Map::new(),
            versioning: VersioningConfig::default(),
            root_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut config = Self::parse(&content, ConfigFormat::from_path(path), config_dir)?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
