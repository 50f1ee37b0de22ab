//! Site context shared by all resolution stages.
//!
//! [`SiteContext`] is built once per resolution and passed explicitly to every
//! stage. It holds:
//!
//! - resolved project, source and archive directories ([`SitePaths`])
//! - version labels discovered from the archive's immediate subdirectories
//! - the locale key to locale index map ([`LocaleMap`])
//!
//! Nothing in the context changes after [`SiteContext::initialize`] returns.
//! Stages only produce their own output tables.
//!
//! # Directory Layout
//!
//! ```text
//! <root>/<sources>/<locale>/**/*.md            # current docs
//! <root>/<archive>/<version>/<locale>/**/*.md  # archived docs
//! <root>/<archive>/.gitkeep                    # created with the archive dir
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use verso_config::Config;

use crate::error::ConfigurationError;
use crate::route_key::{RouteKey, parse_route_key};

/// Locale index of the primary locale.
pub const ROOT_LOCALE: &str = "root";

/// Marker file keeping an empty archive directory under version control.
const ARCHIVE_MARKER: &str = ".gitkeep";

/// Absolute directories the site is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitePaths {
    /// Project root.
    pub root_dir: PathBuf,
    /// Current documentation sources.
    pub source_dir: PathBuf,
    /// Archived documentation snapshots, one subdirectory per version.
    pub archive_dir: PathBuf,
}

impl SitePaths {
    /// Resolve directories from configuration.
    ///
    /// A missing archive directory is created together with a `.gitkeep`
    /// marker.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingSourceDir` if the source directory
    /// does not exist, `ConfigurationError::Io` if the archive directory
    /// cannot be created.
    pub fn resolve(config: &Config) -> Result<Self, ConfigurationError> {
        let root_dir = std::path::absolute(&config.root_dir)
            .map_err(|e| ConfigurationError::io(&config.root_dir, e))?;
        let source_dir = root_dir.join(&config.versioning.sources);
        let archive_dir = root_dir.join(&config.versioning.archive);

        if !source_dir.is_dir() {
            return Err(ConfigurationError::MissingSourceDir(source_dir));
        }

        if !archive_dir.exists() {
            fs::create_dir_all(&archive_dir)
                .map_err(|e| ConfigurationError::io(&archive_dir, e))?;
            let marker = archive_dir.join(ARCHIVE_MARKER);
            fs::write(&marker, "").map_err(|e| ConfigurationError::io(&marker, e))?;
            tracing::info!(path = %archive_dir.display(), "Created archive directory");
        }

        Ok(Self {
            root_dir,
            source_dir,
            archive_dir,
        })
    }

    /// Path of `path` relative to the project root, with `/` separators.
    ///
    /// Returns `None` for paths outside the root.
    #[must_use]
    pub fn relative_to_root(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root_dir).ok()?;
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

/// One user locale key and the index it resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleKey {
    /// Key as written in the user's `locales` table.
    pub key: String,
    /// Canonical index (`"root"` for the primary locale).
    pub index: String,
}

/// How the user keyed their primary locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleKeyStyle {
    /// An explicit `root` key exists.
    RootKeyed,
    /// No `root` key; the first key is the primary locale.
    BareKeyed,
}

/// Map from user locale keys to locale indices.
///
/// Exactly one key maps to [`ROOT_LOCALE`]: the explicit `root` key when
/// present, otherwise the first key. Without any user locales, the map holds
/// a single `root` placeholder so the root index always exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleMap {
    entries: Vec<LocaleKey>,
    style: LocaleKeyStyle,
}

impl LocaleMap {
    /// Build the map from user locale keys in configuration order.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        let style = if keys.contains(&ROOT_LOCALE) {
            LocaleKeyStyle::RootKeyed
        } else {
            LocaleKeyStyle::BareKeyed
        };

        let mut entries: Vec<LocaleKey> = keys
            .iter()
            .enumerate()
            .map(|(i, &key)| {
                let is_root = match style {
                    LocaleKeyStyle::RootKeyed => key == ROOT_LOCALE,
                    LocaleKeyStyle::BareKeyed => i == 0,
                };
                LocaleKey {
                    key: key.to_owned(),
                    index: (if is_root { ROOT_LOCALE } else { key }).to_owned(),
                }
            })
            .collect();

        if entries.is_empty() {
            entries.push(LocaleKey {
                key: ROOT_LOCALE.to_owned(),
                index: ROOT_LOCALE.to_owned(),
            });
        }

        Self { entries, style }
    }

    /// Build the map from the `locales` table of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match config.locales() {
            Some(locales) => Self::from_keys(locales.keys().map(String::as_str)),
            None => Self::from_keys([]),
        }
    }

    /// Detected keying style.
    #[must_use]
    pub fn style(&self) -> LocaleKeyStyle {
        self.style
    }

    /// Entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleKey> {
        self.entries.iter()
    }

    /// Resolve a user key or an index to its index.
    #[must_use]
    pub fn index_of(&self, key_or_index: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key_or_index)
            .or_else(|| self.entries.iter().find(|e| e.index == key_or_index))
            .map(|e| e.index.as_str())
    }

    /// User key behind an index.
    #[must_use]
    pub fn key_of(&self, index: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.key.as_str())
    }

    /// All tokens that identify a locale in a route: keys and indices.
    #[must_use]
    pub fn route_tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            tokens.push(entry.key.as_str());
            if entry.index != entry.key {
                tokens.push(entry.index.as_str());
            }
        }
        tokens
    }
}

/// One `(locale, version)` combination of the output table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell<'a> {
    /// Locale index.
    pub locale: &'a str,
    /// Archived version label, `None` for the current docs.
    pub version: Option<&'a str>,
}

impl<'a> Cell<'a> {
    /// Locale URL segment, `None` for the root locale.
    #[must_use]
    pub fn locale_segment(&self) -> Option<&'a str> {
        (self.locale != ROOT_LOCALE).then_some(self.locale)
    }

    /// Archived version label, treating `""` and `"root"` as current docs.
    #[must_use]
    pub fn archived_version(&self) -> Option<&'a str> {
        self.version
            .filter(|version| !version.is_empty() && *version != ROOT_LOCALE)
    }

    /// Output table key.
    ///
    /// - current docs: the locale index (`root`, `fr`)
    /// - archived docs: `<version>` for root, `<locale>/<version>` otherwise
    #[must_use]
    pub fn key(&self) -> String {
        match (self.locale_segment(), self.archived_version()) {
            (_, None) => self.locale.to_owned(),
            (None, Some(version)) => version.to_owned(),
            (Some(locale), Some(version)) => format!("{locale}/{version}"),
        }
    }

    /// URL prefix of the cell, always with leading and trailing slash.
    #[must_use]
    pub fn url_prefix(&self) -> String {
        let mut prefix = String::from("/");
        for segment in [self.locale_segment(), self.archived_version()]
            .into_iter()
            .flatten()
        {
            prefix.push_str(segment);
            prefix.push('/');
        }
        prefix
    }
}

/// Immutable state shared by every resolution stage.
#[derive(Clone, Debug)]
pub struct SiteContext {
    paths: SitePaths,
    versions: Vec<String>,
    locales: LocaleMap,
    current_label: String,
}

impl SiteContext {
    /// Create a context from already-known parts.
    #[must_use]
    pub fn new(
        paths: SitePaths,
        versions: Vec<String>,
        locales: LocaleMap,
        current_label: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            versions,
            locales,
            current_label: current_label.into(),
        }
    }

    /// Discover versions and build the locale map.
    ///
    /// Versions are the immediate subdirectories of the archive directory in
    /// directory-listing order. Hidden directories are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Io` if the archive directory cannot be
    /// listed.
    pub fn initialize(paths: SitePaths, config: &Config) -> Result<Self, ConfigurationError> {
        let locales = LocaleMap::from_config(config);
        let versions = drop_colliding_versions(discover_versions(&paths.archive_dir)?, &locales);

        tracing::info!(
            versions = versions.len(),
            locales = locales.entries.len(),
            "Site context initialized"
        );
        tracing::debug!(style = ?locales.style(), ?versions, "Locale keys and versions");

        Ok(Self::new(
            paths,
            versions,
            locales,
            config.versioning.current.as_str(),
        ))
    }

    /// Resolved directories.
    #[must_use]
    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    /// Archived version labels in discovery order.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Locale map.
    #[must_use]
    pub fn locales(&self) -> &LocaleMap {
        &self.locales
    }

    /// Display label of the current docs.
    #[must_use]
    pub fn current_label(&self) -> &str {
        &self.current_label
    }

    /// Whether `label` is a known archived version.
    #[must_use]
    pub fn is_version(&self, label: &str) -> bool {
        self.versions.iter().any(|v| v == label)
    }

    /// Every output cell: each locale with the current docs, then each version.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = Vec::with_capacity(self.locales.entries.len() * (self.versions.len() + 1));
        for locale in self.locales.iter() {
            cells.push(Cell {
                locale: &locale.index,
                version: None,
            });
            for version in &self.versions {
                cells.push(Cell {
                    locale: &locale.index,
                    version: Some(version.as_str()),
                });
            }
        }
        cells
    }

    /// Parse the leading locale and version of a route.
    ///
    /// Locale segments may be written as user keys or indices; the returned
    /// locale is always an index (empty when absent).
    #[must_use]
    pub fn parse_route<'s, 'a>(&'a self, segments: &'s [&'a str]) -> (RouteKey<'a>, &'s [&'a str]) {
        let tokens = self.locales.route_tokens();
        let (mut key, rest) = parse_route_key(segments, &tokens, &self.versions);
        if !key.locale.is_empty() {
            key.locale = self.locales.index_of(key.locale).unwrap_or(key.locale);
        }
        (key, rest)
    }
}

/// Remove versions whose root cell key would equal another cell's key.
///
/// The root cell of version `v` is keyed `v`, so a version named like a
/// locale index (or `root`) would overwrite that locale's current cell.
fn drop_colliding_versions(versions: Vec<String>, locales: &LocaleMap) -> Vec<String> {
    versions
        .into_iter()
        .filter(|version| {
            let collides = version == ROOT_LOCALE || locales.iter().any(|l| l.index == *version);
            if collides {
                tracing::warn!(
                    version = %version,
                    "Archived version is named like a locale, skipping it"
                );
            }
            !collides
        })
        .collect()
}

/// List archive subdirectories as version labels.
fn discover_versions(archive_dir: &Path) -> Result<Vec<String>, ConfigurationError> {
    let entries = fs::read_dir(archive_dir).map_err(|e| ConfigurationError::io(archive_dir, e))?;

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigurationError::io(archive_dir, e))?;
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        versions.push(name);
    }
    Ok(versions)
}
