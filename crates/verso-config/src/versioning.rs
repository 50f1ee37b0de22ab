//! Versioning settings.
//!
//! The `versioning` section of the site configuration controls where current
//! and archived documentation live and whether a version switcher is added to
//! the navigation. User values are layered over [`stock_defaults_value`] with
//! [`fill_missing`](crate::fill_missing) before deserialization, so a sparse
//! section only needs the keys it wants to change:
//!
//! ```toml
//! [versioning]
//! current = "2.x"
//! archive = "archive"
//! versionSwitcher = false
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ConfigError;
use crate::merge::fill_missing;

const DEFAULT_CURRENT: &str = "latest";
const DEFAULT_SOURCES: &str = "src";
const DEFAULT_ARCHIVE: &str = "versions";
const DEFAULT_SWITCHER_TEXT: &str = "Switch Version";

/// Resolved versioning settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersioningConfig {
    /// Display label of the current (unversioned) documentation.
    pub current: String,
    /// Source directory name, relative to the project root.
    pub sources: String,
    /// Archive directory name, relative to the project root.
    pub archive: String,
    /// Version switcher settings.
    pub version_switcher: VersionSwitcher,
    /// Whether the rewrite map is emitted.
    pub rewrites: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            current: DEFAULT_CURRENT.to_owned(),
            sources: DEFAULT_SOURCES.to_owned(),
            archive: DEFAULT_ARCHIVE.to_owned(),
            version_switcher: VersionSwitcher::Settings(VersionSwitcherSettings::default()),
            rewrites: true,
        }
    }
}

/// Version switcher toggle: `false`, `true`, or a settings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSwitcher {
    /// Plain on/off switch. `true` uses default settings.
    Enabled(bool),
    /// Explicit settings (implies enabled).
    Settings(VersionSwitcherSettings),
}

impl VersionSwitcher {
    /// Effective settings, or `None` when the switcher is disabled.
    #[must_use]
    pub fn settings(&self) -> Option<VersionSwitcherSettings> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(VersionSwitcherSettings::default()),
            Self::Settings(settings) => Some(settings.clone()),
        }
    }
}

/// Version switcher display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionSwitcherSettings {
    /// Button text.
    pub text: String,
    /// List the current version alongside archived ones.
    pub include_current_version: bool,
}

impl Default for VersionSwitcherSettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_SWITCHER_TEXT.to_owned(),
            include_current_version: true,
        }
    }
}

/// Stock defaults for the `versioning` section as a JSON tree.
///
/// This is the base layer user values are filled from.
#[must_use]
pub fn stock_defaults_value() -> Value {
    json!({
        "current": DEFAULT_CURRENT,
        "sources": DEFAULT_SOURCES,
        "archive": DEFAULT_ARCHIVE,
        "versionSwitcher": {
            "text": DEFAULT_SWITCHER_TEXT,
            "includeCurrentVersion": true,
        },
        "rewrites": true,
    })
}

impl VersioningConfig {
    /// Build settings from a raw `versioning` value.
    ///
    /// `None` and `null` yield the stock defaults. Missing keys are filled
    /// from the defaults; present keys are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is not a table or
    /// holds invalid values, `ConfigError::Json` on type mismatches.
    pub fn from_value(raw: Option<&Value>) -> Result<Self, ConfigError> {
        let mut value = match raw {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(Value::Object(map)) => Value::Object(map.clone()),
            Some(_) => {
                return Err(ConfigError::Validation(
                    "versioning must be a table".to_owned(),
                ));
            }
        };
        fill_missing(&mut value, &stock_defaults_value());

        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate directory names and labels.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.current, "versioning.current")?;
        require_non_empty(&self.sources, "versioning.sources")?;
        require_non_empty(&self.archive, "versioning.archive")?;
        if self.sources.trim_matches('/') == self.archive.trim_matches('/') {
            return Err(ConfigError::Validation(
                "versioning.sources and versioning.archive must differ".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
