//! Locale table construction.
//!
//! Every user locale yields one entry for the current docs and one per
//! archived version. Versioned entries are keyed by cell key (`v1`,
//! `fr/v1`), carry a blank label so the locale switcher does not list them
//! twice, and leave navigation and sidebar out of their theme settings.

use serde::Serialize;
use serde_json::{Map, Value};
use verso_config::Config;

use crate::context::{Cell, ROOT_LOCALE, SiteContext};
use crate::items::take_string;

/// Label given to versioned locale entries.
pub const HIDDEN_LABEL: &str = " ";

/// Language of the root locale when neither the locale nor the site sets one.
const DEFAULT_ROOT_LANG: &str = "en-US";

/// Theme keys resolved per cell rather than copied.
const RESOLVED_THEME_KEYS: [&str; 2] = ["nav", "sidebar"];

/// One entry of the host `locales` table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleEntry {
    /// Output table key.
    #[serde(skip)]
    pub key: String,
    /// Locale index.
    #[serde(skip)]
    pub locale: String,
    /// Archived version, `None` for the current docs.
    #[serde(skip)]
    pub version: Option<String>,
    /// Display label in the locale switcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Switcher target.
    pub link: String,
    /// Per-locale theme settings.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub theme_config: Map<String, Value>,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocaleEntry {
    /// The cell this entry belongs to.
    #[must_use]
    pub fn cell(&self) -> Cell<'_> {
        Cell {
            locale: &self.locale,
            version: self.version.as_deref(),
        }
    }

    /// Derive the entry of an archived version.
    fn versioned(&self, version: &str) -> Self {
        let mut entry = self.clone();
        entry.version = Some(version.to_owned());
        entry.key = entry.cell().key();
        entry.label = Some(HIDDEN_LABEL.to_owned());
        for key in RESOLVED_THEME_KEYS {
            entry.theme_config.remove(key);
        }
        entry
    }
}

/// Ordered locale table: locale config order, each base entry followed by
/// its versions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocaleTable {
    entries: Vec<LocaleEntry>,
}

impl LocaleTable {
    /// Entries in output order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleEntry> {
        self.entries.iter()
    }

    /// Mutable entries in output order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LocaleEntry> {
        self.entries.iter_mut()
    }

    /// Entry by output key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LocaleEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host-shaped `locales` object.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be serialized.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut map = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            map.insert(entry.key.clone(), serde_json::to_value(entry)?);
        }
        Ok(Value::Object(map))
    }
}

/// Build the locale table for every cell.
#[must_use]
pub fn build_locale_table(context: &SiteContext, config: &Config) -> LocaleTable {
    let mut entries = Vec::with_capacity(context.cells().len());

    for locale in context.locales().iter() {
        let mut record = match config.locales().and_then(|l| l.get(&locale.key)) {
            Some(Value::Object(record)) => record.clone(),
            Some(other) => {
                tracing::warn!(locale = %locale.key, value = %other, "Locale entry must be a table, ignoring its settings");
                Map::new()
            }
            None => Map::new(),
        };

        let is_root = locale.index == ROOT_LOCALE;
        let label = take_string(&mut record, "label");
        let mut lang = take_string(&mut record, "lang");
        if is_root && lang.is_none() {
            lang = Some(config.lang().unwrap_or(DEFAULT_ROOT_LANG).to_owned());
        }
        let user_link = take_string(&mut record, "link");
        let link = if is_root {
            "/".to_owned()
        } else {
            user_link.unwrap_or_else(|| {
                let segment = lang.as_deref().map_or(locale.key.as_str(), primary_subtag);
                format!("/{}/", segment.to_lowercase())
            })
        };
        let theme_config = match record.remove("themeConfig") {
            Some(Value::Object(theme)) => theme,
            _ => Map::new(),
        };

        let base = LocaleEntry {
            key: locale.index.clone(),
            locale: locale.index.clone(),
            version: None,
            label,
            lang,
            link,
            theme_config,
            extra: record,
        };

        let versioned: Vec<LocaleEntry> = context
            .versions()
            .iter()
            .map(|version| base.versioned(version))
            .collect();
        entries.push(base);
        entries.extend(versioned);
    }

    LocaleTable { entries }
}

/// Leading subtag of a language tag: `zh-Hans-CN` -> `zh`, `pt_BR` -> `pt`.
#[must_use]
pub fn primary_subtag(lang: &str) -> &str {
    lang.split(['-', '_']).next().unwrap_or(lang)
}
