//! Sidebar resolution.
//!
//! Works like [navigation](crate::nav) with two differences:
//!
//! - A cell's sidebar is itself path-keyed. Flat lists land under the cell's
//!   URL prefix (`/`, `/fr/v1/`), keyed entries under prefix + subpath.
//! - Groups may carry a `base`. In archived versions the base is resolved to
//!   `/<locale>/<version>/<base>/` and handed down to every descendant as
//!   their `base`, leaving descendant `link`s as written.
//!
//! Entries keyed to another locale are skipped. For each subpath, the most
//! specific entry of a source wins, in the same order as navigation.

use std::collections::BTreeMap;

use serde_json::Value;
use verso_config::Config;

use crate::context::{Cell, SiteContext};
use crate::items::SidebarItem;
use crate::links::{is_external, prefix_link, resolve_base};
use crate::route_key::{is_unscoped_key, split_route};

/// Sidebar of one cell: path prefix to items.
pub type Sidebar = BTreeMap<String, Vec<SidebarItem>>;

/// Resolved sidebars keyed by output cell key.
pub type SidebarTable = BTreeMap<String, Sidebar>;

#[derive(Clone, Debug, PartialEq)]
struct SidebarEntry {
    locale: String,
    version: String,
    subpath: String,
    items: Vec<SidebarItem>,
}

/// Sidebar entries of one source keyed by `(locale, version, subpath)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidebarSource {
    entries: Vec<SidebarEntry>,
}

impl SidebarSource {
    /// Normalize a `sidebar` configuration value.
    ///
    /// Accepted shapes:
    /// - a list of items (unscoped, no subpath)
    /// - a map from route keys to a list, a single item, or a
    ///   `{base, items}` block
    ///
    /// A nested path map or a scalar at a value position is reported and
    /// skipped.
    #[must_use]
    pub fn from_value(value: Option<&Value>, context: &SiteContext) -> Self {
        let mut source = Self::default();
        match value {
            Some(Value::Array(items)) => source.push(SidebarEntry {
                locale: String::new(),
                version: String::new(),
                subpath: String::new(),
                items: SidebarItem::from_values(items),
            }),
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    let items = match value {
                        Value::Array(items) => SidebarItem::from_values(items),
                        Value::Object(obj) if SidebarItem::is_item_shape(obj) => {
                            SidebarItem::from_value(value).into_iter().collect()
                        }
                        Value::Object(_) => {
                            tracing::warn!(
                                key = %key,
                                "Sidebar entry is a nested path map where items were expected, skipping"
                            );
                            continue;
                        }
                        _ => {
                            tracing::warn!(key = %key, "Sidebar entry must be a list or an item, skipping");
                            continue;
                        }
                    };
                    source.push(Self::scoped_entry(key, items, context));
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                tracing::warn!(sidebar = %other, "Sidebar must be a list or a map, ignoring");
            }
        }
        source
    }

    fn scoped_entry(key: &str, items: Vec<SidebarItem>, context: &SiteContext) -> SidebarEntry {
        if is_unscoped_key(key) {
            return SidebarEntry {
                locale: String::new(),
                version: String::new(),
                subpath: String::new(),
                items,
            };
        }
        let segments = split_route(key);
        let (route, rest) = context.parse_route(&segments);
        SidebarEntry {
            locale: route.locale.to_owned(),
            version: route.version.to_owned(),
            subpath: rest.join("/"),
            items,
        }
    }

    /// Whether the source holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append this source's entries for `cell` into `sidebar`.
    ///
    /// Per subpath only the most specific entry is taken. Candidates in
    /// order: `(locale, version)`, `(locale, "")`, `("", version)`,
    /// `("", "")`. Entries of other locales never apply.
    pub fn collect_into(&self, cell: &Cell<'_>, sidebar: &mut Sidebar) {
        let version = cell.archived_version().unwrap_or("");
        let candidates = [
            (cell.locale, version),
            (cell.locale, ""),
            ("", version),
            ("", ""),
        ];

        let mut subpaths: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !entry.locale.is_empty() && entry.locale != cell.locale {
                tracing::debug!(
                    locale = %entry.locale,
                    cell = %cell.key(),
                    "Skipping sidebar entry of another locale"
                );
                continue;
            }
            if !subpaths.contains(&entry.subpath.as_str()) {
                subpaths.push(&entry.subpath);
            }
        }

        for subpath in subpaths {
            let chosen = candidates.iter().find_map(|(locale, version)| {
                self.entries.iter().find(|e| {
                    e.subpath == subpath && e.locale == *locale && e.version == *version
                })
            });
            if let Some(entry) = chosen {
                sidebar
                    .entry(sidebar_path(cell, subpath))
                    .or_default()
                    .extend(entry.items.iter().cloned());
            }
        }
    }

    fn push(&mut self, entry: SidebarEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| {
            e.locale == entry.locale && e.version == entry.version && e.subpath == entry.subpath
        }) {
            existing.items.extend(entry.items);
        } else {
            self.entries.push(entry);
        }
    }
}

/// Sidebar key of a subpath within a cell.
fn sidebar_path(cell: &Cell<'_>, subpath: &str) -> String {
    let mut path = cell.url_prefix();
    if !subpath.is_empty() {
        path.push_str(subpath);
        path.push('/');
    }
    path
}

/// Build the sidebar table for every cell.
#[must_use]
pub fn build_sidebar_table(context: &SiteContext, config: &Config) -> SidebarTable {
    let global = SidebarSource::from_value(
        config.theme_config().and_then(|t| t.get("sidebar")),
        context,
    );

    let mut table = SidebarTable::new();
    for locale in context.locales().iter() {
        let local = SidebarSource::from_value(locale_sidebar(config, &locale.key), context);

        for cell in context
            .cells()
            .into_iter()
            .filter(|cell| cell.locale == locale.index)
        {
            let mut sidebar = Sidebar::new();
            local.collect_into(&cell, &mut sidebar);
            global.collect_into(&cell, &mut sidebar);
            let sidebar = sidebar
                .into_iter()
                .map(|(path, items)| (path, populate(&items, &cell)))
                .collect();
            table.insert(cell.key(), sidebar);
        }
    }
    table
}

/// The locale's own `themeConfig.sidebar` value.
fn locale_sidebar<'c>(config: &'c Config, key: &str) -> Option<&'c Value> {
    config
        .locales()?
        .get(key)?
        .get("themeConfig")?
        .get("sidebar")
}

/// Propagate sidebar items for a cell.
///
/// Returns fresh items; the input is not modified.
#[must_use]
pub fn populate(items: &[SidebarItem], cell: &Cell<'_>) -> Vec<SidebarItem> {
    if cell.archived_version().is_none() {
        return items.to_vec();
    }
    propagate(items, cell, None)
}

fn propagate(items: &[SidebarItem], cell: &Cell<'_>, inherited: Option<&str>) -> Vec<SidebarItem> {
    items
        .iter()
        .map(|item| match item {
            SidebarItem::Group(group) if !group.skip_versioning => {
                let mut group = group.clone();
                let base = match &group.base {
                    Some(own) => Some(resolve_base(own, cell)),
                    None => inherited.map(str::to_owned),
                };
                if base.is_none()
                    && let Some(link) = &group.link
                {
                    group.link = Some(prefix_link(link, cell));
                }
                group.items = propagate(&group.items, cell, base.as_deref());
                group.base = base;
                SidebarItem::Group(group)
            }
            SidebarItem::Link(link) if !link.skip_versioning && !is_external(&link.link) => {
                let mut link = link.clone();
                match (&link.base, inherited) {
                    (Some(own), _) => link.base = Some(resolve_base(own, cell)),
                    (None, Some(base)) => link.base = Some(base.to_owned()),
                    (None, None) => link.link = prefix_link(&link.link, cell),
                }
                SidebarItem::Link(link)
            }
            other => other.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::context::{LocaleMap, SitePaths};

    fn test_context(locales: &[&str], versions: &[&str]) -> SiteContext {
        SiteContext::new(
            SitePaths {
                root_dir: PathBuf::from("/p"),
                source_dir: PathBuf::from("/p/src"),
                archive_dir: PathBuf::from("/p/versions"),
            },
            versions.iter().map(|v| (*v).to_owned()).collect(),
            LocaleMap::from_keys(locales.iter().copied()),
            "latest",
        )
    }

    fn test_config(value: Value) -> Config {
        Config::from_value(value, Path::new("/p")).unwrap()
    }

    fn items(value: Value) -> Vec<SidebarItem> {
        SidebarItem::from_values(value.as_array().unwrap())
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    const ROOT_V1: Cell<'static> = Cell {
        locale: "root",
        version: Some("v1"),
    };

    #[test]
    fn test_populate_accumulates_group_base() {
        let input = items(json!([{"base": "/api", "items": [{"link": "/ref"}]}]));

        let output = populate(&input, &ROOT_V1);

        assert_eq!(
            to_json(&output),
            json!([{"base": "/v1/api/", "items": [{"link": "/ref", "base": "/v1/api/"}]}])
        );
    }

    #[test]
    fn test_populate_nested_groups_inherit_base() {
        let input = items(json!([{
            "text": "API",
            "base": "/api/",
            "items": [{"text": "Core", "items": [{"text": "Types", "link": "types"}]}],
        }]));

        let output = populate(&input, &ROOT_V1);

        assert_eq!(
            to_json(&output),
            json!([{
                "text": "API",
                "base": "/v1/api/",
                "items": [{
                    "text": "Core",
                    "base": "/v1/api/",
                    "items": [{"text": "Types", "link": "types", "base": "/v1/api/"}],
                }],
            }])
        );
    }

    #[test]
    fn test_populate_prefixes_links_without_base() {
        let input = items(json!([
            {"text": "Guide", "link": "/guide/", "items": [{"text": "Intro", "link": "/guide/intro"}]},
        ]));

        let output = populate(&input, &ROOT_V1);

        assert_eq!(
            to_json(&output),
            json!([
                {"text": "Guide", "link": "/v1/guide/", "items": [{"text": "Intro", "link": "/v1/guide/intro"}]},
            ])
        );
    }

    #[test]
    fn test_populate_external_link_exempt() {
        let input = items(json!([{"text": "Ext", "link": "https://example.com"}]));

        let output = populate(&input, &Cell {
            locale: "root",
            version: Some("v2"),
        });

        assert_eq!(to_json(&output), json!([{"text": "Ext", "link": "https://example.com"}]));
    }

    #[test]
    fn test_populate_external_link_in_based_group_gets_no_base() {
        let input = items(json!([{"base": "/api", "items": [{"text": "Ext", "link": "https://example.com"}]}]));

        let output = populate(&input, &ROOT_V1);

        assert_eq!(
            to_json(&output),
            json!([{"base": "/v1/api/", "items": [{"text": "Ext", "link": "https://example.com"}]}])
        );
    }

    #[test]
    fn test_populate_skip_versioning_subtree_untouched() {
        let input = items(json!([
            {
                "text": "Shared",
                "base": "/shared",
                "skipVersioning": true,
                "items": [{"text": "A", "link": "/a"}, {"text": "B", "base": "/b", "items": [{"link": "c"}]}],
            },
            {"text": "Pinned", "link": "/pinned", "skipVersioning": true},
        ]));

        for version in ["v1", "v2", "", "root"] {
            let cell = Cell {
                locale: "root",
                version: Some(version),
            };
            assert_eq!(populate(&input, &cell), input, "version: {version:?}");
        }
    }

    #[test]
    fn test_populate_current_unchanged() {
        let input = items(json!([{"base": "/api", "items": [{"link": "/ref"}]}]));
        let cell = Cell {
            locale: "root",
            version: None,
        };
        assert_eq!(populate(&input, &cell), input);
    }

    #[test]
    fn test_populate_locale_link() {
        let input = items(json!([{"text": "Guide", "link": "/fr/guide/"}]));
        let cell = Cell {
            locale: "fr",
            version: Some("v1"),
        };
        assert_eq!(
            to_json(&populate(&input, &cell)),
            json!([{"text": "Guide", "link": "/fr/v1/guide/"}])
        );
    }

    #[test]
    fn test_source_wraps_single_item() {
        let context = test_context(&["root"], &[]);
        let value = json!({"/guide/": {"text": "Guide", "items": [{"text": "A", "link": "/guide/a"}]}});
        let source = SidebarSource::from_value(Some(&value), &context);

        let mut sidebar = Sidebar::new();
        source.collect_into(&Cell { locale: "root", version: None }, &mut sidebar);

        assert_eq!(sidebar["/guide/"].len(), 1);
    }

    #[test]
    fn test_source_skips_nested_path_map() {
        let context = test_context(&["root"], &[]);
        let value = json!({"/guide/": {"/deeper/": [{"text": "A", "link": "/a"}]}});
        let source = SidebarSource::from_value(Some(&value), &context);
        assert!(source.is_empty());
    }

    #[test]
    fn test_source_skips_scalar_values() {
        let context = test_context(&["root"], &[]);
        let source = SidebarSource::from_value(Some(&json!({"/guide/": "nope"})), &context);
        assert!(source.is_empty());
    }

    #[test]
    fn test_collect_skips_other_locales() {
        let context = test_context(&["root", "fr", "de"], &[]);
        let value = json!({
            "/fr/guide/": [{"text": "Fr", "link": "/fr/guide/"}],
            "/de/guide/": [{"text": "De", "link": "/de/guide/"}],
        });
        let source = SidebarSource::from_value(Some(&value), &context);

        let mut sidebar = Sidebar::new();
        source.collect_into(&Cell { locale: "fr", version: None }, &mut sidebar);

        assert_eq!(
            to_json(&sidebar),
            json!({"/fr/guide/": [{"text": "Fr", "link": "/fr/guide/"}]})
        );
    }

    #[test]
    fn test_build_locale_root_entry_not_mixed_into_other_locales() {
        let context = test_context(&["root", "fr"], &["v1"]);
        let config = test_config(json!({
            "themeConfig": {"sidebar": {
                "/": [{"text": "English", "link": "/en-page"}],
                "/fr/": [{"text": "Francais", "link": "/fr/page"}],
            }},
            "locales": {"root": {}, "fr": {}},
        }));

        let table = build_sidebar_table(&context, &config);

        assert_eq!(
            to_json(&table["fr"]),
            json!({"/fr/": [{"text": "Francais", "link": "/fr/page"}]})
        );
        assert_eq!(
            to_json(&table["fr/v1"]),
            json!({"/fr/v1/": [{"text": "Francais", "link": "/fr/v1/page"}]})
        );
        assert_eq!(
            to_json(&table["v1"]),
            json!({"/v1/": [{"text": "English", "link": "/v1/en-page"}]})
        );
    }

    #[test]
    fn test_collect_unscoped_subpath_is_fallback_only() {
        let context = test_context(&["root", "fr"], &[]);
        let value = json!({
            "/guide/": [{"text": "Guide", "link": "/guide/"}],
            "/fr/guide/": [{"text": "Guide FR", "link": "/fr/guide/"}],
            "/api/": [{"text": "API", "link": "/api/"}],
        });
        let source = SidebarSource::from_value(Some(&value), &context);

        let mut sidebar = Sidebar::new();
        source.collect_into(&Cell { locale: "fr", version: None }, &mut sidebar);

        assert_eq!(
            to_json(&sidebar),
            json!({
                "/fr/guide/": [{"text": "Guide FR", "link": "/fr/guide/"}],
                "/fr/api/": [{"text": "API", "link": "/api/"}],
            })
        );
    }

    #[test]
    fn test_collect_prefers_exact_version() {
        let context = test_context(&["root"], &["v1", "v2"]);
        let value = json!({
            "/guide/": [{"text": "Current", "link": "/guide/"}],
            "/v1/guide/": [{"text": "Old", "link": "/guide/"}],
        });
        let source = SidebarSource::from_value(Some(&value), &context);

        let mut v1 = Sidebar::new();
        source.collect_into(&Cell { locale: "root", version: Some("v1") }, &mut v1);
        let mut v2 = Sidebar::new();
        source.collect_into(&Cell { locale: "root", version: Some("v2") }, &mut v2);

        assert_eq!(to_json(&v1), json!({"/v1/guide/": [{"text": "Old", "link": "/guide/"}]}));
        assert_eq!(to_json(&v2), json!({"/v2/guide/": [{"text": "Current", "link": "/guide/"}]}));
    }

    #[test]
    fn test_build_flat_list_per_cell() {
        let context = test_context(&["root", "fr"], &["v1"]);
        let config = test_config(json!({
            "themeConfig": {"sidebar": [{"text": "Intro", "link": "/intro"}]},
            "locales": {"root": {}, "fr": {}},
        }));

        let table = build_sidebar_table(&context, &config);

        assert_eq!(to_json(&table["root"]), json!({"/": [{"text": "Intro", "link": "/intro"}]}));
        assert_eq!(
            to_json(&table["v1"]),
            json!({"/v1/": [{"text": "Intro", "link": "/v1/intro"}]})
        );
        assert_eq!(
            to_json(&table["fr/v1"]),
            json!({"/fr/v1/": [{"text": "Intro", "link": "/v1/intro"}]})
        );
    }

    #[test]
    fn test_build_locale_entries_precede_global() {
        let context = test_context(&["root", "fr"], &[]);
        let config = test_config(json!({
            "themeConfig": {"sidebar": {"/fr/": [{"text": "Global", "link": "/fr/g"}]}},
            "locales": {
                "root": {},
                "fr": {"themeConfig": {"sidebar": [{"text": "Local", "link": "/fr/l"}]}},
            },
        }));

        let table = build_sidebar_table(&context, &config);

        assert_eq!(
            to_json(&table["fr"]),
            json!({"/fr/": [
                {"text": "Local", "link": "/fr/l"},
                {"text": "Global", "link": "/fr/g"},
            ]})
        );
        assert!(table["root"].is_empty());
    }
}
