//! Navigation bar resolution.
//!
//! Builds one navigation list per output cell from two sources:
//!
//! - the locale's own `locales.<key>.themeConfig.nav`
//! - the global `themeConfig.nav`
//!
//! Either source may be a flat list (the unscoped entry) or a map keyed by
//! composite route keys such as `v1`, `fr` or `fr/v1`. For each cell, the
//! most specific matching entry of each source is taken, locale items first
//! and global items appended after them.
//!
//! Items are then propagated for the cell: internal links gain the version
//! prefix and component items receive `version` and `locale` props.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use verso_config::{Config, VersionSwitcherSettings};

use crate::context::{Cell, SiteContext};
use crate::items::{NavComponent, NavItem};
use crate::links::prefix_link;
use crate::route_key::{is_unscoped_key, split_route};

/// Component name of the generated version switcher.
pub const VERSION_SWITCHER_COMPONENT: &str = "VersionSwitcher";

/// Resolved navigation keyed by output cell key.
pub type NavTable = BTreeMap<String, Vec<NavItem>>;

/// Navigation entries of one source keyed by `(locale, version)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavSource {
    entries: Vec<((String, String), Vec<NavItem>)>,
}

impl NavSource {
    /// Normalize a `nav` configuration value.
    ///
    /// A list becomes the unscoped entry. A map is keyed by composite route
    /// keys; the subpath part of a key is ignored. Other values yield an
    /// empty source.
    #[must_use]
    pub fn from_value(value: Option<&Value>, context: &SiteContext) -> Self {
        let mut source = Self::default();
        match value {
            Some(Value::Array(items)) => {
                source.push(String::new(), String::new(), NavItem::from_values(items));
            }
            Some(Value::Object(map)) => {
                for (key, items) in map {
                    let Value::Array(items) = items else {
                        tracing::warn!(key = %key, "Navigation entry must be a list, skipping");
                        continue;
                    };
                    let (locale, version) = if is_unscoped_key(key) {
                        (String::new(), String::new())
                    } else {
                        let segments = split_route(key);
                        let (route, _) = context.parse_route(&segments);
                        (route.locale.to_owned(), route.version.to_owned())
                    };
                    source.push(locale, version, NavItem::from_values(items));
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                tracing::warn!(nav = %other, "Navigation must be a list or a map, ignoring");
            }
        }
        source
    }

    fn push(&mut self, locale: String, version: String, items: Vec<NavItem>) {
        if let Some((_, existing)) = self
            .entries
            .iter_mut()
            .find(|((l, v), _)| *l == locale && *v == version)
        {
            existing.extend(items);
        } else {
            self.entries.push(((locale, version), items));
        }
    }

    /// Whether the source holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most specific entry for the cell.
    ///
    /// Candidates in order: `(locale, version)`, `(locale, "")`,
    /// `("", version)`, `("", "")`.
    #[must_use]
    pub fn lookup(&self, cell: &Cell<'_>) -> &[NavItem] {
        let version = cell.archived_version().unwrap_or("");
        let candidates = [
            (cell.locale, version),
            (cell.locale, ""),
            ("", version),
            ("", ""),
        ];
        candidates
            .iter()
            .find_map(|(locale, version)| {
                self.entries
                    .iter()
                    .find(|((l, v), _)| l == locale && v == version)
            })
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }
}

/// Build the navigation table for every cell.
#[must_use]
pub fn build_nav_table(context: &SiteContext, config: &Config) -> NavTable {
    let global = NavSource::from_value(config.theme_config().and_then(|t| t.get("nav")), context);
    let switcher = config.versioning.version_switcher.settings();

    let mut table = NavTable::new();
    for locale in context.locales().iter() {
        let local = NavSource::from_value(locale_nav(config, &locale.key), context);

        for cell in context
            .cells()
            .into_iter()
            .filter(|cell| cell.locale == locale.index)
        {
            let mut items: Vec<NavItem> = local.lookup(&cell).to_vec();
            items.extend_from_slice(global.lookup(&cell));
            if let Some(settings) = &switcher {
                items.push(version_switcher_item(context, settings));
            }
            table.insert(cell.key(), populate(&items, &cell, context.current_label()));
        }
    }
    table
}

/// The locale's own `themeConfig.nav` value.
fn locale_nav<'c>(config: &'c Config, key: &str) -> Option<&'c Value> {
    config
        .locales()?
        .get(key)?
        .get("themeConfig")?
        .get("nav")
}

/// Version switcher component item.
fn version_switcher_item(context: &SiteContext, settings: &VersionSwitcherSettings) -> NavItem {
    let mut versions: Vec<&str> = Vec::with_capacity(context.versions().len() + 1);
    if settings.include_current_version {
        versions.push(context.current_label());
    }
    versions.extend(context.versions().iter().map(String::as_str));

    let mut props = Map::new();
    props.insert("text".to_owned(), json!(settings.text));
    props.insert("versions".to_owned(), json!(versions));
    props.insert("current".to_owned(), json!(context.current_label()));

    NavItem::Component(NavComponent {
        component: VERSION_SWITCHER_COMPONENT.to_owned(),
        props,
        extra: Map::new(),
    })
}

/// Propagate navigation items for a cell.
///
/// - Component items get `version` (the archived label, or `current_label`
///   for current docs) and `locale` props, regardless of `skipVersioning`.
/// - Links get the version prefix unless external.
/// - Items marked `skipVersioning` are copied with their whole subtree
///   untouched.
///
/// Returns fresh items; the input is not modified.
#[must_use]
pub fn populate(items: &[NavItem], cell: &Cell<'_>, current_label: &str) -> Vec<NavItem> {
    items
        .iter()
        .map(|item| match item {
            NavItem::Component(component) => {
                let mut component = component.clone();
                component.props.insert(
                    "version".to_owned(),
                    json!(cell.archived_version().unwrap_or(current_label)),
                );
                component
                    .props
                    .insert("locale".to_owned(), json!(cell.locale));
                NavItem::Component(component)
            }
            NavItem::Link(link) if !link.skip_versioning => {
                let mut link = link.clone();
                link.link = prefix_link(&link.link, cell);
                NavItem::Link(link)
            }
            NavItem::Group(group) if !group.skip_versioning => {
                let mut group = group.clone();
                group.items = populate(&group.items, cell, current_label);
                NavItem::Group(group)
            }
            skipped => skipped.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

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

    fn items(value: Value) -> Vec<NavItem> {
        NavItem::from_values(value.as_array().unwrap())
    }

    const ROOT_V1: Cell<'static> = Cell {
        locale: "root",
        version: Some("v1"),
    };

    #[test]
    fn test_populate_prefixes_links() {
        let input = items(json!([
            {"text": "Guide", "link": "/guide/"},
            {"text": "More", "items": [{"text": "API", "link": "/api"}]},
        ]));

        let output = populate(&input, &ROOT_V1, "latest");

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!([
                {"text": "Guide", "link": "/v1/guide/"},
                {"text": "More", "items": [{"text": "API", "link": "/v1/api"}]},
            ])
        );
    }

    #[test]
    fn test_populate_current_version_leaves_links() {
        let input = items(json!([{"text": "Guide", "link": "/guide/"}]));
        let cell = Cell {
            locale: "root",
            version: None,
        };

        let output = populate(&input, &cell, "latest");

        assert_eq!(output, input);
    }

    #[test]
    fn test_populate_skip_versioning_subtree_untouched() {
        let input = items(json!([
            {
                "text": "Community",
                "skipVersioning": true,
                "items": [
                    {"text": "Blog", "link": "/blog/"},
                    {"text": "Nested", "items": [{"text": "Forum", "link": "/forum/"}]},
                ],
            },
            {"text": "Changelog", "link": "/changelog", "skipVersioning": true},
        ]));

        for version in ["v1", "", "root"] {
            let cell = Cell {
                locale: "root",
                version: Some(version),
            };
            let output = populate(&input, &cell, "latest");
            assert_eq!(output, input, "version: {version:?}");
        }
    }

    #[test]
    fn test_populate_injects_component_props() {
        let input = items(json!([
            {"component": "Badge", "props": {"type": "tip"}, "skipVersioning": true},
        ]));

        let output = populate(&input, &ROOT_V1, "latest");

        let NavItem::Component(component) = &output[0] else {
            panic!("expected component");
        };
        assert_eq!(component.props.get("type"), Some(&json!("tip")));
        assert_eq!(component.props.get("version"), Some(&json!("v1")));
        assert_eq!(component.props.get("locale"), Some(&json!("root")));
    }

    #[test]
    fn test_populate_component_current_label() {
        let input = items(json!([{"component": "Badge"}]));
        let cell = Cell {
            locale: "fr",
            version: None,
        };

        let output = populate(&input, &cell, "3.x");

        let NavItem::Component(component) = &output[0] else {
            panic!("expected component");
        };
        assert_eq!(component.props.get("version"), Some(&json!("3.x")));
        assert_eq!(component.props.get("locale"), Some(&json!("fr")));
    }

    #[test]
    fn test_populate_does_not_mutate_input() {
        let input = items(json!([{"text": "Guide", "link": "/guide/"}]));
        let before = input.clone();

        let _ = populate(&input, &ROOT_V1, "latest");

        assert_eq!(input, before);
    }

    #[test]
    fn test_populate_external_link_unchanged() {
        let input = items(json!([{"text": "GitHub", "link": "https://github.com/x"}]));

        let output = populate(&input, &ROOT_V1, "latest");

        assert_eq!(output, input);
    }

    #[test]
    fn test_source_from_list_is_unscoped() {
        let context = test_context(&["root", "fr"], &["v1"]);
        let source = NavSource::from_value(Some(&json!([{"text": "A", "link": "/a"}])), &context);

        let cell = Cell {
            locale: "fr",
            version: Some("v1"),
        };
        assert_eq!(source.lookup(&cell).len(), 1);
    }

    #[test]
    fn test_source_lookup_prefers_specific_keys() {
        let context = test_context(&["root", "fr"], &["v1"]);
        let value = json!({
            "root": [{"text": "Any", "link": "/any"}],
            "v1": [{"text": "V1", "link": "/v1-only"}],
            "fr": [{"text": "Fr", "link": "/fr/"}],
        });
        let source = NavSource::from_value(Some(&value), &context);

        let text = |cell: Cell<'_>| match &source.lookup(&cell)[0] {
            NavItem::Link(link) => link.text.clone(),
            _ => panic!("expected link"),
        };

        assert_eq!(text(Cell { locale: "root", version: None }), "Any");
        assert_eq!(text(Cell { locale: "root", version: Some("v1") }), "V1");
        assert_eq!(text(Cell { locale: "fr", version: None }), "Fr");
        assert_eq!(text(Cell { locale: "fr", version: Some("v1") }), "Fr");
    }

    #[test]
    fn test_source_ignores_non_list_values() {
        let context = test_context(&["root"], &[]);
        let source = NavSource::from_value(Some(&json!({"root": {"text": "x"}})), &context);
        assert!(source.is_empty());
    }

    #[test]
    fn test_build_appends_global_after_locale() {
        let context = test_context(&["root", "fr"], &[]);
        let config = test_config(json!({
            "versioning": {"versionSwitcher": false},
            "themeConfig": {"nav": [{"text": "Global", "link": "/global"}]},
            "locales": {
                "root": {"label": "English"},
                "fr": {"themeConfig": {"nav": [{"text": "Local", "link": "/fr/local"}]}},
            },
        }));

        let table = build_nav_table(&context, &config);

        assert_eq!(
            serde_json::to_value(&table["fr"]).unwrap(),
            json!([
                {"text": "Local", "link": "/fr/local"},
                {"text": "Global", "link": "/global"},
            ])
        );
        assert_eq!(
            serde_json::to_value(&table["root"]).unwrap(),
            json!([{"text": "Global", "link": "/global"}])
        );
    }

    #[test]
    fn test_build_covers_every_cell() {
        let context = test_context(&["root", "fr"], &["v1", "v2"]);
        let config = test_config(json!({"versioning": {"versionSwitcher": false}}));

        let table = build_nav_table(&context, &config);

        let keys: Vec<&String> = table.keys().collect();
        assert_eq!(keys, vec!["fr", "fr/v1", "fr/v2", "root", "v1", "v2"]);
    }

    #[test]
    fn test_build_prefixes_archived_cells() {
        let context = test_context(&["root", "fr"], &["v1"]);
        let config = test_config(json!({
            "versioning": {"versionSwitcher": false},
            "locales": {
                "root": {},
                "fr": {"themeConfig": {"nav": [{"text": "Guide", "link": "/fr/guide/"}]}},
            },
        }));

        let table = build_nav_table(&context, &config);

        assert_eq!(
            serde_json::to_value(&table["fr/v1"]).unwrap(),
            json!([{"text": "Guide", "link": "/fr/v1/guide/"}])
        );
    }

    #[test]
    fn test_build_adds_version_switcher() {
        let context = test_context(&[], &["v1"]);
        let config = test_config(json!({}));

        let table = build_nav_table(&context, &config);

        assert_eq!(
            serde_json::to_value(&table["v1"]).unwrap(),
            json!([{
                "component": "VersionSwitcher",
                "props": {
                    "text": "Switch Version",
                    "versions": ["latest", "v1"],
                    "current": "latest",
                    "version": "v1",
                    "locale": "root",
                },
            }])
        );
    }

    #[test]
    fn test_build_switcher_without_current() {
        let context = test_context(&[], &["v1"]);
        let config = test_config(json!({
            "versioning": {"versionSwitcher": {"includeCurrentVersion": false}},
        }));

        let table = build_nav_table(&context, &config);

        let NavItem::Component(component) = &table["root"][0] else {
            panic!("expected component");
        };
        assert_eq!(component.props.get("versions"), Some(&json!(["v1"])));
    }
}
