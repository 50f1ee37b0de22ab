//! Navigation and sidebar item model.
//!
//! User configuration describes items by shape: an object with `component`
//! is a component reference, one with `items` is a group, one with `link` is
//! a link. Shapes are resolved once, here, into closed enums. Serialization
//! writes the host generator's shape back out, so no discriminant leaks into
//! the output. Fields this crate does not interpret are kept in `extra` and
//! re-emitted unchanged.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field holding the display text. `label` is accepted as an alias.
const TEXT_KEYS: [&str; 2] = ["text", "label"];

/// Navigation bar item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NavItem {
    /// Custom component reference.
    Component(NavComponent),
    /// Dropdown with nested items.
    Group(NavGroup),
    /// Plain link.
    Link(NavLink),
}

/// Navigation link.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    /// Display text.
    pub text: String,
    /// Link target.
    pub link: String,
    /// Leave this link untouched in archived versions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_versioning: bool,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Navigation dropdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavGroup {
    /// Display text.
    pub text: String,
    /// Nested items.
    pub items: Vec<NavItem>,
    /// Leave the whole subtree untouched in archived versions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_versioning: bool,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Component reference rendered by the host theme.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavComponent {
    /// Registered component name.
    pub component: String,
    /// Props passed to the component.
    pub props: Map<String, Value>,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NavItem {
    /// Resolve an item from its configuration shape.
    ///
    /// Returns `None` for values that match no item shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let mut extra = value.as_object()?.clone();

        if let Some(component) = take_string(&mut extra, "component") {
            let props = match extra.remove("props") {
                Some(Value::Object(props)) => props,
                _ => Map::new(),
            };
            return Some(Self::Component(NavComponent {
                component,
                props,
                extra,
            }));
        }

        if let Some(Value::Array(children)) = extra.remove("items") {
            return Some(Self::Group(NavGroup {
                text: take_text(&mut extra),
                items: Self::from_values(&children),
                skip_versioning: take_skip_versioning(&mut extra),
                extra,
            }));
        }

        let link = take_string(&mut extra, "link")?;
        Some(Self::Link(NavLink {
            text: take_text(&mut extra),
            link,
            skip_versioning: take_skip_versioning(&mut extra),
            extra,
        }))
    }

    /// Resolve a list of items, dropping values that match no shape.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| {
                let item = Self::from_value(value);
                if item.is_none() {
                    tracing::warn!(item = %value, "Skipping navigation item with unknown shape");
                }
                item
            })
            .collect()
    }
}

/// Sidebar item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SidebarItem {
    /// Section with nested items, optionally linked and based.
    Group(SidebarGroup),
    /// Plain link.
    Link(SidebarLink),
    /// Text-only header.
    Label(SidebarLabel),
}

/// Sidebar section.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarGroup {
    /// Display text. A bare `{base, items}` block has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Section landing link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Path prefix for descendant links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Nested items.
    pub items: Vec<SidebarItem>,
    /// Leave the whole subtree untouched in archived versions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_versioning: bool,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sidebar link.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarLink {
    /// Display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Link target, resolved against `base` when set.
    pub link: String,
    /// Path prefix the link resolves against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Leave this link untouched in archived versions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip_versioning: bool,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sidebar header without a link.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarLabel {
    /// Display text.
    pub text: String,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SidebarItem {
    /// Resolve an item from its configuration shape.
    ///
    /// Returns `None` for values that match no item shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let mut extra = value.as_object()?.clone();

        if let Some(Value::Array(children)) = extra.remove("items") {
            return Some(Self::Group(SidebarGroup {
                text: take_optional_text(&mut extra),
                link: take_string(&mut extra, "link"),
                base: take_string(&mut extra, "base"),
                items: Self::from_values(&children),
                skip_versioning: take_skip_versioning(&mut extra),
                extra,
            }));
        }

        if let Some(link) = take_string(&mut extra, "link") {
            return Some(Self::Link(SidebarLink {
                text: take_optional_text(&mut extra),
                link,
                base: take_string(&mut extra, "base"),
                skip_versioning: take_skip_versioning(&mut extra),
                extra,
            }));
        }

        let text = take_optional_text(&mut extra)?;
        Some(Self::Label(SidebarLabel { text, extra }))
    }

    /// Resolve a list of items, dropping values that match no shape.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| {
                let item = Self::from_value(value);
                if item.is_none() {
                    tracing::warn!(item = %value, "Skipping sidebar item with unknown shape");
                }
                item
            })
            .collect()
    }

    /// Whether a configuration object looks like a single item rather than a
    /// path-keyed map.
    #[must_use]
    pub fn is_item_shape(map: &Map<String, Value>) -> bool {
        ["items", "link", "text", "label", "base"]
            .iter()
            .any(|key| map.contains_key(*key))
    }
}

/// Remove a string field. Non-string values are left in place.
pub(crate) fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            // Keep non-string values where the host can still see them.
            map.insert(key.to_owned(), other);
            None
        }
        None => None,
    }
}

fn take_optional_text(map: &mut Map<String, Value>) -> Option<String> {
    let mut text = None;
    for key in TEXT_KEYS {
        if let Some(value) = take_string(map, key) {
            text.get_or_insert(value);
        }
    }
    text
}

fn take_text(map: &mut Map<String, Value>) -> String {
    take_optional_text(map).unwrap_or_default()
}

fn take_skip_versioning(map: &mut Map<String, Value>) -> bool {
    map.remove("skipVersioning")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nav_link_from_value() {
        let item = NavItem::from_value(&json!({"text": "Guide", "link": "/guide/"})).unwrap();
        assert_eq!(
            item,
            NavItem::Link(NavLink {
                text: "Guide".to_owned(),
                link: "/guide/".to_owned(),
                skip_versioning: false,
                extra: Map::new(),
            })
        );
    }

    #[test]
    fn test_nav_label_alias() {
        let item = NavItem::from_value(&json!({"label": "Guide", "link": "/guide/"})).unwrap();
        let NavItem::Link(link) = item else {
            panic!("expected link");
        };
        assert_eq!(link.text, "Guide");
    }

    #[test]
    fn test_nav_group_from_value() {
        let value = json!({
            "text": "More",
            "skipVersioning": true,
            "items": [{"text": "A", "link": "/a"}, "bogus"],
        });
        let NavItem::Group(group) = NavItem::from_value(&value).unwrap() else {
            panic!("expected group");
        };
        assert_eq!(group.text, "More");
        assert!(group.skip_versioning);
        assert_eq!(group.items.len(), 1);
    }

    #[test]
    fn test_nav_component_from_value() {
        let value = json!({"component": "Badge", "props": {"type": "tip"}});
        let NavItem::Component(component) = NavItem::from_value(&value).unwrap() else {
            panic!("expected component");
        };
        assert_eq!(component.component, "Badge");
        assert_eq!(component.props.get("type"), Some(&json!("tip")));
    }

    #[test]
    fn test_nav_unknown_shape() {
        assert!(NavItem::from_value(&json!({"text": "Orphan"})).is_none());
        assert!(NavItem::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_nav_serializes_host_shape() {
        let value = json!({"text": "Guide", "link": "/guide/", "activeMatch": "^/guide/"});
        let item = NavItem::from_value(&value).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_nav_skip_versioning_round_trips_when_set() {
        let value = json!({"text": "Ext", "link": "/x", "skipVersioning": true});
        let item = NavItem::from_value(&value).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_sidebar_group_with_base() {
        let value = json!({"base": "/api", "items": [{"text": "Ref", "link": "/ref"}]});
        let SidebarItem::Group(group) = SidebarItem::from_value(&value).unwrap() else {
            panic!("expected group");
        };
        assert_eq!(group.text, None);
        assert_eq!(group.base.as_deref(), Some("/api"));
        assert_eq!(group.items.len(), 1);
    }

    #[test]
    fn test_sidebar_link_and_label() {
        assert!(matches!(
            SidebarItem::from_value(&json!({"text": "A", "link": "/a"})),
            Some(SidebarItem::Link(_))
        ));
        assert!(matches!(
            SidebarItem::from_value(&json!({"text": "Header"})),
            Some(SidebarItem::Label(_))
        ));
        assert!(SidebarItem::from_value(&json!({"collapsed": true})).is_none());
    }

    #[test]
    fn test_sidebar_serializes_host_shape() {
        let value = json!({
            "text": "Guide",
            "collapsed": false,
            "items": [
                {"text": "Intro", "link": "/intro"},
                {"text": "Header"},
            ],
        });
        let item = SidebarItem::from_value(&value).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_take_string_leaves_non_strings() {
        let mut map = json!({"link": "/a", "base": 3}).as_object().unwrap().clone();

        assert_eq!(take_string(&mut map, "link").as_deref(), Some("/a"));
        assert_eq!(take_string(&mut map, "base"), None);
        assert_eq!(take_string(&mut map, "missing"), None);
        assert_eq!(Value::Object(map), json!({"base": 3}));
    }

    #[test]
    fn test_is_item_shape() {
        assert!(SidebarItem::is_item_shape(
            json!({"items": []}).as_object().unwrap()
        ));
        assert!(!SidebarItem::is_item_shape(
            json!({"/guide/": []}).as_object().unwrap()
        ));
    }
}
