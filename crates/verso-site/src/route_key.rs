//! Composite route key parsing.
//!
//! Route keys combine an optional locale segment, an optional version
//! segment, and a subpath: `[<locale>/][<version>/]<subpath>`. They appear
//! both as user-supplied keys (path-keyed navigation and sidebar maps) and as
//! archive file paths (`<version>/<locale>/guide/intro.md`).
//!
//! # Parse Order
//!
//! The first segment is checked against the known versions before the known
//! locales. A token that is both a version label and a locale code is
//! therefore always read as a version, and no locale is consumed:
//!
//! - `v2/guide` -> version `v2`, rest `guide`
//! - `fr/v2/guide` -> locale `fr`, version `v2`, rest `guide`
//! - `fr/guide` -> locale `fr`, rest `guide`
//! - `guide` -> nothing consumed

/// Keys that denote the unscoped entry of a path-keyed map.
const UNSCOPED_KEYS: [&str; 2] = ["root", "/"];

/// Locale and version consumed from the front of a route.
///
/// Empty strings mean the segment was not present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteKey<'a> {
    /// Leading locale segment.
    pub locale: &'a str,
    /// Version segment.
    pub version: &'a str,
}

/// Parse the leading locale and version segments of a route.
///
/// Returns the parsed key and the untouched tail of `segments`. The input is
/// never modified.
pub fn parse_route_key<'s, 'a, L, V>(
    segments: &'s [&'a str],
    locales: &[L],
    versions: &[V],
) -> (RouteKey<'a>, &'s [&'a str])
where
    L: AsRef<str>,
    V: AsRef<str>,
{
    let is_locale = |segment: &str| locales.iter().any(|l| l.as_ref() == segment);
    let is_version = |segment: &str| versions.iter().any(|v| v.as_ref() == segment);

    let mut key = RouteKey::default();
    let Some((&first, rest)) = segments.split_first() else {
        return (key, segments);
    };

    if is_version(first) {
        key.version = first;
        return (key, rest);
    }
    if !is_locale(first) {
        return (key, segments);
    }

    key.locale = first;
    match rest.split_first() {
        Some((&second, tail)) if is_version(second) => {
            key.version = second;
            (key, tail)
        }
        _ => (key, rest),
    }
}

/// Split a route or file path into its non-empty segments.
///
/// Backslashes are treated as separators.
#[must_use]
pub fn split_route(route: &str) -> Vec<&str> {
    route
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Whether a user-supplied map key denotes the unscoped entry.
#[must_use]
pub fn is_unscoped_key(key: &str) -> bool {
    UNSCOPED_KEYS.contains(&key) || key.trim_matches('/').is_empty()
}

/// Join segments with `/`, skipping empty ones.
#[must_use]
pub fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
