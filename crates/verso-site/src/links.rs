//! Link and base path rewriting for versioned cells.

use crate::context::Cell;
use crate::route_key::split_route;

/// Whether a link points outside the site.
///
/// External links carry a URI scheme (`https:`, `mailto:`), are
/// protocol-relative (`//cdn`), or are in-page anchors (`#top`).
#[must_use]
pub fn is_external(link: &str) -> bool {
    if link.starts_with("//") || link.starts_with('#') {
        return true;
    }
    let Some((scheme, _)) = link.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Insert the cell's version into an internal link.
///
/// - `/guide/intro` with `v1` -> `/v1/guide/intro`
/// - `/fr/guide` in locale `fr` with `v1` -> `/fr/v1/guide`
/// - `guide` with `v1` -> `/v1/guide`
///
/// External links and cells without a version are returned unchanged.
#[must_use]
pub fn prefix_link(link: &str, cell: &Cell<'_>) -> String {
    let Some(version) = cell.archived_version() else {
        return link.to_owned();
    };
    if is_external(link) {
        return link.to_owned();
    }

    let trimmed = link.trim_start_matches('/');
    if let Some(locale) = cell.locale_segment() {
        if trimmed == locale {
            return format!("/{locale}/{version}/");
        }
        if let Some(rest) = trimmed.strip_prefix(locale).and_then(|r| r.strip_prefix('/')) {
            return format!("/{locale}/{version}/{rest}");
        }
    }
    format!("/{version}/{trimmed}")
}

/// Resolve a sidebar group base for the cell.
///
/// The result is `/<locale>/<version>/<base>/` with separators normalized
/// and a trailing slash. The locale is only inserted when the base starts
/// with it. Cells without a version return the base unchanged.
///
/// - `/api` with `v1` -> `/v1/api/`
/// - `fr/api/` in locale `fr` with `v1` -> `/fr/v1/api/`
#[must_use]
pub fn resolve_base(base: &str, cell: &Cell<'_>) -> String {
    let Some(version) = cell.archived_version() else {
        return base.to_owned();
    };
    if is_external(base) {
        return base.to_owned();
    }

    let mut segments = split_route(base);
    let mut resolved = String::from("/");
    if let Some(locale) = cell.locale_segment()
        && segments.first() == Some(&locale)
    {
        segments.remove(0);
        resolved.push_str(locale);
        resolved.push('/');
    }
    resolved.push_str(version);
    resolved.push('/');
    for segment in segments {
        resolved.push_str(segment);
        resolved.push('/');
    }
    resolved
}
