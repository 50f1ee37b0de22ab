//! Rewrite map construction.
//!
//! Maps every Markdown source file to its output page path:
//!
//! ```text
//! src/guide/intro.md            -> guide/intro.md
//! src/fr/guide/intro.md         -> fr/guide/intro.md
//! versions/v1/guide/intro.md    -> v1/guide/intro.md
//! versions/v1/fr/guide/intro.md -> fr/v1/guide/intro.md
//! ```
//!
//! Source ids are project-root-relative with `/` separators. The output path
//! comes from a [`RewritesHook`], [`DefaultRewritesHook`] unless the caller
//! supplies one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use verso_config::Config;

use crate::context::{ROOT_LOCALE, SiteContext};
use crate::route_key::{join_segments, split_route};

/// Static rewrite map: source id to output path.
pub type RewriteMap = BTreeMap<String, String>;

/// Computes the output path of a source file.
///
/// Arguments are the path below the locale directory, the archived version
/// (`""` for current docs) and the locale index (`""` for the root locale).
pub trait RewritesHook {
    /// Output path for one source file.
    fn rewrite(&self, path: &str, version: &str, locale: &str) -> String;
}

impl<F> RewritesHook for F
where
    F: Fn(&str, &str, &str) -> String,
{
    fn rewrite(&self, path: &str, version: &str, locale: &str) -> String {
        self(path, version, locale)
    }
}

/// Hook producing `<locale>/<version>/<path>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRewritesHook;

impl RewritesHook for DefaultRewritesHook {
    fn rewrite(&self, path: &str, version: &str, locale: &str) -> String {
        default_rewrite(path, version, locale)
    }
}

/// Join locale, version and path, skipping empty parts.
#[must_use]
pub fn default_rewrite(path: &str, version: &str, locale: &str) -> String {
    join_segments([locale, version, path])
}

/// Resolves single source ids against the site layout.
pub struct RewriteResolver<'a, H> {
    context: &'a SiteContext,
    source_prefix: Vec<String>,
    archive_prefix: Vec<String>,
    hook: H,
}

impl<'a, H: RewritesHook> RewriteResolver<'a, H> {
    /// Create a resolver for the context's source and archive trees.
    #[must_use]
    pub fn new(context: &'a SiteContext, hook: H) -> Self {
        let paths = context.paths();
        let prefix = |dir: &Path| -> Vec<String> {
            paths
                .relative_to_root(dir)
                .map(|rel| split_route(&rel).into_iter().map(str::to_owned).collect())
                .unwrap_or_default()
        };
        Self {
            context,
            source_prefix: prefix(&paths.source_dir),
            archive_prefix: prefix(&paths.archive_dir),
            hook,
        }
    }

    /// Output path of a project-root-relative source id.
    ///
    /// Returns `None` for files outside both trees and for archive files not
    /// below a known version.
    #[must_use]
    pub fn resolve(&self, source_id: &str) -> Option<String> {
        let segments = split_route(source_id);

        // The archive may live inside the source tree.
        if let Some(rest) = strip_prefix(&segments, &self.archive_prefix) {
            let (route, rest) = self.context.parse_route(rest);
            if route.version.is_empty() {
                return None;
            }
            let (locale, rest) = if route.locale.is_empty() {
                self.leading_locale(rest)
            } else {
                (route.locale, rest)
            };
            return Some(self.rewrite(rest, route.version, locale));
        }

        let rest = strip_prefix(&segments, &self.source_prefix)?;
        let (locale, rest) = self.leading_locale(rest);
        Some(self.rewrite(rest, "", locale))
    }

    /// Split a leading locale directory off a path.
    ///
    /// The root locale's own key is stripped too, so `en/guide.md` and
    /// `guide.md` map to the same page when `en` is the root locale.
    fn leading_locale<'s, 'p>(&'s self, segments: &'p [&'p str]) -> (&'s str, &'p [&'p str]) {
        if let Some((first, rest)) = segments.split_first()
            && !rest.is_empty()
            && let Some(index) = self.context.locales().index_of(first)
        {
            return (index, rest);
        }
        ("", segments)
    }

    fn rewrite(&self, rest: &[&str], version: &str, locale: &str) -> String {
        let locale = if locale == ROOT_LOCALE { "" } else { locale };
        self.hook.rewrite(&rest.join("/"), version, locale)
    }
}

fn strip_prefix<'s, 'p>(segments: &'s [&'p str], prefix: &[String]) -> Option<&'s [&'p str]> {
    if segments.len() < prefix.len() {
        return None;
    }
    let (head, rest) = segments.split_at(prefix.len());
    head.iter().zip(prefix).all(|(a, b)| a == b).then_some(rest)
}

/// Build the static rewrite map by walking the source and archive trees.
///
/// Only `*.md` files are mapped. Hidden entries are skipped, as are files
/// matching the site's `srcExclude` patterns (matched against the path below
/// the source directory or below the version directory).
#[must_use]
pub fn build_rewrite_map<H: RewritesHook>(
    context: &SiteContext,
    config: &Config,
    hook: H,
) -> RewriteMap {
    let excludes: Vec<Pattern> = config
        .src_exclude()
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Invalid srcExclude pattern, ignoring");
                None
            }
        })
        .collect();

    let resolver = RewriteResolver::new(context, hook);
    let paths = context.paths();

    let mut files = Vec::new();
    collect_markdown(&paths.source_dir, "", &excludes, &mut files);
    for version in context.versions() {
        collect_markdown(&paths.archive_dir.join(version), "", &excludes, &mut files);
    }

    let mut map = RewriteMap::new();
    for file in files {
        let Some(source_id) = paths.relative_to_root(&file) else {
            continue;
        };
        match resolver.resolve(&source_id) {
            Some(output) => {
                map.insert(source_id, output);
            }
            None => tracing::debug!(file = %source_id, "No rewrite for file"),
        }
    }

    tracing::debug!(entries = map.len(), "Rewrite map built");
    map
}

/// Recursively collect Markdown files below `dir`.
fn collect_markdown(dir: &Path, rel_prefix: &str, excludes: &[Pattern], files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let rel = if rel_prefix.is_empty() {
            name
        } else {
            format!("{rel_prefix}/{name}")
        };

        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            collect_markdown(&path, &rel, excludes, files);
        } else if path.extension().is_some_and(|e| e == "md") {
            if excludes.iter().any(|pattern| pattern.matches(&rel)) {
                continue;
            }
            files.push(path);
        }
    }
}
