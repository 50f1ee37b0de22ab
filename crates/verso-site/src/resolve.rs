//! Resolution entry point.

use serde_json::{Map, Value};
use verso_config::Config;

use crate::context::{ROOT_LOCALE, SiteContext, SitePaths};
use crate::error::ConfigurationError;
use crate::locales::{LocaleTable, build_locale_table};
use crate::nav::{NavTable, build_nav_table};
use crate::rewrites::{DefaultRewritesHook, RewriteMap, RewritesHook, build_rewrite_map};
use crate::sidebar::{SidebarTable, build_sidebar_table};

/// Everything derived from one configuration.
#[derive(Clone, Debug)]
pub struct ResolvedSite {
    /// Paths, versions and locales the tables were built from.
    pub context: SiteContext,
    /// Navigation per cell key.
    pub nav: NavTable,
    /// Sidebar per cell key.
    pub sidebar: SidebarTable,
    /// Expanded locale table.
    pub locales: LocaleTable,
    /// Rewrite map, `None` when rewrites are disabled.
    pub rewrites: Option<RewriteMap>,
    site: Map<String, Value>,
}

/// Resolve a configuration with the default rewrite hook.
///
/// # Errors
///
/// Returns `ConfigurationError::MissingSourceDir` if the source directory
/// does not exist, `ConfigurationError::Io` if the archive directory cannot
/// be created or listed.
pub fn resolve(config: &Config) -> Result<ResolvedSite, ConfigurationError> {
    resolve_with_hook(config, DefaultRewritesHook)
}

/// Resolve a configuration with a custom rewrite hook.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_with_hook<H: RewritesHook>(
    config: &Config,
    hook: H,
) -> Result<ResolvedSite, ConfigurationError> {
    let paths = SitePaths::resolve(config)?;
    let context = SiteContext::initialize(paths, config)?;

    let nav = build_nav_table(&context, config);
    let sidebar = build_sidebar_table(&context, config);
    let locales = build_locale_table(&context, config);
    let rewrites = config
        .versioning
        .rewrites
        .then(|| build_rewrite_map(&context, config, hook));

    tracing::info!(
        cells = locales.len(),
        rewrites = rewrites.as_ref().map_or(0, RewriteMap::len),
        "Site configuration resolved"
    );

    Ok(ResolvedSite {
        context,
        nav,
        sidebar,
        locales,
        rewrites,
        site: config.site.clone(),
    })
}

impl ResolvedSite {
    /// Host generator configuration.
    ///
    /// The site fields are passed through with:
    /// - `locales` replaced by the expanded table, each entry's
    ///   `themeConfig` holding its cell's resolved `nav` and `sidebar`
    /// - top-level `themeConfig.nav` / `sidebar` taken from the root cell
    /// - `rewrites` set to the rewrite map when enabled
    ///
    /// # Errors
    ///
    /// Returns an error if a resolved table cannot be serialized.
    pub fn to_host_config(&self) -> Result<Value, serde_json::Error> {
        let mut site = self.site.clone();

        let mut locales = self.locales.clone();
        for entry in locales.iter_mut() {
            self.inject_theme(&entry.key, &mut entry.theme_config)?;
        }
        site.insert("locales".to_owned(), locales.to_value()?);

        let mut theme = match site.remove("themeConfig") {
            Some(Value::Object(theme)) => theme,
            _ => Map::new(),
        };
        self.inject_theme(ROOT_LOCALE, &mut theme)?;
        site.insert("themeConfig".to_owned(), Value::Object(theme));

        if let Some(rewrites) = &self.rewrites {
            site.insert("rewrites".to_owned(), serde_json::to_value(rewrites)?);
        }

        Ok(Value::Object(site))
    }

    /// Replace `nav` and `sidebar` in theme settings with a cell's resolved
    /// tables, leaving them out when empty.
    fn inject_theme(&self, key: &str, theme: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        theme.remove("nav");
        theme.remove("sidebar");
        if let Some(nav) = self.nav.get(key).filter(|nav| !nav.is_empty()) {
            theme.insert("nav".to_owned(), serde_json::to_value(nav)?);
        }
        if let Some(sidebar) = self.sidebar.get(key).filter(|sidebar| !sidebar.is_empty()) {
            theme.insert("sidebar".to_owned(), serde_json::to_value(sidebar)?);
        }
        Ok(())
    }
}
