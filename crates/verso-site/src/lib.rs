//! Versioned and localized site configuration for verso.
//!
//! Expands a site configuration across every `(locale, version)` cell of a
//! documentation project:
//!
//! - navigation with version-prefixed links and a version switcher
//! - path-keyed sidebars with resolved group bases
//! - one locale entry per cell
//! - a rewrite map from source files to output pages
//!
//! ```ignore
//! let config = verso_config::Config::load(None, None)?;
//! let site = verso_site::resolve(&config)?;
//! let host = site.to_host_config()?;
//! ```
//!
//! Versions are the subdirectories of the archive directory. Locales come
//! from the configuration's `locales` table. See [`SiteContext`] for the
//! directory layout.

mod context;
mod error;
mod items;
mod links;
mod locales;
pub mod nav;
mod resolve;
mod rewrites;
mod route_key;
pub mod sidebar;

pub use context::{Cell, LocaleKey, LocaleKeyStyle, LocaleMap, ROOT_LOCALE, SiteContext, SitePaths};
pub use error::ConfigurationError;
pub use items::{
    NavComponent, NavGroup, NavItem, NavLink, SidebarGroup, SidebarItem, SidebarLabel, SidebarLink,
};
pub use links::{is_external, prefix_link, resolve_base};
pub use locales::{HIDDEN_LABEL, LocaleEntry, LocaleTable, build_locale_table, primary_subtag};
pub use nav::{NavSource, NavTable, VERSION_SWITCHER_COMPONENT, build_nav_table};
pub use resolve::{ResolvedSite, resolve, resolve_with_hook};
pub use rewrites::{
    DefaultRewritesHook, RewriteMap, RewriteResolver, RewritesHook, build_rewrite_map,
    default_rewrite,
};
pub use route_key::{RouteKey, join_segments, parse_route_key, split_route};
pub use sidebar::{Sidebar, SidebarSource, SidebarTable, build_sidebar_table};
