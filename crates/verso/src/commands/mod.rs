//! CLI command implementations.

pub(crate) mod resolve;
pub(crate) mod rewrites;
pub(crate) mod versions;

use std::path::PathBuf;

use clap::Args;
use verso_config::{CliSettings, Config};
use verso_site::ResolvedSite;

pub(crate) use resolve::ResolveArgs;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover verso.toml).
    #[arg(short, long, global = true, env = "VERSO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root directory (overrides the config file location).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Source directory name (overrides config).
    #[arg(long, global = true)]
    pub sources: Option<String>,

    /// Archive directory name (overrides config).
    #[arg(long, global = true)]
    pub archive: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load the configuration and resolve the site.
    pub(crate) fn resolve(&self) -> Result<ResolvedSite, CliError> {
        let cli_settings = CliSettings {
            root_dir: self.root.clone(),
            sources: self.sources.clone(),
            archive: self.archive.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(root = %config.root_dir.display(), "Configuration loaded");

        let output = Output::new();
        match &config.config_path {
            Some(path) => output.status("Config", &path.display().to_string()),
            None => output.warning("No verso.toml found, using defaults"),
        }

        Ok(verso_site::resolve(&config)?)
    }
}
