//! `verso resolve` command implementation.

use std::io::{self, Write};

use clap::Args;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

impl ResolveArgs {
    /// Print the host configuration as JSON on stdout.
    pub(crate) fn execute(self, site: &SiteArgs) -> Result<(), CliError> {
        let resolved = site.resolve()?;
        let host = resolved.to_host_config()?;

        let json = if self.compact {
            serde_json::to_string(&host)?
        } else {
            serde_json::to_string_pretty(&host)?
        };
        writeln!(io::stdout().lock(), "{json}")?;

        Output::new().status(
            "Resolved",
            &format!(
                "{} locale entries, {} versions",
                resolved.locales.len(),
                resolved.context.versions().len()
            ),
        );
        Ok(())
    }
}
