//! `verso versions` command implementation.

use std::io::{self, Write};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// List archived version labels on stdout, one per line.
pub(crate) fn execute(site: &SiteArgs) -> Result<(), CliError> {
    let resolved = site.resolve()?;
    let context = &resolved.context;
    let output = Output::new();

    output.status("Current", context.current_label());
    if context.versions().is_empty() {
        output.warning(&format!(
            "No archived versions in {}",
            context.paths().archive_dir.display()
        ));
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    for version in context.versions() {
        writeln!(stdout, "{version}")?;
    }
    Ok(())
}
