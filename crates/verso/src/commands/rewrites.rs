//! `verso rewrites` command implementation.

use std::io::{self, Write};

use verso_site::RewriteMap;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Print the rewrite map on stdout as `source -> page` lines.
pub(crate) fn execute(site: &SiteArgs) -> Result<(), CliError> {
    let resolved = site.resolve()?;
    let output = Output::new();

    let Some(rewrites) = &resolved.rewrites else {
        output.warning("Rewrites are disabled (versioning.rewrites = false)");
        return Ok(());
    };

    write!(io::stdout().lock(), "{}", format_rewrites(rewrites))?;
    output.status("Mapped", &format!("{} files", rewrites.len()));
    Ok(())
}

fn format_rewrites(rewrites: &RewriteMap) -> String {
    let width = rewrites.keys().map(String::len).max().unwrap_or(0);
    rewrites
        .iter()
        .map(|(source, page)| format!("{source:<width$} -> {page}\n"))
        .collect()
}
