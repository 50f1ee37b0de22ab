//! verso CLI - versioned documentation configuration.
//!
//! Provides commands for:
//! - `resolve`: Print the resolved site configuration as JSON
//! - `versions`: List archived documentation versions
//! - `rewrites`: Print the source file to page rewrite map

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ResolveArgs, SiteArgs};
use output::Output;

/// verso - versioned and localized documentation sites.
#[derive(Parser)]
#[command(name = "verso", version, about)]
struct Cli {
    #[command(flatten)]
    site: SiteArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved site configuration.
    Resolve(ResolveArgs),
    /// List archived versions.
    Versions,
    /// Print the rewrite map.
    Rewrites,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.site.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(&cli.site),
        Commands::Versions => commands::versions::execute(&cli.site),
        Commands::Rewrites => commands::rewrites::execute(&cli.site),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
