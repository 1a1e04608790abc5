//! hdrdoc: generate markdown reference pages from documented C headers.
//!
//! Every declaration in a configured header must be preceded by `// `
//! comment lines; the comment and the declaration become one section of the
//! header's page. Two modes:
//!
//! - **write** (default): `hdrdoc` regenerates every page
//! - **verify**: `hdrdoc --verify` fails if any page is missing or stale

mod assemble;
mod config;
mod error;
mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use assemble::Mode;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hdrdoc",
    about = "Generate markdown API reference pages from documented C headers"
)]
struct Cli {
    /// Check that every page is up to date instead of writing it
    #[arg(long)]
    verify: bool,

    /// Config file listing the pages to generate.
    /// Defaults to hdrdoc.toml in the working directory, if present.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log every page and header processed
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::Config::resolve(cli.config.as_deref())?;
    let mode = if cli.verify { Mode::Verify } else { Mode::Write };

    let pages = assemble::run(&config, mode).with_context(|| match mode {
        Mode::Write => "failed to generate documentation",
        Mode::Verify => "documentation check failed",
    })?;

    tracing::debug!(pages, ?mode, "done");
    Ok(())
}

/// Log to stderr at `info` (`debug` with `--verbose`); `RUST_LOG` overrides.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
