//! Modwire - module connectivity resolver
//!
//! Scans repositories for module descriptors, builds the module forest, and
//! prints every top-level module with its discovered connections.
//!
//! # Usage
//!
//! ```bash
//! modwire test_data/hw_repo test_data/sw_repo
//! RUST_LOG=modwire=debug modwire --descriptor-name board.yaml repos/
//! ```

use std::path::PathBuf;

use clap::Parser;
use modwire::{
    config::{DEFAULT_DESCRIPTOR_NAMES, DEFAULT_MAX_DEPTH},
    discover::load_repositories,
    error::Result,
    BuildConfig, Forest,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Module connectivity resolver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository roots to scan for module descriptors
    #[arg(value_name = "REPO", required = true)]
    repos: Vec<PathBuf>,

    /// Descriptor file name to look for (repeatable)
    #[arg(long = "descriptor-name", value_name = "FILE")]
    descriptor_names: Vec<String>,

    /// Maximum module nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let names: Vec<String> = if args.descriptor_names.is_empty() {
        DEFAULT_DESCRIPTOR_NAMES.iter().map(|n| n.to_string()).collect()
    } else {
        args.descriptor_names
    };

    // Locate and decode descriptors
    let (loaded, load_errors) = load_repositories(&args.repos, &names);

    // Build every top-level module, skipping broken descriptors
    let mut forest = Forest::with_config(BuildConfig::default().with_max_depth(args.max_depth));
    let mut skipped = load_errors.len();
    for item in &loaded {
        if let Err(e) = forest.add_module(&item.path, &item.descriptor) {
            error!(file = %item.file.display(), "skipping descriptor: {}", e);
            skipped += 1;
        }
    }

    // One connectivity pass over the complete forest
    let connections = forest.resolve_connections();

    for &root in forest.roots() {
        print!("{}", forest.display(root));
    }

    info!(
        modules = forest.modules().len(),
        pins = forest.pins().len(),
        connections,
        diagnostics = forest.diagnostics().len(),
        skipped,
        "resolved forest"
    );

    Ok(())
}
