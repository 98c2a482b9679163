//! Dupe Minder - find and deal with duplicate tracks in a music library.
//!
//! Scans a directory tree for MP3 and M4A files, groups copies of the same
//! track by artist, album and fuzzy-matched title, and keeps only the
//! highest-bitrate copy of each. The rest are either flagged with a marker
//! in their tags or moved into a separate duplicate tree.

pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod library;
pub mod matcher;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod resolver;
pub mod run_log;
pub mod scanner;
pub mod sentinel;
#[cfg(test)]
pub mod test_utils;
pub mod verify;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Usage errors print and exit here, before any scanning
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("dupe_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
