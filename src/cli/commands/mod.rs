//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `flag`: tag duplicates with a sentinel marker
//! - `relocate`: move duplicates into a mirrored dupe directory

mod flag;
mod relocate;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub use flag::cmd_flag;
pub use relocate::cmd_move;

use crate::config::{self, Config};

/// Find duplicate MP3/M4A tracks and flag or move the lower-bitrate copies
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "DUPE_MINDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Flag duplicates for deletion by writing a marker into their tags
    Flag {
        /// Audio directory to scan
        audio_dir: PathBuf,
        /// Dry run - show what would be flagged without writing tags
        #[arg(long)]
        dry_run: bool,
        /// Skip re-reading flagged files afterwards
        #[arg(long)]
        no_verify: bool,
        /// Run log to append to (default: flag_dupes.log)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Move duplicates into <DUPE_DIR>/<artist>/<album>/
    Move {
        /// Audio directory to scan
        audio_dir: PathBuf,
        /// Root of the duplicate storage tree
        dupe_dir: PathBuf,
        /// Dry run - show what would be moved without touching files
        #[arg(long)]
        dry_run: bool,
        /// Run log to append to (default: move_dupes.log)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Flag {
            audio_dir,
            dry_run,
            no_verify,
            log_file,
        } => cmd_flag(&config, audio_dir, *dry_run, !*no_verify, log_file.as_deref()),
        Commands::Move {
            audio_dir,
            dupe_dir,
            dry_run,
            log_file,
        } => cmd_move(&config, audio_dir, dupe_dir, *dry_run, log_file.as_deref()),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// An explicit config file must load; the default one may be absent.
fn load_config(path: Option<&Path>) -> crate::error::Result<Config> {
    match path {
        Some(path) => Ok(config::load_from(path)?),
        None => Ok(config::load()),
    }
}

/// Fail early when the audio directory is unusable.
pub(crate) fn ensure_dir(path: &Path) -> crate::error::Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(crate::error::Error::NotADirectory(path.to_path_buf()))
    }
}
