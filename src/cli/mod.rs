//! Command-line interface for dupe-minder.
//!
//! Two independent commands share one pipeline: `flag` tags duplicates with
//! a sentinel marker, `move` relocates them into a dupe directory.

mod commands;

pub use commands::{Cli, Commands, run_command};
