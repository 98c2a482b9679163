//! Move command: relocate duplicates into a dupe directory.

use std::path::Path;

use crate::config::Config;
use crate::dedupe::{self, RunOptions};
use crate::metadata::{LoftyTags, MetadataReader};
use crate::organizer::{FileMover, FsMover, MoveAction};
use crate::run_log::RunLog;

use super::ensure_dir;

/// What a move run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: usize,
    pub failed: usize,
    pub dupe_dir: String,
    pub dry_run: bool,
}

impl MoveSummary {
    pub fn message(&self) -> String {
        let verb = if self.dry_run { "would be" } else { "were" };
        format!(
            "{} audio files {verb} moved to the dupe dir:\n{}",
            self.moved, self.dupe_dir
        )
    }
}

/// Move duplicates under `audio_dir` into `dupe_dir`
pub fn cmd_move(
    config: &Config,
    audio_dir: &Path,
    dupe_dir: &Path,
    dry_run: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    ensure_dir(audio_dir)?;
    let log_path = log_file.unwrap_or(config.relocate.log_file.as_path());
    let log = RunLog::open(log_path, "move_dupes")?;

    if dry_run {
        println!("\n[DRY RUN MODE - No files will be moved]\n");
    }

    let summary = move_with(&LoftyTags, &FsMover, config, audio_dir, dupe_dir, dry_run, &log);
    println!("{}", summary.message());
    if summary.failed > 0 {
        println!("{} duplicates could not be moved, see {}", summary.failed, log_path.display());
    }
    Ok(())
}

/// Run the move pipeline against any tag reader and mover.
pub(crate) fn move_with<R: MetadataReader, M: FileMover>(
    reader: &R,
    mover: &M,
    config: &Config,
    audio_dir: &Path,
    dupe_dir: &Path,
    dry_run: bool,
    log: &RunLog,
) -> MoveSummary {
    log.info(format!("Running audio dupe mover on {}", audio_dir.display()));

    let action = MoveAction::new(mover, dupe_dir);
    let options = RunOptions {
        threshold: config.relocate.threshold,
        sort_paths: config.scan.sort_paths,
        dry_run,
    };
    let outcome = dedupe::run(audio_dir, reader, &action, options, log);

    if dry_run {
        for result in outcome.succeeded() {
            if let Some(description) = &result.reason {
                println!("{}: {}", result.record.path.display(), description);
            }
        }
    }

    tracing::info!(
        indexed = outcome.indexed,
        skipped = outcome.skipped.len(),
        groups = outcome.decisions.len(),
        "Move run finished"
    );

    let summary = MoveSummary {
        moved: outcome.success_count(),
        failed: outcome.failure_count(),
        dupe_dir: dupe_dir.display().to_string(),
        dry_run,
    };
    log.info(summary.message());
    summary
}
