//! The deduplication pipeline.
//!
//! Both commands run the same core: index the tree with a threshold, resolve
//! keepers, then hand each decision to an action strategy. Only the
//! threshold and the strategy differ between flagging and moving.

use std::path::Path;

use crate::library::{Indexer, SkippedFile};
use crate::matcher::TitleMatcher;
use crate::metadata::MetadataReader;
use crate::model::{ActionResult, DuplicateDecision};
use crate::organizer::{self, DuplicateAction};
use crate::resolver;
use crate::run_log::RunLog;

/// Knobs shared by every run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Titles merge when similarity is strictly above this
    pub threshold: f64,
    /// Walk directories in file name order
    pub sort_paths: bool,
    /// Describe actions without performing them
    pub dry_run: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Files indexed successfully
    pub indexed: usize,
    pub skipped: Vec<SkippedFile>,
    pub decisions: Vec<DuplicateDecision>,
    pub results: Vec<ActionResult>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> impl Iterator<Item = &ActionResult> {
        self.results.iter().filter(|r| r.success)
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}

/// Index `root`, resolve duplicates and apply `action` to each one.
pub fn run<R: MetadataReader>(
    root: &Path,
    reader: &R,
    action: &dyn DuplicateAction,
    options: RunOptions,
    log: &RunLog,
) -> RunOutcome {
    let indexer = Indexer::new(reader, TitleMatcher::new(options.threshold), log)
        .sort_paths(options.sort_paths);
    let report = indexer.index(root);
    let decisions = resolver::resolve(&report.index);
    for skipped in &report.skipped {
        tracing::debug!(path = %skipped.path.display(), reason = %skipped.reason, "Skipped");
    }

    tracing::info!(
        indexed = report.index.track_count(),
        skipped = report.skipped.len(),
        groups = decisions.len(),
        "Resolved duplicates"
    );

    let results = decisions
        .iter()
        .flat_map(|decision| organizer::apply(decision, action, log, options.dry_run))
        .collect();

    RunOutcome {
        indexed: report.index.track_count(),
        skipped: report.skipped,
        decisions,
        results,
    }
}
