//! Flag command: mark duplicates for deletion.

use std::path::Path;

use crate::config::Config;
use crate::dedupe::{self, RunOptions};
use crate::metadata::{LoftyTags, MetadataReader, MetadataWriter};
use crate::organizer::FlagAction;
use crate::run_log::RunLog;
use crate::sentinel::Sentinel;
use crate::verify::{self, VerifyReport};

use super::ensure_dir;

/// What a flag run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSummary {
    pub flagged: usize,
    pub failed: usize,
    pub marker: String,
    pub verify: Option<VerifyReport>,
    pub dry_run: bool,
}

impl FlagSummary {
    pub fn message(&self) -> String {
        let verb = if self.dry_run { "would be" } else { "were" };
        format!(
            "{} audio files {verb} flagged for deletion.\n{}",
            self.flagged, self.marker
        )
    }
}

/// Flag duplicates under `audio_dir`
pub fn cmd_flag(
    config: &Config,
    audio_dir: &Path,
    dry_run: bool,
    verify: bool,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    ensure_dir(audio_dir)?;
    let log_path = log_file.unwrap_or(config.flag.log_file.as_path());
    let log = RunLog::open(log_path, "flag_dupes")?;

    if dry_run {
        println!("\n[DRY RUN MODE - No tags will be written]\n");
    }

    let summary = flag_with(&LoftyTags, config, audio_dir, dry_run, verify, &log);
    println!("{}", summary.message());
    if summary.failed > 0 {
        println!("{} duplicates could not be flagged, see {}", summary.failed, log_path.display());
    }
    if let Some(report) = summary.verify.filter(|r| r.failed > 0) {
        println!("{} flagged files did not keep the marker", report.failed);
    }
    Ok(())
}

/// Run the flag pipeline against any tag backend.
pub(crate) fn flag_with<T: MetadataReader + MetadataWriter>(
    tags: &T,
    config: &Config,
    audio_dir: &Path,
    dry_run: bool,
    verify: bool,
    log: &RunLog,
) -> FlagSummary {
    log.info(format!("Running audio dupe flagger on {}", audio_dir.display()));

    let sentinel = Sentinel::now(&config.flag.sentinel_prefix);
    let action = FlagAction::new(tags, &sentinel);
    let options = RunOptions {
        threshold: config.flag.threshold,
        sort_paths: config.scan.sort_paths,
        dry_run,
    };
    let outcome = dedupe::run(audio_dir, tags, &action, options, log);

    if dry_run {
        for result in outcome.succeeded() {
            if let Some(description) = &result.reason {
                println!("{}: {}", result.record.path.display(), description);
            }
        }
    }

    let verify_report = (verify && config.flag.verify && !dry_run)
        .then(|| verify::verify(tags, &sentinel, &outcome.results, log));
    if let Some(report) = verify_report {
        tracing::info!(passed = report.passed, failed = report.failed, "Verified flags");
    }
    tracing::info!(
        indexed = outcome.indexed,
        skipped = outcome.skipped.len(),
        groups = outcome.decisions.len(),
        "Flag run finished"
    );

    let summary = FlagSummary {
        flagged: outcome.success_count(),
        failed: outcome.failure_count(),
        marker: sentinel.value().to_string(),
        verify: verify_report,
        dry_run,
    };
    log.info(summary.message());
    summary
}
