//! Post-flag verification.
//!
//! Re-reads the marker field of every successfully flagged file and checks
//! it starts with the sentinel prefix. Purely diagnostic: mismatches are
//! logged and counted, never retried or undone.

use crate::metadata::{MarkerField, MetadataReader};
use crate::model::ActionResult;
use crate::run_log::RunLog;
use crate::sentinel::Sentinel;

/// Pass/fail counts from one verification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub passed: usize,
    pub failed: usize,
}

/// Check that flagged files carry the marker. Failed results are ignored.
pub fn verify<R: MetadataReader>(
    reader: &R,
    sentinel: &Sentinel,
    results: &[ActionResult],
    log: &RunLog,
) -> VerifyReport {
    let mut report = VerifyReport::default();

    for result in results.iter().filter(|r| r.success) {
        let record = &result.record;
        let field = MarkerField::for_format(record.format);

        let problem = match reader.read_field(&record.path, field) {
            Ok(Some(value)) if sentinel.is_marked(&value) => None,
            Ok(Some(value)) => Some(format!("{field} is {value:?}")),
            Ok(None) => Some(format!("{field} is empty")),
            Err(e) => Some(e.to_string()),
        };

        match problem {
            None => report.passed += 1,
            Some(reason) => {
                log.error(format!("Could not assert flag: {} ({reason})", record.path.display()));
                report.failed += 1;
            }
        }
    }

    report
}
