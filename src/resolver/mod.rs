//! Duplicate resolution.
//!
//! For every bucket with two or more records the highest-bitrate record is
//! kept. On equal bitrates the first record in scan order stays keeper,
//! since the running maximum only moves on a strictly greater bitrate.
//! Duplicates are everything else, in scan order, identified by position
//! rather than by comparing record contents.

use crate::library::LibraryIndex;
use crate::model::{DuplicateDecision, TitleBucket};

/// Decisions for every multi-record bucket in the index.
pub fn resolve(index: &LibraryIndex) -> Vec<DuplicateDecision> {
    index
        .buckets()
        .filter_map(|(_, _, bucket)| resolve_bucket(bucket))
        .collect()
}

/// Position of the keeper within `bucket`, `None` for an empty bucket.
pub fn keeper_position(bucket: &TitleBucket) -> Option<usize> {
    let mut records = bucket.records().iter().enumerate();
    let (mut best, first) = records.next()?;
    let mut highest = first.bitrate;

    for (i, record) in records {
        if record.bitrate > highest {
            highest = record.bitrate;
            best = i;
        }
    }
    Some(best)
}

/// Decision for one bucket; single-record buckets have nothing to resolve.
pub fn resolve_bucket(bucket: &TitleBucket) -> Option<DuplicateDecision> {
    if bucket.len() < 2 {
        return None;
    }
    let keep = keeper_position(bucket)?;
    let records = bucket.records();

    let duplicates = records
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != keep)
        .map(|(_, r)| r.clone())
        .collect();

    Some(DuplicateDecision {
        keeper: records[keep].clone(),
        duplicates,
    })
}
