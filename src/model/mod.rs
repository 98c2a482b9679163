//! Core data models for duplicate detection.
//!
//! Defines the entities that flow through a run:
//! - [`TrackRecord`] - one audio file observed during a scan
//! - [`TitleBucket`] - records judged to be the same logical track
//! - [`DuplicateDecision`] - keeper plus duplicates for one bucket
//! - [`ActionResult`] - outcome of flagging or moving one duplicate
//!
//! Records are immutable once indexed. Tag updates and moves happen on the
//! underlying files, never on these in-memory values.

use std::fmt;
use std::path::{Path, PathBuf};

/// Audio container formats the deduplicator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// Returns `None` for anything that is not exactly `mp3` or `m4a`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Lower-case extension, as used in file names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One physical audio file observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// File location, unique per record within a run
    pub path: PathBuf,
    /// Normalized artist (lower-cased, trimmed)
    pub artist: String,
    /// Normalized album (lower-cased, trimmed)
    pub album: String,
    /// Normalized title, used only as matching input
    pub title: String,
    /// Bitrate in kbps
    pub bitrate: u32,
    pub format: AudioFormat,
}

/// Lower-case and trim a tag value for use as an index key.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A set of records considered to be the same logical track.
///
/// The key is the title text that started the bucket; it never changes
/// once the bucket exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBucket {
    key: String,
    records: Vec<TrackRecord>,
}

impl TitleBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            records: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records in scan-encounter order.
    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    pub fn push(&mut self, record: TrackRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Resolution output for one bucket holding two or more records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDecision {
    pub keeper: TrackRecord,
    /// Remaining records in scan order, keeper excluded
    pub duplicates: Vec<TrackRecord>,
}

/// Outcome of applying the configured action to one duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub record: TrackRecord,
    pub success: bool,
    /// Why the action failed, or what a dry run would have done
    pub reason: Option<String>,
}

impl ActionResult {
    pub fn succeeded(record: TrackRecord) -> Self {
        Self {
            record,
            success: true,
            reason: None,
        }
    }

    pub fn failed(record: TrackRecord, reason: impl Into<String>) -> Self {
        Self {
            record,
            success: false,
            reason: Some(reason.into()),
        }
    }

    /// A success that only describes the action (dry run).
    pub fn would(record: TrackRecord, description: impl Into<String>) -> Self {
        Self {
            record,
            success: true,
            reason: Some(description.into()),
        }
    }
}
