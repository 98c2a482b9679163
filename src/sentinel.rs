//! Sentinel marker written into flagged duplicates.
//!
//! A marker is a fixed prefix followed by an ISO-8601 timestamp taken once
//! at run start, e.g. `dupedelete_2024-03-01T14:22:07.123456`. Every file
//! flagged in one run carries the identical value, which makes the batch
//! easy to select in a smart playlist.

use chrono::{Local, NaiveDateTime};

/// Default marker prefix.
pub const DEFAULT_PREFIX: &str = "dupedelete_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    prefix: String,
    value: String,
}

impl Sentinel {
    /// Marker stamped with the current local time.
    pub fn now(prefix: &str) -> Self {
        Self::at(prefix, Local::now().naive_local())
    }

    pub fn at(prefix: &str, stamp: NaiveDateTime) -> Self {
        Self {
            prefix: prefix.to_string(),
            value: format!("{prefix}{}", stamp.format("%Y-%m-%dT%H:%M:%S%.6f")),
        }
    }

    /// Full marker text written into tags.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether a tag value carries this marker's prefix.
    pub fn is_marked(&self, tag_value: &str) -> bool {
        tag_value.starts_with(&self.prefix)
    }
}

impl std::fmt::Display for Sentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
