use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::model::AudioFormat;

/// A directory entry the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkError {
    pub path: PathBuf,
    pub message: String,
}

/// Audio files found under a root, plus the entries that could not be read.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<(PathBuf, AudioFormat)>,
    pub errors: Vec<WalkError>,
}

/// Scans the given root directory recursively for audio files.
///
/// Supported extensions: mp3, m4a (case-insensitive).
/// With `sorted` set, entries in each directory are visited in file name
/// order so repeated runs see the same encounter order on any filesystem.
/// Symlinked files are included; symlinked directories are not descended.
/// Unreadable entries are collected in [`ScanResult::errors`].
pub fn scan(root: &Path, sorted: bool) -> ScanResult {
    let mut walker = WalkDir::new(root).follow_links(false);
    if sorted {
        walker = walker.sort_by_file_name();
    }

    let mut result = ScanResult::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry");
                result.errors.push(WalkError {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        // Follows symlinks, unlike the entry's own file type
        if !entry.path().is_file() {
            continue;
        }
        if let Some(format) = AudioFormat::from_path(entry.path()) {
            result.files.push((entry.into_path(), format));
        }
    }
    result
}
