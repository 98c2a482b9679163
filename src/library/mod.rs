//! Library index: artist -> album -> title buckets.
//!
//! Artist and album keys are exact matches on normalized tag text; only
//! titles are grouped fuzzily, through [`TitleMatcher`]. Buckets keep the
//! order in which their first record was seen, and records keep scan order,
//! so the resolver's first-encountered tie-break is stable for a given walk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::matcher::TitleMatcher;
use crate::metadata::MetadataReader;
use crate::model::{AudioFormat, TitleBucket, TrackRecord, normalize};
use crate::run_log::RunLog;
use crate::scanner;

/// Buckets for one album, in creation order.
pub type AlbumBuckets = Vec<TitleBucket>;

/// Hierarchical grouping built from one directory walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryIndex {
    artists: BTreeMap<String, BTreeMap<String, AlbumBuckets>>,
}

impl LibraryIndex {
    /// File a record under its artist and album, joining the first bucket
    /// whose key is similar enough or starting a new one.
    pub fn insert(&mut self, record: TrackRecord, matcher: &TitleMatcher) {
        let buckets = self
            .artists
            .entry(record.artist.clone())
            .or_default()
            .entry(record.album.clone())
            .or_default();

        let position = matcher
            .find(&record.title, buckets.iter().map(TitleBucket::key))
            .and_then(|key| buckets.iter().position(|b| b.key() == key));

        match position {
            Some(i) => buckets[i].push(record),
            None => {
                let mut bucket = TitleBucket::new(record.title.clone());
                bucket.push(record);
                buckets.push(bucket);
            }
        }
    }

    /// Every bucket with its artist and album keys.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &str, &TitleBucket)> {
        self.artists.iter().flat_map(|(artist, albums)| {
            albums.iter().flat_map(move |(album, buckets)| {
                buckets
                    .iter()
                    .map(move |bucket| (artist.as_str(), album.as_str(), bucket))
            })
        })
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    /// Number of records across all buckets.
    pub fn track_count(&self) -> usize {
        self.buckets().map(|(_, _, b)| b.len()).sum()
    }
}

/// A file the indexer could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Index plus the files left out of it.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub index: LibraryIndex,
    pub skipped: Vec<SkippedFile>,
}

/// Builds a [`LibraryIndex`] from a directory tree.
pub struct Indexer<'a, R: MetadataReader> {
    reader: &'a R,
    matcher: TitleMatcher,
    log: &'a RunLog,
    sort_paths: bool,
}

impl<'a, R: MetadataReader> Indexer<'a, R> {
    pub fn new(reader: &'a R, matcher: TitleMatcher, log: &'a RunLog) -> Self {
        Self {
            reader,
            matcher,
            log,
            sort_paths: true,
        }
    }

    /// Visit directory entries in raw listing order instead of by name.
    pub fn sort_paths(mut self, sorted: bool) -> Self {
        self.sort_paths = sorted;
        self
    }

    /// Walk `root` and index every readable mp3/m4a file.
    ///
    /// Unreadable entries and untagged files are logged and skipped; they
    /// never fail the walk. Each call starts from an empty index.
    pub fn index(&self, root: &Path) -> IndexReport {
        let scan = scanner::scan(root, self.sort_paths);
        tracing::info!(
            root = %root.display(),
            files = scan.files.len(),
            threshold = self.matcher.threshold(),
            "Indexing audio files"
        );

        let mut report = self.index_files(scan.files);
        for error in scan.errors {
            self.log.warn(format!("Could not walk: {} ({})", error.path.display(), error.message));
            report.skipped.push(SkippedFile {
                path: error.path,
                reason: error.message,
            });
        }
        tracing::info!(
            artists = report.index.artist_count(),
            tracks = report.index.track_count(),
            "Indexed library"
        );
        report
    }

    /// Index an explicit list of files, in the given order.
    pub fn index_files(&self, files: impl IntoIterator<Item = (PathBuf, AudioFormat)>) -> IndexReport {
        let mut report = IndexReport::default();

        for (path, format) in files {
            match self.reader.read(&path) {
                Ok(tags) => {
                    let record = TrackRecord {
                        artist: normalize(&tags.artist),
                        album: normalize(&tags.album),
                        title: normalize(&tags.title),
                        bitrate: tags.bitrate,
                        format,
                        path,
                    };
                    tracing::debug!(path = %record.path.display(), title = %record.title, "Indexed");
                    report.index.insert(record, &self.matcher);
                }
                Err(e) => {
                    self.log.warn(format!("Could not read tags: {} ({e})", path.display()));
                    report.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
