//! Test utilities and fixtures for dupe-minder tests.
//!
//! Provides in-memory stand-ins for the metadata and filesystem
//! collaborators so the pipeline can be exercised without real audio files.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::FakeTags;
//!
//! let tags = FakeTags::new();
//! tags.add("/music/a.mp3", "The Who", "My Generation", "My Generation", 128);
//! let report = Indexer::new(&tags, matcher, &log).index_files(tags.files());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::metadata::{MarkerField, MetadataError, MetadataReader, MetadataWriter, TrackTags};
use crate::model::{AudioFormat, TrackRecord};
use crate::organizer::{FileMover, MoveError};

/// Creates a TrackRecord for an mp3 with already-normalized fields.
pub fn mock_record(path: &str, artist: &str, album: &str, title: &str, bitrate: u32) -> TrackRecord {
    TrackRecord {
        path: PathBuf::from(path),
        artist: artist.to_string(),
        album: album.to_string(),
        title: title.to_string(),
        bitrate,
        format: AudioFormat::from_path(Path::new(path)).unwrap_or(AudioFormat::Mp3),
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Tagged {
        tags: TrackTags,
        fields: HashMap<MarkerField, String>,
    },
    /// Parses, but has no tag container
    Untagged,
    /// Cannot be parsed at all
    Unreadable,
}

/// In-memory tag store implementing both metadata traits.
#[derive(Debug, Default)]
pub struct FakeTags {
    entries: RefCell<Vec<(PathBuf, Entry)>>,
}

impl FakeTags {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, path: &Path, entry: Entry) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(p, _)| p == path) {
            Some((_, existing)) => *existing = entry,
            None => entries.push((path.to_path_buf(), entry)),
        }
    }

    pub fn add(
        &self,
        path: impl AsRef<Path>,
        artist: &str,
        album: &str,
        title: &str,
        bitrate: u32,
    ) {
        let tags = TrackTags {
            artist: artist.to_string(),
            album: album.to_string(),
            title: title.to_string(),
            bitrate,
        };
        self.insert(
            path.as_ref(),
            Entry::Tagged {
                tags,
                fields: HashMap::new(),
            },
        );
    }

    pub fn add_untagged(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), Entry::Untagged);
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), Entry::Unreadable);
    }

    /// Set a marker field directly, bypassing the writer.
    pub fn set_field(&self, path: impl AsRef<Path>, field: MarkerField, value: &str) {
        let mut entries = self.entries.borrow_mut();
        if let Some((_, Entry::Tagged { fields, .. })) =
            entries.iter_mut().find(|(p, _)| p == path.as_ref())
        {
            fields.insert(field, value.to_string());
        }
    }

    /// Current value of a marker field.
    pub fn field(&self, path: impl AsRef<Path>, field: MarkerField) -> Option<String> {
        self.entries
            .borrow()
            .iter()
            .find(|(p, _)| p == path.as_ref())
            .and_then(|(_, entry)| match entry {
                Entry::Tagged { fields, .. } => fields.get(&field).cloned(),
                _ => None,
            })
    }

    /// Known audio files in insertion order, as the scanner would yield them.
    pub fn files(&self) -> Vec<(PathBuf, AudioFormat)> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|(p, _)| AudioFormat::from_path(p).map(|f| (p.clone(), f)))
            .collect()
    }

    fn entry(&self, path: &Path) -> Result<Entry, MetadataError> {
        match self.entries.borrow().iter().find(|(p, _)| p == path) {
            Some((_, Entry::Unreadable)) => Err(MetadataError::Read {
                path: path.to_path_buf(),
                message: "not an audio file".to_string(),
            }),
            Some((_, entry)) => Ok(entry.clone()),
            None => Err(MetadataError::Open {
                path: path.to_path_buf(),
                message: "No such file or directory".to_string(),
            }),
        }
    }
}

impl MetadataReader for FakeTags {
    fn read(&self, path: &Path) -> Result<TrackTags, MetadataError> {
        match self.entry(path)? {
            Entry::Tagged { tags, .. } => Ok(tags),
            _ => Err(MetadataError::NoTag {
                path: path.to_path_buf(),
            }),
        }
    }

    fn read_field(&self, path: &Path, field: MarkerField) -> Result<Option<String>, MetadataError> {
        match self.entry(path)? {
            Entry::Tagged { fields, .. } => Ok(fields.get(&field).cloned()),
            _ => Err(MetadataError::NoTag {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl MetadataWriter for FakeTags {
    fn write_field(&self, path: &Path, field: MarkerField, value: &str) -> Result<(), MetadataError> {
        match self.entry(path)? {
            Entry::Tagged { .. } => {
                self.set_field(path, field, value);
                Ok(())
            }
            _ => Err(MetadataError::NoTag {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Wraps a [`FakeTags`] so reads work and every write fails.
pub struct ReadOnly<'a>(pub &'a FakeTags);

impl MetadataReader for ReadOnly<'_> {
    fn read(&self, path: &Path) -> Result<TrackTags, MetadataError> {
        self.0.read(path)
    }

    fn read_field(&self, path: &Path, field: MarkerField) -> Result<Option<String>, MetadataError> {
        self.0.read_field(path, field)
    }
}

impl MetadataWriter for ReadOnly<'_> {
    fn write_field(&self, path: &Path, _field: MarkerField, _value: &str) -> Result<(), MetadataError> {
        Err(MetadataError::Write {
            path: path.to_path_buf(),
            message: "Read-only file system".to_string(),
        })
    }
}

/// Mover that records moves and fails for chosen sources.
#[derive(Debug, Default)]
pub struct FailingMover {
    fail_on: Vec<PathBuf>,
    created: RefCell<Vec<PathBuf>>,
    moved: RefCell<Vec<PathBuf>>,
}

impl FailingMover {
    pub fn failing_on(path: &str) -> Self {
        Self {
            fail_on: vec![PathBuf::from(path)],
            ..Self::default()
        }
    }

    /// Sources moved so far, in order.
    pub fn moved(&self) -> Vec<PathBuf> {
        self.moved.borrow().clone()
    }

    /// Directories created so far, in order.
    pub fn created(&self) -> Vec<PathBuf> {
        self.created.borrow().clone()
    }
}

impl FileMover for FailingMover {
    fn create_dir_all(&self, dir: &Path) -> Result<(), MoveError> {
        self.created.borrow_mut().push(dir.to_path_buf());
        Ok(())
    }

    fn move_into(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, MoveError> {
        if self.fail_on.iter().any(|p| p == source) {
            return Err(MoveError::Relocate {
                from: source.to_path_buf(),
                to: dest_dir.to_path_buf(),
                message: "Permission denied".to_string(),
            });
        }
        self.moved.borrow_mut().push(source.to_path_buf());
        Ok(dest_dir.join(source.file_name().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_record_defaults() {
        let record = mock_record("/m/a.m4a", "x", "y", "z", 256);
        assert_eq!(record.format, AudioFormat::M4a);
        assert_eq!(record.bitrate, 256);
        assert_eq!(mock_record("a", "x", "y", "z", 1).format, AudioFormat::Mp3);
    }

    #[test]
    fn test_fake_tags_round_trip_field() {
        let tags = FakeTags::new();
        tags.add("/m/a.mp3", "x", "y", "z", 128);
        tags.write_field(Path::new("/m/a.mp3"), MarkerField::Composer, "v")
            .unwrap();
        assert_eq!(tags.field("/m/a.mp3", MarkerField::Composer).as_deref(), Some("v"));
        assert_eq!(
            tags.read_field(Path::new("/m/a.mp3"), MarkerField::Composer).unwrap(),
            Some("v".to_string())
        );
    }

    #[test]
    fn test_fake_tags_failures() {
        let tags = FakeTags::new();
        tags.add_untagged("/m/u.mp3");
        tags.add_unreadable("/m/r.mp3");
        assert!(matches!(tags.read(Path::new("/m/u.mp3")), Err(MetadataError::NoTag { .. })));
        assert!(matches!(tags.read(Path::new("/m/r.mp3")), Err(MetadataError::Read { .. })));
        assert!(matches!(tags.read(Path::new("/m/x.mp3")), Err(MetadataError::Open { .. })));
        assert_eq!(tags.files().len(), 2);
    }

    #[test]
    fn test_failing_mover() {
        let mover = FailingMover::failing_on("/m/b.mp3");
        assert!(mover.move_into(Path::new("/m/a.mp3"), Path::new("/d")).is_ok());
        assert!(mover.move_into(Path::new("/m/b.mp3"), Path::new("/d")).is_err());
        mover.create_dir_all(Path::new("/d")).unwrap();
        assert_eq!(mover.moved(), vec![PathBuf::from("/m/a.mp3")]);
        assert_eq!(mover.created(), vec![PathBuf::from("/d")]);
    }
}
