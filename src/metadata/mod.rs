//! Audio file metadata reading and writing.
//!
//! The deduplicator talks to tags through two small traits so the core can be
//! tested without real audio files:
//! - [`MetadataReader`] - artist/album/title/bitrate plus single-field reads
//! - [`MetadataWriter`] - writes one text field and persists it
//!
//! [`LoftyTags`] implements both on top of the lofty crate. Each call opens,
//! uses and drops its own file handle, so nothing stays open between files.

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::path::{Path, PathBuf};

use crate::model::AudioFormat;

/// Raw tag values as stored in the file (not yet normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: String,
    pub album: String,
    pub title: String,
    /// Bitrate in kbps
    pub bitrate: u32,
}

/// The one tag field the flag action writes for each format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerField {
    /// ID3v2 composer (TCOM), used for MP3
    Composer,
    /// MP4 comment atom, used for M4A
    Comment,
}

impl MarkerField {
    pub fn for_format(format: AudioFormat) -> Self {
        match format {
            AudioFormat::Mp3 => Self::Composer,
            AudioFormat::M4a => Self::Comment,
        }
    }

    fn item_key(self) -> ItemKey {
        match self {
            Self::Composer => ItemKey::Composer,
            Self::Comment => ItemKey::Comment,
        }
    }
}

impl std::fmt::Display for MarkerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Composer => f.write_str("composer"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// Metadata collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Failed to read tags from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No proper tag: {path}")]
    NoTag { path: PathBuf },

    #[error("Missing {field} tag: {path}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Failed to write tags to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Reads tags from audio files.
pub trait MetadataReader {
    /// Read artist, album, title and bitrate.
    ///
    /// Fails if the file cannot be parsed, carries no tag, or has no title.
    fn read(&self, path: &Path) -> Result<TrackTags, MetadataError>;

    /// Read a single text field, `None` when the field is absent.
    fn read_field(&self, path: &Path, field: MarkerField) -> Result<Option<String>, MetadataError>;
}

/// Writes a text field back into an audio file's tag.
pub trait MetadataWriter {
    /// Set `field` to `value` and persist.
    ///
    /// Fails when the file has no existing tag container to update.
    fn write_field(&self, path: &Path, field: MarkerField, value: &str) -> Result<(), MetadataError>;
}

/// lofty-backed reader and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTags;

fn open(path: &Path) -> Result<lofty::file::TaggedFile, MetadataError> {
    Probe::open(path)
        .map_err(|e| MetadataError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .read()
        .map_err(|e| MetadataError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

impl MetadataReader for LoftyTags {
    fn read(&self, path: &Path) -> Result<TrackTags, MetadataError> {
        let tagged_file = open(path)?;

        // Get the primary tag, or fall back to the first available tag
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or_else(|| MetadataError::NoTag {
                path: path.to_path_buf(),
            })?;

        let title = tag
            .title()
            .map(|s| s.to_string())
            .ok_or_else(|| MetadataError::MissingField {
                path: path.to_path_buf(),
                field: "title",
            })?;
        let artist = tag.artist().map(|s| s.to_string()).unwrap_or_default();
        let album = tag.album().map(|s| s.to_string()).unwrap_or_default();

        let properties = tagged_file.properties();
        let bitrate = properties
            .audio_bitrate()
            .or_else(|| properties.overall_bitrate())
            .unwrap_or(0);

        Ok(TrackTags {
            artist,
            album,
            title,
            bitrate,
        })
    }

    fn read_field(&self, path: &Path, field: MarkerField) -> Result<Option<String>, MetadataError> {
        let tagged_file = open(path)?;
        let tag = tagged_file
            .tag(tagged_file.primary_tag_type())
            .ok_or_else(|| MetadataError::NoTag {
                path: path.to_path_buf(),
            })?;
        Ok(tag.get_string(&field.item_key()).map(str::to_string))
    }
}

impl MetadataWriter for LoftyTags {
    fn write_field(&self, path: &Path, field: MarkerField, value: &str) -> Result<(), MetadataError> {
        let mut tagged_file = open(path)?;
        let tag_type = tagged_file.primary_tag_type();

        // Only update an existing tag; untagged files are reported, not repaired
        let tag: &mut Tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| MetadataError::NoTag {
                path: path.to_path_buf(),
            })?;

        tag.insert_text(field.item_key(), value.to_string());

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| MetadataError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::tag::TagType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Writes 40 silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz, stereo).
    fn silent_mp3(path: &Path) {
        const FRAME_LEN: usize = 417;
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        std::fs::write(path, frame.repeat(40)).unwrap();
    }

    /// A silent MP3 with an ID3v2 tag carrying the usual fields and a comment.
    fn tagged_mp3(path: &Path) {
        silent_mp3(path);
        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_title("My Generation".to_string());
        tag.set_artist("The Who".to_string());
        tag.set_album("My Generation".to_string());
        tag.insert_text(ItemKey::Comment, "keep me".to_string());
        tag.save_to_path(path, WriteOptions::default()).unwrap();
    }

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = LoftyTags.read(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let path = Path::new("non_existent_file.mp3");
        let err = LoftyTags.read(path).unwrap_err();
        assert!(matches!(err, MetadataError::Open { path: ref p, .. } if p == path));
    }

    #[test]
    fn test_write_to_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "Not an audio file").expect("Failed to write");

        let result = LoftyTags.write_field(file.path(), MarkerField::Comment, "dupedelete_x");
        assert!(result.is_err());
    }

    #[test]
    fn test_read_tagged_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        tagged_mp3(&path);

        let tags = LoftyTags.read(&path).unwrap();
        assert_eq!(tags.title, "My Generation");
        assert_eq!(tags.artist, "The Who");
        assert_eq!(tags.album, "My Generation");
        assert!(tags.bitrate > 0);
        assert_eq!(LoftyTags.read_field(&path, MarkerField::Composer).unwrap(), None);
    }

    #[test]
    fn test_marker_round_trip_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        tagged_mp3(&path);
        let before = LoftyTags.read(&path).unwrap();

        LoftyTags
            .write_field(&path, MarkerField::Composer, "dupedelete_2024")
            .unwrap();

        let marker = LoftyTags.read_field(&path, MarkerField::Composer).unwrap();
        assert!(marker.as_deref().is_some_and(|v| v.starts_with("dupedelete_")));
        assert_eq!(
            LoftyTags.read_field(&path, MarkerField::Comment).unwrap().as_deref(),
            Some("keep me")
        );
        assert_eq!(LoftyTags.read(&path).unwrap(), before);
    }

    #[test]
    fn test_write_to_untagged_mp3_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.mp3");
        silent_mp3(&path);
        let original = std::fs::read(&path).unwrap();

        let err = LoftyTags
            .write_field(&path, MarkerField::Composer, "dupedelete_2024")
            .unwrap_err();
        assert!(matches!(err, MetadataError::NoTag { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), original);
        assert!(matches!(LoftyTags.read(&path), Err(MetadataError::NoTag { .. })));
    }

    #[test]
    fn test_marker_field_per_format() {
        assert_eq!(MarkerField::for_format(AudioFormat::Mp3), MarkerField::Composer);
        assert_eq!(MarkerField::for_format(AudioFormat::M4a), MarkerField::Comment);
        assert_eq!(MarkerField::Composer.to_string(), "composer");
    }

    #[test]
    fn test_error_messages_include_path() {
        let err = MetadataError::NoTag {
            path: PathBuf::from("/music/song.mp3"),
        };
        assert_eq!(err.to_string(), "No proper tag: /music/song.mp3");

        let err = MetadataError::MissingField {
            path: PathBuf::from("/music/song.m4a"),
            field: "title",
        };
        assert!(err.to_string().contains("title"));
    }
}
