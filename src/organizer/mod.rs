//! Applying an action to resolved duplicates.
//!
//! Two strategies share the [`DuplicateAction`] contract:
//! - [`FlagAction`] writes the run's sentinel marker into the composer (MP3)
//!   or comment (M4A) field through a [`MetadataWriter`]
//! - [`MoveAction`] relocates the file to `<dupe_root>/<artist>/<album>/`
//!   through a [`FileMover`]
//!
//! Failures are recorded per duplicate and logged; the batch always runs to
//! the end. With `dry_run` set, nothing on disk is touched and results
//! describe what would have happened.

use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::{MarkerField, MetadataWriter};
use crate::model::{ActionResult, DuplicateDecision, TrackRecord};
use crate::run_log::RunLog;
use crate::sentinel::Sentinel;

/// One way of dealing with a duplicate.
pub trait DuplicateAction {
    /// Act on a single duplicate. Never panics on I/O trouble; failures come
    /// back as unsuccessful results.
    fn apply_one(&self, record: &TrackRecord, dry_run: bool) -> ActionResult;
}

/// Apply `action` to every duplicate of `decision`, logging failures.
pub fn apply(
    decision: &DuplicateDecision,
    action: &dyn DuplicateAction,
    log: &RunLog,
    dry_run: bool,
) -> Vec<ActionResult> {
    decision
        .duplicates
        .iter()
        .map(|record| {
            let result = action.apply_one(record, dry_run);
            match (result.success, result.reason.as_deref()) {
                (false, reason) => log.error(format!(
                    "{}: {}",
                    record.path.display(),
                    reason.unwrap_or("action failed")
                )),
                (true, Some(description)) => {
                    tracing::info!(path = %record.path.display(), "{description}")
                }
                (true, None) => {
                    tracing::debug!(path = %record.path.display(), keeper = %decision.keeper.path.display(), "Handled duplicate")
                }
            }
            result
        })
        .collect()
}

// ============================================================================
// Flagging
// ============================================================================

/// Marks duplicates with the run's sentinel value.
pub struct FlagAction<'a, W: MetadataWriter> {
    writer: &'a W,
    sentinel: &'a Sentinel,
}

impl<'a, W: MetadataWriter> FlagAction<'a, W> {
    pub fn new(writer: &'a W, sentinel: &'a Sentinel) -> Self {
        Self { writer, sentinel }
    }
}

impl<W: MetadataWriter> DuplicateAction for FlagAction<'_, W> {
    fn apply_one(&self, record: &TrackRecord, dry_run: bool) -> ActionResult {
        let field = MarkerField::for_format(record.format);
        if dry_run {
            return ActionResult::would(
                record.clone(),
                format!("would set {field} to {}", self.sentinel),
            );
        }

        match self.writer.write_field(&record.path, field, self.sentinel.value()) {
            Ok(()) => ActionResult::succeeded(record.clone()),
            Err(e) => ActionResult::failed(record.clone(), e.to_string()),
        }
    }
}

// ============================================================================
// Moving
// ============================================================================

/// File relocation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Failed to create directory {path}: {message}")]
    CreateDir { path: PathBuf, message: String },

    #[error("Destination already exists: {0}")]
    Collision(PathBuf),

    #[error("Source file not found: {0}")]
    MissingSource(PathBuf),

    #[error("Failed to move {from} to {to}: {message}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
}

/// Filesystem operations the move action needs.
pub trait FileMover {
    /// Create `dir` and any missing parents.
    fn create_dir_all(&self, dir: &Path) -> Result<(), MoveError>;

    /// Move `source` into `dest_dir`, keeping its file name. Returns the new
    /// path. Never overwrites an existing file.
    fn move_into(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, MoveError>;
}

/// [`FileMover`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
    fn create_dir_all(&self, dir: &Path) -> Result<(), MoveError> {
        fs::create_dir_all(dir).map_err(|e| MoveError::CreateDir {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn move_into(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, MoveError> {
        if !source.is_file() {
            return Err(MoveError::MissingSource(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| MoveError::MissingSource(source.to_path_buf()))?;
        let dest = dest_dir.join(file_name);
        if dest.exists() {
            return Err(MoveError::Collision(dest));
        }

        let relocate_err = |e: std::io::Error| MoveError::Relocate {
            from: source.to_path_buf(),
            to: dest.clone(),
            message: e.to_string(),
        };

        if fs::rename(source, &dest).is_err() {
            // If rename fails (cross-device), try copy + delete
            fs::copy(source, &dest).map_err(relocate_err)?;
            fs::remove_file(source).map_err(relocate_err)?;
        }
        Ok(dest)
    }
}

/// Relocates duplicates under a mirrored artist/album tree.
pub struct MoveAction<'a, M: FileMover> {
    mover: &'a M,
    dupe_root: PathBuf,
}

impl<'a, M: FileMover> MoveAction<'a, M> {
    pub fn new(mover: &'a M, dupe_root: impl Into<PathBuf>) -> Self {
        Self {
            mover,
            dupe_root: dupe_root.into(),
        }
    }

    /// Directory a duplicate of `record` is moved into.
    pub fn destination_dir(&self, record: &TrackRecord) -> PathBuf {
        self.dupe_root
            .join(path_component(&record.artist))
            .join(path_component(&record.album))
    }
}

impl<M: FileMover> DuplicateAction for MoveAction<'_, M> {
    fn apply_one(&self, record: &TrackRecord, dry_run: bool) -> ActionResult {
        let dest_dir = self.destination_dir(record);
        if dry_run {
            return ActionResult::would(
                record.clone(),
                format!("would move to {}", dest_dir.display()),
            );
        }

        let moved = self
            .mover
            .create_dir_all(&dest_dir)
            .and_then(|()| self.mover.move_into(&record.path, &dest_dir));
        match moved {
            Ok(dest) => {
                tracing::debug!(from = %record.path.display(), to = %dest.display(), "Moved duplicate");
                ActionResult::succeeded(record.clone())
            }
            Err(e) => ActionResult::failed(record.clone(), format!("Could not move file ({e})")),
        }
    }
}

/// Sanitizes a filename by removing/replacing invalid characters
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// A single safe directory name; empty and dot-only names become `_`.
fn path_component(name: &str) -> String {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        sanitized
    }
}
