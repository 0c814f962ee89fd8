//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-day `{trail_dir}/{YYYY-MM-DD}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use redpin_core::trail::TrailOperation;

use crate::error::DatabaseError;

fn io_error(e: std::io::Error) -> DatabaseError {
    DatabaseError::Other(e.into())
}

/// Writer for the per-day sync trail.
///
/// Service mutations append while their transaction is still open, so a
/// failed append rolls the mutation back.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Open a writer on `trail_dir`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Other` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(io_error)?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that records nothing and reads back an empty trail.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the file for its day.
    ///
    /// File path: `{trail_dir}/{op.ts:%Y-%m-%d}.jsonl`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.path_for(op);
        serde_jsonlines::append_json_lines(&path, [op]).map_err(io_error)?;
        tracing::trace!(op = %op.op, entity = %op.entity, id = %op.id, "trail append");
        Ok(())
    }

    /// Read every operation in the trail directory, ordered by timestamp.
    ///
    /// A disabled writer has no trail and returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a file cannot be read or a line is invalid.
    pub fn read_all(&self) -> Result<Vec<TrailOperation>, DatabaseError> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let mut ops = Vec::new();
        for entry in std::fs::read_dir(&self.trail_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let file_ops: Vec<TrailOperation> = serde_jsonlines::json_lines(&path)
                .map_err(io_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(io_error)?;
            ops.extend(file_ops);
        }
        ops.sort_by_key(|op| op.ts);
        Ok(ops)
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn path_for(&self, op: &TrailOperation) -> PathBuf {
        self.trail_dir
            .join(format!("{}.jsonl", op.ts.format("%Y-%m-%d")))
    }
}
