// src/materialize.rs
// =============================================================================
// This module writes the selected files to disk.
//
// Files are first written into a staging directory created next to the
// destination (same parent, so the final rename stays on one filesystem).
// Only commit() touches the real destination: it removes the old tree and
// renames the staging directory into its place.
//
// If the run fails before commit(), the TempDir guard deletes the staging
// directory when it is dropped and the previous destination is untouched.
// commit() releases the guard with keep() and owns the path from then on.
//
// Rust concepts:
// - RAII: TempDir cleans up after itself in Drop
// - Consuming methods: commit(self) makes a second commit impossible
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{SyncError, SyncResult};

pub struct Staging {
    dir: TempDir,
    destination: PathBuf,
}

impl Staging {
    /// Creates an empty staging directory for `destination`.
    ///
    /// The destination's parent is created if needed; the destination itself
    /// is not touched yet.
    pub fn new(destination: &Path) -> SyncResult<Self> {
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| SyncError::io(&parent, e))?;

        let dir = tempfile::Builder::new()
            .prefix(".skill-sync-")
            .tempdir_in(&parent)
            .map_err(|e| SyncError::io(&parent, e))?;

        // tempdirs are created 0700; the published tree should look like a
        // normal mkdir
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755))
                .map_err(|e| SyncError::io(dir.path(), e))?;
        }

        debug!(staging = %dir.path().display(), "created staging directory");

        Ok(Self {
            dir,
            destination: destination.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `bytes` at `relative_path` ('/'-separated) inside the staging
    /// tree, creating parent directories as needed.
    pub fn write(&self, relative_path: &str, bytes: &[u8]) -> SyncResult<PathBuf> {
        let target = relative_path
            .split('/')
            .fold(self.dir.path().to_path_buf(), |path, part| path.join(part));

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        fs::write(&target, bytes).map_err(|e| SyncError::io(&target, e))?;

        Ok(target)
    }

    /// Replaces the destination with the staged tree.
    ///
    /// Whatever was at the destination before (directory or stray file) is
    /// removed first, so no stale files survive.
    pub fn commit(self) -> SyncResult<PathBuf> {
        let destination = self.destination;

        if destination.is_dir() {
            debug!("Cleaning existing directory: {}", destination.display());
            fs::remove_dir_all(&destination).map_err(|e| SyncError::io(&destination, e))?;
        } else if destination.exists() {
            fs::remove_file(&destination).map_err(|e| SyncError::io(&destination, e))?;
        }

        // Take the directory out of the guard first so Drop never tries to
        // delete a path that the rename is about to move
        let staged = self.dir.keep();
        if let Err(e) = fs::rename(&staged, &destination) {
            let _ = fs::remove_dir_all(&staged);
            return Err(SyncError::io(&destination, e));
        }

        Ok(destination)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why stage into a temporary directory?
//    - Writing straight into the destination means a failure halfway leaves
//      a half-populated folder
//    - fs::rename of a directory on the same filesystem is a single step, so
//      the destination goes from "old tree" to "new tree" with no middle state
//      other than the short moment between remove_dir_all and rename
//
// 2. What does `commit(self)` mean?
//    - The method takes ownership of the Staging value
//    - After calling it, the caller can no longer use the old variable
//    - The compiler therefore rules out "commit twice" or "write after commit"
//
// 3. Why `#[cfg(unix)]`?
//    - Permission bits (0o755) only exist on Unix-like systems
//    - The block is compiled out on Windows
// -----------------------------------------------------------------------------
