// src/archive/reader.rs
// =============================================================================
// Thin wrapper around zip::ZipArchive over an in-memory buffer.
//
// The archive owns its bytes (Cursor<Vec<u8>>), so dropping the reader
// releases everything; there is no file handle to close.
// =============================================================================

use std::io::{Cursor, Read};

use anyhow::bail;
use zip::ZipArchive;

use crate::error::{SyncError, SyncResult};

/// Largest entry we are willing to hold in memory. Skill folders are text
/// and a few images; anything bigger is a broken or hostile archive.
pub const MAX_ENTRY_SIZE: u64 = 64 * 1024 * 1024;

pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ArchiveReader {
    /// Parses the central directory. Anything that is not a ZIP fails here
    /// with SyncError::InvalidArchive.
    pub fn new(bytes: Vec<u8>) -> SyncResult<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(SyncError::InvalidArchive)?;
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Every entry path, directories included. Position `i` in the result is
    /// the index to pass to read().
    pub fn entry_names(&mut self) -> SyncResult<Vec<String>> {
        (0..self.archive.len())
            .map(|index| -> SyncResult<String> {
                // by_index_raw only looks at the headers, nothing is inflated
                let file = self
                    .archive
                    .by_index_raw(index)
                    .map_err(SyncError::InvalidArchive)?;
                Ok(file.name().to_string())
            })
            .collect()
    }

    /// Reads the entry at `index` fully into memory.
    ///
    /// Errors here (corrupt data, unsupported compression, bad CRC, size
    /// over MAX_ENTRY_SIZE) are per-entry: the caller logs them and moves on.
    /// The size in the header is never used to pre-allocate.
    pub fn read(&mut self, index: usize) -> anyhow::Result<Vec<u8>> {
        let file = self.archive.by_index(index)?;

        let declared = file.size();
        if declared > MAX_ENTRY_SIZE {
            bail!(
                "entry declares {} bytes, more than the {} byte limit",
                declared,
                MAX_ENTRY_SIZE
            );
        }

        let mut content = Vec::new();
        file.take(MAX_ENTRY_SIZE + 1).read_to_end(&mut content)?;
        if content.len() as u64 > MAX_ENTRY_SIZE {
            bail!("entry inflates past the {} byte limit", MAX_ENTRY_SIZE);
        }

        Ok(content)
    }
}
