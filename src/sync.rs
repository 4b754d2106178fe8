// src/sync.rs
// =============================================================================
// The whole run, start to finish:
//
//   fetch archive -> open zip -> select entries -> rewrite Markdown -> write
//
// Everything is sequential. The only await point is the download; all file
// I/O is plain blocking std::fs.
// =============================================================================

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::{self, ArchiveReader};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::github;
use crate::materialize::Staging;
use crate::rewrite::{self, Action};

/// One file that ended up in the destination
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// Path relative to the destination
    pub path: String,
    pub action: Action,
}

/// An entry that could not be read from the archive
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub source_url: String,
    pub destination: PathBuf,
    pub entries: Vec<EntryReport>,
    pub skipped: Vec<SkippedEntry>,
}

impl SyncReport {
    pub fn count(&self, action: Action) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }
}

// Downloads the archive and mirrors the source folder into the destination
//
// Parameters:
//   config: validated configuration
//   base_dir: directory that relative destinations resolve against
//             (the current working directory in main)
pub async fn run_sync(config: &SyncConfig, base_dir: &Path) -> SyncResult<SyncReport> {
    let destination = base_dir.join(&config.destination);
    info!("Target destination: {}", destination.display());

    let bytes = github::fetch_archive(&config.archive_url).await?;

    info!("Extracting and processing files...");
    let mut report = extract_archive(bytes, config, &destination)?;
    report.source_url = config.archive_url.clone();

    info!("Done!");
    Ok(report)
}

// Everything after the download. Split out so it can run on in-memory
// archives without a network.
pub fn extract_archive(
    bytes: Vec<u8>,
    config: &SyncConfig,
    destination: &Path,
) -> SyncResult<SyncReport> {
    let mut reader = ArchiveReader::new(bytes)?;
    let names = reader.entry_names()?;
    debug!(entries = reader.len(), "opened archive");

    let selection = archive::select_entries(&names, &config.source_prefix);
    if selection.entries.is_empty() {
        if !selection.rejected.is_empty() {
            return Err(SyncError::UnsafeEntries {
                prefix: config.source_prefix.clone(),
                rejected: selection.rejected,
            });
        }
        return Err(SyncError::MissingSourceFolder {
            prefix: config.source_prefix.clone(),
            top_level: archive::top_level_folders(&names),
        });
    }
    let selected = selection.entries;

    let staging = Staging::new(destination)?;
    let mut entries = Vec::with_capacity(selected.len());
    let mut skipped = Vec::new();

    for entry in selected {
        let content = match reader.read(entry.index) {
            Ok(content) => content,
            Err(e) => {
                warn!("Error reading {}: {:#}", entry.archive_path, e);
                skipped.push(SkippedEntry {
                    path: entry.archive_path,
                    reason: format!("{:#}", e),
                });
                continue;
            }
        };

        let rewritten = rewrite::rewrite_entry(&entry.relative_path, content, &config.rules);
        staging.write(&entry.relative_path, &rewritten.bytes)?;

        info!("{}: {}", rewritten.action.label(), entry.relative_path);
        debug!(kind = ?rewritten.kind, size = rewritten.bytes.len(), "wrote entry");

        entries.push(EntryReport {
            path: entry.relative_path,
            action: rewritten.action,
        });
    }

    let destination = staging.commit()?;

    Ok(SyncReport {
        source_url: String::new(),
        destination,
        entries,
        skipped,
    })
}
