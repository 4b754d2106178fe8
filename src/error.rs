// src/error.rs
// =============================================================================
// Typed errors for the sync pipeline.
//
// Every stage returns a SyncError so that main() can turn the failure into a
// distinct process exit code. Scripts calling skill-sync can then tell
// "network is down" apart from "the archive layout changed".
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from attributes
// - #[source]: keeps the underlying error in the chain for `{:#}` printing
// =============================================================================

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configuration itself is unusable (bad URL, empty prefix, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request could not be completed
    #[error("failed to download {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status
    #[error("failed to download {url}: HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The downloaded bytes are not a ZIP archive
    #[error("the downloaded file is not a valid zip archive")]
    InvalidArchive(#[source] zip::result::ZipError),

    /// Nothing in the archive lives under the configured prefix
    #[error(
        "could not find folder '{prefix}' in the zip archive (top-level folders: {})",
        format_folders(top_level)
    )]
    MissingSourceFolder {
        prefix: String,
        top_level: BTreeSet<String>,
    },

    /// Entries exist under the prefix, but every one of them had a path that
    /// would land outside the destination
    #[error(
        "every entry under '{prefix}' has an unsafe path ({} rejected)",
        rejected.len()
    )]
    UnsafeEntries {
        prefix: String,
        rejected: Vec<String>,
    },

    /// Creating, writing, removing or renaming something on disk failed
    #[error("filesystem error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Process exit code for this failure.
    ///
    /// 2 is left out on purpose: clap already uses it for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::InvalidConfig(_) => 1,
            SyncError::Network { .. } | SyncError::HttpStatus { .. } => 3,
            SyncError::InvalidArchive(_) => 4,
            SyncError::MissingSourceFolder { .. } => 5,
            SyncError::Io { .. } => 6,
            SyncError::UnsafeEntries { .. } => 7,
        }
    }

    /// Shorthand for wrapping an io::Error together with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_folders(folders: &BTreeSet<String>) -> String {
    if folders.is_empty() {
        return "none".to_string();
    }
    folders.iter().cloned().collect::<Vec<_>>().join(", ")
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            SyncError::InvalidConfig("x".into()),
            SyncError::HttpStatus {
                url: "u".into(),
                status: reqwest::StatusCode::NOT_FOUND,
            },
            SyncError::InvalidArchive(zip::result::ZipError::FileNotFound),
            SyncError::MissingSourceFolder {
                prefix: "p".into(),
                top_level: BTreeSet::new(),
            },
            SyncError::io("dest", std::io::Error::other("boom")),
            SyncError::UnsafeEntries {
                prefix: "p".into(),
                rejected: vec!["p/../x".into()],
            },
        ];

        let codes: BTreeSet<i32> = errors.iter().map(SyncError::exit_code).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
        assert!(!codes.contains(&2));
    }

    #[test]
    fn test_missing_folder_message_lists_top_level() {
        let err = SyncError::MissingSourceFolder {
            prefix: "beads-main/claude-plugin/skills/beads".into(),
            top_level: ["beads-dev".to_string(), "docs".to_string()].into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("beads-main/claude-plugin/skills/beads"));
        assert!(msg.contains("beads-dev, docs"));
    }
}
