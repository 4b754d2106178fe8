// src/archive/filter.rs
// =============================================================================
// Selects the archive entries that live under the source folder.
//
// Rules:
// - The entry path must start with the prefix at a folder boundary
//   ("a/skills/beads/x.md" matches "a/skills/beads", "a/skills/beads-old/x.md"
//   does not)
// - Directory markers (paths ending in '/') are skipped; parent directories
//   are recreated from file paths anyway
// - The destination-relative path is whatever follows the prefix, with the
//   leading separator removed. Empty and "." components collapse the same
//   way a filesystem path join would ("refs//cli.md" -> "refs/cli.md")
// - A relative path that could climb out of the destination ("..",
//   backslashes, drive prefixes) is rejected with a warning
// =============================================================================

use std::collections::BTreeSet;
use std::path::{Component, Path};

use tracing::warn;

/// An archive entry that will be written to the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    /// Position in the archive, used to read the content
    pub index: usize,
    /// Full path inside the archive, for messages
    pub archive_path: String,
    /// Path below the destination directory, '/'-separated
    pub relative_path: String,
}

/// Result of filtering the archive listing
#[derive(Debug, Default)]
pub struct Selection {
    pub entries: Vec<SelectedEntry>,
    /// Entries under the prefix whose path would escape the destination
    pub rejected: Vec<String>,
}

// Filters `names` down to the files under `prefix`
//
// Parameters:
//   names: every entry path in the archive, in index order
//   prefix: source folder inside the archive, without surrounding slashes
//
// Returns: the selected entries in archive order, plus the unsafe ones
pub fn select_entries<S: AsRef<str>>(names: &[S], prefix: &str) -> Selection {
    let mut selection = Selection::default();

    for (index, name) in names.iter().map(AsRef::as_ref).enumerate() {
        if name.ends_with('/') {
            continue;
        }
        let Some(rest) = strip_source_prefix(name, prefix) else {
            continue;
        };

        match normalize_relative(rest) {
            Ok(Some(relative_path)) => selection.entries.push(SelectedEntry {
                index,
                archive_path: name.to_string(),
                relative_path,
            }),
            // Only separators or "." after the prefix: a folder marker
            Ok(None) => {}
            Err(()) => {
                warn!("Skipping unsafe entry path: {}", name);
                selection.rejected.push(name.to_string());
            }
        }
    }

    selection
}

// First path component of every entry, for the "folder not found" report
pub fn top_level_folders<S: AsRef<str>>(names: &[S]) -> BTreeSet<String> {
    names
        .iter()
        .filter_map(|name| name.as_ref().split('/').next())
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_source_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    // Either the entry is the prefix itself, or the prefix stopped in the
    // middle of a folder name
    rest.starts_with('/').then_some(rest)
}

// Ok(None) when nothing is left, Err(()) when a component is not a plain name
fn normalize_relative(rest: &str) -> Result<Option<String>, ()> {
    if rest.contains('\\') {
        return Err(());
    }

    let mut parts = Vec::new();
    for part in rest.split('/').filter(|p| !p.is_empty() && *p != ".") {
        let plain = Path::new(part)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(());
        }
        parts.push(part);
    }

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join("/")))
    }
}
