// src/archive/mod.rs
// =============================================================================
// This module turns downloaded bytes into the list of files we care about.
//
// Submodules:
// - reader: Opens the ZIP and reads individual entries
// - filter: Picks the entries under the source folder and computes where
//           each one lands in the destination
// =============================================================================

mod filter;
mod reader;

pub use filter::{select_entries, top_level_folders, SelectedEntry, Selection};
pub use reader::ArchiveReader;
