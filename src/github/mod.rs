// src/github/mod.rs
// =============================================================================
// This module handles downloading archives from GitHub.
//
// Currently implements:
// - Parsing GitHub URLs to extract owner/repo
// - Building the branch snapshot URL (github.com/<o>/<r>/archive/refs/heads/<b>.zip)
// - Downloading the archive bytes in a single GET
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod fetch;

// Re-export the public functions from fetch.rs
pub use fetch::{archive_root, archive_url, fetch_archive, parse_github_url};
