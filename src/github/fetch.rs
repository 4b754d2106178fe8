// src/github/fetch.rs
// =============================================================================
// This module downloads a repository snapshot from GitHub.
//
// Strategy:
// - GitHub serves any branch as a ZIP at
//   https://github.com/<owner>/<repo>/archive/refs/heads/<branch>.zip
// - The archive unpacks into a single root folder named "<repo>-<branch>"
// - We read the whole body into memory; skill folders are small
//
// Rust concepts:
// - async functions: For network I/O
// - Result: For error handling
// - String parsing: To extract owner/repo from URL
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};

// Downloads the archive at `url` and returns its raw bytes
//
// Parameters:
//   url: direct link to a .zip (usually built with archive_url())
//
// Returns: SyncResult<Vec<u8>>
//   Success: the full response body
//   Error: SyncError::Network if the request failed,
//          SyncError::HttpStatus if the server answered with a non-2xx code
pub async fn fetch_archive(url: &str) -> SyncResult<Vec<u8>> {
    info!("Downloading {}...", url);

    // Create HTTP client for making requests
    // GitHub redirects archive links to codeload.github.com; reqwest follows
    // up to 10 redirects by default.
    let client = Client::new();

    let network = |source: reqwest::Error| SyncError::Network {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(network)?;

    if !response.status().is_success() {
        return Err(SyncError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let bytes = response.bytes().await.map_err(network)?;
    debug!(size = bytes.len(), "archive downloaded");

    Ok(bytes.to_vec())
}

// Builds the download URL of a branch snapshot
//
// Example:
//   ("steveyegge", "beads", "main")
//     -> "https://github.com/steveyegge/beads/archive/refs/heads/main.zip"
pub fn archive_url(owner: &str, repo: &str, branch: &str) -> String {
    format!(
        "https://github.com/{}/{}/archive/refs/heads/{}.zip",
        owner, repo, branch
    )
}

// Name of the single root folder inside a branch snapshot
//
// GitHub replaces '/' in branch names with '-' for this folder
// ("feature/x" -> "repo-feature-x").
pub fn archive_root(repo: &str, branch: &str) -> String {
    format!("{}-{}", repo, branch.replace('/', "-"))
}

// Parses a GitHub URL to extract owner and repository name
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo
//
// Returns: (owner, repo) tuple
//
// Example:
//   "https://github.com/steveyegge/beads" -> ("steveyegge", "beads")
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    // Remove common prefixes
    let url = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    // Should start with github.com
    if !url.starts_with("github.com/") {
        return Err(anyhow!("Not a GitHub URL: {}", url));
    }

    // Remove "github.com/" prefix
    let path = url.trim_start_matches("github.com/");

    // Split by '/' to get owner and repo
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    if parts.len() < 2 {
        return Err(anyhow!("Invalid GitHub URL format: {}", url));
    }

    let owner = parts[0].to_string();
    let repo = parts[1].trim_end_matches(".git").to_string();

    if repo.is_empty() {
        return Err(anyhow!("Invalid GitHub URL format: {}", url));
    }

    Ok((owner, repo))
}
