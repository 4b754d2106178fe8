// src/config.rs
// =============================================================================
// Run configuration: where to download from, which folder to keep, where to
// put it, and which strings to rewrite.
//
// The defaults reproduce the beads skill import. Every field can be
// overridden from the command line (see cli.rs).
// =============================================================================

use std::path::PathBuf;

use serde::Serialize;
use url::Url;

use crate::error::{SyncError, SyncResult};

pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/steveyegge/beads/archive/refs/heads/main.zip";

// GitHub names the root folder of a branch archive "<repo>-<branch>"
pub const DEFAULT_SOURCE_PREFIX: &str = "beads-main/claude-plugin/skills/beads";

pub const DEFAULT_DESTINATION: &str = "skills/beads";

/// Folder inside the repository that holds the skill, used with --repo
pub const DEFAULT_SKILL_SUBFOLDER: &str = "claude-plugin/skills/beads";

/// One literal find-and-replace pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementRule {
    pub search: String,
    pub replace: String,
}

impl ReplacementRule {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }
}

/// Rules applied to Markdown files, in this order.
/// "Claude code" must run before "Claude" or it would never match.
pub fn default_rules() -> Vec<ReplacementRule> {
    vec![
        ReplacementRule::new("Claude code", "Gemini CLI"),
        ReplacementRule::new("Claude", "Gemini"),
        ReplacementRule::new("TodoWrite", "Session Todos (write_todos)"),
    ]
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// ZIP archive to download
    pub archive_url: String,
    /// Folder inside the archive to extract, without a trailing slash
    pub source_prefix: String,
    /// Output directory, relative paths resolve against the working directory
    pub destination: PathBuf,
    pub rules: Vec<ReplacementRule>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            rules: default_rules(),
        }
    }
}

impl SyncConfig {
    /// Checks the settings before anything touches the network or disk.
    ///
    /// Normalizes the prefix by dropping surrounding slashes so that
    /// "a/b/" and "a/b" select the same entries.
    pub fn validate(mut self) -> SyncResult<Self> {
        let url = Url::parse(&self.archive_url).map_err(|e| {
            SyncError::InvalidConfig(format!("archive URL '{}': {}", self.archive_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::InvalidConfig(format!(
                "archive URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        self.source_prefix = self.source_prefix.trim_matches('/').to_string();
        if self.source_prefix.is_empty() {
            return Err(SyncError::InvalidConfig(
                "source prefix must not be empty".to_string(),
            ));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(SyncError::InvalidConfig(
                "destination must not be empty".to_string(),
            ));
        }

        if let Some(rule) = self.rules.iter().find(|r| r.search.is_empty()) {
            return Err(SyncError::InvalidConfig(format!(
                "replacement rule with empty search string (replace = '{}')",
                rule.replace
            )));
        }

        Ok(self)
    }
}
