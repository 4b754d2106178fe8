// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Running `skill-sync` with no arguments imports the beads skill with the
// built-in settings. Every flag is an optional override.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Option<T>: "the user did not pass this flag"
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{SyncConfig, DEFAULT_SKILL_SUBFOLDER};
use crate::github;

#[derive(Parser, Debug)]
#[command(
    name = "skill-sync",
    version,
    about = "Import a skill folder from a GitHub archive and rebrand its Markdown",
    long_about = "skill-sync downloads a repository snapshot, extracts one folder from it, \
                  rewrites product names in the Markdown files and replaces the local copy. \
                  With no arguments it imports the beads skill into ./skills/beads."
)]
pub struct Cli {
    /// Direct URL of the ZIP archive to download
    #[arg(long, conflicts_with = "repo")]
    pub url: Option<String>,

    /// GitHub repository to download instead of --url
    ///
    /// Example: --repo https://github.com/steveyegge/beads
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to download when using --repo
    #[arg(long, default_value = "main", requires = "repo")]
    pub branch: String,

    /// Folder inside the archive to extract
    ///
    /// Defaults to beads-main/claude-plugin/skills/beads, or to
    /// <repo>-<branch>/claude-plugin/skills/beads when --repo is given
    #[arg(long)]
    pub prefix: Option<String>,

    /// Destination directory (replaced on every run)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Applies the flags on top of the default configuration
    pub fn into_config(self) -> Result<SyncConfig> {
        let mut config = SyncConfig::default();

        if let Some(repo) = &self.repo {
            let (owner, name) = github::parse_github_url(repo)
                .with_context(|| format!("invalid --repo value '{}'", repo))?;
            config.archive_url = github::archive_url(&owner, &name, &self.branch);
            config.source_prefix = format!(
                "{}/{}",
                github::archive_root(&name, &self.branch),
                DEFAULT_SKILL_SUBFOLDER
            );
        }

        if let Some(url) = self.url {
            config.archive_url = url;
        }
        if let Some(prefix) = self.prefix {
            config.source_prefix = prefix;
        }
        if let Some(dest) = self.dest {
            config.destination = dest;
        }

        Ok(config.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ARCHIVE_URL, DEFAULT_SOURCE_PREFIX};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("skill-sync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(config.source_prefix, DEFAULT_SOURCE_PREFIX);
        assert_eq!(config.destination, PathBuf::from("skills/beads"));
    }

    #[test]
    fn test_repo_and_branch_derive_url_and_prefix() {
        let config = parse(&["--repo", "https://github.com/acme/beads", "--branch", "dev"])
            .into_config()
            .unwrap();
        assert_eq!(
            config.archive_url,
            "https://github.com/acme/beads/archive/refs/heads/dev.zip"
        );
        assert_eq!(config.source_prefix, "beads-dev/claude-plugin/skills/beads");
    }

    #[test]
    fn test_explicit_flags_override() {
        let config = parse(&[
            "--url",
            "https://example.com/a.zip",
            "--prefix",
            "a-main/docs/",
            "--dest",
            "out/docs",
            "--json",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.archive_url, "https://example.com/a.zip");
        assert_eq!(config.source_prefix, "a-main/docs");
        assert_eq!(config.destination, PathBuf::from("out/docs"));
    }

    #[test]
    fn test_url_conflicts_with_repo() {
        let result = Cli::try_parse_from([
            "skill-sync",
            "--url",
            "https://example.com/a.zip",
            "--repo",
            "https://github.com/a/b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_repo_is_rejected() {
        assert!(parse(&["--repo", "https://gitlab.com/a/b"]).into_config().is_err());
    }
}
