// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, default "info")
// 2. Parse command-line arguments using clap
// 3. Run the sync: download, extract, rewrite, write
// 4. Print a summary (or JSON)
// 5. Exit with a code that tells scripts what went wrong:
//      0 = success
//      1 = invalid configuration
//      3 = download failed
//      4 = not a zip archive
//      5 = source folder not found in the archive
//      6 = filesystem error
//      7 = every entry under the source folder had an unsafe path
// =============================================================================

// Module declarations - tells Rust about our other source files
mod archive;       // src/archive/ - reading and filtering the zip
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - defaults and validation
mod error;         // src/error.rs - typed errors and exit codes
mod github;        // src/github/ - downloading from GitHub
mod materialize;   // src/materialize.rs - staged writes to disk
mod rewrite;       // src/rewrite.rs - Markdown replacements
mod sync;          // src/sync.rs - the pipeline

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use error::SyncError;
use rewrite::Action;
use sync::SyncReport;

#[tokio::main]
async fn main() {
    // Logs go to stderr so `--json` output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole cause chain on one line. For a missing
            // source folder this includes the archive's top-level folders.
            tracing::error!("{:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;
    let config = cli.into_config()?;

    let base_dir = std::env::current_dir().context("cannot determine the working directory")?;
    let report = sync::run_sync(&config, &base_dir).await?;

    print!("{}", render_report(&report, json)?);

    Ok(())
}

// Typed pipeline errors carry their own code; anything else (unreadable
// working directory, bad --repo, JSON encoding) is a generic failure.
fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<SyncError>() {
        Some(err) => err.exit_code(),
        None => 1,
    }
}

// Formats the report either as pretty JSON or as a human-readable summary
fn render_report(report: &SyncReport, json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(report)?))
    } else {
        Ok(format_summary(report))
    }
}

fn format_summary(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("📁 {}\n", report.destination.display()));
    out.push_str(&format!("   ✏️  Updated: {}\n", report.count(Action::Updated)));
    out.push_str(&format!("   📄 Copied: {}\n", report.count(Action::Copied)));
    if !report.skipped.is_empty() {
        out.push_str(&format!("   ⚠️  Skipped: {}\n", report.skipped.len()));
        for skipped in &report.skipped {
            out.push_str(&format!("      {} ({})\n", skipped.path, skipped.reason));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync::{EntryReport, SkippedEntry};

    #[test]
    fn test_exit_code_from_typed_error() {
        let err = anyhow::Error::new(SyncError::InvalidConfig("bad".into()));
        assert_eq!(exit_code_for(&err), 1);

        let err = anyhow::Error::new(SyncError::MissingSourceFolder {
            prefix: "p".into(),
            top_level: Default::default(),
        });
        assert_eq!(exit_code_for(&err), 5);
    }

    fn sample_report() -> SyncReport {
        SyncReport {
            source_url: "https://example.com/a.zip".to_string(),
            destination: std::path::PathBuf::from("/tmp/skills/beads"),
            entries: vec![
                EntryReport {
                    path: "README.md".to_string(),
                    action: Action::Updated,
                },
                EntryReport {
                    path: "icon.png".to_string(),
                    action: Action::Copied,
                },
            ],
            skipped: vec![SkippedEntry {
                path: "beads-main/bad.md".to_string(),
                reason: "invalid checksum".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_report_uses_snake_case_actions() {
        let out = render_report(&sample_report(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["source_url"], "https://example.com/a.zip");
        assert_eq!(value["entries"][0]["path"], "README.md");
        assert_eq!(value["entries"][0]["action"], "updated");
        assert_eq!(value["entries"][1]["action"], "copied");
        assert_eq!(value["skipped"][0]["reason"], "invalid checksum");
    }

    #[test]
    fn test_summary_counts_actions_and_lists_skips() {
        let out = render_report(&sample_report(), false).unwrap();

        assert!(out.contains("/tmp/skills/beads"));
        assert!(out.contains("Updated: 1"));
        assert!(out.contains("Copied: 1"));
        assert!(out.contains("Skipped: 1"));
        assert!(out.contains("beads-main/bad.md (invalid checksum)"));
    }

    #[test]
    fn test_summary_without_skips() {
        let mut report = sample_report();
        report.skipped.clear();
        let out = format_summary(&report);
        assert!(!out.contains("Skipped"));
    }

    #[test]
    fn test_exit_code_for_untyped_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), 1);
    }
}
