// src/rewrite.rs
// =============================================================================
// This module applies the replacement rules to Markdown files.
//
// For each entry:
// - Bytes that are not valid UTF-8 are binary: passed through untouched
// - UTF-8 text with a .md extension (any case) gets every rule applied,
//   in order, to every occurrence
// - Any other text file is passed through untouched
//
// Rust concepts:
// - String::from_utf8 hands the bytes back on failure, so binary files are
//   never copied
// - Enums: To report what happened to each file
// =============================================================================

use std::path::Path;

use serde::Serialize;

use crate::config::ReplacementRule;

/// What happened to a file on its way to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// At least one rule changed the content
    Updated,
    /// Written exactly as found in the archive
    Copied,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Updated => "Updated",
            Action::Copied => "Copied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

#[derive(Debug)]
pub struct Rewritten {
    pub bytes: Vec<u8>,
    pub action: Action,
    pub kind: ContentKind,
}

// Decides what to write for one archive entry
//
// Parameters:
//   relative_path: destination-relative path, only its extension matters
//   content: raw bytes from the archive (consumed; returned as-is when unchanged)
//   rules: replacement rules, applied in order
pub fn rewrite_entry(relative_path: &str, content: Vec<u8>, rules: &[ReplacementRule]) -> Rewritten {
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(err) => {
            return Rewritten {
                bytes: err.into_bytes(),
                action: Action::Copied,
                kind: ContentKind::Binary,
            }
        }
    };

    if !is_markdown(relative_path) {
        return Rewritten {
            bytes: text.into_bytes(),
            action: Action::Copied,
            kind: ContentKind::Text,
        };
    }

    match apply_rules(&text, rules) {
        Some(updated) => Rewritten {
            bytes: updated.into_bytes(),
            action: Action::Updated,
            kind: ContentKind::Text,
        },
        None => Rewritten {
            bytes: text.into_bytes(),
            action: Action::Copied,
            kind: ContentKind::Text,
        },
    }
}

// Runs every rule over `text`
//
// Returns: Some(new text) if anything changed, None otherwise
pub fn apply_rules(text: &str, rules: &[ReplacementRule]) -> Option<String> {
    let mut current = text.to_string();
    for rule in rules {
        if current.contains(&rule.search) {
            current = current.replace(&rule.search, &rule.replace);
        }
    }

    if current == text {
        None
    } else {
        Some(current)
    }
}

fn is_markdown(relative_path: &str) -> bool {
    Path::new(relative_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does rewrite_entry take Vec<u8> instead of &[u8]?
//    - Most files are written unchanged
//    - Taking ownership lets us hand the very same buffer back without a copy
//
// 2. What is String::from_utf8?
//    - It checks that bytes are valid UTF-8 and wraps them in a String
//    - On failure the error still owns the bytes (err.into_bytes())
//
// 3. Why does rule order matter?
//    - "Claude code" contains "Claude"
//    - If "Claude" ran first, "Claude code" would become "Gemini code" and the
//      longer rule would never match
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rules;

    #[test]
    fn test_markdown_is_rewritten() {
        let out = rewrite_entry(
            "README.md",
            b"Claude code helps you...".to_vec(),
            &default_rules(),
        );
        assert_eq!(out.action, Action::Updated);
        assert_eq!(out.kind, ContentKind::Text);
        assert_eq!(out.bytes, b"Gemini CLI helps you...");
    }

    #[test]
    fn test_rules_apply_in_order_to_every_occurrence() {
        let text = "Claude code and Claude. Use TodoWrite, then Claude code again.";
        let out = apply_rules(text, &default_rules()).unwrap();
        assert_eq!(
            out,
            "Gemini CLI and Gemini. Use Session Todos (write_todos), then Gemini CLI again."
        );
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let out = rewrite_entry("docs/GUIDE.MD", b"Ask Claude".to_vec(), &default_rules());
        assert_eq!(out.action, Action::Updated);
        assert_eq!(out.bytes, b"Ask Gemini");
    }

    #[test]
    fn test_markdown_without_matches_is_copied() {
        let original = b"# Beads\n\nNothing to see here.\n".to_vec();
        let out = rewrite_entry("SKILL.md", original.clone(), &default_rules());
        assert_eq!(out.action, Action::Copied);
        assert_eq!(out.bytes, original);
    }

    #[test]
    fn test_txt_file_keeps_claude() {
        let original = b"Claude wrote this".to_vec();
        let out = rewrite_entry("notes.txt", original.clone(), &default_rules());
        assert_eq!(out.action, Action::Copied);
        assert_eq!(out.kind, ContentKind::Text);
        assert_eq!(out.bytes, original);
    }

    #[test]
    fn test_binary_passes_through() {
        // Invalid UTF-8 that happens to contain the search bytes
        let mut original = vec![0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe];
        original.extend_from_slice(b"Claude");
        let out = rewrite_entry("icon.md", original.clone(), &default_rules());
        assert_eq!(out.kind, ContentKind::Binary);
        assert_eq!(out.action, Action::Copied);
        assert_eq!(out.bytes, original);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rules = default_rules();
        let once = apply_rules("Claude code uses TodoWrite. Claude!", &rules).unwrap();
        assert_eq!(apply_rules(&once, &rules), None);
    }

    #[test]
    fn test_no_extension_is_not_markdown() {
        assert!(!is_markdown("LICENSE"));
        assert!(!is_markdown("md"));
        assert!(is_markdown("a/b/c.Md"));
    }
}
