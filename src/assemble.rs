//! # Document Assembler
//!
//! Builds one coherent README from a project's metadata and loaded tab
//! content:
//!
//! 1. Title line from `displayName`, optional `>` blockquote subtitle.
//! 2. A two-level table of contents: top level links each tab, nested level
//!    links the tab's original `##` headings (extracted before shifting).
//! 3. Each tab in declared order as a `## <Label>` section whose content has
//!    every heading shifted down exactly one level, so the document forms a
//!    single hierarchy.
//!
//! Tabs whose content is absent are skipped entirely and never appear in the
//! TOC. A project with no loadable tab content assembles to the empty
//! string, which callers treat as "skip this project".

use crate::config::Metadata;
use crate::loader::TabContents;
use crate::project::Project;

/// Shift every markdown heading in `content` down one level (`#` → `##`).
///
/// Shebang-style `#!` lines are not headings and are left alone.
pub fn shift_headings_down(content: &str) -> String {
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') && !trimmed.starts_with("#!") {
                format!("#{}", line)
            } else {
                line.to_string()
            }
        })
        .collect();
    lines.join("\n")
}

/// Extract the text of every `##` heading (exactly level 2) from raw,
/// pre-shift markdown content.
pub fn extract_h2_headings(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let stripped = line.trim();
            if stripped.starts_with("## ") && !stripped.starts_with("### ") {
                Some(stripped[3..].trim().to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Create a markdown anchor slug from heading text.
///
/// Lowercase, spaces become hyphens, everything non-alphanumeric is
/// stripped, runs of hyphens collapse, and edge hyphens are trimmed.
pub fn heading_anchor(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut last_was_hyphen = false;

    for c in text.to_lowercase().chars() {
        let mapped = if c == ' ' {
            Some('-')
        } else if c.is_alphanumeric() || c == '-' {
            Some(c)
        } else {
            None
        };
        match mapped {
            Some('-') => {
                if !last_was_hyphen {
                    anchor.push('-');
                }
                last_was_hyphen = true;
            }
            Some(c) => {
                anchor.push(c);
                last_was_hyphen = false;
            }
            None => {}
        }
    }

    anchor.trim_matches('-').to_string()
}

/// Generate the two-level table of contents for the tabs that have content.
fn table_of_contents(metadata: &Metadata, contents: &TabContents) -> String {
    let mut lines = vec!["## Table of Contents".to_string(), String::new()];

    for tab in &metadata.tabs {
        let Some(id) = tab.id.as_deref() else { continue };
        let Some(Some(content)) = contents.get(id) else {
            continue;
        };

        let label = tab.label_or_default();
        lines.push(format!("- [{}](#{})", label, heading_anchor(label)));

        // Original H2s become H3s after the shift; anchors are unchanged.
        for heading in extract_h2_headings(content) {
            lines.push(format!("  - [{}](#{})", heading, heading_anchor(&heading)));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Assemble the project README from metadata and loaded tab content.
///
/// Returns the empty string when no tab has content.
pub fn assemble(project: &Project, metadata: &Metadata, contents: &TabContents) -> String {
    let has_content = metadata
        .tabs
        .iter()
        .filter_map(|tab| tab.id.as_deref())
        .any(|id| matches!(contents.get(id), Some(Some(_))));
    if !has_content {
        return String::new();
    }

    let mut lines = Vec::new();

    let title = metadata
        .display_name
        .clone()
        .unwrap_or_else(|| project.basename().to_string());
    lines.push(format!("# {}", title));
    lines.push(String::new());

    if let Some(subtitle) = &metadata.short_description {
        lines.push(format!("> {}", subtitle));
        lines.push(String::new());
    }

    lines.push(table_of_contents(metadata, contents));
    lines.push("---".to_string());
    lines.push(String::new());

    for tab in &metadata.tabs {
        let Some(id) = tab.id.as_deref() else { continue };
        let Some(Some(content)) = contents.get(id) else {
            continue;
        };

        lines.push(format!("## {}", tab.label_or_default()));
        lines.push(String::new());
        lines.push(shift_headings_down(content.trim()));
        lines.push(String::new());
    }

    lines.join("\n")
}
