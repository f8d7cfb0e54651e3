//! # Metadata & Content Loader
//!
//! Reads a project's `metadata.yaml` and the markdown files its tabs
//! reference, running everything through the variable substitution engine
//! before returning it.
//!
//! Missing optional inputs are skip conditions, never errors:
//!
//! - Missing `metadata.yaml` → `Ok(None)`; the caller skips the project.
//! - A tab without an `id` or `filename` → warned and ignored.
//! - A declared tab file that does not exist → warned; the tab's content is
//!   recorded as `None` and excluded from assembly and emission.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde_yaml::Value;

use crate::config::{self, Metadata};
use crate::error::Result;
use crate::project::{Project, METADATA_FILE};
use crate::subst::{SubstitutionSummary, VarSubstituter};

/// Per-tab content keyed by tab id; `None` marks a declared tab whose file
/// was absent.
pub type TabContents = BTreeMap<String, Option<String>>;

/// Load and substitute a project's metadata.
///
/// Returns `Ok(None)` when the marker file is missing, which callers treat
/// as "skip this project" rather than a failure.
pub fn load_metadata(
    project: &Project,
    source_root: &Path,
    subst: &VarSubstituter,
    summary: &mut SubstitutionSummary,
) -> Result<Option<Metadata>> {
    let metadata_path = project.source_dir(source_root).join(METADATA_FILE);
    if !metadata_path.is_file() {
        warn!("{}: {} not found, skipping project", project, METADATA_FILE);
        return Ok(None);
    }

    let yaml = std::fs::read_to_string(&metadata_path)?;
    let metadata = config::parse(&yaml, subst, summary)?;
    Ok(Some(metadata))
}

/// Load the markdown content for every well-formed tab declared in
/// `metadata`, substituted.
pub fn load_tab_contents(
    project: &Project,
    source_root: &Path,
    metadata: &Metadata,
    subst: &VarSubstituter,
    summary: &mut SubstitutionSummary,
) -> Result<TabContents> {
    let source_dir = project.source_dir(source_root);
    let mut contents = TabContents::new();

    for tab in &metadata.tabs {
        let Some(id) = tab.id.as_deref() else {
            warn!("{}: tab without an id, ignoring", project);
            continue;
        };
        let Some(filename) = tab.filename.as_deref() else {
            warn!("{}: tab '{}' has no filename, ignoring", project, id);
            continue;
        };

        let path = source_dir.join(filename);
        if !path.is_file() {
            warn!("{}: {} not found, tab '{}' will be skipped", project, filename, id);
            contents.insert(id.to_string(), None);
            continue;
        }

        let raw = std::fs::read_to_string(&path)?;
        let substituted = match subst.substitute_value(&Value::String(raw), summary) {
            Value::String(s) => s,
            // Strings substitute to strings; anything else is unreachable.
            other => serde_yaml::to_string(&other)?,
        };
        contents.insert(id.to_string(), Some(substituted));
    }

    Ok(contents)
}
