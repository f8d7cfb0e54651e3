//! # Metadata Schema and Parsing
//!
//! This module defines the data structures that represent a project's
//! `metadata.yaml` file, as well as the logic for parsing it.
//!
//! ## Key Components
//!
//! - **`Metadata`**: Display metadata plus the declared tabs, resource links
//!   and optional call-to-action. Unknown fields are tolerated so the source
//!   format can grow without breaking the pipeline.
//!
//! - **`Tab`**: `{id, label, filename}` declaring one documentation section
//!   backed by a markdown file. All fields are optional in the source; tabs
//!   missing an `id` or `filename` are skipped by the loader with a warning.
//!
//! ## Parsing
//!
//! Parsing is two-stage: the YAML is first read into a `serde_yaml::Value`
//! so the variable substitution engine can rewrite string values, then the
//! substituted value is deserialized into the typed schema. `parse` performs
//! both stages; callers that need the intermediate value use
//! `parse_value` + `from_value`.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::Result;
use crate::subst::{SubstitutionSummary, VarSubstituter};

/// Default document kind when metadata does not declare one.
pub const DEFAULT_KIND: &str = "PLAYBOOK";

/// One declared documentation tab backed by a markdown file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    /// Stable identifier used to key loaded content.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable section label shown in the assembled document.
    #[serde(default)]
    pub label: Option<String>,
    /// Markdown file name, relative to the project's source directory.
    #[serde(default)]
    pub filename: Option<String>,
}

impl Tab {
    /// Label with the loader's fallback applied.
    pub fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("Unlabeled")
    }
}

/// A project's `metadata.yaml`, after variable substitution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document kind consumed by the build site (defaults to `PLAYBOOK`).
    #[serde(default)]
    pub kind: Option<String>,
    /// Short machine name (defaults to the project basename).
    #[serde(default)]
    pub name: Option<String>,
    /// Catalog identity (defaults to the project path).
    #[serde(default)]
    pub catalog_name: Option<String>,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    /// Resource links passed through to the UX config untouched.
    #[serde(default)]
    pub resources: Vec<Value>,
    /// Call-to-action block; only emitted when present in the source.
    #[serde(default)]
    pub cta: Option<Value>,
}

/// Parse raw metadata YAML into an untyped value (pre-substitution).
pub fn parse_value(yaml: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Deserialize a (substituted) value into the typed schema.
pub fn from_value(value: Value) -> Result<Metadata> {
    Ok(serde_yaml::from_value(value)?)
}

/// Parse metadata YAML, applying variable substitution between the untyped
/// and typed stages.
pub fn parse(
    yaml: &str,
    subst: &VarSubstituter,
    summary: &mut SubstitutionSummary,
) -> Result<Metadata> {
    let raw = parse_value(yaml)?;
    let substituted = subst.substitute_value(&raw, summary);
    from_value(substituted)
}
