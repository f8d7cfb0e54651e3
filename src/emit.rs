//! # Config Emitter
//!
//! Derives the two publication configuration documents from substituted
//! metadata and loaded tab content:
//!
//! - **`conf.yaml`** ([`PublishConfig`]): the minimal build-site descriptor,
//!   a trivial projection with defaults.
//! - **`ux-conf.yaml`** ([`UxConfig`]): the full descriptor — display
//!   metadata, a fixed per-environment attribute block, every tab's content
//!   (indented two spaces per line, exactly one trailing newline), resource
//!   links, and the call-to-action only when the source declares one.
//!
//! Multi-line tab content is rendered by `serde_yaml` as literal block
//! scalars; the trailing-whitespace normalization keeps repeated runs from
//! accumulating blank lines inside those blocks.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::config::{Metadata, DEFAULT_KIND};
use crate::error::Result;
use crate::loader::TabContents;
use crate::project::Project;

/// Fixed catalog namespace the build site files artifacts under.
const CATALOG_NAMESPACE: &str = "qc69jvmznzxy";

/// Minimal build-site descriptor (`conf.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishConfig {
    pub kind: String,
    pub catalog_name: String,
    pub name: String,
}

impl PublishConfig {
    pub fn from_metadata(project: &Project, metadata: &Metadata) -> Self {
        Self {
            kind: metadata.kind.clone().unwrap_or_else(|| DEFAULT_KIND.to_string()),
            catalog_name: metadata.catalog_name.clone().unwrap_or_else(|| project.path()),
            name: metadata.name.clone().unwrap_or_else(|| project.basename().to_string()),
        }
    }
}

/// One environment entry in the fixed build-site attribute block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvAttributes {
    pub attributes_env: String,
    #[serde(rename = "showUnavailableBanner")]
    pub show_unavailable_banner: String,
}

/// The fixed test/production attribute block required by the build site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvSpecificAttributes {
    pub test: Vec<EnvAttributes>,
    pub production: Vec<EnvAttributes>,
}

impl Default for EnvSpecificAttributes {
    fn default() -> Self {
        let entry = |env: &str| EnvAttributes {
            attributes_env: env.to_string(),
            show_unavailable_banner: "false".to_string(),
        };
        Self {
            test: vec![entry("test")],
            production: vec![entry("production")],
        }
    }
}

/// One tab in the UX descriptor, content pre-indented for embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UxTab {
    pub id: String,
    pub label: String,
    pub content: String,
}

/// Full build-site descriptor (`ux-conf.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UxConfig {
    pub kind: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub short_description: String,
    pub publisher: String,
    pub labels: Vec<String>,
    pub duration: String,
    pub env_specific_attributes: EnvSpecificAttributes,
    #[serde(rename = "artifactName")]
    pub artifact_name: String,
    pub namespace: String,
    pub tabs: Vec<UxTab>,
    pub resources: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<Value>,
}

/// Indent every non-blank line by two spaces, strip trailing whitespace and
/// end with exactly one newline.
///
/// The trailing normalization is what keeps the literal block scalar stable
/// across repeated pipeline runs.
pub fn indent_tab_content(content: &str) -> String {
    let indented: Vec<String> = content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("  {}", line)
            }
        })
        .collect();
    let mut joined = indented.join("\n");
    joined.truncate(joined.trim_end().len());
    joined.push('\n');
    joined
}

/// Build the UX descriptor from metadata and loaded tab content.
///
/// Tabs with absent content are omitted from the descriptor.
pub fn ux_config(project: &Project, metadata: &Metadata, contents: &TabContents) -> UxConfig {
    let mut tabs = Vec::new();
    for tab in &metadata.tabs {
        let Some(id) = tab.id.as_deref() else { continue };
        let Some(Some(content)) = contents.get(id) else {
            continue;
        };
        tabs.push(UxTab {
            id: id.to_string(),
            label: tab.label_or_default().to_string(),
            content: indent_tab_content(content),
        });
    }

    UxConfig {
        kind: metadata.kind.clone().unwrap_or_else(|| DEFAULT_KIND.to_string()),
        name: metadata.name.clone().unwrap_or_else(|| project.basename().to_string()),
        display_name: metadata
            .display_name
            .clone()
            .unwrap_or_else(|| project.basename().to_string()),
        short_description: metadata.short_description.clone().unwrap_or_default(),
        publisher: metadata
            .publisher
            .clone()
            .unwrap_or_else(|| project.publisher.clone()),
        labels: metadata.labels.clone(),
        duration: metadata.duration.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
        env_specific_attributes: EnvSpecificAttributes::default(),
        artifact_name: project.basename().to_string(),
        namespace: CATALOG_NAMESPACE.to_string(),
        tabs,
        resources: metadata.resources.clone(),
        cta: metadata.cta.clone(),
    }
}

/// Render a descriptor to YAML text.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tab;

    fn project() -> Project {
        Project::new("nvidia", "jax")
    }

    fn metadata_with_tab() -> Metadata {
        Metadata {
            name: Some("jax".to_string()),
            display_name: Some("JAX on Spark".to_string()),
            short_description: Some("SOM training".to_string()),
            publisher: Some("nvidia".to_string()),
            duration: Some("30min".to_string()),
            tabs: vec![Tab {
                id: Some("overview".to_string()),
                label: Some("Overview".to_string()),
                filename: Some("overview.md".to_string()),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_publish_config_defaults() {
        let config = PublishConfig::from_metadata(&project(), &Metadata::default());
        assert_eq!(config.kind, "PLAYBOOK");
        assert_eq!(config.catalog_name, "nvidia/jax");
        assert_eq!(config.name, "jax");
    }

    #[test]
    fn test_publish_config_uses_metadata_values() {
        let metadata = Metadata {
            kind: Some("GUIDE".to_string()),
            catalog_name: Some("custom/path".to_string()),
            name: Some("custom".to_string()),
            ..Default::default()
        };
        let config = PublishConfig::from_metadata(&project(), &metadata);
        assert_eq!(config.kind, "GUIDE");
        assert_eq!(config.catalog_name, "custom/path");
        assert_eq!(config.name, "custom");
    }

    #[test]
    fn test_indent_tab_content_two_spaces_and_single_newline() {
        let out = indent_tab_content("# Title\n\nBody\n\n\n");
        assert_eq!(out, "  # Title\n\n  Body\n");
    }

    #[test]
    fn test_indent_tab_content_is_stable_on_rerun() {
        let once = indent_tab_content("line\n");
        // Repeated runs re-read their own output; the trailing newline must
        // not grow.
        assert!(once.ends_with("line\n"));
        assert!(!once.ends_with("\n\n"));
    }

    #[test]
    fn test_ux_config_includes_fixed_attribute_block() {
        let contents = TabContents::from([(
            "overview".to_string(),
            Some("# Intro\nBody".to_string()),
        )]);
        let config = ux_config(&project(), &metadata_with_tab(), &contents);

        assert_eq!(config.env_specific_attributes.test.len(), 1);
        assert_eq!(config.env_specific_attributes.test[0].attributes_env, "test");
        assert_eq!(
            config.env_specific_attributes.production[0].show_unavailable_banner,
            "false"
        );
        assert_eq!(config.artifact_name, "jax");
        assert_eq!(config.namespace, CATALOG_NAMESPACE);
    }

    #[test]
    fn test_ux_config_omits_absent_tabs() {
        let mut metadata = metadata_with_tab();
        metadata.tabs.push(Tab {
            id: Some("missing".to_string()),
            label: Some("Missing".to_string()),
            filename: Some("missing.md".to_string()),
        });
        let contents = TabContents::from([
            ("overview".to_string(), Some("text".to_string())),
            ("missing".to_string(), None),
        ]);
        let config = ux_config(&project(), &metadata, &contents);
        assert_eq!(config.tabs.len(), 1);
        assert_eq!(config.tabs[0].id, "overview");
    }

    #[test]
    fn test_ux_config_cta_only_when_present() {
        let contents = TabContents::from([("overview".to_string(), Some("text".to_string()))]);
        let without = ux_config(&project(), &metadata_with_tab(), &contents);
        let yaml = to_yaml(&without).unwrap();
        assert!(!yaml.contains("cta"));

        let mut metadata = metadata_with_tab();
        metadata.cta = Some(serde_yaml::from_str("label: Go\nurl: https://example.com\n").unwrap());
        let with = ux_config(&project(), &metadata, &contents);
        let yaml = to_yaml(&with).unwrap();
        assert!(yaml.contains("cta:"));
        assert!(yaml.contains("label: Go"));
    }

    #[test]
    fn test_multiline_content_rendered_as_literal_block() {
        let contents = TabContents::from([(
            "overview".to_string(),
            Some("# Intro\n\nBody line".to_string()),
        )]);
        let config = ux_config(&project(), &metadata_with_tab(), &contents);
        let yaml = to_yaml(&config).unwrap();
        assert!(yaml.contains("content: |"), "expected literal block scalar, got:\n{}", yaml);
    }
}
