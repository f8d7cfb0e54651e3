//! # Project Identity and Discovery
//!
//! A **project** is one publishable unit of playbook content, identified by
//! `publisher/name` and backed by a source directory containing a
//! `metadata.yaml` marker file plus the markdown files it references.
//!
//! Discovery scans exactly two directory levels below the source root
//! (`publisher/project/`) for the marker file; hidden directories are
//! ignored. The discovered set is sorted so repeated runs see projects in a
//! stable order.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Marker file that identifies a directory as a playbook project.
pub const METADATA_FILE: &str = "metadata.yaml";

/// One publishable unit of source content, identified by publisher/name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Project {
    /// Publisher directory name (e.g., "nvidia")
    pub publisher: String,
    /// Project directory name (e.g., "jax")
    pub name: String,
}

impl Project {
    pub fn new(publisher: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            name: name.into(),
        }
    }

    /// The `publisher/name` path used for source, artifact and destination
    /// directory layouts alike.
    pub fn path(&self) -> String {
        format!("{}/{}", self.publisher, self.name)
    }

    /// The project's directory name without the publisher component.
    pub fn basename(&self) -> &str {
        &self.name
    }

    /// The project's source directory under `root`.
    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.publisher).join(&self.name)
    }

    /// Fallback display name derived from the directory name
    /// ("pytorch-fine-tune" -> "Pytorch Fine Tune").
    pub fn title_cased_name(&self) -> String {
        self.name
            .split('-')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.publisher, self.name)
    }
}

impl FromStr for Project {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(publisher), Some(name), None) if !publisher.is_empty() && !name.is_empty() => {
                Ok(Project::new(publisher, name))
            }
            _ => Err(Error::Config {
                message: format!("Invalid project path: '{}'", s),
                hint: Some("Expected 'publisher/name' (e.g., nvidia/jax)".to_string()),
            }),
        }
    }
}

/// Discover all projects under `root` by scanning two directory levels for
/// the metadata marker file.
///
/// Hidden directories (leading '.') are skipped at both levels. Returns a
/// sorted list so output ordering is deterministic across runs.
pub fn discover(root: &Path) -> Result<Vec<Project>> {
    let mut projects = Vec::new();

    for publisher_entry in std::fs::read_dir(root)? {
        let publisher_entry = publisher_entry?;
        let publisher_name = publisher_entry.file_name().to_string_lossy().to_string();
        if !publisher_entry.path().is_dir() || publisher_name.starts_with('.') {
            continue;
        }

        for project_entry in std::fs::read_dir(publisher_entry.path())? {
            let project_entry = project_entry?;
            let project_name = project_entry.file_name().to_string_lossy().to_string();
            if !project_entry.path().is_dir() || project_name.starts_with('.') {
                continue;
            }

            if project_entry.path().join(METADATA_FILE).is_file() {
                projects.push(Project::new(&publisher_name, &project_name));
            }
        }
    }

    projects.sort();
    Ok(projects)
}
