//! # Environment-Driven Configuration
//!
//! The pipeline is configured through environment variables supplied by the
//! CI job that runs it:
//!
//! - `SRC_ASSETS_URL` / `SRC_ASSETS_TOKEN` — the source-assets repository.
//! - `DST_REPOS_JSON` — JSON array of destination repository descriptors
//!   (`{alias, url, token_var}`); each `token_var` names another
//!   environment variable holding that repository's token.
//! - `FORBIDDEN_PATTERNS_JSON` — optional wholesale override of the
//!   forbidden-reference patterns. Malformed JSON here falls back to the
//!   defaults with a warning rather than failing the run.
//! - `ROOT_FILE_GLOBS_JSON` / `ROOT_DIRS_JSON` — optional overrides of the
//!   root-level files and directories mirrored into every destination.
//! - `SKIP_PROJECTS` (comma-separated) / `SKIP_PROJECTS_JSON` (JSON array)
//!   — projects excluded from batch publication.
//!
//! Malformed *required* configuration (`DST_REPOS_JSON`) is fatal before any
//! work begins; everything else degrades to defaults.

use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::gate::DEFAULT_FORBIDDEN_PATTERNS;

pub const SRC_ASSETS_URL_VAR: &str = "SRC_ASSETS_URL";
pub const SRC_ASSETS_TOKEN_VAR: &str = "SRC_ASSETS_TOKEN";
pub const DST_REPOS_VAR: &str = "DST_REPOS_JSON";
pub const FORBIDDEN_PATTERNS_VAR: &str = "FORBIDDEN_PATTERNS_JSON";
pub const ROOT_FILE_GLOBS_VAR: &str = "ROOT_FILE_GLOBS_JSON";
pub const ROOT_DIRS_VAR: &str = "ROOT_DIRS_JSON";
pub const SKIP_PROJECTS_VAR: &str = "SKIP_PROJECTS";
pub const SKIP_PROJECTS_JSON_VAR: &str = "SKIP_PROJECTS_JSON";

/// Root-level files mirrored into every destination by default.
pub const DEFAULT_ROOT_FILE_GLOBS: [&str; 3] = ["LICENSE*", "CONTRIBUTING.md", "CODE_OF_CONDUCT.md"];

/// Root-level directories mirrored into every destination by default
/// (shared image assets referenced by the aggregate README).
pub const DEFAULT_ROOT_DIRS: [&str; 1] = ["src"];

/// One destination repository descriptor from `DST_REPOS_JSON`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DestinationRepo {
    /// Short name used for the local clone directory and log lines.
    pub alias: String,
    /// Repository URL (HTTPS or SSH).
    pub url: String,
    /// Name of the environment variable holding this repository's token.
    pub token_var: String,
}

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub src_assets_url: Option<String>,
    pub src_assets_token: Option<String>,
    pub dst_repos: Vec<DestinationRepo>,
    pub forbidden_patterns: Vec<String>,
    pub root_file_globs: Vec<String>,
    pub root_dirs: Vec<String>,
    skip_projects_env: Option<String>,
    skip_projects_json: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings from an explicit lookup (tests inject a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dst_repos = match lookup(DST_REPOS_VAR) {
            Some(json) => serde_json::from_str(&json).map_err(|e| Error::Config {
                message: format!("Error parsing {}: {}", DST_REPOS_VAR, e),
                hint: Some("Expected a JSON array of {alias, url, token_var} objects".to_string()),
            })?,
            None => Vec::new(),
        };

        let forbidden_patterns = match lookup(FORBIDDEN_PATTERNS_VAR) {
            Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
                Ok(patterns) => patterns,
                Err(e) => {
                    warn!("Invalid {}, using defaults: {}", FORBIDDEN_PATTERNS_VAR, e);
                    default_patterns()
                }
            },
            None => default_patterns(),
        };

        let root_file_globs = optional_string_list(
            &lookup,
            ROOT_FILE_GLOBS_VAR,
            &DEFAULT_ROOT_FILE_GLOBS,
        );
        let root_dirs = optional_string_list(&lookup, ROOT_DIRS_VAR, &DEFAULT_ROOT_DIRS);

        Ok(Self {
            src_assets_url: lookup(SRC_ASSETS_URL_VAR),
            src_assets_token: lookup(SRC_ASSETS_TOKEN_VAR),
            dst_repos,
            forbidden_patterns,
            root_file_globs,
            root_dirs,
            skip_projects_env: lookup(SKIP_PROJECTS_VAR),
            skip_projects_json: lookup(SKIP_PROJECTS_JSON_VAR),
        })
    }

    /// The source-assets URL, required for any workflow that clones it.
    pub fn require_src_assets_url(&self) -> Result<&str> {
        self.src_assets_url.as_deref().ok_or(Error::MissingEnv {
            variable: SRC_ASSETS_URL_VAR.to_string(),
        })
    }

    /// The source-assets token, required alongside the URL.
    pub fn require_src_assets_token(&self) -> Result<&str> {
        self.src_assets_token.as_deref().ok_or(Error::MissingEnv {
            variable: SRC_ASSETS_TOKEN_VAR.to_string(),
        })
    }

    /// Projects excluded from batch publication.
    ///
    /// Priority: CLI flag, then the comma-separated env var, then the JSON
    /// env var.
    pub fn skip_projects(&self, cli_value: Option<&str>) -> Result<Vec<String>> {
        if let Some(value) = cli_value {
            return Ok(split_comma_list(value));
        }
        if let Some(value) = &self.skip_projects_env {
            return Ok(split_comma_list(value));
        }
        if let Some(json) = &self.skip_projects_json {
            return Ok(serde_json::from_str(json)?);
        }
        Ok(Vec::new())
    }
}

fn default_patterns() -> Vec<String> {
    DEFAULT_FORBIDDEN_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn optional_string_list<F>(lookup: &F, var: &str, defaults: &[&str]) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
            Ok(list) => list,
            Err(e) => {
                warn!("Invalid {}, using defaults: {}", var, e);
                defaults.iter().map(|s| s.to_string()).collect()
            }
        },
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
