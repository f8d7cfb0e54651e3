//! # Merge-Request Proposal
//!
//! End-to-end flow behind the `propose` command: converge every project in
//! content-only mode, clone the catalog repository, copy each project's two
//! generated YAML descriptors into it, commit them on a timestamped branch,
//! push with upstream tracking and open a merge request over the hosting
//! API.
//!
//! Two early-exit successes: no descriptors copied, or an empty staged diff
//! after copying. Both mean the catalog is already current.

use std::path::Path;

use chrono::Local;
use log::{info, warn};

use crate::error::{Error, Result};
use crate::git;
use crate::pipeline::{Pipeline, CONF_FILE, UX_CONF_FILE};
use crate::project::Project;
use crate::runner::CommandRunner;

/// Branch the merge request targets unless overridden.
pub const DEFAULT_TARGET_BRANCH: &str = "main";

/// Projects excluded from catalog proposals by default.
pub const DEFAULT_EXCLUDED_PROJECTS: [&str; 1] = ["nvidia/a-template-project"];

/// Timestamped branch name for one proposal run.
pub fn proposal_branch_name() -> String {
    format!("update-playbooks-{}", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Commit message carrying the proposal timestamp.
pub fn proposal_commit_message() -> String {
    format!(
        "Update playbook YAML files - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Copy each project's generated descriptors into the catalog clone.
///
/// Missing descriptors are warned and skipped; returns how many files were
/// copied.
pub fn copy_descriptors(
    pipeline: &Pipeline,
    projects: &[Project],
    catalog_root: &Path,
) -> Result<usize> {
    let mut copied = 0usize;

    for project in projects {
        let artifact_dir = pipeline.artifact_dir(project);
        let dest_dir = catalog_root.join(project.path());
        std::fs::create_dir_all(&dest_dir)?;

        for file in [CONF_FILE, UX_CONF_FILE] {
            let source = artifact_dir.join(file);
            if !source.is_file() {
                warn!("{}: {} not found, skipping", project, file);
                continue;
            }
            std::fs::copy(&source, dest_dir.join(file))?;
            copied += 1;
        }
    }

    info!("copied {} descriptor file(s) into the catalog clone", copied);
    Ok(copied)
}

/// Branch, commit and push the copied descriptors.
///
/// Returns `Ok(None)` when the staged diff is empty (catalog already
/// current), otherwise the pushed branch name.
pub fn commit_and_push_branch(
    runner: &dyn CommandRunner,
    catalog_root: &Path,
) -> Result<Option<String>> {
    let branch = proposal_branch_name();
    git::checkout_new_branch(runner, catalog_root, &branch)?;
    git::stage_all(runner, catalog_root)?;

    if git::staged_is_empty(runner, catalog_root)? {
        info!("no changes against the catalog, nothing to propose");
        return Ok(None);
    }

    git::commit(runner, catalog_root, &proposal_commit_message())?;
    git::push_upstream(runner, catalog_root, &branch)?;
    Ok(Some(branch))
}

/// Parameters for one merge-request creation call.
#[derive(Debug)]
pub struct MergeRequestSpec<'a> {
    pub gitlab_url: &'a str,
    pub project_id: &'a str,
    pub source_branch: &'a str,
    pub target_branch: &'a str,
    pub token: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Open a merge request via the hosting API, returning its web URL.
pub fn create_merge_request(spec: &MergeRequestSpec) -> Result<String> {
    let api_url = format!(
        "{}/api/v4/projects/{}/merge_requests",
        spec.gitlab_url.trim_end_matches('/'),
        spec.project_id
    );

    let title = spec
        .title
        .map(String::from)
        .unwrap_or_else(|| format!("Update playbook YAML files - {}", Local::now().format("%Y-%m-%d")));
    let description = spec.description.unwrap_or(
        "Automated update of playbook configuration files (conf.yaml and ux-conf.yaml)",
    );

    let body = serde_json::json!({
        "source_branch": spec.source_branch,
        "target_branch": spec.target_branch,
        "title": title,
        "description": description,
        "remove_source_branch": true,
    });

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&api_url)
        .header("PRIVATE-TOKEN", spec.token)
        .json(&body)
        .send()
        .map_err(|e| Error::Http {
            url: api_url.clone(),
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().unwrap_or_default();
        return Err(Error::Http {
            url: api_url,
            message: format!("{}: {}", status, text),
        });
    }

    let payload: serde_json::Value = response.json().map_err(|e| Error::Http {
        url: api_url.clone(),
        message: e.to_string(),
    })?;
    let web_url = payload
        .get("web_url")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    info!("merge request created: {}", web_url);
    Ok(web_url)
}
