//! # Propose Command Implementation
//!
//! Converge-and-merge-request flow against the catalog repository:
//!
//! 1. Prepare every discovered project in content-only mode.
//! 2. Clone the catalog repository.
//! 3. Copy each project's `conf.yaml` / `ux-conf.yaml` into it.
//! 4. Commit on a timestamped branch and push with upstream tracking.
//! 5. Open a merge request over the hosting API (`--skip-mr` stops after
//!    the push).
//!
//! An already-current catalog (no descriptors copied, or an empty staged
//! diff) exits 0 with nothing to do.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use playbook_converge::gate::{GateMode, ReferenceGate, ViolationCollector};
use playbook_converge::git;
use playbook_converge::mr::{self, MergeRequestSpec, DEFAULT_EXCLUDED_PROJECTS, DEFAULT_TARGET_BRANCH};
use playbook_converge::output::{emoji, OutputConfig};
use playbook_converge::pipeline::{Outcome, Pipeline};
use playbook_converge::runner::SystemRunner;
use playbook_converge::settings::Settings;

/// Converge all projects and open a merge request against the catalog
#[derive(Args, Debug)]
pub struct ProposeArgs {
    /// Source root containing `publisher/name/metadata.yaml` trees.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_root: PathBuf,

    /// Output directory for converged artifacts and the catalog clone.
    #[arg(long, value_name = "DIR", default_value = "convergence-output")]
    pub output_dir: PathBuf,

    /// Catalog repository URL.
    #[arg(long, value_name = "URL")]
    pub catalog_repo: String,

    /// Token for the catalog repository and the hosting API.
    #[arg(long, value_name = "TOKEN", env = "CATALOG_TOKEN", hide_env_values = true)]
    pub catalog_token: String,

    /// Hosting instance base URL for the merge-request API call.
    #[arg(long, value_name = "URL")]
    pub gitlab_url: String,

    /// Hosting project id of the catalog repository.
    #[arg(long, value_name = "ID")]
    pub project_id: String,

    /// Target branch for the merge request.
    #[arg(long, value_name = "BRANCH", default_value = DEFAULT_TARGET_BRANCH)]
    pub target_branch: String,

    /// Report forbidden references without failing projects.
    #[arg(long)]
    pub allow_forbidden_refs: bool,

    /// Exclude a project (`publisher/name`); repeatable. Defaults to the
    /// template project.
    #[arg(long = "exclude", value_name = "PUBLISHER/NAME")]
    pub exclude: Vec<String>,

    /// Push the branch but skip creating the merge request.
    #[arg(long)]
    pub skip_mr: bool,
}

/// Execute the `propose` command.
pub fn execute(args: ProposeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let settings = Settings::from_env()?;
    let exclude = if args.exclude.is_empty() {
        DEFAULT_EXCLUDED_PROJECTS.iter().map(|s| s.to_string()).collect()
    } else {
        args.exclude.clone()
    };

    let mode = GateMode::from_flags(args.allow_forbidden_refs, false);
    let gate = ReferenceGate::new(&settings.forbidden_patterns)?;
    let pipeline = Pipeline::new(&args.source_root, &args.output_dir, gate, mode);

    println!(
        "{} Converging all playbooks...",
        emoji(&out, "📦", "[RUN]")
    );

    let mut collector = ViolationCollector::new();
    let outcomes = pipeline.prepare_all(&exclude, &mut collector)?;

    let written: Vec<_> = outcomes
        .iter()
        .filter(|(_, o)| *o == Outcome::Written)
        .map(|(p, _)| p.clone())
        .collect();
    let blocked = outcomes.iter().filter(|(_, o)| o.is_blocked()).count();

    println!(
        "{} {}/{} playbooks converged",
        emoji(&out, "📊", "[INFO]"),
        written.len(),
        outcomes.len()
    );
    if let Some(summary) = collector.render_summary() {
        println!("{}", summary);
    }
    if blocked > 0 {
        bail!("{} project(s) blocked by forbidden references", blocked);
    }
    if written.is_empty() {
        bail!("no playbooks converged successfully");
    }

    println!(
        "{} Cloning catalog repository...",
        emoji(&out, "📥", "[CLONE]")
    );
    let runner = SystemRunner::new();
    let catalog_dir = args.output_dir.join("catalog-repo");
    let auth_url = git::authenticated_url(&args.catalog_repo, &args.catalog_token)?;
    git::clone(&runner, &auth_url, &catalog_dir)?;

    let copied = mr::copy_descriptors(&pipeline, &written, &catalog_dir)?;
    if copied == 0 {
        println!(
            "{} No descriptor files copied, nothing to propose",
            emoji(&out, "ℹ️", "[INFO]")
        );
        return Ok(());
    }

    let Some(branch) = mr::commit_and_push_branch(&runner, &catalog_dir)? else {
        println!(
            "{} Catalog already current, nothing to propose",
            emoji(&out, "ℹ️", "[INFO]")
        );
        return Ok(());
    };
    println!("{} Pushed branch: {}", emoji(&out, "✅", "[OK]"), branch);

    if args.skip_mr {
        println!(
            "{} Merge request creation skipped",
            emoji(&out, "⏭️", "[SKIP]")
        );
        return Ok(());
    }

    let mr_url = mr::create_merge_request(&MergeRequestSpec {
        gitlab_url: &args.gitlab_url,
        project_id: &args.project_id,
        source_branch: &branch,
        target_branch: &args.target_branch,
        token: &args.catalog_token,
        title: None,
        description: None,
    })?;

    println!("{} Merge Request: {}", emoji(&out, "🎉", "[DONE]"), mr_url);
    Ok(())
}
