//! # Publish Command Implementation
//!
//! Batch full-regeneration cycle: the artifacts directory is rebuilt from
//! scratch for every discovered project (minus the skip list), then each
//! destination repository is cloned once, wiped to its `.git` directory,
//! repopulated from the rendered READMEs plus shared assets and root files,
//! and pushed. The result exactly mirrors current source state, including
//! deletions the per-project incremental mode cannot express. The YAML
//! descriptors stay local; the propose command carries them to the catalog.
//!
//! Pushing is opt-in via `--push`; without it the run stops after artifact
//! generation, which is useful for inspecting the would-be publication
//! locally.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use playbook_converge::gate::{GateMode, ReferenceGate, ViolationCollector};
use playbook_converge::output::{emoji, OutputConfig};
use playbook_converge::pipeline::{self, Outcome, Pipeline};
use playbook_converge::runner::SystemRunner;
use playbook_converge::settings::Settings;
use playbook_converge::sync::{Synchronizer, SystemDelay};

/// Regenerate all artifacts and publish the READMEs to every destination
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Source root containing `publisher/name/metadata.yaml` trees.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_root: PathBuf,

    /// Artifacts directory; recreated from scratch each run.
    #[arg(long, value_name = "DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Clone, repopulate and push the destinations after generating
    /// artifacts. Without this flag the run stops after generation.
    #[arg(long)]
    pub push: bool,

    /// Report forbidden references without failing projects.
    #[arg(long)]
    pub allow_forbidden_refs: bool,

    /// Mask forbidden references in READMEs instead of failing.
    #[arg(long)]
    pub censor_forbidden_refs: bool,

    /// Comma-separated `publisher/name` list to exclude. Overrides the
    /// `SKIP_PROJECTS` / `SKIP_PROJECTS_JSON` environment variables.
    #[arg(long, value_name = "LIST")]
    pub skip_projects: Option<String>,
}

/// Execute the `publish` command.
pub fn execute(args: PublishArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let settings = Settings::from_env()?;
    let skip = settings.skip_projects(args.skip_projects.as_deref())?;
    let mode = GateMode::from_flags(args.allow_forbidden_refs, args.censor_forbidden_refs);
    let gate = ReferenceGate::new(&settings.forbidden_patterns)?;
    let pipeline = Pipeline::new(&args.source_root, &args.artifacts_dir, gate, mode);

    if !skip.is_empty() {
        println!(
            "{} Excluding {} project(s): {}",
            emoji(&out, "⏭️", "[SKIP]"),
            skip.len(),
            skip.join(", ")
        );
    }

    println!(
        "{} Regenerating all playbook artifacts...",
        emoji(&out, "🔄", "[RUN]")
    );

    let runner = SystemRunner::new();
    let delay = SystemDelay;
    let sync = Synchronizer::new(&runner, &delay, &settings, &args.artifacts_dir);
    let mut collector = ViolationCollector::new();

    let report = pipeline::publish_all(&pipeline, &sync, &mut collector, &skip, args.push)?;

    for (project, outcome) in &report.outcomes {
        match outcome {
            Outcome::Written => {
                println!("{} {}", emoji(&out, "✅", "[OK]"), project);
            }
            Outcome::Skipped(reason) => {
                println!("{} {} ({})", emoji(&out, "⏭️", "[SKIP]"), project, reason);
            }
            Outcome::Blocked(count) => {
                println!(
                    "{} {}: {} forbidden reference(s)",
                    emoji(&out, "❌", "[ERR]"),
                    project,
                    count
                );
            }
        }
    }

    if let Some(summary) = collector.render_summary() {
        println!("{}", summary);
    }

    for (alias, did_push) in &report.destinations {
        if *did_push {
            println!("{} '{}': pushed", emoji(&out, "✅", "[OK]"), alias);
        } else {
            println!("{} '{}': no changes", emoji(&out, "ℹ️", "[INFO]"), alias);
        }
    }

    let blocked = report.blocked_count();
    if blocked > 0 {
        bail!("{} project(s) blocked by forbidden references", blocked);
    }

    println!(
        "{} Published {} project(s)",
        emoji(&out, "🎉", "[DONE]"),
        report.written().len()
    );
    Ok(())
}
