//! # Prepare Command Implementation
//!
//! Generates one project's publication artifacts: README, `conf.yaml` and
//! `ux-conf.yaml` under the output directory. With `--prepare-only` (the CI
//! per-project job) that is all; without it the rendered README and assets
//! are also pushed to every configured destination repository. The YAML
//! descriptors stay local; the propose command carries them to the catalog.
//!
//! Gate behavior is selected with `--allow-forbidden-refs` /
//! `--censor-forbidden-refs`; the default blocks the project on any
//! violation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use playbook_converge::error::Error;
use playbook_converge::gate::{GateMode, ReferenceGate, ViolationCollector};
use playbook_converge::output::{emoji, OutputConfig};
use playbook_converge::pipeline::{self, Outcome, Pipeline};
use playbook_converge::project::Project;
use playbook_converge::runner::SystemRunner;
use playbook_converge::settings::Settings;
use playbook_converge::sync::{Synchronizer, SystemDelay};

/// Generate one project's publication artifacts
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Project to prepare, as `publisher/name`.
    #[arg(long, value_name = "PUBLISHER/NAME")]
    pub project: String,

    /// Source root containing `publisher/name/metadata.yaml` trees.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_root: PathBuf,

    /// Directory the artifact bundle is written under.
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Report forbidden references without failing the project.
    #[arg(long)]
    pub allow_forbidden_refs: bool,

    /// Mask forbidden references in the README instead of failing.
    #[arg(long)]
    pub censor_forbidden_refs: bool,

    /// Stop after writing artifacts; skip all git operations.
    #[arg(long)]
    pub prepare_only: bool,
}

/// Execute the `prepare` command.
pub fn execute(args: PrepareArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let project: Project = args.project.parse()?;
    let settings = Settings::from_env()?;
    let mode = GateMode::from_flags(args.allow_forbidden_refs, args.censor_forbidden_refs);
    let gate = ReferenceGate::new(&settings.forbidden_patterns)?;
    let pipeline = Pipeline::new(&args.source_root, &args.output_dir, gate, mode);

    println!("{} Preparing {}...", emoji(&out, "🔄", "[RUN]"), project);

    let mut collector = ViolationCollector::new();
    let outcome = pipeline.prepare_project(&project, &mut collector)?;

    if let Some(summary) = collector.render_summary() {
        println!("{}", summary);
    }

    match outcome {
        Outcome::Skipped(reason) => {
            println!(
                "{} {} skipped: {}",
                emoji(&out, "⏭️", "[SKIP]"),
                project,
                reason
            );
            return Ok(());
        }
        Outcome::Blocked(count) => {
            println!(
                "{} Use --allow-forbidden-refs or --censor-forbidden-refs to override",
                emoji(&out, "💡", "[HINT]")
            );
            return Err(Error::GateBlocked {
                project: project.path(),
                count,
            }
            .into());
        }
        Outcome::Written => {
            println!(
                "{} Artifacts written to {}",
                emoji(&out, "✅", "[OK]"),
                pipeline.artifact_dir(&project).display()
            );
        }
    }

    if args.prepare_only {
        return Ok(());
    }

    println!(
        "{} Publishing {} to {} destination(s)...",
        emoji(&out, "📤", "[PUSH]"),
        project,
        settings.dst_repos.len()
    );

    let runner = SystemRunner::new();
    let delay = SystemDelay;
    let sync = Synchronizer::new(&runner, &delay, &settings, &args.output_dir);
    let pushed = pipeline::publish_project(&pipeline, &sync, &project)?;

    for (alias, did_push) in pushed {
        if did_push {
            println!("{} '{}': pushed", emoji(&out, "✅", "[OK]"), alias);
        } else {
            println!("{} '{}': no changes", emoji(&out, "ℹ️", "[INFO]"), alias);
        }
    }

    Ok(())
}
