//! # Pipeline Orchestrator
//!
//! Drives the two workflows:
//!
//! - **prepare**: per project, a pure transform — load and substitute
//!   metadata and tab content, assemble the README, emit both config
//!   documents, gate-check the emitted text, and write the artifact bundle
//!   under `output/publisher/name/`. No git involved.
//! - **publish-all**: regenerate the artifact set for every discovered
//!   project (minus the skip list), then run one clone-wipe-repopulate-
//!   commit-push cycle per destination repository.
//!
//! Per-project state machine: discovered → metadata-loaded → (skip |
//! content-loaded) → assembled → config-emitted → gate-checked → (blocked |
//! written). Skip states are successes with zero artifacts. Blocked is the
//! one failure state that is reported through the outcome instead of an
//! error, so a batch run can finish the remaining projects before exiting
//! non-zero.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::assemble;
use crate::emit::{self, PublishConfig};
use crate::error::Result;
use crate::gate::{GateMode, ReferenceGate, ViolationCollector};
use crate::loader;
use crate::project::{self, Project};
use crate::subst::{SubstitutionSummary, VarSubstituter};
use crate::sync::{self, Synchronizer, DEFAULT_MAX_PUSH_RETRIES};

pub const README_FILE: &str = "README.md";
pub const CONF_FILE: &str = "conf.yaml";
pub const UX_CONF_FILE: &str = "ux-conf.yaml";

/// Terminal state of one project's prepare run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Expected no-op (missing metadata, no content); zero artifacts.
    Skipped(String),
    /// Artifact bundle written.
    Written,
    /// Gate failure under block mode; zero artifacts, run exits non-zero.
    Blocked(usize),
}

impl Outcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Outcome::Blocked(_))
    }
}

/// The prepare-side pipeline: source in, artifact bundles out.
pub struct Pipeline {
    source_root: PathBuf,
    output_dir: PathBuf,
    gate: ReferenceGate,
    mode: GateMode,
}

impl Pipeline {
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        gate: ReferenceGate,
        mode: GateMode,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_dir: output_dir.into(),
            gate,
            mode,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where a project's artifact bundle lands.
    pub fn artifact_dir(&self, project: &Project) -> PathBuf {
        self.output_dir.join(project.path())
    }

    /// Whether a complete artifact bundle already exists for a project.
    pub fn has_artifacts(&self, project: &Project) -> bool {
        let dir = self.artifact_dir(project);
        dir.join(CONF_FILE).is_file() && dir.join(UX_CONF_FILE).is_file()
    }

    /// Run the full prepare transform for one project.
    pub fn prepare_project(
        &self,
        project: &Project,
        collector: &mut ViolationCollector,
    ) -> Result<Outcome> {
        let subst = VarSubstituter::for_project(project);
        let mut summary = SubstitutionSummary::new();

        let Some(metadata) =
            loader::load_metadata(project, &self.source_root, &subst, &mut summary)?
        else {
            return Ok(Outcome::Skipped("metadata.yaml not found".to_string()));
        };

        let contents =
            loader::load_tab_contents(project, &self.source_root, &metadata, &subst, &mut summary)?;

        let mut readme = assemble::assemble(project, &metadata, &contents);
        if readme.is_empty() {
            warn!("{}: no tab content, nothing to generate", project);
            return Ok(Outcome::Skipped("no tab content".to_string()));
        }

        let publish_config = PublishConfig::from_metadata(project, &metadata);
        let conf_yaml = emit::to_yaml(&publish_config)?;
        let ux = emit::ux_config(project, &metadata, &contents);
        let ux_yaml = emit::to_yaml(&ux)?;

        // The gate runs against the emitted descriptor, which embeds every
        // tab's content, before anything is persisted.
        let violations = self.gate.scan(&project.path(), UX_CONF_FILE, &ux_yaml);
        let violation_count = violations.len();
        collector.record(violations);

        if violation_count > 0 {
            match self.mode {
                GateMode::Block => {
                    warn!(
                        "{}: {} forbidden reference(s), artifacts not written",
                        project, violation_count
                    );
                    return Ok(Outcome::Blocked(violation_count));
                }
                GateMode::Allow => {
                    warn!(
                        "{}: {} forbidden reference(s) allowed through",
                        project, violation_count
                    );
                }
                GateMode::Censor => {
                    let (censored, count) = self.gate.censor(&readme);
                    readme = censored;
                    warn!("{}: censored {} forbidden reference(s)", project, count);
                }
            }
        }

        let artifact_dir = self.artifact_dir(project);
        std::fs::create_dir_all(&artifact_dir)?;
        std::fs::write(artifact_dir.join(README_FILE), &readme)?;
        std::fs::write(artifact_dir.join(CONF_FILE), &conf_yaml)?;
        std::fs::write(artifact_dir.join(UX_CONF_FILE), &ux_yaml)?;

        summary.log();
        info!("{}: artifacts written to {}", project, artifact_dir.display());
        Ok(Outcome::Written)
    }

    /// Discover every project under the source root and prepare each one,
    /// skipping those on the skip list.
    pub fn prepare_all(
        &self,
        skip: &[String],
        collector: &mut ViolationCollector,
    ) -> Result<Vec<(Project, Outcome)>> {
        let mut outcomes = Vec::new();
        for project in project::discover(&self.source_root)? {
            if skip.contains(&project.path()) {
                info!("{}: on the skip list, excluded", project);
                outcomes.push((project, Outcome::Skipped("skip list".to_string())));
                continue;
            }
            let outcome = self.prepare_project(&project, collector)?;
            outcomes.push((project, outcome));
        }
        Ok(outcomes)
    }
}

/// What a publish run did, per project and per destination.
#[derive(Debug)]
pub struct PublishReport {
    pub outcomes: Vec<(Project, Outcome)>,
    /// `(alias, pushed)` per destination; `false` means nothing to commit.
    pub destinations: Vec<(String, bool)>,
}

impl PublishReport {
    pub fn blocked_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_blocked()).count()
    }

    pub fn written(&self) -> Vec<&Project> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == Outcome::Written)
            .map(|(p, _)| p)
            .collect()
    }
}

/// Commit message for the batch regeneration cycle.
pub const BATCH_COMMIT_MESSAGE: &str = "chore: Regenerate all playbooks";

/// Regenerate every project's artifacts, then repopulate each destination
/// repository with the rendered READMEs and assets.
///
/// The artifacts directory is recreated from scratch so deletions in source
/// disappear from the destinations too. When `push` is false the run stops
/// after artifact generation.
pub fn publish_all(
    pipeline: &Pipeline,
    sync: &Synchronizer,
    collector: &mut ViolationCollector,
    skip: &[String],
    push: bool,
) -> Result<PublishReport> {
    if pipeline.output_dir().exists() {
        std::fs::remove_dir_all(pipeline.output_dir())?;
    }
    std::fs::create_dir_all(pipeline.output_dir())?;

    let mut outcomes = Vec::new();
    for project in project::discover(pipeline.source_root())? {
        if skip.contains(&project.path()) {
            info!("{}: on the skip list, excluded", project);
            outcomes.push((project, Outcome::Skipped("skip list".to_string())));
            continue;
        }
        let outcome = pipeline.prepare_project(&project, collector)?;
        outcomes.push((project, outcome));
    }

    let report_outcomes = outcomes;
    let written: Vec<Project> = report_outcomes
        .iter()
        .filter(|(_, o)| *o == Outcome::Written)
        .map(|(p, _)| p.clone())
        .collect();

    if !push {
        info!("push disabled, stopping after artifact generation");
        return Ok(PublishReport {
            outcomes: report_outcomes,
            destinations: Vec::new(),
        });
    }

    let src_assets = sync.clone_source_assets()?;
    let destinations = sync.clone_destinations()?;
    let mut pushed = Vec::new();

    for dest in &destinations {
        info!("populating '{}'", dest.repo.alias);
        sync.wipe_worktree(&dest.path)?;

        for project in &written {
            copy_project_readme(pipeline, &dest.path, project)?;
            sync.copy_project_assets(&src_assets, &dest.path, project)?;
        }

        sync.copy_root_files(&src_assets, &dest.path)?;
        sync.copy_root_dirs(pipeline.source_root(), &dest.path)?;
        write_aggregate_readme(pipeline, &written, &dest.path)?;

        let did_push = sync.commit_and_push(
            &dest.path,
            &dest.repo.alias,
            BATCH_COMMIT_MESSAGE,
            DEFAULT_MAX_PUSH_RETRIES,
        )?;
        pushed.push((dest.repo.alias.clone(), did_push));
    }

    Ok(PublishReport {
        outcomes: report_outcomes,
        destinations: pushed,
    })
}

/// Publish one freshly prepared project's README and assets to every
/// destination repository.
///
/// Only the project's own subdirectory is wiped and rewritten; the rest of
/// each destination is left alone apart from root files/dirs and the
/// aggregate README.
pub fn publish_project(
    pipeline: &Pipeline,
    sync: &Synchronizer,
    project: &Project,
) -> Result<Vec<(String, bool)>> {
    let src_assets = sync.clone_source_assets()?;
    let destinations = sync.clone_destinations()?;
    let all_projects = project::discover(pipeline.source_root())?;
    let message = format!("[{}] Update playbook content", project.path());
    let mut pushed = Vec::new();

    for dest in &destinations {
        sync.clean_project_dir(&dest.path, project)?;
        copy_project_readme(pipeline, &dest.path, project)?;
        sync.copy_project_assets(&src_assets, &dest.path, project)?;
        sync.copy_root_files(&src_assets, &dest.path)?;
        sync.copy_root_dirs(pipeline.source_root(), &dest.path)?;
        write_aggregate_readme(pipeline, &all_projects, &dest.path)?;

        let did_push = sync.commit_and_push(
            &dest.path,
            &dest.repo.alias,
            &message,
            DEFAULT_MAX_PUSH_RETRIES,
        )?;
        pushed.push((dest.repo.alias.clone(), did_push));
    }

    Ok(pushed)
}

/// Destination repositories receive the rendered README only. The YAML
/// descriptors stay in the artifacts directory; they travel to the internal
/// catalog through the merge-request flow instead.
fn copy_project_readme(pipeline: &Pipeline, dest_root: &Path, project: &Project) -> Result<()> {
    let project_dir = dest_root.join(project.path());
    std::fs::create_dir_all(&project_dir)?;
    std::fs::copy(
        pipeline.artifact_dir(project).join(README_FILE),
        project_dir.join(README_FILE),
    )?;
    Ok(())
}

/// Regenerate the top-level README in a destination from the template in the
/// source root. Display names come from the freshly generated artifacts,
/// falling back to the source tree's metadata.
fn write_aggregate_readme(
    pipeline: &Pipeline,
    projects: &[Project],
    dest_root: &Path,
) -> Result<()> {
    let template_path = pipeline.source_root().join(sync::README_TEMPLATE);
    let template = match std::fs::read_to_string(&template_path) {
        Ok(text) => text,
        Err(_) => {
            warn!(
                "{} not found in source root, using a minimal header",
                sync::README_TEMPLATE
            );
            "# Playbooks\n".to_string()
        }
    };

    let entries: Vec<(Project, String)> = projects
        .iter()
        .map(|p| {
            let name = if pipeline.has_artifacts(p) {
                sync::project_display_name(pipeline.output_dir(), p)
            } else {
                sync::source_display_name(pipeline.source_root(), p)
            };
            (p.clone(), name)
        })
        .collect();

    let directory = sync::render_directory(&entries);
    let readme = sync::aggregate_readme(&template, &directory);
    std::fs::write(dest_root.join(README_FILE), readme)?;
    Ok(())
}
