//! # Multi-Repo Synchronizer
//!
//! Clones, cleans, populates and pushes the destination repositories. Two
//! call patterns share this module:
//!
//! - *Per-project full mode*: wipe the project's subdirectory in each
//!   destination so source deletions are reflected, write the generated
//!   README, copy the project's asset subtree through from the source-assets
//!   clone, mirror the root files/directories, regenerate the aggregate
//!   README and push.
//! - *Batch full-regeneration mode*: wipe each destination's entire worktree
//!   (except `.git`) and repopulate it from the complete artifact set, so
//!   the destination exactly mirrors current source state.
//!
//! ## Push protocol
//!
//! Stage everything; an empty staged diff skips the commit and push with no
//! error. Otherwise commit and attempt the push under a bounded retry loop.
//! A pull-with-rebase runs before *every* attempt (including the first) to
//! minimize the race window against concurrent pipeline instances pushing
//! the same branch; failures back off for a randomized, attempt-scaled
//! interval. A small randomized delay before the first attempt
//! de-synchronizes parallel jobs that finish around the same time. Subprocess
//! timeouts are fatal immediately — only ordinary git failures are retried.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use rand::Rng;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::git;
use crate::project::Project;
use crate::runner::CommandRunner;
use crate::settings::{DestinationRepo, Settings};

/// Default bound on push attempts per destination.
pub const DEFAULT_MAX_PUSH_RETRIES: u32 = 3;

/// Insertion marker for the generated directory in the aggregate README
/// template.
pub const TOC_MARKER: &str = "<!-- TABLE OF CONTENTS GENERATED BELOW -->";

/// Heading that also serves as an insertion point when the marker is absent.
pub const TOC_HEADING: &str = "## Available Playbooks";

/// Aggregate README template file in the source root.
pub const README_TEMPLATE: &str = "README-Public.md";

/// Sleep seam so retry/backoff logic is testable without real waiting.
pub trait Delay {
    fn sleep(&self, duration: Duration);
}

/// Production delay: actually sleeps.
#[derive(Debug, Default)]
pub struct SystemDelay;

impl Delay for SystemDelay {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Randomized pre-push stagger (1-30s) to spread out parallel jobs.
fn stagger_delay() -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(1..=30))
}

/// Randomized, attempt-scaled backoff after a failed push attempt.
fn retry_delay(attempt: u32) -> Duration {
    let base = rand::thread_rng().gen_range(10..=30);
    Duration::from_secs(base * attempt as u64)
}

/// A destination repository together with its local clone.
#[derive(Debug)]
pub struct DestinationClone {
    pub repo: DestinationRepo,
    pub path: PathBuf,
}

/// Owns the git-facing half of a publication run.
pub struct Synchronizer<'a> {
    runner: &'a dyn CommandRunner,
    delay: &'a dyn Delay,
    settings: &'a Settings,
    /// Directory local clones are created under.
    work_dir: PathBuf,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        delay: &'a dyn Delay,
        settings: &'a Settings,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            delay,
            settings,
            work_dir: work_dir.into(),
        }
    }

    fn token_for(&self, repo: &DestinationRepo) -> Result<String> {
        std::env::var(&repo.token_var).map_err(|_| Error::MissingEnv {
            variable: repo.token_var.clone(),
        })
    }

    /// Clone every destination repository once.
    pub fn clone_destinations(&self) -> Result<Vec<DestinationClone>> {
        let mut clones = Vec::new();
        for repo in &self.settings.dst_repos {
            let token = self.token_for(repo)?;
            let auth_url = git::authenticated_url(&repo.url, &token)?;
            let path = self.work_dir.join(format!("publish-{}", repo.alias));
            info!("cloning destination '{}'", repo.alias);
            git::clone(self.runner, &auth_url, &path)?;
            clones.push(DestinationClone {
                repo: repo.clone(),
                path,
            });
        }
        Ok(clones)
    }

    /// Clone the shared source-assets repository.
    pub fn clone_source_assets(&self) -> Result<PathBuf> {
        let url = self.settings.require_src_assets_url()?;
        let token = self.settings.require_src_assets_token()?;
        let auth_url = git::authenticated_url(url, token)?;
        let path = self.work_dir.join("source-assets");
        info!("cloning source assets repository");
        git::clone(self.runner, &auth_url, &path)?;
        Ok(path)
    }

    /// Remove and recreate a project's subdirectory in a destination so
    /// stale content (including source deletions) disappears.
    pub fn clean_project_dir(&self, dest_root: &Path, project: &Project) -> Result<PathBuf> {
        let project_dir = dest_root.join(project.path());
        if project_dir.exists() {
            std::fs::remove_dir_all(&project_dir)?;
        }
        std::fs::create_dir_all(&project_dir)?;
        Ok(project_dir)
    }

    /// Empty a destination worktree entirely, keeping only `.git`.
    pub fn wipe_worktree(&self, dest_root: &Path) -> Result<()> {
        for entry in std::fs::read_dir(dest_root)? {
            let entry = entry?;
            if entry.file_name() == ".git" {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Copy a project's asset subtree from the source-assets clone into a
    /// destination. Projects without assets are a silent no-op.
    pub fn copy_project_assets(
        &self,
        src_assets: &Path,
        dest_root: &Path,
        project: &Project,
    ) -> Result<()> {
        let assets_dir = src_assets.join(project.basename()).join("assets");
        if !assets_dir.is_dir() {
            info!("{}: no assets in source-assets repository", project);
            return Ok(());
        }

        let dest_assets = dest_root.join(project.path()).join("assets");
        if dest_assets.exists() {
            std::fs::remove_dir_all(&dest_assets)?;
        }
        copy_tree(&assets_dir, &dest_assets)
    }

    /// Mirror root-level files (license, contribution docs) from the
    /// source-assets clone into a destination root.
    pub fn copy_root_files(&self, src_assets: &Path, dest_root: &Path) -> Result<()> {
        let mut copied = 0usize;
        for pattern in &self.settings.root_file_globs {
            let full_pattern = src_assets.join(pattern);
            for entry in glob::glob(&full_pattern.to_string_lossy())? {
                let src_file = entry.map_err(|e| Error::Config {
                    message: format!("Error expanding root file glob: {}", e),
                    hint: None,
                })?;
                if !src_file.is_file() {
                    continue;
                }
                let name = src_file.file_name().unwrap_or_default();
                std::fs::copy(&src_file, dest_root.join(name))?;
                copied += 1;
            }
        }
        if copied == 0 {
            warn!(
                "no root files matched {:?} in the source-assets repository",
                self.settings.root_file_globs
            );
        }
        Ok(())
    }

    /// Mirror root-level directories (shared image assets) from the source
    /// root into a destination root.
    pub fn copy_root_dirs(&self, source_root: &Path, dest_root: &Path) -> Result<()> {
        for dir_name in &self.settings.root_dirs {
            let src_dir = source_root.join(dir_name);
            if !src_dir.is_dir() {
                warn!("root directory '{}' not found in source root", dir_name);
                continue;
            }
            let dest_dir = dest_root.join(dir_name);
            if dest_dir.exists() {
                std::fs::remove_dir_all(&dest_dir)?;
            }
            copy_tree(&src_dir, &dest_dir)?;
        }
        Ok(())
    }

    /// Stage, commit and push a destination with the race-tolerant retry
    /// protocol. Returns `Ok(false)` when there was nothing to commit.
    pub fn commit_and_push(
        &self,
        dest_root: &Path,
        alias: &str,
        message: &str,
        max_retries: u32,
    ) -> Result<bool> {
        git::stage_all(self.runner, dest_root)?;

        if git::staged_is_empty(self.runner, dest_root)? {
            info!("'{}': no changes to commit", alias);
            return Ok(false);
        }

        git::commit(self.runner, dest_root, message)?;

        // De-synchronize parallel jobs that finish around the same time.
        self.delay.sleep(stagger_delay());

        for attempt in 1..=max_retries {
            if attempt > 1 {
                info!("'{}': push retry {}/{}", alias, attempt, max_retries);
            }

            // Rebase before every attempt, including the first, to shrink
            // the race window against concurrent pushes.
            let result = git::pull_rebase(self.runner, dest_root)
                .and_then(|_| git::push(self.runner, dest_root));

            match result {
                Ok(()) => {
                    info!("'{}': pushed", alias);
                    return Ok(true);
                }
                Err(err @ Error::CommandTimeout { .. }) => return Err(err),
                Err(Error::GitCommand { command, stderr }) => {
                    warn!("'{}': {} failed: {}", alias, command, stderr);
                    if attempt < max_retries {
                        self.delay.sleep(retry_delay(attempt));
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(Error::PushExhausted {
            alias: alias.to_string(),
            attempts: max_retries,
        })
    }
}

/// Recursively copy a directory tree.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| Error::Config {
            message: format!("Error walking {}: {}", src.display(), e),
            hint: None,
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Read a project's display name from its generated `ux-conf.yaml`,
/// falling back to a title-cased directory name.
pub fn project_display_name(artifacts_dir: &Path, project: &Project) -> String {
    let ux_conf = artifacts_dir.join(project.path()).join("ux-conf.yaml");
    if let Ok(text) = std::fs::read_to_string(&ux_conf) {
        if let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(&text) {
            if let Some(name) = value.get("displayName").and_then(|v| v.as_str()) {
                return name.to_string();
            }
        }
    }
    project.title_cased_name()
}

/// Read a project's display name from its source `metadata.yaml`, falling
/// back to a title-cased directory name. Used for directory entries whose
/// artifacts were not regenerated in this run.
pub fn source_display_name(source_root: &Path, project: &Project) -> String {
    let metadata = project.source_dir(source_root).join("metadata.yaml");
    if let Ok(text) = std::fs::read_to_string(&metadata) {
        if let Ok(value) = serde_yaml::from_str::<serde_yaml::Value>(&text) {
            if let Some(name) = value.get("displayName").and_then(|v| v.as_str()) {
                return name.to_string();
            }
        }
    }
    project.title_cased_name()
}

/// Render the project directory listing, grouped by publisher and sorted by
/// display name within each group.
pub fn render_directory(entries: &[(Project, String)]) -> String {
    let mut by_publisher: std::collections::BTreeMap<&str, Vec<(&String, &Project)>> =
        std::collections::BTreeMap::new();
    for (project, display_name) in entries {
        by_publisher
            .entry(project.publisher.as_str())
            .or_default()
            .push((display_name, project));
    }

    let mut lines = Vec::new();
    for (publisher, mut projects) in by_publisher {
        lines.push(format!("### {}", publisher.to_uppercase()));
        lines.push(String::new());
        projects.sort();
        for (display_name, project) in projects {
            lines.push(format!("- [{}]({}/)", display_name, project.path()));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Insert the generated directory into the aggregate README template.
///
/// The directory replaces the comment marker when present, otherwise lands
/// after the directory heading; when neither exists, a new section is
/// appended.
pub fn aggregate_readme(template: &str, directory: &str) -> String {
    let mut result_lines: Vec<String> = Vec::new();
    let mut inserted = false;

    for line in template.lines() {
        if !inserted && line.trim() == TOC_MARKER {
            result_lines.push(directory.to_string());
            inserted = true;
            continue;
        }
        result_lines.push(line.to_string());
        if !inserted && line.trim().starts_with(TOC_HEADING) {
            result_lines.push(String::new());
            result_lines.push(directory.to_string());
            inserted = true;
        }
    }

    if !inserted {
        result_lines.push(String::new());
        result_lines.push(TOC_HEADING.to_string());
        result_lines.push(String::new());
        result_lines.push(directory.to_string());
    }

    result_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, CommandRequest};
    use crate::settings::Settings;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// No-op delay so retry tests finish instantly.
    struct NoDelay;
    impl Delay for NoDelay {
        fn sleep(&self, _duration: Duration) {}
    }

    /// Scripted runner: pops one canned output per invocation (default ok)
    /// and records every request.
    struct FakeRunner {
        requests: RefCell<Vec<CommandRequest>>,
        script: RefCell<Vec<CommandOutput>>,
    }

    impl FakeRunner {
        fn new(script: Vec<CommandOutput>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                script: RefCell::new(script),
            }
        }

        fn ok() -> CommandOutput {
            CommandOutput {
                status_code: 0,
                ..Default::default()
            }
        }

        fn fail(stderr: &str) -> CommandOutput {
            CommandOutput {
                status_code: 1,
                stderr: stderr.to_string(),
                ..Default::default()
            }
        }

        fn command_lines(&self) -> Vec<String> {
            self.requests
                .borrow()
                .iter()
                .map(|r| {
                    let mut parts = vec![r.program.clone()];
                    parts.extend(r.args.iter().cloned());
                    parts.join(" ")
                })
                .collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, request: &CommandRequest) -> Result<CommandOutput> {
            self.requests.borrow_mut().push(request.clone());
            let mut script = self.script.borrow_mut();
            if script.is_empty() {
                Ok(FakeRunner::ok())
            } else {
                Ok(script.remove(0))
            }
        }
    }

    fn settings() -> Settings {
        Settings::from_lookup(|_| None).unwrap()
    }

    fn synchronizer<'a>(
        runner: &'a FakeRunner,
        delay: &'a NoDelay,
        settings: &'a Settings,
        work_dir: &Path,
    ) -> Synchronizer<'a> {
        Synchronizer::new(runner, delay, settings, work_dir)
    }

    #[test]
    fn test_empty_staged_diff_skips_commit_and_push() {
        let temp = TempDir::new().unwrap();
        // add -A ok; diff --staged --quiet exits 0 (empty)
        let runner = FakeRunner::new(vec![FakeRunner::ok(), FakeRunner::ok()]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let pushed = sync
            .commit_and_push(temp.path(), "github", "msg", DEFAULT_MAX_PUSH_RETRIES)
            .unwrap();
        assert!(!pushed);

        let commands = runner.command_lines();
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| !c.contains("push")));
        assert!(commands.iter().all(|c| !c.contains("commit")));
    }

    #[test]
    fn test_push_retry_rebases_before_every_attempt() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new(vec![
            FakeRunner::ok(),               // add -A
            FakeRunner::fail(""),           // diff --staged --quiet: changes exist
            FakeRunner::ok(),               // commit
            FakeRunner::ok(),               // pull --rebase (attempt 1)
            FakeRunner::fail("rejected"),   // push (attempt 1 fails)
            FakeRunner::ok(),               // pull --rebase (attempt 2)
            FakeRunner::ok(),               // push (attempt 2 succeeds)
        ]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let pushed = sync
            .commit_and_push(temp.path(), "github", "msg", DEFAULT_MAX_PUSH_RETRIES)
            .unwrap();
        assert!(pushed);

        let commands = runner.command_lines();
        let pulls: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.contains("pull --rebase"))
            .map(|(i, _)| i)
            .collect();
        let pushes: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.ends_with("push"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(pulls.len(), 2);
        assert_eq!(pushes.len(), 2);
        // Every push is immediately preceded by a rebase-pull
        for (pull, push) in pulls.iter().zip(pushes.iter()) {
            assert!(pull < push);
        }
    }

    #[test]
    fn test_push_exhaustion_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut script = vec![
            FakeRunner::ok(),     // add -A
            FakeRunner::fail(""), // diff: changes exist
            FakeRunner::ok(),     // commit
        ];
        for _ in 0..DEFAULT_MAX_PUSH_RETRIES {
            script.push(FakeRunner::ok()); // pull --rebase
            script.push(FakeRunner::fail("rejected")); // push
        }
        let runner = FakeRunner::new(script);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let err = sync
            .commit_and_push(temp.path(), "github", "msg", DEFAULT_MAX_PUSH_RETRIES)
            .unwrap_err();
        assert!(matches!(err, Error::PushExhausted { attempts: 3, .. }));
    }

    #[test]
    fn test_clean_project_dir_removes_stale_content() {
        let temp = TempDir::new().unwrap();
        let project = Project::new("nvidia", "jax");
        let stale = temp.path().join("nvidia/jax/stale.md");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let runner = FakeRunner::new(vec![]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let dir = sync.clean_project_dir(temp.path(), &project).unwrap();
        assert!(dir.is_dir());
        assert!(!stale.exists());
    }

    #[test]
    fn test_wipe_worktree_keeps_git_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "cfg").unwrap();
        fs::create_dir_all(temp.path().join("nvidia/jax")).unwrap();
        fs::write(temp.path().join("README.md"), "x").unwrap();

        let runner = FakeRunner::new(vec![]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());
        sync.wipe_worktree(temp.path()).unwrap();

        assert!(temp.path().join(".git/config").exists());
        assert!(!temp.path().join("README.md").exists());
        assert!(!temp.path().join("nvidia").exists());
    }

    #[test]
    fn test_copy_project_assets_missing_is_noop() {
        let temp = TempDir::new().unwrap();
        let src_assets = temp.path().join("source-assets");
        let dest = temp.path().join("dest");
        fs::create_dir_all(&src_assets).unwrap();
        fs::create_dir_all(&dest).unwrap();

        let runner = FakeRunner::new(vec![]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let project = Project::new("nvidia", "jax");
        sync.copy_project_assets(&src_assets, &dest, &project).unwrap();
        assert!(!dest.join("nvidia/jax/assets").exists());
    }

    #[test]
    fn test_copy_project_assets_copies_tree() {
        let temp = TempDir::new().unwrap();
        let src_assets = temp.path().join("source-assets");
        let dest = temp.path().join("dest");
        fs::create_dir_all(src_assets.join("jax/assets/img")).unwrap();
        fs::write(src_assets.join("jax/assets/img/demo.png"), "png").unwrap();
        fs::create_dir_all(&dest).unwrap();

        let runner = FakeRunner::new(vec![]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());

        let project = Project::new("nvidia", "jax");
        sync.copy_project_assets(&src_assets, &dest, &project).unwrap();
        assert!(dest.join("nvidia/jax/assets/img/demo.png").exists());
    }

    #[test]
    fn test_copy_root_files_matches_globs() {
        let temp = TempDir::new().unwrap();
        let src_assets = temp.path().join("source-assets");
        let dest = temp.path().join("dest");
        fs::create_dir_all(&src_assets).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(src_assets.join("LICENSE.txt"), "license").unwrap();
        fs::write(src_assets.join("CONTRIBUTING.md"), "contrib").unwrap();
        fs::write(src_assets.join("unrelated.bin"), "skip").unwrap();

        let runner = FakeRunner::new(vec![]);
        let delay = NoDelay;
        let config = settings();
        let sync = synchronizer(&runner, &delay, &config, temp.path());
        sync.copy_root_files(&src_assets, &dest).unwrap();

        assert!(dest.join("LICENSE.txt").exists());
        assert!(dest.join("CONTRIBUTING.md").exists());
        assert!(!dest.join("unrelated.bin").exists());
    }

    #[test]
    fn test_render_directory_groups_by_publisher() {
        let entries = vec![
            (Project::new("nvidia", "jax"), "JAX on Spark".to_string()),
            (Project::new("nvidia", "txt2kg"), "Text to KG".to_string()),
            (Project::new("partner", "demo"), "Partner Demo".to_string()),
        ];
        let directory = render_directory(&entries);
        assert!(directory.contains("### NVIDIA"));
        assert!(directory.contains("### PARTNER"));
        assert!(directory.contains("- [JAX on Spark](nvidia/jax/)"));
        assert!(directory.contains("- [Partner Demo](partner/demo/)"));
        let nvidia_pos = directory.find("### NVIDIA").unwrap();
        let partner_pos = directory.find("### PARTNER").unwrap();
        assert!(nvidia_pos < partner_pos);
    }

    #[test]
    fn test_aggregate_readme_replaces_marker() {
        let template = format!("# Playbooks\n\n{}\n\nFooter\n", TOC_MARKER);
        let result = aggregate_readme(&template, "### NVIDIA\n- [X](nvidia/x/)");
        assert!(!result.contains(TOC_MARKER));
        assert!(result.contains("- [X](nvidia/x/)"));
        assert!(result.contains("Footer"));
    }

    #[test]
    fn test_aggregate_readme_inserts_after_heading() {
        let template = format!("# Playbooks\n\n{}\n\nFooter\n", TOC_HEADING);
        let result = aggregate_readme(&template, "DIRECTORY");
        let heading_pos = result.find(TOC_HEADING).unwrap();
        let directory_pos = result.find("DIRECTORY").unwrap();
        let footer_pos = result.find("Footer").unwrap();
        assert!(heading_pos < directory_pos);
        assert!(directory_pos < footer_pos);
    }

    #[test]
    fn test_aggregate_readme_appends_without_insertion_point() {
        let result = aggregate_readme("# Plain template\n", "DIRECTORY");
        assert!(result.contains(TOC_HEADING));
        assert!(result.ends_with("DIRECTORY"));
    }

    #[test]
    fn test_project_display_name_from_artifact() {
        let temp = TempDir::new().unwrap();
        let project = Project::new("nvidia", "jax");
        let dir = temp.path().join("nvidia/jax");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ux-conf.yaml"), "displayName: JAX on Spark\n").unwrap();

        assert_eq!(project_display_name(temp.path(), &project), "JAX on Spark");
    }

    #[test]
    fn test_source_display_name_from_metadata() {
        let temp = TempDir::new().unwrap();
        let project = Project::new("nvidia", "jax");
        let dir = temp.path().join("nvidia/jax");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("metadata.yaml"), "displayName: JAX on Spark\n").unwrap();

        assert_eq!(source_display_name(temp.path(), &project), "JAX on Spark");
        let ghost = Project::new("nvidia", "txt2kg");
        assert_eq!(source_display_name(temp.path(), &ghost), "Txt2kg");
    }

    #[test]
    fn test_project_display_name_fallback() {
        let temp = TempDir::new().unwrap();
        let project = Project::new("nvidia", "pytorch-fine-tune");
        assert_eq!(
            project_display_name(temp.path(), &project),
            "Pytorch Fine Tune"
        );
    }
}
