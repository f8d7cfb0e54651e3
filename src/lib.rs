//! # Playbook Converge Library
//!
//! Core functionality for converging playbook source content into
//! publication artifacts and synchronizing them to destination
//! repositories. Used by the `playbook-converge` command-line tool but
//! usable from other applications that need the same pipeline.
//!
//! ## Core Concepts
//!
//! - **Projects (`project`)**: a playbook is identified by
//!   `publisher/name` and discovered by scanning two directory levels for
//!   a `metadata.yaml` marker.
//! - **Substitution (`subst`)**: `${NAME}` placeholders in metadata and
//!   markdown resolve from the environment, filtered by a variable-name
//!   prefix plus a small bare allow-list; unknown placeholders stay
//!   verbatim.
//! - **Loading and assembly (`config`, `loader`, `assemble`)**: typed
//!   metadata, per-tab markdown content, and the single assembled README
//!   with its table of contents and shifted headings.
//! - **Emission (`emit`)**: the two build-site descriptors, `conf.yaml`
//!   and `ux-conf.yaml`, with tab content embedded as literal block
//!   scalars.
//! - **Gating (`gate`)**: emitted text is scanned for internal-only
//!   references before anything is persisted; block, allow and censor
//!   modes.
//! - **Synchronization (`runner`, `git`, `sync`)**: destination clones are
//!   wiped, repopulated and pushed under a rebase-retry protocol that
//!   tolerates concurrent pipeline instances.
//! - **Orchestration (`pipeline`, `mr`)**: the per-project prepare
//!   workflow, the batch publish-all cycle, and the catalog merge-request
//!   proposal flow.

pub mod assemble;
pub mod config;
pub mod emit;
pub mod error;
pub mod gate;
pub mod git;
pub mod loader;
pub mod mr;
pub mod output;
pub mod pipeline;
pub mod project;
pub mod runner;
pub mod settings;
pub mod subst;
pub mod sync;

#[cfg(test)]
mod subst_proptest;
