//! # CLI Command Implementations
//!
//! One module per subcommand. Each defines an `Args` struct (clap derive)
//! and an `execute` function that drives the library: `prepare` for the
//! per-project workflow, `publish` for the batch regeneration cycle and
//! `propose` for the converge-and-merge-request flow.

pub mod prepare;
pub mod propose;
pub mod publish;
