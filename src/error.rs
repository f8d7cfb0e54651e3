//! # Error Handling
//!
//! Centralized error handling for the `playbook-converge` application, built
//! on `thiserror`. The `Error` enum covers every anticipated failure mode:
//!
//! - Environment/configuration errors (missing variables, malformed JSON).
//! - Git clone and git command failures.
//! - Subprocess timeouts (always fatal, never retried silently).
//! - Push retry exhaustion against a destination repository.
//! - Forbidden-reference gate blocks.
//! - HTTP failures when opening a merge request.
//! - Wrapped I/O, YAML, JSON, regex, glob and URL errors.
//!
//! Variants carry enough context (repository alias, command line, attempt
//! count) that a fatal condition prints the specific failing step before the
//! process exits non-zero.

use thiserror::Error;

/// Main error type for playbook-converge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value from the environment was missing or malformed.
    ///
    /// Includes an optional hint about how to fix the issue.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A required environment variable was not set.
    #[error("Missing required environment variable: {variable}")]
    MissingEnv { variable: String },

    /// An error occurred while cloning a Git repository.
    ///
    /// The URL is reported with any embedded credentials masked.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A subprocess exceeded its timeout and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimeout { command: String, seconds: u64 },

    /// Pushing to a destination repository failed after all retry attempts.
    #[error("Push to '{alias}' failed after {attempts} attempt(s)")]
    PushExhausted { alias: String, attempts: u32 },

    /// The forbidden-reference gate blocked a project.
    #[error("Forbidden references detected in {project}: {count} violation(s) (gate mode: block)")]
    GateBlocked { project: String, count: usize },

    /// An error occurred during an HTTP request.
    #[error("HTTP request failed for {url}: {message}")]
    Http { url: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
