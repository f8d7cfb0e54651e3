//! # Variable Substitution Engine
//!
//! Resolves `${NAME}` placeholders in arbitrary nested YAML structures
//! (mappings, sequences, strings). Substitution is gated: a name is resolved
//! only if it starts with the configured prefix (default `GITLAB_`) or is in
//! the bare allow-list (default: the project-identity variable `PROJECT`).
//! Everything else is left byte-identical, including placeholders sitting
//! next to resolved ones in the same string — partial substitution is
//! expected and correct.
//!
//! Substitution is idempotent: resolved text never reintroduces `${...}`
//! syntax that matches a live variable name. This holds as a tested
//! invariant (see `subst_proptest`).
//!
//! A [`SubstitutionSummary`] records which variable names were resolved;
//! names that look secret-like are masked when the summary is logged.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use log::info;
use regex::Regex;
use serde_yaml::Value;

use crate::project::Project;

/// Default prefix a variable name must carry to be eligible for substitution.
pub const DEFAULT_VAR_PREFIX: &str = "GITLAB_";

/// Bare variable name resolved from the project identity rather than the
/// environment.
pub const PROJECT_VAR: &str = "PROJECT";

/// Variable-name fragments that mark a value as sensitive for logging.
const SECRET_KEYWORDS: [&str; 6] = ["password", "secret", "key", "token", "auth", "credential"];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"))
}

/// Returns true when a variable name should have its value masked in logs.
pub fn is_secret_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SECRET_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// One resolved variable, recorded for the end-of-load summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutedVar {
    pub value: String,
    pub secret: bool,
}

/// Accumulates the unique variable names resolved during a load.
///
/// Ordered so the logged summary is stable across runs.
#[derive(Debug, Default)]
pub struct SubstitutionSummary {
    entries: BTreeMap<String, SubstitutedVar>,
}

impl SubstitutionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, name: &str, value: &str) {
        self.entries.entry(name.to_string()).or_insert_with(|| SubstitutedVar {
            value: value.to_string(),
            secret: is_secret_name(name),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &SubstitutedVar)> {
        self.entries.iter()
    }

    /// Log one line per resolved variable, masking secret-like values.
    pub fn log(&self) {
        for (name, var) in &self.entries {
            if var.secret {
                info!("Substituted {}: [MASKED]", name);
            } else {
                info!("Substituted {}: {}", name, var.value);
            }
        }
    }
}

/// Prefix-gated `${NAME}` resolver over nested YAML values.
#[derive(Debug, Clone)]
pub struct VarSubstituter {
    prefix: String,
    allowed_bare: Vec<String>,
    overrides: HashMap<String, String>,
    /// Explicit variable source; `None` falls back to the process
    /// environment. Tests inject a map here so they never mutate env state.
    vars: Option<HashMap<String, String>>,
}

impl VarSubstituter {
    /// Substituter for a project, with `${PROJECT}` resolving to the
    /// project's `publisher/name` path and everything else read from the
    /// environment when prefixed with `GITLAB_`.
    pub fn for_project(project: &Project) -> Self {
        let mut overrides = HashMap::new();
        overrides.insert(PROJECT_VAR.to_string(), project.path());
        Self {
            prefix: DEFAULT_VAR_PREFIX.to_string(),
            allowed_bare: vec![PROJECT_VAR.to_string()],
            overrides,
            vars: None,
        }
    }

    /// Replace the environment lookup with an explicit variable map.
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Override the eligibility prefix (rarely needed outside tests).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn eligible(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) || self.allowed_bare.iter().any(|a| a == name)
    }

    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        match &self.vars {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Substitute placeholders in a single string.
    ///
    /// Ineligible and unresolvable placeholders are left verbatim; the
    /// placeholder text is never partially consumed.
    pub fn substitute_str(&self, input: &str, summary: &mut SubstitutionSummary) -> String {
        placeholder_regex()
            .replace_all(input, |caps: &regex::Captures| {
                let name = &caps[1];
                if !self.eligible(name) {
                    return caps[0].to_string();
                }
                match self.resolve(name) {
                    Some(value) => {
                        summary.record(name, &value);
                        value
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Recursively substitute placeholders through a YAML value.
    ///
    /// Mapping keys are left untouched; only values and sequence elements
    /// are rewritten.
    pub fn substitute_value(&self, value: &Value, summary: &mut SubstitutionSummary) -> Value {
        match value {
            Value::String(s) => Value::String(self.substitute_str(s, summary)),
            Value::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .map(|item| self.substitute_value(item, summary))
                    .collect(),
            ),
            Value::Mapping(map) => {
                let mut result = serde_yaml::Mapping::new();
                for (k, v) in map {
                    result.insert(k.clone(), self.substitute_value(v, summary));
                }
                Value::Mapping(result)
            }
            other => other.clone(),
        }
    }
}
