//! # Forbidden-Reference Gate
//!
//! Scans emitted configuration text for internal-only references that must
//! never reach public output: internal GitLab hostnames, internal container
//! and artifact registries, internal email domains. The pattern list can be
//! replaced wholesale through external configuration.
//!
//! Three operating modes:
//!
//! - **Block** (default): any violation fails the project; its artifacts are
//!   not written.
//! - **Allow**: violations are reported but do not block.
//! - **Censor**: violations are additionally rewritten in the README as the
//!   fixed mask `******`, processed last-to-first so earlier match offsets
//!   stay valid. The mask is deliberately not length-preserving (original
//!   behavior, kept as-is).
//!
//! Violations from every project handled in one invocation accumulate in an
//! explicit, run-scoped [`ViolationCollector`] so the end-of-run summary can
//! span the whole run without relying on ambient global state.

use regex::RegexBuilder;

use crate::error::Result;

/// Default forbidden patterns: internal references that must not be public.
pub const DEFAULT_FORBIDDEN_PATTERNS: [&str; 5] = [
    r"gitlab-master\.nvidia\.com",      // internal GitLab
    r"gitlab-master\.nvidia\.com:5005", // internal registry
    r"urm\.nvidia\.com",                // internal URM registry
    r"nvcr\.io.*-internal",             // internal NGC containers
    r"@nvidia\.com",                    // internal email addresses
];

/// Fixed replacement written over each censored match.
const CENSOR_MASK: &str = "******";

/// Characters of context captured on each side of a match.
const CONTEXT_WINDOW: usize = 40;

/// How forbidden-reference matches affect the pipeline outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    /// Fail the project; do not write artifacts.
    #[default]
    Block,
    /// Report violations but let the project through.
    Allow,
    /// Let the project through with matches masked in the README.
    Censor,
}

impl GateMode {
    /// Derive the mode from the two CLI toggles; censor implies allow.
    pub fn from_flags(allow: bool, censor: bool) -> Self {
        if censor {
            GateMode::Censor
        } else if allow {
            GateMode::Allow
        } else {
            GateMode::Block
        }
    }
}

/// One forbidden-reference match found in a project's emitted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Project path (`publisher/name`).
    pub project: String,
    /// File the text was scanned as (e.g., `ux-conf.yaml`).
    pub source_file: String,
    /// The pattern that matched.
    pub pattern: String,
    /// The matched text itself.
    pub matched_text: String,
    /// 1-based line number of the match.
    pub line: usize,
    /// Up to ±40 characters of surrounding context, newlines flattened.
    pub context: String,
}

/// Run-scoped accumulator for violations across all projects in one
/// invocation.
#[derive(Debug, Default)]
pub struct ViolationCollector {
    violations: Vec<Violation>,
}

impl ViolationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, violations: Vec<Violation>) {
        self.violations.extend(violations);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Render the end-of-run summary table, or `None` when the run was
    /// clean.
    pub fn render_summary(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }

        let mut out = String::new();
        out.push_str(&"=".repeat(80));
        out.push_str("\nFORBIDDEN REFERENCE VIOLATIONS SUMMARY\n");
        out.push_str(&"=".repeat(80));
        out.push('\n');
        out.push_str(&format!(
            "{:<30} {:<15} {:<6} {:<30}\n",
            "Project", "File", "Line", "Match"
        ));
        out.push_str(&"-".repeat(80));
        out.push('\n');

        for v in &self.violations {
            let project_short: String = v
                .project
                .rsplit('/')
                .next()
                .unwrap_or(&v.project)
                .chars()
                .take(28)
                .collect();
            let match_short: String = v.matched_text.chars().take(28).collect();
            out.push_str(&format!(
                "{:<30} {:<15} {:<6} {:<30}\n",
                project_short, v.source_file, v.line, match_short
            ));
        }

        out.push_str(&"-".repeat(80));
        out.push_str(&format!("\nTotal violations: {}\n", self.violations.len()));
        out.push_str(&"=".repeat(80));
        Some(out)
    }
}

/// Compiled forbidden-pattern scanner.
#[derive(Debug)]
pub struct ReferenceGate {
    patterns: Vec<(String, regex::Regex)>,
}

impl ReferenceGate {
    /// Compile a gate from pattern strings (case-insensitive).
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let source = pattern.as_ref().to_string();
            let regex = RegexBuilder::new(&source).case_insensitive(true).build()?;
            compiled.push((source, regex));
        }
        Ok(Self { patterns: compiled })
    }

    /// Gate using the default internal-reference patterns.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_FORBIDDEN_PATTERNS).expect("default patterns are valid")
    }

    /// Scan `text` for forbidden references, recording line numbers and a
    /// context window per match.
    pub fn scan(&self, project: &str, source_file: &str, text: &str) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (source, regex) in &self.patterns {
            for m in regex.find_iter(text) {
                let line = text[..m.start()].matches('\n').count() + 1;
                let start = m.start().saturating_sub(CONTEXT_WINDOW);
                let end = (m.end() + CONTEXT_WINDOW).min(text.len());
                let start = ceil_char_boundary(text, start);
                let end = floor_char_boundary(text, end);
                let context = text[start..end].replace('\n', " ");

                violations.push(Violation {
                    project: project.to_string(),
                    source_file: source_file.to_string(),
                    pattern: source.clone(),
                    matched_text: m.as_str().to_string(),
                    line,
                    context,
                });
            }
        }

        violations
    }

    /// Replace every forbidden reference in `text` with the fixed mask.
    ///
    /// Matches are rewritten from the last to the first so byte offsets of
    /// still-to-process matches remain valid. Returns the censored text and
    /// the number of replacements made.
    pub fn censor(&self, text: &str) -> (String, usize) {
        let mut censored = text.to_string();
        let mut count = 0;

        for (_, regex) in &self.patterns {
            let ranges: Vec<(usize, usize)> = regex
                .find_iter(&censored)
                .map(|m| (m.start(), m.end()))
                .collect();
            for (start, end) in ranges.into_iter().rev() {
                censored.replace_range(start..end, CENSOR_MASK);
                count += 1;
            }
        }

        (censored, count)
    }
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ReferenceGate {
        ReferenceGate::with_defaults()
    }

    #[test]
    fn test_scan_finds_internal_hostname_on_line_one() {
        let violations = gate().scan(
            "nvidia/jax",
            "ux-conf.yaml",
            "see http://gitlab-master.nvidia.com/x",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].matched_text, "gitlab-master.nvidia.com");
        assert_eq!(violations[0].project, "nvidia/jax");
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let violations = gate().scan("p/x", "f", "GITLAB-MASTER.NVIDIA.COM");
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_scan_records_line_numbers() {
        let text = "line one\nline two\ncontact someone@nvidia.com here\n";
        let violations = gate().scan("p/x", "f", text);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);
        assert_eq!(violations[0].matched_text, "@nvidia.com");
    }

    #[test]
    fn test_scan_context_window_flattens_newlines() {
        let text = "before\nurm.nvidia.com\nafter";
        let violations = gate().scan("p/x", "f", text);
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].context.contains('\n'));
        assert!(violations[0].context.contains("urm.nvidia.com"));
    }

    #[test]
    fn test_scan_clean_text_yields_nothing() {
        let violations = gate().scan("p/x", "f", "all public content here");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_censor_uses_fixed_mask() {
        let (censored, count) = gate().censor("see http://gitlab-master.nvidia.com/x");
        assert_eq!(censored, "see http://******/x");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_censor_multiple_matches_reverse_order() {
        let text = "a urm.nvidia.com b urm.nvidia.com c";
        let (censored, count) = gate().censor(text);
        assert_eq!(censored, "a ****** b ****** c");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_censor_clean_text_untouched() {
        let (censored, count) = gate().censor("nothing internal");
        assert_eq!(censored, "nothing internal");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let gate = ReferenceGate::new(["private\\.example\\.com"]).unwrap();
        assert!(gate.scan("p/x", "f", "gitlab-master.nvidia.com").is_empty());
        assert_eq!(gate.scan("p/x", "f", "private.example.com").len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(ReferenceGate::new(["[unclosed"]).is_err());
    }

    #[test]
    fn test_gate_mode_from_flags() {
        assert_eq!(GateMode::from_flags(false, false), GateMode::Block);
        assert_eq!(GateMode::from_flags(true, false), GateMode::Allow);
        assert_eq!(GateMode::from_flags(false, true), GateMode::Censor);
        assert_eq!(GateMode::from_flags(true, true), GateMode::Censor);
    }

    #[test]
    fn test_collector_accumulates_across_projects() {
        let mut collector = ViolationCollector::new();
        collector.record(gate().scan("nvidia/jax", "ux-conf.yaml", "urm.nvidia.com"));
        collector.record(gate().scan("nvidia/txt2kg", "ux-conf.yaml", "someone@nvidia.com"));

        assert_eq!(collector.len(), 2);
        let summary = collector.render_summary().unwrap();
        assert!(summary.contains("jax"));
        assert!(summary.contains("txt2kg"));
        assert!(summary.contains("Total violations: 2"));
    }

    #[test]
    fn test_collector_empty_run_has_no_summary() {
        let collector = ViolationCollector::new();
        assert!(collector.render_summary().is_none());
    }
}
