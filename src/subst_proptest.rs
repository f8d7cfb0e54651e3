//! Property-based tests for the variable substitution engine.
//!
//! These tests use proptest to generate random inputs and verify that the
//! substitution invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::project::Project;
    use crate::subst::{SubstitutionSummary, VarSubstituter};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn substituter(vars: &[(String, String)]) -> VarSubstituter {
        let map: HashMap<String, String> = vars.iter().cloned().collect();
        VarSubstituter::for_project(&Project::new("nvidia", "jax")).with_vars(map)
    }

    proptest! {
        /// Property: substitution is idempotent — running it twice on
        /// already-substituted data is a no-op.
        #[test]
        fn substitution_is_idempotent(
            input in ".*",
            value in "[a-zA-Z0-9 ./:-]{0,30}",
        ) {
            let sub = substituter(&[("GITLAB_VALUE".to_string(), value)]);
            let mut summary = SubstitutionSummary::new();
            let once = sub.substitute_str(&input, &mut summary);
            let twice = sub.substitute_str(&once, &mut summary);
            prop_assert_eq!(once, twice);
        }

        /// Property: a placeholder whose name neither carries the prefix nor
        /// sits in the bare allow-list is left byte-identical.
        #[test]
        fn unprefixed_placeholders_untouched(name in "[A-Z][A-Z0-9_]{0,15}") {
            prop_assume!(!name.starts_with("GITLAB_"));
            prop_assume!(name != "PROJECT");

            let input = format!("before ${{{}}} after", name);
            let sub = substituter(&[(name.clone(), "resolved".to_string())]);
            let mut summary = SubstitutionSummary::new();
            let output = sub.substitute_str(&input, &mut summary);
            prop_assert_eq!(output, input);
        }

        /// Property: text without any placeholder syntax passes through
        /// unchanged.
        #[test]
        fn plain_text_passes_through(input in "[^$]*") {
            let sub = substituter(&[("GITLAB_X".to_string(), "y".to_string())]);
            let mut summary = SubstitutionSummary::new();
            let output = sub.substitute_str(&input, &mut summary);
            prop_assert_eq!(output, input);
        }

        /// Property: one resolvable and one unresolvable placeholder in the
        /// same string yields exactly the resolvable one replaced.
        #[test]
        fn partial_substitution_is_exact(value in "[a-zA-Z0-9./-]{1,20}") {
            let sub = substituter(&[("GITLAB_SET".to_string(), value.clone())]);
            let mut summary = SubstitutionSummary::new();
            let output =
                sub.substitute_str("${GITLAB_SET}|${GITLAB_UNSET}|${BARE}", &mut summary);
            prop_assert_eq!(output, format!("{}|${{GITLAB_UNSET}}|${{BARE}}", value));
        }

        /// Property: substitution is deterministic.
        #[test]
        fn substitution_is_deterministic(input in ".*") {
            let sub = substituter(&[("GITLAB_A".to_string(), "alpha".to_string())]);
            let mut s1 = SubstitutionSummary::new();
            let mut s2 = SubstitutionSummary::new();
            prop_assert_eq!(
                sub.substitute_str(&input, &mut s1),
                sub.substitute_str(&input, &mut s2)
            );
        }
    }
}
