//! # CLI Output Appearance
//!
//! Progress lines use emoji markers when the terminal supports them and
//! bracketed plain-text tags otherwise. The usual conventions are honored:
//! `NO_COLOR` (https://no-color.org/), `CLICOLOR=0`, `CLICOLOR_FORCE=1`,
//! `TERM=dumb` and the `--color=never|always|auto` flag.

use std::env;

/// Whether decorated output (emoji) should be used.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub decorated: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag ("always", "never" or "auto") against the
    /// environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let decorated = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect(),
        };
        Self { decorated }
    }

    fn detect() -> bool {
        // Presence alone disables, even when empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn decorated() -> Self {
        Self { decorated: true }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { decorated: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Pick the emoji marker or its plain-text fallback.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.decorated {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides() {
        assert!(OutputConfig::from_env_and_flag("always").decorated);
        assert!(!OutputConfig::from_env_and_flag("never").decorated);
    }

    #[test]
    fn test_emoji_fallback() {
        assert_eq!(emoji(&OutputConfig::decorated(), "✅", "[OK]"), "✅");
        assert_eq!(emoji(&OutputConfig::plain(), "✅", "[OK]"), "[OK]");
    }
}
