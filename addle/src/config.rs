//! Pipeline configuration.

use addle_eval::DEFAULT_MAX_CALL_DEPTH;
use addle_parser::lexer::UnknownCharPolicy;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: expected {expected}")]
    InvalidVar {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// What the lexer does at a character no rule matches.
    pub unknown_char: UnknownCharPolicy,
    /// Nested calls allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Config {
    /// Set to `1`/`true` to keep lexing past unknown characters.
    pub const RECOVER_VAR: &'static str = "ADDLE_RECOVER";
    pub const MAX_CALL_DEPTH_VAR: &'static str = "ADDLE_MAX_CALL_DEPTH";

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration from `lookup`, falling back to the defaults for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::RECOVER_VAR) {
            config.unknown_char = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => UnknownCharPolicy::Recover,
                "" | "0" | "false" | "no" => UnknownCharPolicy::Halt,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        var: Self::RECOVER_VAR,
                        value,
                        expected: "a boolean",
                    })
                }
            };
        }

        if let Some(value) = lookup(Self::MAX_CALL_DEPTH_VAR) {
            config.max_call_depth = value.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: Self::MAX_CALL_DEPTH_VAR,
                value: value.clone(),
                expected: "a non-negative integer",
            })?;
        }

        Ok(config)
    }

    pub fn unknown_char(mut self, policy: UnknownCharPolicy) -> Self {
        self.unknown_char = policy;
        self
    }

    pub fn max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_char: UnknownCharPolicy::Halt,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn reads_variables() {
        let config = Config::from_lookup(lookup(&[
            ("ADDLE_RECOVER", "true"),
            ("ADDLE_MAX_CALL_DEPTH", " 32 "),
        ]))
        .unwrap();

        assert_eq!(config.unknown_char, UnknownCharPolicy::Recover);
        assert_eq!(config.max_call_depth, 32);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Config::from_lookup(lookup(&[("ADDLE_MAX_CALL_DEPTH", "deep")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value \"deep\" for ADDLE_MAX_CALL_DEPTH: expected a non-negative integer"
        );
        assert!(Config::from_lookup(lookup(&[("ADDLE_RECOVER", "maybe")])).is_err());
    }
}
