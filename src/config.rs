//! Encoder configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::GuessPolicy;

/// Default cap on alternatives held during a transduction.
pub const DEFAULT_MAX_BRANCHES: usize = 256;

/// Default cap on returned keys.
pub const DEFAULT_MAX_RESULTS: usize = 256;

/// Tunables of the [`BeiderMorse`](crate::BeiderMorse) encoder.
///
/// Every field has a default, so a configuration file only needs to name the
/// fields it changes:
///
/// ```rust
/// use bmpm::config::EncoderConfig;
/// use bmpm::language::GuessPolicy;
///
/// let config = EncoderConfig::from_json_str(r#"{"guess_policy": "sequential"}"#).unwrap();
/// assert_eq!(config.guess_policy, GuessPolicy::Sequential);
/// assert_eq!(config.max_branches, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Alternatives kept after each rule application and each merge; 0 acts
    /// as 1
    pub max_branches: usize,
    /// Keys returned per word; 0 acts as 1
    pub max_results: usize,
    /// How matching accept rules of the language guesser combine
    pub guess_policy: GuessPolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_branches: DEFAULT_MAX_BRANCHES,
            max_results: DEFAULT_MAX_RESULTS,
            guess_policy: GuessPolicy::default(),
        }
    }
}

impl EncoderConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Sets the branch cap.
    pub fn with_max_branches(mut self, max_branches: usize) -> Self {
        self.max_branches = max_branches;
        self
    }

    /// Sets the result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the guess policy.
    pub fn with_guess_policy(mut self, guess_policy: GuessPolicy) -> Self {
        self.guess_policy = guess_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::default();
        assert_eq!(config.max_branches, DEFAULT_MAX_BRANCHES);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(config.guess_policy, GuessPolicy::Union);
        assert_eq!(EncoderConfig::from_json_str("{}").unwrap(), config);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(
            EncoderConfig::from_json_str(r#"{"max_branch": 4}"#),
            Err(Error::RuleData(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"max_branches": 16, "max_results": 4}"#).unwrap();
        let config = EncoderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, EncoderConfig::default().with_max_branches(16).with_max_results(4));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EncoderConfig::from_json_file(dir.path().join("absent.json")),
            Err(Error::Io(_))
        ));
    }
}
