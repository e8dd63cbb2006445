//! Error types for rule loading and phonetic encoding.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors** describe defects in the rule data: a table that
//!   cannot be found, an expression that does not parse, or a table that fails
//!   to cover a character of its script. They are fatal for the engine.
//! - **Input errors** describe a request the engine cannot serve, such as an
//!   empty word.
//!
//! Ordinary phonetic ambiguity is never an error; it is always represented as
//! several output keys.

use thiserror::Error;

use crate::language::LanguageSet;
use crate::rules::{NameType, TableKey, Tier};

/// Errors raised while loading rule data or encoding a word.
#[derive(Debug, Error)]
pub enum Error {
    /// No table exists for the requested name type, tier and key, and no
    /// fallback table applies.
    #[error("no {tier} table for '{key}' in {name_type} rules")]
    MissingTable {
        /// Rule family that was searched
        name_type: NameType,
        /// Pipeline tier that was searched
        tier: Tier,
        /// Language key that was requested
        key: TableKey,
    },

    /// Transduction reached a position that no rule in the table covers.
    ///
    /// Tables are expected to end with catch-all rules for every character of
    /// their scripts, so this signals a malformed table or a word written in
    /// a script the table was never meant to see.
    #[error("no rule in table '{table}' matches {character:?} at position {position} of {word:?}")]
    NoMatchingRule {
        /// Name of the table being applied
        table: String,
        /// Word being transduced
        word: String,
        /// Character offset of the unmatched position
        position: usize,
        /// Character found at that position
        character: char,
    },

    /// A pattern or context expression could not be compiled.
    #[error("invalid rule expression {text:?}: {reason}")]
    InvalidExpression {
        /// Source text of the expression
        text: String,
        /// What went wrong
        reason: &'static str,
    },

    /// A replacement template could not be compiled.
    #[error("invalid replacement template {text:?}: {reason}")]
    InvalidTemplate {
        /// Source text of the template
        text: String,
        /// What went wrong
        reason: &'static str,
    },

    /// A rule with an empty pattern was found. Such a rule would never
    /// advance the cursor.
    #[error("rule with empty pattern in table '{table}'")]
    EmptyPattern {
        /// Table that holds the rule
        table: String,
    },

    /// A tier refers to a named table that the rule data does not define.
    #[error("tier refers to unknown table '{0}'")]
    UnknownTable(String),

    /// A rule family name is unknown.
    #[error("unknown name type '{0}'")]
    UnknownNameType(String),

    /// A language name in the rule data or on the command line is unknown.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    /// The rule data is not valid JSON or does not follow the expected shape.
    #[error("malformed rule data")]
    RuleData(#[from] serde_json::Error),

    /// Rule data or configuration could not be read.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The word to encode is empty after trimming.
    #[error("cannot encode an empty word")]
    EmptyWord,

    /// Explicit languages were requested that the rule family does not know.
    #[error("languages {languages} are not supported by {name_type} rules")]
    UnsupportedLanguages {
        /// Rule family that was requested
        name_type: NameType,
        /// The offending languages
        languages: LanguageSet,
    },
}

impl Error {
    /// Returns `true` if this error signals defective rule data rather than a
    /// bad request.
    ///
    /// A character from a script no table covers surfaces as
    /// [`Error::NoMatchingRule`] and counts as a configuration error. Only
    /// [`Error::EmptyWord`] and [`Error::UnsupportedLanguages`] are input
    /// errors. Both groups abort the call the same way, with no partial keys;
    /// this only tells the caller where to look.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Error::EmptyWord | Error::UnsupportedLanguages { .. })
    }
}

/// A specialized `Result` type for rule loading and encoding.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(!Error::EmptyWord.is_configuration());
        assert!(!Error::UnsupportedLanguages {
            name_type: NameType::Sephardic,
            languages: crate::language::Language::Arabic.into(),
        }
        .is_configuration());
        assert!(Error::NoMatchingRule {
            table: "rules/any".to_string(),
            word: "ab1".to_string(),
            position: 2,
            character: '1',
        }
        .is_configuration());
        assert!(Error::UnknownTable("rules_any".to_string()).is_configuration());
        assert!(Error::MissingTable {
            name_type: NameType::Generic,
            tier: Tier::Rules,
            key: TableKey::Common,
        }
        .is_configuration());
    }

    #[test]
    fn test_no_matching_rule_message() {
        let err = Error::NoMatchingRule {
            table: "rules/any".to_string(),
            word: "a b".to_string(),
            position: 1,
            character: ' ',
        };
        assert_eq!(
            err.to_string(),
            "no rule in table 'rules/any' matches ' ' at position 1 of \"a b\""
        );
    }
}
