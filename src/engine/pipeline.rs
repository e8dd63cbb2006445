//! The encoding pipeline.
//!
//! [`BeiderMorse`] runs three transduction passes per word:
//!
//! 1. the *rules* tier rewrites the lowercased word into the phonetic
//!    alphabet, using the table of the active language when exactly one is
//!    active and the generic table otherwise;
//! 2. the *common* table of the approx or exact tier cleans up every
//!    alternative, whatever its language;
//! 3. the language table of the approx or exact tier produces the final
//!    keys.
//!
//! Passes 2 and 3 walk each alternative's string on its own, seeded with that
//! alternative's mask, and merge the results.

use std::sync::Arc;

use tracing::debug;

use super::branch::BranchSet;
use super::transducer::Transducer;
use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use crate::language::{LanguageSet, RuleGuesser};
use crate::names::{split_name, EncodedName};
use crate::rules::{NameType, NameTypeRules, RuleBook, RuleTable, RuleType, TableKey, Tier};

/// Beider-Morse phonetic encoder.
///
/// Cheap to clone; rule data is shared. Safe to use from many threads at
/// once since every call only reads the rule data.
///
/// # Example
///
/// ```rust
/// use bmpm::{BeiderMorse, NameType, RuleType};
///
/// let encoder = BeiderMorse::embedded().unwrap();
/// let keys = encoder
///     .encode("Schwarz", NameType::Generic, RuleType::Approx, None)
///     .unwrap();
/// assert!(keys.iter().any(|key| key == "svarts"));
/// ```
#[derive(Debug, Clone)]
pub struct BeiderMorse {
    rules: Arc<RuleBook>,
    config: EncoderConfig,
}

impl BeiderMorse {
    /// Creates an encoder over `rules` with the default configuration.
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self::with_config(rules, EncoderConfig::default())
    }

    /// Creates an encoder over `rules` with `config`.
    pub fn with_config(rules: Arc<RuleBook>, config: EncoderConfig) -> Self {
        Self { rules, config }
    }

    /// Creates an encoder over the rule data compiled into the library.
    #[cfg(feature = "embedded-rules")]
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(RuleBook::embedded()?))
    }

    /// The active configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// The rule data.
    pub fn rule_book(&self) -> &RuleBook {
        &self.rules
    }

    /// Estimates the source languages of a single word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyWord`] for blank input and
    /// [`Error::MissingTable`] if `name_type` was not loaded.
    pub fn guess_languages(&self, word: &str, name_type: NameType) -> Result<LanguageSet> {
        let chars = normalize(word)?;
        let family = self.rules.family(name_type)?;
        Ok(self.guess(family.guesser(), &chars))
    }

    /// Encodes a single word into its phonetic keys.
    ///
    /// At most `max_results` keys are returned, and never fewer than one for
    /// a word that encodes. `languages` restricts the word to the given source languages; `None`
    /// or an empty set lets the family's language rules decide.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyWord`] for blank input,
    /// - [`Error::UnsupportedLanguages`] if `languages` names a language the
    ///   family does not support,
    /// - [`Error::MissingTable`] or [`Error::NoMatchingRule`] for defective
    ///   rule data or characters outside every table's scripts.
    pub fn encode(
        &self,
        word: &str,
        name_type: NameType,
        rule_type: RuleType,
        languages: Option<LanguageSet>,
    ) -> Result<Vec<String>> {
        let branches = self.encode_branches(word, name_type, rule_type, languages)?;
        let mut keys = branches.into_texts();
        keys.truncate(self.config.max_results.max(1));
        Ok(keys)
    }

    /// Like [`encode`](Self::encode), returning the final alternatives with
    /// the languages each remains valid for.
    pub fn encode_branches(
        &self,
        word: &str,
        name_type: NameType,
        rule_type: RuleType,
        languages: Option<LanguageSet>,
    ) -> Result<BranchSet> {
        let chars = normalize(word)?;
        let family = self.rules.family(name_type)?;
        let active = self.active_languages(family, &chars, languages)?;
        let seed = if active == LanguageSet::ANY {
            LanguageSet::ALL
        } else {
            active
        };
        let key = TableKey::select(active);
        let tier = rule_type.tier();

        debug!(
            word,
            %name_type,
            %rule_type,
            languages = %active,
            "encoding word"
        );

        let rules_table = family.lookup(Tier::Rules, key)?;
        let phonetic = self.transducer(rules_table).apply(&chars, seed)?;
        debug!(table = rules_table.name(), branches = phonetic.len(), "rules pass");

        let common = family.lookup(tier, TableKey::Common)?;
        let cleaned = self.apply_each(common, phonetic)?;
        debug!(table = common.name(), branches = cleaned.len(), "common pass");

        let final_table = family.lookup(tier, key)?;
        let keys = self.apply_each(final_table, cleaned)?;
        debug!(table = final_table.name(), branches = keys.len(), "final pass");

        Ok(keys)
    }

    /// Encodes a possibly multi-word name, one segment per token.
    ///
    /// The name is split with [`split_name`]; without explicit `languages`
    /// each token is guessed on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyWord`] if the name has no tokens, and any error
    /// of [`encode`](Self::encode).
    pub fn encode_name(
        &self,
        name: &str,
        name_type: NameType,
        rule_type: RuleType,
        languages: Option<LanguageSet>,
    ) -> Result<EncodedName> {
        let parts = split_name(name, name_type);
        if parts.is_empty() {
            return Err(Error::EmptyWord);
        }
        let segments = parts
            .tokens()
            .map(|token| self.encode(token, name_type, rule_type, languages))
            .collect::<Result<Vec<_>>>()?;
        Ok(EncodedName::new(segments))
    }

    fn guess(&self, guesser: &RuleGuesser, word: &[char]) -> LanguageSet {
        guesser.under(self.config.guess_policy).guess_chars(word)
    }

    fn active_languages(
        &self,
        family: &NameTypeRules,
        word: &[char],
        languages: Option<LanguageSet>,
    ) -> Result<LanguageSet> {
        match languages {
            Some(explicit) if !explicit.is_empty() => {
                let unsupported = explicit - family.languages();
                if !unsupported.is_empty() {
                    return Err(Error::UnsupportedLanguages {
                        name_type: family.name_type(),
                        languages: unsupported,
                    });
                }
                Ok(explicit)
            }
            _ => Ok(self.guess(family.guesser(), word)),
        }
    }

    fn transducer<'t>(&self, table: &'t RuleTable) -> Transducer<'t> {
        Transducer::new(table, self.config.max_branches)
    }

    /// Runs `table` over each alternative of `input` separately and merges
    /// the results in order.
    fn apply_each(&self, table: &RuleTable, input: BranchSet) -> Result<BranchSet> {
        let transducer = self.transducer(table);
        let mut merged = BranchSet::new(self.config.max_branches);
        for alternative in input {
            let chars: Vec<char> = alternative.text().chars().collect();
            merged.merge(transducer.apply(&chars, alternative.languages())?);
        }
        Ok(merged)
    }
}

/// Lowercases and trims `word`.
fn normalize(word: &str) -> Result<Vec<char>> {
    let chars: Vec<char> = word.trim().to_lowercase().chars().collect();
    if chars.is_empty() {
        return Err(Error::EmptyWord);
    }
    Ok(chars)
}
