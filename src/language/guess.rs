//! Language guessing from spelling evidence.
//!
//! Each rule family ships a list of language rules `{pattern, languages,
//! accept}`. A rule fires when its pattern occurs anywhere in the word (the
//! pattern may be anchored with `^` or `$`). Accept rules assert that the
//! word belongs to one of the rule's languages; reject rules assert that it
//! belongs to none of them.
//!
//! Evaluation sits behind the [`LanguageGuesser`] trait so alternative
//! strategies can be validated against a reference corpus independently of
//! the encoder.

use serde::{Deserialize, Serialize};

use super::LanguageSet;
use crate::error::Result;
use crate::rules::ContextExpr;

/// How matching accept rules combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GuessPolicy {
    /// Intersect the starting set with the union of all matching accept
    /// rules. Order independent.
    #[default]
    Union,
    /// Intersect the starting set with each matching accept rule in turn, so
    /// disjoint accept rules can empty the set.
    Sequential,
}

/// One language-evidence rule.
#[derive(Debug, Clone)]
pub struct LanguageRule {
    source: String,
    pattern: ContextExpr,
    languages: LanguageSet,
    accept: bool,
}

impl LanguageRule {
    /// Compiles a language rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExpression`](crate::Error::InvalidExpression)
    /// if `pattern` does not parse.
    pub fn new(pattern: &str, languages: LanguageSet, accept: bool) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
            pattern: ContextExpr::parse(pattern)?,
            languages,
            accept,
        })
    }

    /// Source text of the pattern.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Languages the rule accepts or rejects.
    pub fn languages(&self) -> LanguageSet {
        self.languages
    }

    /// `true` for accept rules, `false` for reject rules.
    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// Returns `true` if the pattern occurs anywhere in `word`.
    #[inline]
    pub fn matches(&self, word: &[char]) -> bool {
        self.pattern.found_in(word)
    }
}

/// Estimates the source languages of a single word.
pub trait LanguageGuesser {
    /// Returns the languages `word` may belong to. Never returns an empty
    /// set; when the evidence rules out everything the result is
    /// [`LanguageSet::ANY`].
    fn guess(&self, word: &str) -> LanguageSet;
}

/// The rule-driven guesser used by every rule family.
///
/// The accept-combination policy is not part of the guesser; it is supplied
/// per call or bound with [`under`](Self::under).
#[derive(Debug, Clone)]
pub struct RuleGuesser {
    rules: Vec<LanguageRule>,
    supported: LanguageSet,
}

impl RuleGuesser {
    /// Creates a guesser over `rules` for a family supporting `supported`.
    pub fn new(rules: Vec<LanguageRule>, supported: LanguageSet) -> Self {
        Self { rules, supported }
    }

    /// The rules in declared order.
    pub fn rules(&self) -> &[LanguageRule] {
        &self.rules
    }

    /// Binds this guesser to `policy`, giving a [`LanguageGuesser`].
    pub fn under(&self, policy: GuessPolicy) -> PolicyGuesser<'_> {
        PolicyGuesser {
            guesser: self,
            policy,
        }
    }

    /// Guesses over an already normalized character slice under `policy`.
    pub fn evaluate(&self, word: &[char], policy: GuessPolicy) -> LanguageSet {
        let start = self.supported - LanguageSet::ANY;
        let mut mask = start;
        let mut accepted = LanguageSet::EMPTY;
        let mut any_accept = false;
        let mut rejected = LanguageSet::EMPTY;

        for rule in self.rules.iter().filter(|rule| rule.matches(word)) {
            if !rule.accept {
                rejected |= rule.languages;
                continue;
            }
            any_accept = true;
            match policy {
                GuessPolicy::Union => accepted |= rule.languages,
                GuessPolicy::Sequential => mask &= rule.languages,
            }
        }

        if any_accept && policy == GuessPolicy::Union {
            mask &= accepted;
        }
        mask -= rejected;

        if mask.is_empty() {
            LanguageSet::ANY
        } else {
            mask
        }
    }
}

/// A [`RuleGuesser`] bound to one [`GuessPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct PolicyGuesser<'g> {
    guesser: &'g RuleGuesser,
    policy: GuessPolicy,
}

impl PolicyGuesser<'_> {
    /// The bound policy.
    pub fn policy(&self) -> GuessPolicy {
        self.policy
    }

    /// Guesses over an already normalized character slice.
    pub fn guess_chars(&self, word: &[char]) -> LanguageSet {
        self.guesser.evaluate(word, self.policy)
    }
}

impl LanguageGuesser for PolicyGuesser<'_> {
    fn guess(&self, word: &str) -> LanguageSet {
        let chars: Vec<char> = word.trim().to_lowercase().chars().collect();
        self.guess_chars(&chars)
    }
}
