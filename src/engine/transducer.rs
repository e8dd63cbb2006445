//! The rewriting engine.
//!
//! A [`Transducer`] walks a word left to right. At each position it scans
//! the table in declared order and applies the first rule whose pattern and
//! contexts match there, then advances past the pattern. There is no
//! backtracking and no longest-match preference: table order is priority.
//!
//! Applying a rule appends each of its fragments to each alternative built
//! so far. A rule whose every fragment is ruled out by the masks of the
//! current alternatives is passed over as if it did not match.

use tracing::{trace, warn};

use super::branch::BranchSet;
use crate::error::{Error, Result};
use crate::language::LanguageSet;
use crate::rules::{Rule, RuleTable};

/// Counters collected during one transduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransductionStats {
    /// Number of rules applied; never exceeds the word length
    pub applications: usize,
    /// Largest branch set seen after any application
    pub peak_branches: usize,
    /// Whether the branch cap dropped alternatives at least once
    pub truncated: bool,
}

/// Applies one rule table to words.
#[derive(Debug, Clone, Copy)]
pub struct Transducer<'t> {
    table: &'t RuleTable,
    max_branches: usize,
}

impl<'t> Transducer<'t> {
    /// Creates a transducer over `table` that never holds more than
    /// `max_branches` alternatives.
    pub fn new(table: &'t RuleTable, max_branches: usize) -> Self {
        Self {
            table,
            max_branches,
        }
    }

    /// The table being applied.
    pub fn table(&self) -> &'t RuleTable {
        self.table
    }

    /// Transduces `word`, starting from the empty string valid for `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMatchingRule`] if some position has no applicable
    /// rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bmpm::engine::Transducer;
    /// use bmpm::language::LanguageSet;
    /// use bmpm::rules::{Rule, RuleTable};
    ///
    /// let table = RuleTable::new(
    ///     "demo",
    ///     vec![
    ///         Rule::new("sch", "", "", "S").unwrap(),
    ///         Rule::new("w", "", "", "(v|w)").unwrap(),
    ///         Rule::new("a", "", "", "a").unwrap(),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let word: Vec<char> = "schwa".chars().collect();
    /// let keys = Transducer::new(&table, 16).apply(&word, LanguageSet::ALL).unwrap();
    /// assert_eq!(keys.into_texts(), ["Sva", "Swa"]);
    /// ```
    pub fn apply(&self, word: &[char], seed: LanguageSet) -> Result<BranchSet> {
        self.apply_with_stats(word, seed).map(|(branches, _)| branches)
    }

    /// Like [`apply`](Self::apply), also returning counters.
    pub fn apply_with_stats(
        &self,
        word: &[char],
        seed: LanguageSet,
    ) -> Result<(BranchSet, TransductionStats)> {
        let mut branches = BranchSet::seed(seed, self.max_branches);
        let mut stats = TransductionStats {
            peak_branches: branches.len(),
            ..TransductionStats::default()
        };

        let mut position = 0;
        while position < word.len() {
            let (rule, next) = self.step(word, position, &branches)?;

            trace!(
                table = self.table.name(),
                position,
                rule = %rule,
                branches = next.len(),
                "applied rule"
            );

            stats.applications += 1;
            stats.peak_branches = stats.peak_branches.max(next.len());
            stats.truncated |= next.is_truncated();

            branches = next;
            position += rule.pattern().len();
        }

        if stats.truncated {
            warn!(
                table = self.table.name(),
                cap = self.max_branches,
                word = %word.iter().collect::<String>(),
                "branch cap reached; alternatives were dropped"
            );
        }

        Ok((branches, stats))
    }

    /// Finds the first applicable rule at `position` and the branch set it
    /// produces.
    fn step(
        &self,
        word: &[char],
        position: usize,
        branches: &BranchSet,
    ) -> Result<(&'t Rule, BranchSet)> {
        for rule in self.table.candidates(word[position]) {
            if !rule.matches_at(word, position) {
                continue;
            }
            let next = branches.extend_with(rule.fragments());
            if next.is_empty() {
                trace!(
                    table = self.table.name(),
                    position,
                    rule = %rule,
                    "rule incompatible with every alternative"
                );
                continue;
            }
            return Ok((rule, next));
        }

        Err(Error::NoMatchingRule {
            table: self.table.name().to_string(),
            word: word.iter().collect(),
            position,
            character: word[position],
        })
    }
}
