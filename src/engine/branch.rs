//! Candidate outputs and their language masks.

use rustc_hash::FxHashMap;

use crate::language::LanguageSet;
use crate::rules::Fragment;

/// One candidate output string and the languages under which it is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    text: String,
    languages: LanguageSet,
}

impl Alternative {
    /// Creates an alternative.
    pub fn new(text: impl Into<String>, languages: LanguageSet) -> Self {
        Self {
            text: text.into(),
            languages,
        }
    }

    /// The candidate string.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Languages for which the candidate remains valid.
    #[inline]
    pub fn languages(&self) -> LanguageSet {
        self.languages
    }

    /// Consumes the alternative, returning its string.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// A deduplicated, insertion-ordered, capped set of [`Alternative`]s.
///
/// Two alternatives never share a string: pushing an existing string widens
/// its mask instead. Alternatives with an empty mask are never stored. Once
/// `cap` alternatives are held, new strings are dropped and the set is marked
/// truncated, which keeps the first `cap` in insertion order.
///
/// # Example
///
/// ```rust
/// use bmpm::engine::BranchSet;
/// use bmpm::language::{Language, LanguageSet};
///
/// let mut set = BranchSet::new(2);
/// set.push("vits".to_string(), Language::German.into());
/// set.push("vits".to_string(), Language::English.into());
/// set.push("wits".to_string(), LanguageSet::EMPTY);
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.iter().next().unwrap().languages().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BranchSet {
    alternatives: Vec<Alternative>,
    positions: FxHashMap<String, usize>,
    cap: usize,
    truncated: bool,
}

impl BranchSet {
    /// Creates an empty set holding at most `cap` alternatives (at least one).
    pub fn new(cap: usize) -> Self {
        Self {
            alternatives: Vec::new(),
            positions: FxHashMap::default(),
            cap: cap.max(1),
            truncated: false,
        }
    }

    /// Creates the starting set of a transduction: the empty string valid
    /// for `languages`.
    pub fn seed(languages: LanguageSet, cap: usize) -> Self {
        let mut set = Self::new(cap);
        set.push(String::new(), languages);
        set
    }

    /// Adds `text` under `languages`.
    ///
    /// Returns `false` if nothing was stored: the mask is empty, or the string
    /// is new and the set is full.
    pub fn push(&mut self, text: String, languages: LanguageSet) -> bool {
        if languages.is_empty() {
            return false;
        }
        if let Some(&position) = self.positions.get(&text) {
            self.alternatives[position].languages |= languages;
            return true;
        }
        if self.alternatives.len() >= self.cap {
            self.truncated = true;
            return false;
        }
        self.positions.insert(text.clone(), self.alternatives.len());
        self.alternatives.push(Alternative { text, languages });
        true
    }

    /// Adds every alternative of `other`, in its order.
    pub fn merge(&mut self, other: BranchSet) {
        self.truncated |= other.truncated;
        for alternative in other.alternatives {
            self.push(alternative.text, alternative.languages);
        }
    }

    /// Returns the cartesian product of this set with `fragments`: each
    /// alternative extended by each fragment, masks intersected, in
    /// alternative-major order. The receiver is left untouched.
    pub fn extend_with(&self, fragments: &[Fragment]) -> BranchSet {
        let mut next = BranchSet::new(self.cap);
        for alternative in &self.alternatives {
            for fragment in fragments {
                let languages = alternative.languages & fragment.languages;
                if languages.is_empty() {
                    continue;
                }
                let mut text = String::with_capacity(alternative.text.len() + fragment.text.len());
                text.push_str(&alternative.text);
                text.push_str(&fragment.text);
                next.push(text, languages);
            }
        }
        next
    }

    /// Number of alternatives.
    #[inline]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Returns `true` if no alternative survived.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Maximum number of alternatives.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns `true` if the cap dropped at least one alternative.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Alternatives in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Alternative> {
        self.alternatives.iter()
    }

    /// The union of every alternative's mask.
    pub fn languages(&self) -> LanguageSet {
        self.alternatives
            .iter()
            .fold(LanguageSet::EMPTY, |acc, alternative| acc | alternative.languages)
    }

    /// Consumes the set, returning its strings in insertion order.
    pub fn into_texts(self) -> Vec<String> {
        self.alternatives
            .into_iter()
            .map(Alternative::into_text)
            .collect()
    }
}

impl IntoIterator for BranchSet {
    type Item = Alternative;
    type IntoIter = std::vec::IntoIter<Alternative>;

    fn into_iter(self) -> Self::IntoIter {
        self.alternatives.into_iter()
    }
}

impl<'a> IntoIterator for &'a BranchSet {
    type Item = &'a Alternative;
    type IntoIter = std::slice::Iter<'a, Alternative>;

    fn into_iter(self) -> Self::IntoIter {
        self.alternatives.iter()
    }
}
