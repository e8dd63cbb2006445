//! Languages and language sets.
//!
//! Every rule family shares one enumeration of source languages. A
//! [`LanguageSet`] is a fixed-width bitset over that enumeration with one bit
//! per language; bit 0 is the [`Language::Any`] fallback.
//!
//! Language sets appear in three places:
//!
//! - as the tag of a replacement alternative (`tz[128]` is valid only for
//!   German),
//! - as the mask carried by every in-flight [`Alternative`](crate::engine::Alternative),
//! - as the output of language guessing.
//!
//! # Example
//!
//! ```rust
//! use bmpm::language::{Language, LanguageSet};
//!
//! let guessed: LanguageSet = [Language::German, Language::English].into_iter().collect();
//! let tag = LanguageSet::from(Language::German);
//!
//! assert_eq!(guessed & tag, tag);
//! assert!((guessed & LanguageSet::from(Language::Polish)).is_empty());
//! ```

mod guess;

pub use guess::{GuessPolicy, LanguageGuesser, LanguageRule, PolicyGuesser, RuleGuesser};

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A source language known to the rule data.
///
/// The discriminant is the bit position of the language inside a
/// [`LanguageSet`]; the rule data encodes language tags as bitmasks over
/// these positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Language {
    /// Unknown or mixed origin; selects the generic tables
    Any = 0,
    /// Arabic script
    Arabic,
    /// Cyrillic script
    Cyrillic,
    /// Czech
    Czech,
    /// Dutch
    Dutch,
    /// English
    English,
    /// French
    French,
    /// German
    German,
    /// Greek script
    Greek,
    /// Greek names written in Latin script
    GreekLatin,
    /// Hebrew script
    Hebrew,
    /// Hungarian
    Hungarian,
    /// Italian
    Italian,
    /// Polish
    Polish,
    /// Portuguese
    Portuguese,
    /// Romanian
    Romanian,
    /// Russian names written in Latin script
    Russian,
    /// Spanish
    Spanish,
    /// Turkish
    Turkish,
}

impl Language {
    /// Every language, in bit order.
    pub const ALL: [Language; 19] = [
        Language::Any,
        Language::Arabic,
        Language::Cyrillic,
        Language::Czech,
        Language::Dutch,
        Language::English,
        Language::French,
        Language::German,
        Language::Greek,
        Language::GreekLatin,
        Language::Hebrew,
        Language::Hungarian,
        Language::Italian,
        Language::Polish,
        Language::Portuguese,
        Language::Romanian,
        Language::Russian,
        Language::Spanish,
        Language::Turkish,
    ];

    /// The single bit this language occupies in a [`LanguageSet`].
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << (self as u8)
    }

    /// Lowercase name used by the rule data and the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Language::Any => "any",
            Language::Arabic => "arabic",
            Language::Cyrillic => "cyrillic",
            Language::Czech => "czech",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Greek => "greek",
            Language::GreekLatin => "greeklatin",
            Language::Hebrew => "hebrew",
            Language::Hungarian => "hungarian",
            Language::Italian => "italian",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Romanian => "romanian",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Turkish => "turkish",
        }
    }

    /// Looks a language up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lang| lang.name() == name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Language::from_name(&name).ok_or(Error::UnknownLanguage(name))
    }
}

/// A set of languages stored as a bitmask.
///
/// Sets are immutable values; all operations return new sets. Bits that do
/// not correspond to a [`Language`] are never set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet(u32);

impl LanguageSet {
    /// The empty set. An alternative whose mask becomes empty is impossible.
    pub const EMPTY: LanguageSet = LanguageSet(0);

    /// The set holding only the [`Language::Any`] fallback bit.
    pub const ANY: LanguageSet = LanguageSet(1);

    /// Every language, including the [`Language::Any`] bit.
    pub const ALL: LanguageSet = LanguageSet((1 << Language::ALL.len()) - 1);

    /// Builds a set from a raw bitmask, discarding unknown bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        LanguageSet(bits & Self::ALL.0)
    }

    /// Returns the raw bitmask.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no language is in the set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `language` is in the set.
    #[inline]
    pub const fn contains(self, language: Language) -> bool {
        self.0 & language.bit() != 0
    }

    /// Returns `true` if every language of `self` is also in `other`.
    #[inline]
    pub const fn is_subset(self, other: LanguageSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Languages present in both sets.
    #[inline]
    pub const fn intersection(self, other: LanguageSet) -> Self {
        LanguageSet(self.0 & other.0)
    }

    /// Languages present in either set.
    #[inline]
    pub const fn union(self, other: LanguageSet) -> Self {
        LanguageSet(self.0 | other.0)
    }

    /// Languages of `self` that are not in `other`.
    #[inline]
    pub const fn difference(self, other: LanguageSet) -> Self {
        LanguageSet(self.0 & !other.0)
    }

    /// Number of languages in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns the language if the set names exactly one.
    pub fn single(self) -> Option<Language> {
        if self.len() == 1 {
            Language::ALL.get(self.0.trailing_zeros() as usize).copied()
        } else {
            None
        }
    }

    /// Iterates over the languages in bit order.
    pub fn iter(self) -> impl Iterator<Item = Language> {
        Language::ALL
            .into_iter()
            .filter(move |lang| self.contains(*lang))
    }
}

impl From<Language> for LanguageSet {
    fn from(language: Language) -> Self {
        LanguageSet(language.bit())
    }
}

impl FromIterator<Language> for LanguageSet {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        iter.into_iter()
            .fold(LanguageSet::EMPTY, |set, lang| set | LanguageSet::from(lang))
    }
}

impl BitAnd for LanguageSet {
    type Output = LanguageSet;

    fn bitand(self, rhs: LanguageSet) -> LanguageSet {
        self.intersection(rhs)
    }
}

impl BitAndAssign for LanguageSet {
    fn bitand_assign(&mut self, rhs: LanguageSet) {
        *self = self.intersection(rhs);
    }
}

impl BitOr for LanguageSet {
    type Output = LanguageSet;

    fn bitor(self, rhs: LanguageSet) -> LanguageSet {
        self.union(rhs)
    }
}

impl BitOrAssign for LanguageSet {
    fn bitor_assign(&mut self, rhs: LanguageSet) {
        *self = self.union(rhs);
    }
}

impl Sub for LanguageSet {
    type Output = LanguageSet;

    fn sub(self, rhs: LanguageSet) -> LanguageSet {
        self.difference(rhs)
    }
}

impl SubAssign for LanguageSet {
    fn sub_assign(&mut self, rhs: LanguageSet) {
        *self = self.difference(rhs);
    }
}

impl Not for LanguageSet {
    type Output = LanguageSet;

    fn not(self) -> LanguageSet {
        LanguageSet::ALL.difference(self)
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, lang) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(lang.name())?;
        }
        Ok(())
    }
}

impl fmt::Debug for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageSet({})", self)
    }
}

impl FromStr for LanguageSet {
    type Err = Error;

    /// Parses a comma or `+` separated list of language names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split([',', '+'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Language::from_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_rule_data_encoding() {
        assert_eq!(Language::Any.bit(), 1);
        assert_eq!(Language::Cyrillic.bit(), 4);
        assert_eq!(Language::German.bit(), 128);
        assert_eq!(Language::GreekLatin.bit(), 512);
        assert_eq!(Language::Russian.bit(), 65536);
        assert_eq!(Language::Turkish.bit(), 262144);
        assert_eq!(LanguageSet::ALL.bits(), 524287);
    }

    #[test]
    fn test_from_bits_drops_unknown_bits() {
        let set = LanguageSet::from_bits(u32::MAX);
        assert_eq!(set, LanguageSet::ALL);
        assert_eq!(set.len(), 19);
    }

    #[test]
    fn test_set_algebra() {
        let de_en = LanguageSet::from_bits(128 | 32);
        let de = LanguageSet::from(Language::German);
        let ru = LanguageSet::from(Language::Russian);

        assert_eq!(de_en & de, de);
        assert!((de_en & ru).is_empty());
        assert_eq!((de_en | ru).len(), 3);
        assert_eq!(de_en - de, LanguageSet::from(Language::English));
        assert!(de.is_subset(de_en));
        assert!(!de_en.is_subset(de));
        assert!(!(!de).contains(Language::German));
    }

    #[test]
    fn test_single() {
        assert_eq!(
            LanguageSet::from(Language::Polish).single(),
            Some(Language::Polish)
        );
        assert_eq!(LanguageSet::ANY.single(), Some(Language::Any));
        assert_eq!(LanguageSet::from_bits(128 | 32).single(), None);
        assert_eq!(LanguageSet::EMPTY.single(), None);
    }

    #[test]
    fn test_iter_in_bit_order() {
        let set: LanguageSet = [Language::Spanish, Language::Arabic, Language::German]
            .into_iter()
            .collect();
        let langs: Vec<_> = set.iter().collect();
        assert_eq!(
            langs,
            vec![Language::Arabic, Language::German, Language::Spanish]
        );
    }

    #[test]
    fn test_display_and_parse() {
        let set: LanguageSet = "german, english".parse().unwrap();
        assert_eq!(set.to_string(), "english+german");
        assert_eq!(LanguageSet::EMPTY.to_string(), "none");
        assert_eq!("greeklatin".parse::<Language>().unwrap(), Language::GreekLatin);
        assert!(matches!(
            "klingon".parse::<LanguageSet>(),
            Err(Error::UnknownLanguage(name)) if name == "klingon"
        ));
    }

    #[test]
    fn test_serde_uses_raw_bits() {
        let set = LanguageSet::from_bits(65696);
        assert_eq!(serde_json::to_string(&set).unwrap(), "65696");
        let back: LanguageSet = serde_json::from_str("65696").unwrap();
        assert_eq!(back, set);
        let lang: Language = serde_json::from_str("\"greeklatin\"").unwrap();
        assert_eq!(lang, Language::GreekLatin);
    }
}
