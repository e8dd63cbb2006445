//! Multi-word names.
//!
//! The engine encodes single tokens. A full name is first split into words,
//! and each family decides what to do with name particles:
//!
//! | family     | particles                                              | handling                     |
//! |------------|--------------------------------------------------------|------------------------------|
//! | generic    | `d'` and `da dal de del dela de la della des di do dos du van von` | leading particle read both detached and attached |
//! | sephardic  | `al el` plus the generic list                          | dropped; text before an apostrophe dropped |
//! | ashkenazic | `bar ben da de van von`                                | dropped                      |
//!
//! A name made only of particles is kept as written.

use std::fmt;

use serde::Serialize;

use crate::rules::NameType;

const GENERIC_PARTICLES: &[&str] = &[
    "da", "dal", "de", "del", "dela", "della", "des", "di", "do", "dos", "du", "van", "von",
];

const SEPHARDIC_PARTICLES: &[&str] = &[
    "al", "el", "da", "dal", "de", "del", "dela", "della", "des", "di", "do", "dos", "du", "van",
    "von",
];

const ASHKENAZIC_PARTICLES: &[&str] = &["bar", "ben", "da", "de", "van", "von"];

const APOSTROPHES: [char; 2] = ['\'', '’'];

/// The tokens of a name, ready to be encoded one by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    words: Vec<String>,
    attached: Option<String>,
}

impl NameParts {
    /// Words encoded separately.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// For a generic name with a leading particle, the particle fused with
    /// the rest of the name (`van der berg` gives `vanderberg`).
    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    /// Every token to encode: the words, then the attached reading.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .map(String::as_str)
            .chain(self.attached.as_deref())
    }

    /// Returns `true` if the name has no tokens.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.attached.is_none()
    }
}

/// Splits `name` into tokens following the particle policy of `name_type`.
///
/// # Examples
///
/// ```rust
/// use bmpm::names::split_name;
/// use bmpm::rules::NameType;
///
/// let parts = split_name("D'Angelo", NameType::Generic);
/// assert_eq!(parts.words(), ["angelo"]);
/// assert_eq!(parts.attached(), Some("dangelo"));
///
/// let parts = split_name("Ben-David Cohen", NameType::Ashkenazic);
/// assert_eq!(parts.words(), ["david", "cohen"]);
/// ```
pub fn split_name(name: &str, name_type: NameType) -> NameParts {
    let lowered = name.to_lowercase().replace('-', " ");
    let words: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();
    if words.is_empty() {
        return NameParts::default();
    }

    match name_type {
        NameType::Generic => split_generic(words),
        NameType::Sephardic => {
            let words: Vec<String> = words
                .iter()
                .map(|word| after_last_apostrophe(word).to_string())
                .filter(|word| !word.is_empty())
                .collect();
            drop_particles(words, SEPHARDIC_PARTICLES, &[["de", "la"]])
        }
        NameType::Ashkenazic => drop_particles(words, ASHKENAZIC_PARTICLES, &[]),
    }
}

fn split_generic(words: Vec<String>) -> NameParts {
    let first = &words[0];
    let elided = ["d'", "d’"]
        .iter()
        .find_map(|prefix| first.strip_prefix(*prefix))
        .filter(|rest| !rest.is_empty());
    if let Some(rest) = elided {
        let mut detached = vec![rest.to_string()];
        detached.extend(words[1..].iter().cloned());
        let attached = format!("d{}", detached.concat());
        return NameParts {
            words: detached,
            attached: Some(attached),
        };
    }

    let particle_len = if words.len() > 2 && words[0] == "de" && words[1] == "la" {
        2
    } else if words.len() > 1 && GENERIC_PARTICLES.contains(&words[0].as_str()) {
        1
    } else {
        0
    };
    if particle_len == 0 {
        return NameParts {
            words,
            attached: None,
        };
    }

    let attached = words.concat();
    NameParts {
        words: words[particle_len..].to_vec(),
        attached: Some(attached),
    }
}

fn drop_particles(words: Vec<String>, particles: &[&str], compounds: &[[&str; 2]]) -> NameParts {
    let mut kept = Vec::with_capacity(words.len());
    let mut index = 0;
    while index < words.len() {
        let word = words[index].as_str();
        let next = words.get(index + 1).map(String::as_str);
        if compounds
            .iter()
            .any(|[first, second]| word == *first && next == Some(*second))
        {
            index += 2;
            continue;
        }
        if !particles.contains(&word) {
            kept.push(words[index].clone());
        }
        index += 1;
    }

    NameParts {
        words: if kept.is_empty() { words } else { kept },
        attached: None,
    }
}

fn after_last_apostrophe(word: &str) -> &str {
    match word.rfind(|c| APOSTROPHES.contains(&c)) {
        Some(index) => {
            let apostrophe_len = word[index..].chars().next().map_or(1, char::len_utf8);
            &word[index + apostrophe_len..]
        }
        None => word,
    }
}

/// Phonetic keys of a multi-word name, one segment per token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedName {
    segments: Vec<Vec<String>>,
}

impl EncodedName {
    /// Wraps per-token key lists.
    pub fn new(segments: Vec<Vec<String>>) -> Self {
        Self { segments }
    }

    /// Keys of each token, in token order.
    pub fn segments(&self) -> &[Vec<String>] {
        &self.segments
    }

    /// Every key of every segment.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().flatten().map(String::as_str)
    }

    /// Returns `true` if the two names have at least one key in common.
    pub fn shares_key(&self, other: &EncodedName) -> bool {
        self.keys().any(|key| other.keys().any(|theirs| theirs == key))
    }

    /// Returns `true` if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for EncodedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("-")?;
            }
            write!(f, "({})", segment.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        let parts = split_name("  Schwarz ", NameType::Generic);
        assert_eq!(parts.words(), ["schwarz"]);
        assert_eq!(parts.attached(), None);
        assert_eq!(parts.tokens().collect::<Vec<_>>(), ["schwarz"]);
    }

    #[test]
    fn test_empty_name() {
        assert!(split_name("  - ", NameType::Generic).is_empty());
        assert!(split_name("", NameType::Sephardic).is_empty());
    }

    #[test]
    fn test_generic_elided_particle() {
        let parts = split_name("d’Angelo", NameType::Generic);
        assert_eq!(parts.tokens().collect::<Vec<_>>(), ["angelo", "dangelo"]);
    }

    #[test]
    fn test_generic_leading_particle() {
        let parts = split_name("Van der Berg", NameType::Generic);
        assert_eq!(parts.words(), ["der", "berg"]);
        assert_eq!(parts.attached(), Some("vanderberg"));

        let parts = split_name("de la Fuente", NameType::Generic);
        assert_eq!(parts.words(), ["fuente"]);
        assert_eq!(parts.attached(), Some("delafuente"));
    }

    #[test]
    fn test_generic_keeps_inner_particles() {
        let parts = split_name("Maria de Souza", NameType::Generic);
        assert_eq!(parts.words(), ["maria", "de", "souza"]);
        assert_eq!(parts.attached(), None);
    }

    #[test]
    fn test_hyphen_splits_words() {
        let parts = split_name("Lopez-Garcia", NameType::Generic);
        assert_eq!(parts.words(), ["lopez", "garcia"]);
    }

    #[test]
    fn test_sephardic_drops_particles_and_elisions() {
        let parts = split_name("Abu el d'Israeli de la Vega", NameType::Sephardic);
        assert_eq!(parts.words(), ["abu", "israeli", "vega"]);
    }

    #[test]
    fn test_ashkenazic_drops_particles() {
        let parts = split_name("Bar Ilan", NameType::Ashkenazic);
        assert_eq!(parts.words(), ["ilan"]);
        // "del" is only a particle for the other families
        let parts = split_name("Del Monte", NameType::Ashkenazic);
        assert_eq!(parts.words(), ["del", "monte"]);
    }

    #[test]
    fn test_only_particles_are_kept() {
        let parts = split_name("Ben", NameType::Ashkenazic);
        assert_eq!(parts.words(), ["ben"]);
        let parts = split_name("de la", NameType::Sephardic);
        assert_eq!(parts.words(), ["de", "la"]);
    }

    #[test]
    fn test_encoded_name_display_and_keys() {
        let name = EncodedName::new(vec![
            vec!["anZilo".to_string(), "andZilo".to_string()],
            vec!["danZilo".to_string()],
        ]);
        assert_eq!(name.to_string(), "(anZilo|andZilo)-(danZilo)");
        assert_eq!(name.keys().count(), 3);

        let other = EncodedName::new(vec![vec!["danZilo".to_string()]]);
        assert!(name.shares_key(&other));
        assert!(!other.shares_key(&EncodedName::default()));
    }
}
