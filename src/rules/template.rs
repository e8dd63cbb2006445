//! Replacement templates.
//!
//! A template is a sequence of literal runs and parenthesized alternations.
//! Every alternative, and every literal run, may carry a language tag
//! `[mask]` restricting it to the languages in `mask`:
//!
//! ```text
//! S              one fragment "S" valid for every language
//! (mb|b[512])    "mb" for every language, "b" only for bit 9
//! (t|[64])       "t", or nothing at all for bit 6
//! ```
//!
//! Templates are expanded into [`Fragment`]s once, at load time, by taking
//! the cartesian product of their segments.

use smallvec::{smallvec, SmallVec};

use crate::error::{Error, Result};
use crate::language::LanguageSet;

/// One expansion of a replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Text appended to each alternative
    pub text: String,
    /// Languages for which this text is valid
    pub languages: LanguageSet,
}

impl Fragment {
    /// Creates a fragment valid for `languages`.
    pub fn new(text: impl Into<String>, languages: LanguageSet) -> Self {
        Self {
            text: text.into(),
            languages,
        }
    }
}

/// A compiled replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    fragments: SmallVec<[Fragment; 2]>,
}

impl Template {
    /// Compiles `text` into its fragments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`] for unbalanced parentheses,
    /// malformed tags and templates whose every fragment carries an empty
    /// language tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bmpm::language::LanguageSet;
    /// use bmpm::rules::Template;
    ///
    /// let template = Template::parse("(mb|b[512])").unwrap();
    /// let texts: Vec<&str> = template.fragments().iter().map(|f| f.text.as_str()).collect();
    /// assert_eq!(texts, ["mb", "b"]);
    /// assert_eq!(template.fragments()[0].languages, LanguageSet::ALL);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidTemplate {
            text: text.to_string(),
            reason,
        };

        let mut segments: Vec<Vec<Fragment>> = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            match c {
                '(' => {
                    if !literal.is_empty() {
                        segments.push(vec![Fragment::new(
                            std::mem::take(&mut literal),
                            LanguageSet::ALL,
                        )]);
                    }
                    let mut group = Vec::new();
                    let mut current = String::new();
                    let mut tag: Option<LanguageSet> = None;
                    let mut closed = false;
                    while let Some(c) = chars.next() {
                        match c {
                            '|' | ')' => {
                                group.push(Fragment::new(
                                    std::mem::take(&mut current),
                                    tag.take().unwrap_or(LanguageSet::ALL),
                                ));
                                if c == ')' {
                                    closed = true;
                                    break;
                                }
                            }
                            '[' => {
                                if tag.is_some() {
                                    return Err(invalid("alternative has two language tags"));
                                }
                                tag = Some(read_tag(&mut chars).ok_or_else(|| {
                                    invalid("language tag must be a decimal bitmask")
                                })?);
                            }
                            '(' => return Err(invalid("nested alternation")),
                            _ if tag.is_some() => {
                                return Err(invalid("language tag must end an alternative"))
                            }
                            _ => current.push(c),
                        }
                    }
                    if !closed {
                        return Err(invalid("unterminated alternation"));
                    }
                    segments.push(group);
                }
                '[' => {
                    let languages = read_tag(&mut chars)
                        .ok_or_else(|| invalid("language tag must be a decimal bitmask"))?;
                    segments.push(vec![Fragment::new(
                        std::mem::take(&mut literal),
                        languages,
                    )]);
                }
                ')' | '|' | ']' => return Err(invalid("unbalanced delimiter")),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(vec![Fragment::new(literal, LanguageSet::ALL)]);
        }

        let mut fragments: SmallVec<[Fragment; 2]> =
            smallvec![Fragment::new(String::new(), LanguageSet::ALL)];
        for segment in &segments {
            fragments = fragments
                .iter()
                .flat_map(|prefix| {
                    segment.iter().map(move |part| {
                        Fragment::new(
                            format!("{}{}", prefix.text, part.text),
                            prefix.languages & part.languages,
                        )
                    })
                })
                .filter(|fragment| !fragment.languages.is_empty())
                .collect();
        }
        if fragments.is_empty() {
            return Err(invalid("no fragment is valid for any language"));
        }

        Ok(Self { fragments })
    }

    /// A template emitting `text` for every language.
    pub fn literal(text: &str) -> Self {
        Self {
            fragments: smallvec![Fragment::new(text, LanguageSet::ALL)],
        }
    }

    /// The expanded fragments in template order.
    #[inline]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns `true` if the template expands to more than one fragment.
    pub fn is_branching(&self) -> bool {
        self.fragments.len() > 1
    }
}

/// Reads the digits of a `[mask]` tag, after the opening bracket, through the
/// closing bracket.
fn read_tag(chars: &mut std::str::Chars<'_>) -> Option<LanguageSet> {
    let mut digits = String::new();
    for c in chars.by_ref() {
        if c == ']' {
            return digits.parse::<u32>().ok().map(LanguageSet::from_bits);
        }
        digits.push(c);
    }
    None
}
