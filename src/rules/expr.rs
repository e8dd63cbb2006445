//! Context expressions and context matching.
//!
//! Rule contexts use a small subset of regular-expression syntax:
//!
//! - literal characters (`e`, `ш`, `S`),
//! - single-position character classes (`[aeiou]`, `[^k]`),
//! - single-character alternations (`(а|е|о)`), equivalent to a class,
//! - a leading `^` (word start) and a trailing `$` (word end).
//!
//! Expressions are compiled once, when a table is loaded, into a sequence of
//! single-position [`Atom`]s. A left context is anchored immediately before
//! the candidate match and a right context immediately after it; neither
//! ever searches further away.

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// A single-position test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// Matches exactly this character
    Char(char),
    /// Matches any listed character, or any unlisted one when `negated`
    Class {
        /// Listed characters
        chars: SmallVec<[char; 8]>,
        /// Whether the class is `[^...]`
        negated: bool,
    },
}

impl Atom {
    /// Returns `true` if `c` satisfies this atom.
    #[inline]
    pub fn matches(&self, c: char) -> bool {
        match self {
            Atom::Char(expected) => *expected == c,
            Atom::Class { chars, negated } => chars.contains(&c) != *negated,
        }
    }
}

/// A compiled pattern or context expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextExpr {
    atoms: Vec<Atom>,
    at_start: bool,
    at_end: bool,
}

impl ContextExpr {
    /// Compiles `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExpression`] for unterminated or empty
    /// classes, alternations with multi-character branches, and anchors in
    /// the middle of an expression.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bmpm::rules::ContextExpr;
    ///
    /// let ctx = ContextExpr::parse("[aeiou]$").unwrap();
    /// let word: Vec<char> = "kopa".chars().collect();
    /// assert!(ctx.matches_after(&word, 3));
    /// assert!(!ctx.matches_after(&word, 2));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidExpression {
            text: text.to_string(),
            reason,
        };

        let mut body = text;
        let at_start = body.starts_with('^');
        if at_start {
            body = &body[1..];
        }
        let at_end = body.ends_with('$');
        if at_end {
            body = &body[..body.len() - 1];
        }

        let mut atoms = Vec::new();
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            match c {
                '[' => {
                    let mut class: SmallVec<[char; 8]> = SmallVec::new();
                    let mut negated = false;
                    let mut closed = false;
                    let mut first = true;
                    for c in chars.by_ref() {
                        match c {
                            ']' => {
                                closed = true;
                                break;
                            }
                            '^' if first => negated = true,
                            _ => class.push(c),
                        }
                        first = false;
                    }
                    if !closed {
                        return Err(invalid("unterminated character class"));
                    }
                    if class.is_empty() {
                        return Err(invalid("empty character class"));
                    }
                    atoms.push(Atom::Class {
                        chars: class,
                        negated,
                    });
                }
                '(' => {
                    let mut class: SmallVec<[char; 8]> = SmallVec::new();
                    let mut branch_len = 0;
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            ')' | '|' => {
                                if branch_len != 1 {
                                    return Err(invalid(
                                        "alternation branches must be single characters",
                                    ));
                                }
                                branch_len = 0;
                                if c == ')' {
                                    closed = true;
                                    break;
                                }
                            }
                            _ => {
                                class.push(c);
                                branch_len += 1;
                            }
                        }
                    }
                    if !closed {
                        return Err(invalid("unterminated alternation"));
                    }
                    atoms.push(Atom::Class {
                        chars: class,
                        negated: false,
                    });
                }
                ']' | ')' | '|' => return Err(invalid("unbalanced delimiter")),
                '^' | '$' => return Err(invalid("anchor inside expression")),
                _ => atoms.push(Atom::Char(c)),
            }
        }

        Ok(Self {
            atoms,
            at_start,
            at_end,
        })
    }

    /// Returns `true` if the expression places no constraint at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && !self.at_start && !self.at_end
    }

    /// Number of characters the expression consumes.
    #[inline]
    pub fn width(&self) -> usize {
        self.atoms.len()
    }

    /// The compiled single-position tests.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    fn atoms_match_at(&self, word: &[char], start: usize) -> bool {
        self.atoms
            .iter()
            .zip(&word[start..])
            .all(|(atom, &c)| atom.matches(c))
    }

    /// Tests the expression as a left context ending at `end`.
    ///
    /// A leading `^` additionally requires the context to reach the start of
    /// the word; with no atoms that means `end == 0`.
    pub fn matches_before(&self, word: &[char], end: usize) -> bool {
        let width = self.atoms.len();
        if width > end || end > word.len() {
            return false;
        }
        let start = end - width;
        if self.at_start && start != 0 {
            return false;
        }
        self.atoms_match_at(word, start)
    }

    /// Tests the expression as a right context starting at `start`.
    ///
    /// A trailing `$` additionally requires the context to reach the end of
    /// the word; with no atoms that means `start == word.len()`.
    pub fn matches_after(&self, word: &[char], start: usize) -> bool {
        let end = start + self.atoms.len();
        if end > word.len() {
            return false;
        }
        if self.at_end && end != word.len() {
            return false;
        }
        self.atoms_match_at(word, start)
    }

    /// Returns `true` if the expression occurs anywhere in `word`, honouring
    /// both anchors.
    pub fn found_in(&self, word: &[char]) -> bool {
        let width = self.atoms.len();
        if width > word.len() {
            return false;
        }
        let last = word.len() - width;
        if self.at_start {
            return (!self.at_end || last == 0) && self.atoms_match_at(word, 0);
        }
        if self.at_end {
            return self.atoms_match_at(word, last);
        }
        (0..=last).any(|start| self.atoms_match_at(word, start))
    }
}

/// Checks the left and right contexts around a candidate match.
///
/// The candidate occupies `word[position..position + pattern_len]`. `left`
/// must match immediately before it and `right` immediately after it. Empty
/// contexts always match. A non-match is an ordinary `false`, letting the
/// caller move on to the next rule.
///
/// # Examples
///
/// ```rust
/// use bmpm::rules::{context_matches, ContextExpr};
///
/// let word: Vec<char> = "schwarz".chars().collect();
/// let left = ContextExpr::parse("^").unwrap();
/// let right = ContextExpr::parse("[w]").unwrap();
/// assert!(context_matches(&word, 0, 3, &left, &right));
/// assert!(!context_matches(&word, 4, 1, &left, &ContextExpr::default()));
/// ```
#[inline]
pub fn context_matches(
    word: &[char],
    position: usize,
    pattern_len: usize,
    left: &ContextExpr,
    right: &ContextExpr,
) -> bool {
    left.matches_before(word, position) && right.matches_after(word, position + pattern_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_parse_literals_and_anchors() {
        let expr = ContextExpr::parse("^sch").unwrap();
        assert_eq!(expr.width(), 3);
        assert!(expr.at_start);
        assert!(!expr.at_end);

        let expr = ContextExpr::parse("e$").unwrap();
        assert_eq!(expr.atoms(), &[Atom::Char('e')]);
        assert!(expr.at_end);
    }

    #[test]
    fn test_parse_classes() {
        let expr = ContextExpr::parse("[^aeiou]").unwrap();
        assert!(expr.atoms()[0].matches('k'));
        assert!(!expr.atoms()[0].matches('e'));

        let expr = ContextExpr::parse("(а|е|о)").unwrap();
        assert!(expr.atoms()[0].matches('е'));
        assert!(!expr.atoms()[0].matches('и'));
    }

    #[test]
    fn test_parse_multi_atom_context() {
        let expr = ContextExpr::parse("[ln][bdfg]").unwrap();
        assert_eq!(expr.width(), 2);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["[abc", "[]", "(ab|c)", "(a|b", "a)b", "a^b", "a$b"] {
            assert!(
                matches!(ContextExpr::parse(bad), Err(Error::InvalidExpression { .. })),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_empty_context_always_matches() {
        let empty = ContextExpr::parse("").unwrap();
        assert!(empty.is_empty());
        let word = chars("abc");
        for i in 0..=3 {
            assert!(empty.matches_before(&word, i));
            assert!(empty.matches_after(&word, i));
        }
    }

    #[test]
    fn test_left_context_anchors_at_boundary() {
        let word = chars("kopa");
        let vowel = ContextExpr::parse("[aeiou]").unwrap();
        assert!(vowel.matches_before(&word, 2)); // 'o' precedes 'p'
        assert!(!vowel.matches_before(&word, 3)); // 'p' precedes 'a'
        assert!(!vowel.matches_before(&word, 0));

        let start = ContextExpr::parse("^").unwrap();
        assert!(start.matches_before(&word, 0));
        assert!(!start.matches_before(&word, 1));

        let start_k = ContextExpr::parse("^k").unwrap();
        assert!(start_k.matches_before(&word, 1));
        assert!(!ContextExpr::parse("^o").unwrap().matches_before(&word, 2));
    }

    #[test]
    fn test_right_context_anchors_at_boundary() {
        let word = chars("kopa");
        let end = ContextExpr::parse("$").unwrap();
        assert!(end.matches_after(&word, 4));
        assert!(!end.matches_after(&word, 3));

        let final_a = ContextExpr::parse("a$").unwrap();
        assert!(final_a.matches_after(&word, 3));
        assert!(!final_a.matches_after(&word, 1));

        let consonant = ContextExpr::parse("[^aeiou]").unwrap();
        assert!(consonant.matches_after(&word, 2));
        assert!(!consonant.matches_after(&word, 4));
    }

    #[test]
    fn test_found_in() {
        let word = chars("moskowitz");
        assert!(ContextExpr::parse("witz").unwrap().found_in(&word));
        assert!(ContextExpr::parse("tz$").unwrap().found_in(&word));
        assert!(!ContextExpr::parse("^tz").unwrap().found_in(&word));
        assert!(ContextExpr::parse("^mo").unwrap().found_in(&word));
        assert!(ContextExpr::parse("[aeiou]w").unwrap().found_in(&word));
        assert!(!ContextExpr::parse("^moskowitz.").unwrap().found_in(&word));
        assert!(ContextExpr::parse("^moskowitz$").unwrap().found_in(&word));
    }

    #[test]
    fn test_context_matches() {
        let word = chars("witz");
        let none = ContextExpr::default();
        let end = ContextExpr::parse("$").unwrap();
        assert!(context_matches(&word, 2, 2, &none, &end));
        assert!(!context_matches(&word, 1, 2, &none, &end));
        let after_i = ContextExpr::parse("i").unwrap();
        assert!(context_matches(&word, 2, 2, &after_i, &end));
    }
}
