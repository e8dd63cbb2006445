//! Rule records, rule tables and the rule book.
//!
//! Rule data is organised in three levels:
//!
//! - a [`Rule`] is one `{pattern, left context, right context, replacement}`
//!   record, compiled once at load time;
//! - a [`RuleTable`] is an ordered list of rules for one
//!   (name type, tier, language key) triple, where table order is priority;
//! - a [`NameTypeRules`] holds every table and the language rules of one rule
//!   family, and a [`RuleBook`] holds the families.
//!
//! # Example
//!
//! ```rust
//! use bmpm::rules::{Rule, RuleTable};
//!
//! let table = RuleTable::new(
//!     "demo",
//!     vec![
//!         Rule::new("sch", "^", "", "S").unwrap(),
//!         Rule::new("s", "", "", "s").unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let word: Vec<char> = "schwarz".chars().collect();
//! let first = table.candidates(word[0]).find(|rule| rule.matches_at(&word, 0));
//! assert_eq!(first.map(|rule| rule.pattern_text()), Some("sch"));
//! ```

mod expr;
mod loader;
mod template;

pub use expr::{context_matches, Atom, ContextExpr};
pub use template::{Fragment, Template};

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::{Language, LanguageSet, RuleGuesser};

// ============================================================================
// Selectors
// ============================================================================

/// Rule family, each encoding different assumptions about a name's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NameType {
    /// Names of any origin
    #[cfg_attr(feature = "cli", value(alias = "gen"))]
    Generic,
    /// Ashkenazi Jewish names
    #[cfg_attr(feature = "cli", value(alias = "ash"))]
    Ashkenazic,
    /// Sephardi Jewish names
    #[cfg_attr(feature = "cli", value(alias = "sep"))]
    Sephardic,
}

impl NameType {
    /// Every rule family.
    pub const ALL: [NameType; 3] = [NameType::Generic, NameType::Ashkenazic, NameType::Sephardic];

    /// Lowercase name used in rule data.
    pub const fn name(self) -> &'static str {
        match self {
            NameType::Generic => "generic",
            NameType::Ashkenazic => "ashkenazic",
            NameType::Sephardic => "sephardic",
        }
    }
}

impl fmt::Display for NameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NameType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "gen" => Ok(NameType::Generic),
            "ashkenazic" | "ash" => Ok(NameType::Ashkenazic),
            "sephardic" | "sep" => Ok(NameType::Sephardic),
            _ => Err(Error::UnknownNameType(s.to_string())),
        }
    }
}

/// Final-pass precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RuleType {
    /// Merge sounds that are commonly confused; broader matching
    #[default]
    Approx,
    /// Keep finer distinctions; narrower matching
    Exact,
}

impl RuleType {
    /// The pipeline tier that implements this rule type.
    pub const fn tier(self) -> Tier {
        match self {
            RuleType::Approx => Tier::Approx,
            RuleType::Exact => Tier::Exact,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tier().name())
    }
}

/// Pipeline phase owning a set of tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Orthography to phonetic alphabet
    Rules,
    /// Approximate final pass
    Approx,
    /// Exact final pass
    Exact,
}

impl Tier {
    /// Every tier, in pipeline order.
    pub const ALL: [Tier; 3] = [Tier::Rules, Tier::Approx, Tier::Exact];

    /// Lowercase name used in rule data.
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Rules => "rules",
            Tier::Approx => "approx",
            Tier::Exact => "exact",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Language selector of a table inside a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKey {
    /// Table for one language; [`Language::Any`] is the generic table
    Language(Language),
    /// Language-independent cleanup table of a final tier
    Common,
}

impl TableKey {
    /// The key selecting the table for `languages`: the language's own table
    /// when exactly one language is named, the generic table otherwise.
    pub fn select(languages: LanguageSet) -> TableKey {
        TableKey::Language(languages.single().unwrap_or(Language::Any))
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Language(language) => write!(f, "{language}"),
            TableKey::Common => f.write_str("common"),
        }
    }
}

impl FromStr for TableKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "common" {
            Ok(TableKey::Common)
        } else {
            s.parse().map(TableKey::Language)
        }
    }
}

// ============================================================================
// Rules and tables
// ============================================================================

/// One compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Vec<char>,
    pattern_text: String,
    left: ContextExpr,
    left_text: String,
    right: ContextExpr,
    right_text: String,
    replacement: String,
    template: Template,
}

impl Rule {
    /// Compiles a rule. The pattern is a literal run; contexts and the
    /// replacement use the expression and template syntax.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExpression`] or [`Error::InvalidTemplate`] if a
    /// context or the replacement does not compile.
    pub fn new(pattern: &str, left: &str, right: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.chars().collect(),
            pattern_text: pattern.to_string(),
            left: ContextExpr::parse(left)?,
            left_text: left.to_string(),
            right: ContextExpr::parse(right)?,
            right_text: right.to_string(),
            replacement: replacement.to_string(),
            template: Template::parse(replacement)?,
        })
    }

    /// Rule that rewrites `c` to itself in any context.
    pub(crate) fn identity(c: char) -> Self {
        let text = c.to_string();
        Self {
            pattern: vec![c],
            pattern_text: text.clone(),
            left: ContextExpr::default(),
            left_text: String::new(),
            right: ContextExpr::default(),
            right_text: String::new(),
            template: Template::literal(&text),
            replacement: text,
        }
    }

    /// Pattern characters.
    #[inline]
    pub fn pattern(&self) -> &[char] {
        &self.pattern
    }

    /// Pattern source text.
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    /// Replacement source text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Left context.
    pub fn left(&self) -> &ContextExpr {
        &self.left
    }

    /// Right context.
    pub fn right(&self) -> &ContextExpr {
        &self.right
    }

    /// Expanded replacement fragments.
    #[inline]
    pub fn fragments(&self) -> &[Fragment] {
        self.template.fragments()
    }

    /// Returns `true` if the pattern occurs at `position` and both contexts
    /// hold around it.
    #[inline]
    pub fn matches_at(&self, word: &[char], position: usize) -> bool {
        word[position..].starts_with(&self.pattern)
            && context_matches(word, position, self.pattern.len(), &self.left, &self.right)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [{:?} _ {:?}] -> {:?}",
            self.pattern_text, self.left_text, self.right_text, self.replacement
        )
    }
}

/// An ordered, immutable list of rules.
///
/// Rules are indexed by the first character of their pattern so that the
/// transducer only scans rules that can possibly match, still in declared
/// order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    rules: Vec<Rule>,
    by_first: FxHashMap<char, Vec<usize>>,
}

impl RuleTable {
    /// Builds a table from rules in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPattern`] if any rule has an empty pattern.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Result<Self> {
        let name = name.into();
        let mut by_first: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (index, rule) in rules.iter().enumerate() {
            let first = rule
                .pattern
                .first()
                .ok_or_else(|| Error::EmptyPattern { table: name.clone() })?;
            by_first.entry(*first).or_default().push(index);
        }
        Ok(Self {
            name,
            rules,
            by_first,
        })
    }

    /// Table name, `tier/key` for tables composed by the loader.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules whose pattern starts with `first`, in priority order.
    #[inline]
    pub fn candidates(&self, first: char) -> impl Iterator<Item = &Rule> + '_ {
        self.by_first
            .get(&first)
            .into_iter()
            .flatten()
            .map(move |&index| &self.rules[index])
    }
}

// ============================================================================
// Families
// ============================================================================

/// All rule data of one rule family.
#[derive(Debug, Clone)]
pub struct NameTypeRules {
    name_type: NameType,
    languages: LanguageSet,
    guesser: RuleGuesser,
    tables: FxHashMap<(Tier, TableKey), RuleTable>,
}

impl NameTypeRules {
    /// Assembles a family from already compiled parts.
    pub fn new(
        name_type: NameType,
        languages: LanguageSet,
        guesser: RuleGuesser,
        tables: impl IntoIterator<Item = ((Tier, TableKey), RuleTable)>,
    ) -> Self {
        Self {
            name_type,
            languages,
            guesser,
            tables: tables.into_iter().collect(),
        }
    }

    /// The family.
    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    /// Languages the family supports, including [`Language::Any`].
    pub fn languages(&self) -> LanguageSet {
        self.languages
    }

    /// The family's language guesser.
    pub fn guesser(&self) -> &RuleGuesser {
        &self.guesser
    }

    /// The table stored under exactly `(tier, key)`, without fallback.
    pub fn table(&self, tier: Tier, key: TableKey) -> Option<&RuleTable> {
        self.tables.get(&(tier, key))
    }

    /// Resolves the table for `(tier, key)`.
    ///
    /// A language without its own table falls back to the generic
    /// [`Language::Any`] table of the tier. [`TableKey::Common`] has no
    /// fallback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] if neither table exists.
    pub fn lookup(&self, tier: Tier, key: TableKey) -> Result<&RuleTable> {
        let fallback = match key {
            TableKey::Language(language) if language != Language::Any => {
                Some(TableKey::Language(Language::Any))
            }
            _ => None,
        };
        self.table(tier, key)
            .or_else(|| fallback.and_then(|key| self.table(tier, key)))
            .ok_or(Error::MissingTable {
                name_type: self.name_type,
                tier,
                key,
            })
    }

    /// Number of stored tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Rule data for every loaded family.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    families: FxHashMap<NameType, NameTypeRules>,
}

impl RuleBook {
    /// Creates an empty rule book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a family.
    pub fn insert(&mut self, rules: NameTypeRules) {
        self.families.insert(rules.name_type, rules);
    }

    /// Loaded families in declaration order.
    pub fn name_types(&self) -> Vec<NameType> {
        let mut name_types: Vec<NameType> = self.families.keys().copied().collect();
        name_types.sort();
        name_types
    }

    /// The rules of one family.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] for the generic rules table if the
    /// family was never loaded.
    pub fn family(&self, name_type: NameType) -> Result<&NameTypeRules> {
        self.families.get(&name_type).ok_or(Error::MissingTable {
            name_type,
            tier: Tier::Rules,
            key: TableKey::Language(Language::Any),
        })
    }

    /// Resolves a table, see [`NameTypeRules::lookup`].
    pub fn lookup(&self, name_type: NameType, tier: Tier, key: TableKey) -> Result<&RuleTable> {
        self.family(name_type)?.lookup(tier, key)
    }
}
