//! Loading rule data from JSON.
//!
//! Each rule family is one JSON document:
//!
//! ```json
//! {
//!   "name_type": "generic",
//!   "languages": ["any", "arabic", "cyrillic"],
//!   "language_rules": [{"pattern": "^mc", "languages": 32, "accept": true}],
//!   "tiers": {
//!     "rules":  {"any": ["rules_any"]},
//!     "approx": {"any": ["approx_any"], "common": ["approx_common"]},
//!     "exact":  {"any": ["exact_any"], "common": ["exact_common"]}
//!   },
//!   "tables": {"rules_any": [["sch", "", "", "S"]]}
//! }
//! ```
//!
//! A tier entry lists named tables that are concatenated, in order, into the
//! table for that language key. Tables of the final tiers are closed over the
//! family's phonetic alphabet with identity rules, so that every symbol the
//! rules tier can emit has a matching rule.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::{NameType, NameTypeRules, Rule, RuleBook, RuleTable, TableKey, Tier};
use crate::error::{Error, Result};
use crate::language::{Language, LanguageRule, LanguageSet, RuleGuesser};

#[derive(Debug, Deserialize)]
struct RawFamily {
    name_type: NameType,
    languages: Vec<Language>,
    language_rules: Vec<RawLanguageRule>,
    tiers: RawTiers,
    tables: FxHashMap<String, Vec<[String; 4]>>,
}

#[derive(Debug, Deserialize)]
struct RawLanguageRule {
    pattern: String,
    languages: u32,
    accept: bool,
}

#[derive(Debug, Deserialize)]
struct RawTiers {
    rules: BTreeMap<String, Vec<String>>,
    approx: BTreeMap<String, Vec<String>>,
    exact: BTreeMap<String, Vec<String>>,
}

impl RawTiers {
    fn iter(&self) -> impl Iterator<Item = (Tier, &BTreeMap<String, Vec<String>>)> {
        [
            (Tier::Rules, &self.rules),
            (Tier::Approx, &self.approx),
            (Tier::Exact, &self.exact),
        ]
        .into_iter()
    }
}

/// Compiles each named table once, on first use.
struct TableCompiler<'a> {
    raw: &'a FxHashMap<String, Vec<[String; 4]>>,
    compiled: FxHashMap<&'a str, Vec<Rule>>,
}

impl<'a> TableCompiler<'a> {
    fn new(raw: &'a FxHashMap<String, Vec<[String; 4]>>) -> Self {
        Self {
            raw,
            compiled: FxHashMap::default(),
        }
    }

    fn rules(&mut self, name: &str) -> Result<&[Rule]> {
        let raw = self.raw;
        let (key, raw_rules) = raw
            .get_key_value(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))?;
        if !self.compiled.contains_key(key.as_str()) {
            let rules = raw_rules
                .iter()
                .map(|[pattern, left, right, replacement]| {
                    Rule::new(pattern, left, right, replacement)
                })
                .collect::<Result<Vec<_>>>()?;
            self.compiled.insert(key.as_str(), rules);
        }
        Ok(self
            .compiled
            .get(key.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}

impl NameTypeRules {
    /// Parses and compiles one rule family from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuleData`] for malformed JSON, and the compile errors
    /// of [`Rule::new`], [`RuleTable::new`] and [`LanguageRule::new`] for
    /// defective rules. A tier naming an undefined table yields
    /// [`Error::UnknownTable`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawFamily = serde_json::from_str(json)?;
        compile_family(raw)
    }

    /// Reads and compiles one rule family from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

fn compile_family(raw: RawFamily) -> Result<NameTypeRules> {
    let languages: LanguageSet = raw.languages.iter().copied().collect();

    let language_rules = raw
        .language_rules
        .iter()
        .map(|rule| {
            LanguageRule::new(
                &rule.pattern,
                LanguageSet::from_bits(rule.languages),
                rule.accept,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    let guesser = RuleGuesser::new(language_rules, languages);

    let mut compiler = TableCompiler::new(&raw.tables);
    let mut composed: Vec<((Tier, TableKey), Vec<Rule>)> = Vec::new();
    for (tier, entries) in raw.tiers.iter() {
        for (key, names) in entries {
            let key: TableKey = key.parse()?;
            let mut rules = Vec::new();
            for name in names {
                rules.extend_from_slice(compiler.rules(name)?);
            }
            composed.push(((tier, key), rules));
        }
    }

    let alphabet = phonetic_alphabet(composed.iter().flat_map(|(_, rules)| rules));

    let mut tables = Vec::with_capacity(composed.len());
    for ((tier, key), mut rules) in composed {
        if tier != Tier::Rules {
            rules.extend(alphabet.iter().copied().map(Rule::identity));
        }
        let table = RuleTable::new(format!("{tier}/{key}"), rules)?;
        tables.push(((tier, key), table));
    }

    tracing::debug!(
        name_type = %raw.name_type,
        languages = %languages,
        tables = tables.len(),
        alphabet = alphabet.len(),
        "compiled rule family"
    );

    Ok(NameTypeRules::new(raw.name_type, languages, guesser, tables))
}

/// Every character any rule of the family can emit, in sorted order.
fn phonetic_alphabet<'r>(rules: impl Iterator<Item = &'r Rule>) -> BTreeSet<char> {
    rules
        .flat_map(Rule::fragments)
        .flat_map(|fragment| fragment.text.chars())
        .collect()
}

impl RuleBook {
    /// Loads one JSON document per family.
    ///
    /// # Errors
    ///
    /// See [`NameTypeRules::from_json_file`].
    pub fn from_json_files<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut book = RuleBook::new();
        for path in paths {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "loading rule data");
            book.insert(NameTypeRules::from_json_file(path)?);
        }
        Ok(book)
    }

    /// Loads `generic.json`, `ashkenazic.json` and `sephardic.json` from
    /// `dir`, skipping families whose file does not exist.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let paths: Vec<_> = NameType::ALL
            .iter()
            .map(|name_type| dir.join(format!("{name_type}.json")))
            .filter(|path| path.is_file())
            .collect();
        Self::from_json_files(paths)
    }

    /// The rule data compiled into the library, parsed on first use and
    /// shared afterwards.
    #[cfg(feature = "embedded-rules")]
    pub fn embedded() -> Result<Arc<RuleBook>> {
        static EMBEDDED: once_cell::sync::OnceCell<Arc<RuleBook>> =
            once_cell::sync::OnceCell::new();

        EMBEDDED
            .get_or_try_init(|| {
                let mut book = RuleBook::new();
                for json in [
                    include_str!("../../data/generic.json"),
                    include_str!("../../data/ashkenazic.json"),
                    include_str!("../../data/sephardic.json"),
                ] {
                    book.insert(NameTypeRules::from_json_str(json)?);
                }
                Ok(Arc::new(book))
            })
            .cloned()
    }
}
