//! # bmpm
//!
//! Beider-Morse phonetic matching for personal names.
//!
//! A name written under one language's spelling conventions is rewritten
//! into one or more phonetic keys; spellings of the "same" name from
//! different languages collapse to overlapping keys. The encoder is driven
//! entirely by rule data:
//!
//! - language rules guess which languages a word may come from,
//! - the *rules* tier maps spelling to a phonetic alphabet,
//! - the *approx* or *exact* tier maps that alphabet to matching keys.
//!
//! Three rule families ([`NameType`]) ship with the crate: generic,
//! Ashkenazic and Sephardic.
//!
//! ## Example
//!
//! ```rust
//! use bmpm::prelude::*;
//!
//! let encoder = BeiderMorse::embedded().unwrap();
//!
//! let a = encoder.encode("Peterson", NameType::Generic, RuleType::Approx, None).unwrap();
//! let b = encoder.encode("Petersen", NameType::Generic, RuleType::Approx, None).unwrap();
//! assert!(a.iter().any(|key| b.contains(key)));
//! ```
//!
//! ## Feature flags
//!
//! - `embedded-rules` (default): compiles the bundled rule data into the
//!   library, see [`RuleBook::embedded`].
//! - `cli`: builds the `bmpm` command-line tool.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod names;
pub mod rules;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

pub use config::EncoderConfig;
pub use engine::BeiderMorse;
pub use error::{Error, Result};
pub use language::{Language, LanguageSet};
pub use rules::{NameType, RuleBook, RuleType};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::config::EncoderConfig;
    pub use crate::engine::{Alternative, BeiderMorse, BranchSet};
    pub use crate::error::{Error, Result};
    pub use crate::language::{GuessPolicy, Language, LanguageGuesser, LanguageSet};
    pub use crate::names::{split_name, EncodedName};
    pub use crate::rules::{NameType, RuleBook, RuleType};
}
