//! CLI argument definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::language::{GuessPolicy, LanguageSet};
use crate::rules::{NameType, RuleType};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "bmpm")]
#[command(about = "Beider-Morse phonetic keys for personal names")]
#[command(version)]
pub struct Cli {
    /// Encoder configuration file (JSON)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding generic.json, ashkenazic.json and sephardic.json
    /// (defaults to the bundled rules)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// How matching language rules combine (overrides the configuration)
    #[arg(long, value_enum, global = true)]
    pub guess_policy: Option<GuessPolicy>,

    /// Log more (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encode names into phonetic keys
    Encode {
        /// Names to encode; quote multi-word names
        #[arg(required = true)]
        names: Vec<String>,

        /// Rule family
        #[arg(short = 'n', long, value_enum, default_value_t = NameType::Generic)]
        name_type: NameType,

        /// Final-pass precision
        #[arg(short = 'r', long, value_enum, default_value_t = RuleType::Approx)]
        rule_type: RuleType,

        /// Source languages, comma separated (guessed if omitted)
        #[arg(short = 'l', long)]
        languages: Option<LanguageSet>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Guess the source languages of words
    Guess {
        /// Words to examine
        #[arg(required = true)]
        words: Vec<String>,

        /// Rule family
        #[arg(short = 'n', long, value_enum, default_value_t = NameType::Generic)]
        name_type: NameType,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the languages and tables of the loaded rule families
    Languages {
        /// Only this rule family
        #[arg(short = 'n', long, value_enum)]
        name_type: Option<NameType>,
    },
}
