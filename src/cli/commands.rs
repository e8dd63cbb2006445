//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Commands};
use crate::config::EncoderConfig;
use crate::engine::BeiderMorse;
use crate::language::{GuessPolicy, Language, LanguageSet};
use crate::names::EncodedName;
use crate::rules::{NameType, RuleBook, RuleType, TableKey, Tier};

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let encoder = build_encoder(
        cli.config.as_deref(),
        cli.rules.as_deref(),
        cli.guess_policy,
    )?;

    match cli.command {
        Commands::Encode {
            names,
            name_type,
            rule_type,
            languages,
            json,
        } => cmd_encode(&encoder, &names, name_type, rule_type, languages, json),
        Commands::Guess {
            words,
            name_type,
            json,
        } => cmd_guess(&encoder, &words, name_type, json),
        Commands::Languages { name_type } => cmd_languages(&encoder, name_type),
    }
}

/// Builds the encoder from an optional configuration file and rule directory.
pub fn build_encoder(
    config_path: Option<&Path>,
    rules_dir: Option<&Path>,
    guess_policy: Option<GuessPolicy>,
) -> Result<BeiderMorse> {
    let mut config = match config_path {
        Some(path) => EncoderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => EncoderConfig::default(),
    };
    if let Some(policy) = guess_policy {
        config.guess_policy = policy;
    }

    let rules = match rules_dir {
        Some(dir) => {
            let book = RuleBook::from_dir(dir)
                .with_context(|| format!("Failed to load rules from {}", dir.display()))?;
            if book.name_types().is_empty() {
                bail!("No rule files found in {}", dir.display());
            }
            Arc::new(book)
        }
        None => RuleBook::embedded().context("Failed to load bundled rules")?,
    };

    Ok(BeiderMorse::with_config(rules, config))
}

#[derive(Serialize)]
struct EncodeOutput<'a> {
    name: &'a str,
    name_type: NameType,
    rule_type: RuleType,
    keys: EncodedName,
}

fn cmd_encode(
    encoder: &BeiderMorse,
    names: &[String],
    name_type: NameType,
    rule_type: RuleType,
    languages: Option<LanguageSet>,
    json: bool,
) -> Result<()> {
    let mut outputs = Vec::with_capacity(names.len());
    for name in names {
        let keys = encoder
            .encode_name(name, name_type, rule_type, languages)
            .with_context(|| format!("Failed to encode {name:?}"))?;
        outputs.push(EncodeOutput {
            name,
            name_type,
            rule_type,
            keys,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for output in &outputs {
        println!("{}  {}", output.name.bold(), output.keys.to_string().green());
    }
    Ok(())
}

#[derive(Serialize)]
struct GuessOutput<'a> {
    word: &'a str,
    languages: Vec<Language>,
}

fn cmd_guess(encoder: &BeiderMorse, words: &[String], name_type: NameType, json: bool) -> Result<()> {
    let mut outputs = Vec::with_capacity(words.len());
    for word in words {
        let languages = encoder
            .guess_languages(word, name_type)
            .with_context(|| format!("Failed to guess languages of {word:?}"))?;
        outputs.push((word.as_str(), languages));
    }

    if json {
        let outputs: Vec<GuessOutput<'_>> = outputs
            .iter()
            .map(|(word, languages)| GuessOutput {
                word: *word,
                languages: languages.iter().collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for (word, languages) in &outputs {
        println!("{}  {}", word.bold(), languages.to_string().cyan());
    }
    Ok(())
}

fn cmd_languages(encoder: &BeiderMorse, only: Option<NameType>) -> Result<()> {
    let book = encoder.rule_book();
    let name_types = match only {
        Some(name_type) => vec![name_type],
        None => book.name_types(),
    };

    for name_type in name_types {
        let family = book.family(name_type)?;
        println!("{}", name_type.to_string().bold().underline());
        println!(
            "  Language rules: {}",
            family.guesser().rules().len().to_string().green()
        );
        println!(
            "  Tables:         {}",
            family.table_count().to_string().green()
        );
        for language in family.languages().iter() {
            let key = TableKey::Language(language);
            let own_rules = family.table(Tier::Rules, key).map_or(0, |table| table.len());
            let approx = family
                .lookup(Tier::Approx, key)
                .map(|table| table.name().to_string())
                .unwrap_or_else(|_| "-".to_string());
            let exact = family
                .lookup(Tier::Exact, key)
                .map(|table| table.name().to_string())
                .unwrap_or_else(|_| "-".to_string());
            println!(
                "  {:<12} rules {:>4}  {:<20} {}",
                language.to_string().cyan(),
                own_rules,
                approx,
                exact
            );
        }
        println!();
    }
    Ok(())
}
