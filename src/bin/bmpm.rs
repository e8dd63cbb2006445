//! bmpm - Beider-Morse phonetic keys for personal names

use clap::Parser;
use colored::Colorize;
use std::process;

use bmpm::cli::{commands, init_tracing, Cli};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
