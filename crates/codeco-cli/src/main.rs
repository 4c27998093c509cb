//! CODECO Gate - EDIFACT CODECO messages for depot gate movements
//!
//! Turns gate-in / gate-out records into CODECO interchanges, delivers them,
//! and decodes or checks interchanges received from partners.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still wins over the --verbose default
    let env = if cli.verbose {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
