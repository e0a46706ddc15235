//! Rigup - developer machine bootstrapper
//!
//! A command line tool that makes a workstation or CI runner ready for
//! Azure Databricks infrastructure work: installs the required tools,
//! keeps PATH registrations durable, and scaffolds Terraform projects.

use clap::Parser;

mod ci;
mod cli;
mod commands;
mod diagnostics;
mod environment;
mod error;
mod installer;
mod logging;
mod manifest;
mod pathstore;
mod profile;
mod progress;
mod scaffold;
mod version;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Bootstrap(args) => commands::bootstrap::run(args),
        Commands::Doctor(args) => commands::doctor::run(args),
        Commands::Scaffold(args) => commands::scaffold::run(args),
        Commands::Auth(args) => commands::auth::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
