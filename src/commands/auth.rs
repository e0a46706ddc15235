//! Auth command implementation
//!
//! Writes a Databricks CLI profile into the config file, creating the
//! file on first use and appending new sections after that. Existing
//! profiles are never rewritten.

use console::Style;

use crate::cli::AuthArgs;
use crate::error::Result;
use crate::profile::{self, ProfileOutcome, ProfileRequest};

/// Run the auth command
pub fn run(args: AuthArgs) -> Result<()> {
    let config_file = match args.config_file {
        Some(path) => path,
        None => profile::default_config_file()?,
    };

    let request = ProfileRequest {
        profile: args.profile,
        host: args.host,
        mode: args.mode,
        token: args.token,
    };

    let outcome = profile::write_profile(&config_file, &request)?;

    match outcome {
        ProfileOutcome::Created => {
            println!(
                "Created {} with profile {}",
                Style::new().bold().apply_to(config_file.display()),
                Style::new().bold().yellow().apply_to(&request.profile)
            );
        }
        ProfileOutcome::Appended { backup } => {
            println!(
                "Added profile {} to {}",
                Style::new().bold().yellow().apply_to(&request.profile),
                Style::new().bold().apply_to(config_file.display())
            );
            if let Some(backup) = backup {
                println!(
                    "  {} {}",
                    Style::new().dim().apply_to("backup"),
                    backup.display()
                );
            }
        }
        ProfileOutcome::AlreadyPresent => {
            println!(
                "Profile {} already exists in {}. Left unchanged.",
                Style::new().bold().yellow().apply_to(&request.profile),
                config_file.display()
            );
        }
    }

    Ok(())
}
