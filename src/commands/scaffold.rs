//! Scaffold command implementation
//!
//! Lays down a Terraform starter layout in the target directory,
//! skipping any file that already exists.

use console::Style;

use crate::cli::ScaffoldArgs;
use crate::error::Result;
use crate::scaffold::{self, FileStatus};

/// Run the scaffold command
pub fn run(args: ScaffoldArgs) -> Result<()> {
    let entries = scaffold::scaffold_project(&args.dir)?;

    // Canonicalize without the \\?\ prefix Windows would otherwise show.
    let dir = dunce::canonicalize(&args.dir).unwrap_or_else(|_| args.dir.clone());
    println!(
        "Scaffolding Terraform project in {}",
        Style::new().bold().apply_to(dir.display())
    );
    println!();

    let mut created = 0;
    for entry in &entries {
        match entry.status {
            FileStatus::Created => {
                created += 1;
                println!(
                    "  {} {}",
                    Style::new().green().apply_to("created"),
                    entry.name
                );
            }
            FileStatus::Exists => {
                println!(
                    "  {} {}",
                    Style::new().dim().apply_to("exists "),
                    entry.name
                );
            }
        }
    }

    println!();
    if created == 0 {
        println!("All files already present. Nothing to do.");
    } else {
        let file_label = if created == 1 { "file" } else { "files" };
        println!("Created {} {}.", created, file_label);
        println!("Edit terraform.tfvars.example and rename it to terraform.tfvars to get started.");
    }

    Ok(())
}
