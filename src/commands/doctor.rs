//! Doctor command implementation
//!
//! Probes every tool in the manifest and prints an environment report.
//! Read-only: nothing is installed and no PATH entries are written.

use crate::cli::DoctorArgs;
use crate::diagnostics;
use crate::environment::EnvironmentState;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::pathstore;

/// Run the doctor command
pub fn run(args: DoctorArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, source) = Manifest::resolve(args.manifest.as_deref(), &cwd)?;

    let store = pathstore::default_store()?;
    let env = EnvironmentState::from_process(store.as_ref())?;
    let report = diagnostics::collect(&manifest, &env, &store.location());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Manifest: {}", source);
        println!();
        print!("{}", diagnostics::render_text(&report));
    }

    Ok(())
}
