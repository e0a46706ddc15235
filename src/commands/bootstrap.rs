//! Bootstrap command implementation
//!
//! The bootstrap flow:
//! 1. Resolve the manifest (explicit flag, ./rigup.yaml, or built-in)
//! 2. Load the process and durable PATH into an environment snapshot
//! 3. Ensure each tool in manifest order, retrying failed installs
//! 4. Persist new PATH entries and notify the CI runner, if any
//!
//! A tool that is already present at a satisfying version is left
//! untouched, so reruns converge to "nothing to do".

use std::io::IsTerminal;

use console::Style;
use inquire::Confirm;

use crate::ci::{self, CiKind};
use crate::cli::BootstrapArgs;
use crate::environment::EnvironmentState;
use crate::error::Result;
use crate::installer::{CancelToken, EnsureOutcome, TargetOutcome, ensure_all};
use crate::manifest::Manifest;
use crate::pathstore::{self, PathStore};
use crate::progress::ProgressDisplay;

/// Run the bootstrap command
pub fn run(args: BootstrapArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (mut manifest, source) = Manifest::resolve(args.manifest.as_deref(), &cwd)?;
    if !args.only.is_empty() {
        manifest = manifest.subset(&args.only)?;
    }

    let store = pathstore::default_store()?;
    let mut env = EnvironmentState::from_process(store.as_ref())?;
    let ci_kind = ci::detect(&env);
    let notifier = ci::notifier_for(&env);

    println!("Manifest: {}", source);
    if ci_kind != CiKind::None {
        println!("CI: {}", ci_kind.as_str());
    }
    let names: Vec<&str> = manifest.tools.iter().map(|t| t.name.as_str()).collect();
    println!("Tools: {}", names.join(", "));
    println!();

    if !confirmed(args.yes, ci_kind)? {
        println!("Aborted. No changes were made.");
        return Ok(());
    }

    let targets = manifest.targets()?;
    let policy = manifest.retry.policy();
    let cancel = CancelToken::new();
    let durable_before = env.durable_path().len();

    let total = targets.len();
    let progress = ProgressDisplay::new(total as u64);
    let result = ensure_all(
        &targets,
        &mut env,
        &policy,
        &cancel,
        notifier.as_ref(),
        |index, target| progress.update_tool(&target.name, index + 1, total),
    );

    let outcomes = match result {
        Ok(outcomes) => {
            progress.finish();
            outcomes
        }
        Err(e) => {
            progress.abandon();
            // Targets that installed before the failure keep their PATH
            // entries; the next run finds them instead of reinstalling.
            if let Err(persist_err) = persist_new_entries(store.as_ref(), &env, durable_before) {
                tracing::warn!("could not persist new PATH entries: {persist_err}");
            }
            return Err(e);
        }
    };

    persist_new_entries(store.as_ref(), &env, durable_before)?;

    println!();
    print_summary(&outcomes);

    if !env.added_paths().is_empty() {
        println!();
        println!("PATH entries written to {}:", store.location());
        for dir in env.added_paths() {
            println!("  {}", dir.display());
        }
        if ci_kind == CiKind::None {
            println!("Open a new shell to pick them up.");
        }
    }

    Ok(())
}

/// Write the durable list back when this run appended to it. Registration
/// only appends, so a longer list means new entries.
fn persist_new_entries(
    store: &dyn PathStore,
    env: &EnvironmentState,
    durable_before: usize,
) -> Result<()> {
    if env.durable_path().len() > durable_before {
        store.persist(env.durable_path())?;
    }
    Ok(())
}

/// Skip the prompt with --yes, on CI runners, and when stdin is not a
/// terminal (piped invocations must not hang).
fn confirmed(yes: bool, ci_kind: CiKind) -> Result<bool> {
    if yes || ci_kind != CiKind::None || !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    let answer = Confirm::new("Install missing tools now?")
        .with_default(true)
        .prompt_skippable()?;
    Ok(answer.unwrap_or(false))
}

fn print_summary(outcomes: &[TargetOutcome]) {
    for target in outcomes {
        match &target.outcome {
            EnsureOutcome::AlreadySatisfied { version } => {
                println!(
                    "  {} {:<12} {}",
                    Style::new().green().apply_to("ok"),
                    target.name,
                    match version {
                        Some(v) => format!("{} (already installed)", v),
                        None => "already installed".to_string(),
                    }
                );
            }
            EnsureOutcome::Installed { version, attempts } => {
                let mut detail = match version {
                    Some(v) => format!("{} installed", v),
                    None => "installed".to_string(),
                };
                if *attempts > 1 {
                    detail.push_str(&format!(" after {} attempts", attempts));
                }
                println!(
                    "  {} {:<12} {}",
                    Style::new().green().bold().apply_to("ok"),
                    target.name,
                    detail
                );
            }
        }
    }
}
