//! The probe/install/register/re-probe cycle
//!
//! `ensure_present` is idempotent: a target that already satisfies its
//! version bound causes zero mutating actions. Otherwise the install
//! action runs under retry, the target's directory is registered before
//! the re-probe (the re-probe must be able to resolve a binary the
//! registration just exposed), and the re-probe decides the verdict.

use crate::ci::EnvironmentNotifier;
use crate::environment::EnvironmentState;
use crate::error::{Result, RigupError};
use crate::installer::probe::Presence;
use crate::installer::retry::{CancelToken, RetryPolicy, with_retry};
use crate::installer::{EnsureOutcome, InstallTarget};
use crate::version::meets_minimum;

/// Ensure one target is installed and satisfies its version bound.
pub fn ensure_present(
    target: &InstallTarget,
    env: &mut EnvironmentState,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    notifier: &dyn EnvironmentNotifier,
) -> Result<EnsureOutcome> {
    tracing::debug!("probing {}", target.name);
    let before = target.probe.probe(env)?;

    if let Presence::Present { version } = before {
        match (&target.min_version, &version) {
            (None, _) => {
                tracing::info!("{} already present", target.name);
                return Ok(EnsureOutcome::AlreadySatisfied { version });
            }
            (Some(min), Some(found)) if meets_minimum(found, min) => {
                tracing::info!("{} {found} satisfies minimum {min}", target.name);
                return Ok(EnsureOutcome::AlreadySatisfied { version });
            }
            (Some(min), Some(found)) => {
                tracing::info!("{} {found} below minimum {min}; reinstalling", target.name);
            }
            (Some(min), None) => {
                tracing::info!(
                    "{} present without a version; minimum {min} requires reinstall",
                    target.name
                );
            }
        }
    } else {
        tracing::info!("{} not found; installing", target.name);
    }

    let mut attempts: u32 = 0;
    with_retry(&target.name, policy, cancel, || {
        attempts += 1;
        target.action.run(env)
    })?;

    if let Some(dir) = &target.register_path {
        if env.register_path(dir) {
            notifier.path_added(dir)?;
            tracing::debug!("registered {} on the search path", dir.display());
        }
    }

    match target.probe.probe(env)? {
        Presence::Absent => Err(RigupError::ToolNotFound {
            name: target.name.clone(),
        }),
        Presence::Present { version } => {
            if let Some(min) = &target.min_version {
                let satisfied = version.as_ref().is_some_and(|found| meets_minimum(found, min));
                if !satisfied {
                    let found = version
                        .as_ref()
                        .map_or_else(|| "unknown".to_string(), ToString::to_string);
                    return Err(RigupError::VersionMismatch {
                        tool: target.name.clone(),
                        found,
                        required: min.to_string(),
                    });
                }
            }
            Ok(EnsureOutcome::Installed { version, attempts })
        }
    }
}

/// Per-target result from a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub name: String,
    pub outcome: EnsureOutcome,
}

/// Ensure every target in the given order, halting on the first error.
///
/// Targets run strictly sequentially: later targets may only resolve
/// because an earlier one registered its directory. `progress` is called
/// before each target starts.
pub fn ensure_all<F>(
    targets: &[InstallTarget],
    env: &mut EnvironmentState,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    notifier: &dyn EnvironmentNotifier,
    mut progress: F,
) -> Result<Vec<TargetOutcome>>
where
    F: FnMut(usize, &InstallTarget),
{
    let mut outcomes = Vec::with_capacity(targets.len());
    for (index, target) in targets.iter().enumerate() {
        progress(index, target);
        let outcome = ensure_present(target, env, policy, cancel, notifier)?;
        outcomes.push(TargetOutcome {
            name: target.name.clone(),
            outcome,
        });
    }
    Ok(outcomes)
}
