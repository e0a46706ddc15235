//! Idempotent installer orchestration
//!
//! An `InstallTarget` pairs a presence probe with an opaque install action
//! and an optional minimum-version gate. `ensure::ensure_present` drives
//! the probe/install/register/re-probe cycle; `retry` supplies the bounded
//! backoff around the action.

pub mod ensure;
pub mod probe;
pub mod retry;

use std::path::PathBuf;

use semver::Version;

use crate::installer::probe::{InstallAction, VersionProbe};

pub use ensure::{TargetOutcome, ensure_all, ensure_present};
pub use probe::{CommandAction, CommandProbe, Presence};
pub use retry::{CancelToken, RetryPolicy, with_retry};

/// One tool the bootstrap run must end up with.
///
/// Built fresh for every run and consumed by `ensure_present`; targets are
/// never persisted.
pub struct InstallTarget {
    pub name: String,
    pub probe: Box<dyn VersionProbe>,
    pub min_version: Option<Version>,
    pub action: Box<dyn InstallAction>,
    pub register_path: Option<PathBuf>,
}

impl InstallTarget {
    pub fn new(
        name: impl Into<String>,
        probe: Box<dyn VersionProbe>,
        action: Box<dyn InstallAction>,
    ) -> Self {
        Self {
            name: name.into(),
            probe,
            min_version: None,
            action,
            register_path: None,
        }
    }

    pub fn with_min_version(mut self, min_version: Version) -> Self {
        self.min_version = Some(min_version);
        self
    }

    pub fn with_register_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.register_path = Some(dir.into());
        self
    }
}

/// What `ensure_present` concluded for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The tool was already present and satisfied its version bound; no
    /// mutating action ran.
    AlreadySatisfied { version: Option<Version> },
    /// The install action ran (possibly more than once) and the re-probe
    /// confirmed the tool.
    Installed {
        version: Option<Version>,
        attempts: u32,
    },
}
