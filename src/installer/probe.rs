//! Version probes and install actions
//!
//! `CommandProbe` answers "is this tool on the search path, and which
//! version" by resolving the binary against the `EnvironmentState` and
//! parsing its version output. `CommandAction` runs an arbitrary install
//! command with the state's PATH. Both are trait objects so the
//! orchestrator can be exercised with fakes.

use std::process::Command;

use semver::Version;

use crate::environment::EnvironmentState;
use crate::error::{Result, RigupError};
use crate::version::extract_version;

/// Probe result: the tool is either absent from the search path or
/// present, optionally with a detected version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Present { version: Option<Version> },
}

/// Detects whether a tool is installed and which version it reports.
pub trait VersionProbe {
    fn probe(&self, env: &EnvironmentState) -> Result<Presence>;
}

/// Opaque install step, typically a package-manager invocation.
pub trait InstallAction {
    fn run(&self, env: &EnvironmentState) -> Result<()>;
    fn describe(&self) -> String;
}

/// Probes by resolving `bin` on the state's path and running its version
/// flag. With no version arguments the probe reports bare presence.
pub struct CommandProbe {
    bin: String,
    version_args: Vec<String>,
}

impl CommandProbe {
    pub fn new(bin: impl Into<String>, version_args: Vec<String>) -> Self {
        Self {
            bin: bin.into(),
            version_args,
        }
    }
}

impl VersionProbe for CommandProbe {
    fn probe(&self, env: &EnvironmentState) -> Result<Presence> {
        let Some(resolved) = env.resolve_executable(&self.bin) else {
            return Ok(Presence::Absent);
        };
        if self.version_args.is_empty() {
            return Ok(Presence::Present { version: None });
        }

        let output = Command::new(&resolved)
            .args(&self.version_args)
            .env("PATH", env.path_string())
            .output()
            .map_err(|err| RigupError::CommandSpawnFailed {
                command: format!("{} {}", resolved.display(), self.version_args.join(" ")),
                reason: err.to_string(),
            })?;

        // Some tools print their version to stderr; scan both streams.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        match extract_version(&combined) {
            Some(version) => Ok(Presence::Present {
                version: Some(version),
            }),
            None => Err(RigupError::VersionParseFailed {
                tool: self.bin.clone(),
                output: combined,
            }),
        }
    }
}

/// Runs `program args...` with the state's PATH; a non-zero exit status
/// is an error.
pub struct CommandAction {
    program: String,
    args: Vec<String>,
}

impl CommandAction {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl InstallAction for CommandAction {
    fn run(&self, env: &EnvironmentState) -> Result<()> {
        let resolved =
            env.resolve_executable(&self.program)
                .ok_or_else(|| RigupError::CommandSpawnFailed {
                    command: self.describe(),
                    reason: "not found on the search path".to_string(),
                })?;

        tracing::debug!("running {}", self.describe());
        let status = Command::new(&resolved)
            .args(&self.args)
            .env("PATH", env.path_string())
            .status()
            .map_err(|err| RigupError::CommandSpawnFailed {
                command: self.describe(),
                reason: err.to_string(),
            })?;

        if !status.success() {
            return Err(RigupError::CommandFailed {
                command: self.describe(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}
