//! Tool-set manifest
//!
//! `rigup.yaml` names the tools a machine must have, how to probe them
//! and how to install them. Without a manifest the built-in toolset is
//! used: Chocolatey bootstrapped from its vendor installer, then Git,
//! Terraform (with a minimum version), the Azure CLI and the Databricks
//! CLI through it. Order matters; every later tool installs through the
//! package manager the first entry provides.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RigupError};
use crate::installer::{CommandAction, CommandProbe, InstallTarget, RetryPolicy};
use crate::version::parse_minimum;

/// Chocolatey's documented install one-liner.
const CHOCO_BOOTSTRAP: &str = "Set-ExecutionPolicy Bypass -Scope Process -Force; \
    [System.Net.ServicePointManager]::SecurityProtocol = \
    [System.Net.ServicePointManager]::SecurityProtocol -bor 3072; \
    iex ((New-Object System.Net.WebClient).DownloadString('https://community.chocolatey.org/install.ps1'))";

const CHOCO_BIN_DIR: &str = "C:/ProgramData/chocolatey/bin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub retry: RetrySettings,
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    2000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.initial_delay_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    /// Executable to probe for; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    /// Arguments that make the tool print its version. Empty means
    /// presence is checked without a version gate.
    #[serde(default)]
    pub version_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    pub install: InstallSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_path: Option<PathBuf>,
}

impl ToolSpec {
    pub fn effective_bin(&self) -> &str {
        self.bin.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Where the active manifest came from; shown in the bootstrap banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::BuiltIn => write!(f, "built-in toolset"),
        }
    }
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RigupError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|err| RigupError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let manifest: Manifest =
            serde_yaml::from_str(&content).map_err(|err| RigupError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Pick the manifest for a run: an explicit `--manifest` path, else
    /// `rigup.yaml` in `cwd` when present, else the built-in toolset.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, ManifestSource)> {
        if let Some(path) = explicit {
            return Ok((
                Self::load(path)?,
                ManifestSource::File(path.to_path_buf()),
            ));
        }
        let local = cwd.join("rigup.yaml");
        if local.exists() {
            return Ok((Self::load(&local)?, ManifestSource::File(local)));
        }
        Ok((Self::default_toolset(), ManifestSource::BuiltIn))
    }

    /// The built-in toolset for a Windows build machine.
    pub fn default_toolset() -> Self {
        let choco = ToolSpec {
            name: "choco".to_string(),
            bin: None,
            version_args: vec!["--version".to_string()],
            min_version: None,
            install: InstallSpec {
                program: "powershell".to_string(),
                args: vec![
                    "-NoProfile".to_string(),
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-Command".to_string(),
                    CHOCO_BOOTSTRAP.to_string(),
                ],
            },
            register_path: Some(PathBuf::from(CHOCO_BIN_DIR)),
        };

        Self {
            retry: RetrySettings::default(),
            tools: vec![
                choco,
                choco_tool("git", "git", &["--version"], None),
                choco_tool("terraform", "terraform", &["version"], Some("1.13.0")),
                choco_tool("az", "azure-cli", &["version"], None),
                choco_tool("databricks", "databricks-cli", &["--version"], None),
            ],
        }
    }

    /// Keep only the named tools, preserving manifest order.
    pub fn subset(&self, names: &[String]) -> Result<Self> {
        let known: BTreeSet<&str> = self.tools.iter().map(|t| t.name.as_str()).collect();
        for name in names {
            if !known.contains(name.as_str()) {
                return Err(RigupError::ManifestInvalid {
                    message: format!("unknown tool '{name}' requested via --only"),
                });
            }
        }
        let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        Ok(Self {
            retry: self.retry.clone(),
            tools: self
                .tools
                .iter()
                .filter(|t| wanted.contains(t.name.as_str()))
                .cloned()
                .collect(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.tools.is_empty() {
            return Err(RigupError::ManifestInvalid {
                message: "no tools defined".to_string(),
            });
        }
        if self.retry.max_attempts < 1 {
            return Err(RigupError::ManifestInvalid {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts > 5 {
            tracing::warn!(
                "retry.max_attempts = {} is unusually high; the backoff delay doubles every attempt",
                self.retry.max_attempts
            );
        }

        let mut seen = BTreeSet::new();
        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(RigupError::ManifestInvalid {
                    message: "a tool entry has an empty name".to_string(),
                });
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(RigupError::ManifestInvalid {
                    message: format!("duplicate tool name '{}'", tool.name),
                });
            }
            if tool.install.program.trim().is_empty() {
                return Err(RigupError::ManifestInvalid {
                    message: format!("tool '{}' has an empty install program", tool.name),
                });
            }
            if let Some(min) = &tool.min_version {
                if tool.version_args.is_empty() {
                    return Err(RigupError::ManifestInvalid {
                        message: format!(
                            "tool '{}' sets min_version but no version_args to probe with",
                            tool.name
                        ),
                    });
                }
                if parse_minimum(min).is_none() {
                    return Err(RigupError::ManifestInvalid {
                        message: format!("tool '{}' has unparseable min_version '{min}'", tool.name),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the install targets in manifest order.
    pub fn targets(&self) -> Result<Vec<InstallTarget>> {
        self.tools.iter().map(target_for).collect()
    }
}

fn target_for(tool: &ToolSpec) -> Result<InstallTarget> {
    let probe = CommandProbe::new(tool.effective_bin(), tool.version_args.clone());
    let action = CommandAction::new(tool.install.program.clone(), tool.install.args.clone());
    let mut target = InstallTarget::new(tool.name.clone(), Box::new(probe), Box::new(action));

    if let Some(min) = &tool.min_version {
        let parsed = parse_minimum(min).ok_or_else(|| RigupError::ManifestInvalid {
            message: format!("tool '{}' has unparseable min_version '{min}'", tool.name),
        })?;
        target = target.with_min_version(parsed);
    }
    if let Some(dir) = &tool.register_path {
        target = target.with_register_path(dir.clone());
    }
    Ok(target)
}

fn choco_tool(name: &str, package: &str, version_args: &[&str], min: Option<&str>) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        bin: None,
        version_args: version_args.iter().map(ToString::to_string).collect(),
        min_version: min.map(ToString::to_string),
        install: InstallSpec {
            program: "choco".to_string(),
            args: vec![
                "install".to_string(),
                package.to_string(),
                "--yes".to_string(),
            ],
        },
        register_path: None,
    }
}
