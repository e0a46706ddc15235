//! CI environment-change notification
//!
//! A freshly registered PATH entry only reaches later pipeline steps when
//! the CI orchestrator is told about it. That capability is injected as an
//! `EnvironmentNotifier` so install logic never branches on which CI it
//! runs under.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::environment::EnvironmentState;
use crate::error::{Result, RigupError};

/// Receives newly registered search-path directories.
pub trait EnvironmentNotifier {
    fn path_added(&self, dir: &Path) -> Result<()>;
    fn label(&self) -> &'static str;
}

/// CI orchestrator recognized from an environment snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiKind {
    GithubActions,
    AzurePipelines,
    None,
}

impl CiKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CiKind::GithubActions => "GitHub Actions",
            CiKind::AzurePipelines => "Azure Pipelines",
            CiKind::None => "none",
        }
    }
}

/// Recognize the CI orchestrator from the state's variables.
pub fn detect(env: &EnvironmentState) -> CiKind {
    if env.var("GITHUB_ACTIONS") == Some("true") {
        return CiKind::GithubActions;
    }
    let tf_build = env
        .var("TF_BUILD")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    if tf_build {
        return CiKind::AzurePipelines;
    }
    CiKind::None
}

/// Build the notifier matching the detected orchestrator.
pub fn notifier_for(env: &EnvironmentState) -> Box<dyn EnvironmentNotifier> {
    match detect(env) {
        CiKind::GithubActions => match env.var("GITHUB_PATH") {
            Some(file) => Box::new(GithubActions::new(PathBuf::from(file))),
            None => {
                tracing::warn!("GITHUB_ACTIONS is set but GITHUB_PATH is not; skipping directives");
                Box::new(NullNotifier)
            }
        },
        CiKind::AzurePipelines => Box::new(AzurePipelines),
        CiKind::None => Box::new(NullNotifier),
    }
}

/// Appends directories to the file named by `GITHUB_PATH`.
pub struct GithubActions {
    path_file: PathBuf,
}

impl GithubActions {
    pub fn new(path_file: PathBuf) -> Self {
        Self { path_file }
    }
}

impl EnvironmentNotifier for GithubActions {
    fn path_added(&self, dir: &Path) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path_file)
            .map_err(|err| RigupError::NotifyFailed {
                reason: format!("opening {}: {err}", self.path_file.display()),
            })?;
        writeln!(file, "{}", dir.display()).map_err(|err| RigupError::NotifyFailed {
            reason: err.to_string(),
        })?;
        Ok(())
    }

    fn label(&self) -> &'static str {
        "GITHUB_PATH file"
    }
}

/// Emits the Azure DevOps logging command on stdout.
pub struct AzurePipelines;

impl EnvironmentNotifier for AzurePipelines {
    fn path_added(&self, dir: &Path) -> Result<()> {
        println!("##vso[task.prependpath]{}", dir.display());
        Ok(())
    }

    fn label(&self) -> &'static str {
        "Azure Pipelines logging command"
    }
}

/// Used outside CI.
pub struct NullNotifier;

impl EnvironmentNotifier for NullNotifier {
    fn path_added(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn label(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn state_with_vars(pairs: &[(&str, &str)]) -> EnvironmentState {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentState::new(Vec::new(), Vec::new(), vars)
    }

    #[test]
    fn test_detect_github_actions() {
        let state = state_with_vars(&[("GITHUB_ACTIONS", "true")]);
        assert_eq!(detect(&state), CiKind::GithubActions);
    }

    #[test]
    fn test_detect_azure_pipelines_case_insensitive() {
        let state = state_with_vars(&[("TF_BUILD", "True")]);
        assert_eq!(detect(&state), CiKind::AzurePipelines);
    }

    #[test]
    fn test_detect_none_without_markers() {
        let state = state_with_vars(&[("SHELL", "/bin/zsh")]);
        assert_eq!(detect(&state), CiKind::None);
    }

    #[test]
    fn test_github_takes_precedence_over_azure() {
        let state = state_with_vars(&[("GITHUB_ACTIONS", "true"), ("TF_BUILD", "true")]);
        assert_eq!(detect(&state), CiKind::GithubActions);
    }

    #[test]
    fn test_github_notifier_appends_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path_file = dir.path().join("github_path");
        let notifier = GithubActions::new(path_file.clone());

        notifier.path_added(Path::new("/opt/first/bin")).unwrap();
        notifier.path_added(Path::new("/opt/second/bin")).unwrap();

        let content = std::fs::read_to_string(&path_file).unwrap();
        assert_eq!(content, "/opt/first/bin\n/opt/second/bin\n");
    }

    #[test]
    fn test_notifier_for_github_uses_path_file() {
        let state = state_with_vars(&[("GITHUB_ACTIONS", "true"), ("GITHUB_PATH", "/tmp/gp")]);
        assert_eq!(notifier_for(&state).label(), "GITHUB_PATH file");
    }

    #[test]
    fn test_notifier_for_github_without_path_file_is_null() {
        let state = state_with_vars(&[("GITHUB_ACTIONS", "true")]);
        assert_eq!(notifier_for(&state).label(), "none");
    }

    #[test]
    fn test_notifier_for_plain_machine_is_null() {
        let state = state_with_vars(&[]);
        assert_eq!(notifier_for(&state).label(), "none");
    }

    #[test]
    fn test_null_notifier_accepts_anything() {
        assert!(NullNotifier.path_added(Path::new("/opt/x")).is_ok());
    }
}
