//! Databricks CLI authentication profiles
//!
//! Writes a named profile section into `~/.databrickscfg`. An existing
//! file is backed up to a timestamped sibling before the section is
//! appended; a profile that already exists is left exactly as it is.
//! The backup is best-effort: a failure is logged, not fatal.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;

use crate::error::{Result, RigupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// Personal access token authentication.
    Token,
    /// Delegate authentication to a logged-in Azure CLI.
    AzureCli,
}

#[derive(Debug, Clone)]
pub struct ProfileRequest {
    pub profile: String,
    pub host: String,
    pub mode: AuthMode,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// The config file did not exist and was created with this profile.
    Created,
    /// The profile was appended to an existing file.
    Appended { backup: Option<PathBuf> },
    /// The profile already exists; nothing was written.
    AlreadyPresent,
}

/// Default location of the Databricks CLI configuration.
pub fn default_config_file() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(RigupError::HomeDirNotFound)?;
    Ok(home.join(".databrickscfg"))
}

/// Write `request` into `config_file`, backing the file up first.
pub fn write_profile(config_file: &Path, request: &ProfileRequest) -> Result<ProfileOutcome> {
    validate(request)?;

    if !config_file.exists() {
        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent).map_err(|err| RigupError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: err.to_string(),
            })?;
        }
        write_content(config_file, &render_section(request))?;
        tracing::info!(
            "created {} with profile [{}]",
            config_file.display(),
            request.profile
        );
        return Ok(ProfileOutcome::Created);
    }

    let existing =
        std::fs::read_to_string(config_file).map_err(|err| RigupError::FileReadFailed {
            path: config_file.display().to_string(),
            reason: err.to_string(),
        })?;

    if has_profile(&existing, &request.profile) {
        tracing::info!(
            "profile [{}] already present in {}",
            request.profile,
            config_file.display()
        );
        return Ok(ProfileOutcome::AlreadyPresent);
    }

    let backup = backup_file(config_file);

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    if !updated.is_empty() {
        updated.push('\n');
    }
    updated.push_str(&render_section(request));
    write_content(config_file, &updated)?;
    tracing::info!(
        "appended profile [{}] to {}",
        request.profile,
        config_file.display()
    );
    Ok(ProfileOutcome::Appended { backup })
}

fn validate(request: &ProfileRequest) -> Result<()> {
    if request.profile.trim().is_empty() {
        return Err(RigupError::ProfileInvalid {
            message: "profile name must not be empty".to_string(),
        });
    }
    if request.profile.contains(['[', ']']) {
        return Err(RigupError::ProfileInvalid {
            message: format!("profile name '{}' must not contain brackets", request.profile),
        });
    }
    if request.host.trim().is_empty() {
        return Err(RigupError::ProfileInvalid {
            message: "host must not be empty".to_string(),
        });
    }
    if request.mode == AuthMode::Token && request.token.as_deref().unwrap_or("").is_empty() {
        return Err(RigupError::ProfileInvalid {
            message: "token mode requires a token value".to_string(),
        });
    }
    Ok(())
}

fn render_section(request: &ProfileRequest) -> String {
    let mut section = format!("[{}]\nhost = {}\n", request.profile, request.host.trim());
    match request.mode {
        AuthMode::Token => {
            if let Some(token) = &request.token {
                section.push_str(&format!("token = {}\n", token.trim()));
            }
        }
        AuthMode::AzureCli => {
            section.push_str("auth_type = azure-cli\n");
        }
    }
    section
}

fn has_profile(content: &str, profile: &str) -> bool {
    let header = format!("[{profile}]");
    content.lines().any(|line| line.trim() == header)
}

/// Copy the config aside before modifying it. Returns the backup path,
/// or `None` when the copy failed.
fn backup_file(config_file: &Path) -> Option<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut backup = config_file.as_os_str().to_os_string();
    backup.push(format!(".bak.{stamp}"));
    let backup = PathBuf::from(backup);

    match std::fs::copy(config_file, &backup) {
        Ok(_) => Some(backup),
        Err(err) => {
            tracing::warn!(
                "could not back up {} before modifying it: {err}",
                config_file.display()
            );
            None
        }
    }
}

fn write_content(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|err| RigupError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_request(profile: &str) -> ProfileRequest {
        ProfileRequest {
            profile: profile.to_string(),
            host: "https://adb-123.azuredatabricks.net".to_string(),
            mode: AuthMode::Token,
            token: Some("dapi-secret".to_string()),
        }
    }

    #[test]
    fn test_creates_fresh_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join(".databrickscfg");

        let outcome = write_profile(&cfg, &token_request("dev")).unwrap();
        assert_eq!(outcome, ProfileOutcome::Created);

        let content = std::fs::read_to_string(&cfg).unwrap();
        assert!(content.contains("[dev]"));
        assert!(content.contains("host = https://adb-123.azuredatabricks.net"));
        assert!(content.contains("token = dapi-secret"));
    }

    #[test]
    fn test_appends_and_backs_up_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join(".databrickscfg");
        std::fs::write(&cfg, "[DEFAULT]\nhost = https://old.example\n").unwrap();

        let outcome = write_profile(&cfg, &token_request("ci")).unwrap();
        let ProfileOutcome::Appended { backup } = outcome else {
            panic!("expected append, got {outcome:?}");
        };

        let backup = backup.expect("backup should succeed in a writable dir");
        assert_eq!(
            std::fs::read_to_string(&backup).unwrap(),
            "[DEFAULT]\nhost = https://old.example\n"
        );

        let content = std::fs::read_to_string(&cfg).unwrap();
        assert!(content.contains("[DEFAULT]"));
        assert!(content.contains("[ci]"));
    }

    #[test]
    fn test_existing_profile_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join(".databrickscfg");
        let original = "[ci]\nhost = https://keep.example\ntoken = keep\n";
        std::fs::write(&cfg, original).unwrap();

        let outcome = write_profile(&cfg, &token_request("ci")).unwrap();
        assert_eq!(outcome, ProfileOutcome::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&cfg).unwrap(), original);

        // No backup for a no-op.
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_append_separates_sections_with_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join(".databrickscfg");
        std::fs::write(&cfg, "[DEFAULT]\nhost = https://old.example").unwrap();

        write_profile(&cfg, &token_request("ci")).unwrap();
        let content = std::fs::read_to_string(&cfg).unwrap();
        assert!(content.contains("https://old.example\n\n[ci]\n"));
    }

    #[test]
    fn test_token_mode_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = token_request("dev");
        request.token = None;

        let err = write_profile(&dir.path().join("cfg"), &request).unwrap_err();
        assert!(matches!(err, RigupError::ProfileInvalid { .. }));
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_azure_cli_mode_writes_auth_type() {
        let request = ProfileRequest {
            profile: "azure".to_string(),
            host: "https://adb-9.azuredatabricks.net".to_string(),
            mode: AuthMode::AzureCli,
            token: None,
        };
        let section = render_section(&request);
        assert!(section.contains("auth_type = azure-cli"));
        assert!(!section.contains("token ="));
    }

    #[test]
    fn test_profile_name_with_brackets_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = token_request("bad");
        request.profile = "[weird".to_string();

        let err = write_profile(&dir.path().join("cfg"), &request).unwrap_err();
        assert!(err.to_string().contains("brackets"));
    }

    #[test]
    fn test_has_profile_matches_whole_header() {
        let content = "[ci]\nhost = x\n[ci-extra]\nhost = y\n";
        assert!(has_profile(content, "ci"));
        assert!(has_profile(content, "ci-extra"));
        assert!(!has_profile(content, "c"));
    }
}
