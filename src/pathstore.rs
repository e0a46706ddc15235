//! Durable search-path persistence
//!
//! The OS-level durable PATH is an external collaborator reached only
//! through the `PathStore` trait. On Windows the user-scope `Path`
//! variable is read and written through `powershell`; elsewhere a
//! shell-sourceable drop-in file under `~/.rigup/env` is maintained.
//! `RIGUP_PATH_FILE` redirects the store to an explicit file, which
//! tests use to stay hermetic.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use crate::error::{Result, RigupError};

/// Load and persist the durable search-path entries.
pub trait PathStore {
    fn load(&self) -> Result<Vec<PathBuf>>;
    fn persist(&self, entries: &[PathBuf]) -> Result<()>;
    /// Human-readable location, shown by diagnostics.
    fn location(&self) -> String;
}

/// Pick the store for this platform, honoring `RIGUP_PATH_FILE`.
pub fn default_store() -> Result<Box<dyn PathStore>> {
    if let Some(file) = std::env::var_os("RIGUP_PATH_FILE") {
        return Ok(Box::new(FilePathStore::new(PathBuf::from(file))));
    }
    if cfg!(windows) {
        Ok(Box::new(WindowsPathStore))
    } else {
        let home = dirs::home_dir().ok_or(RigupError::HomeDirNotFound)?;
        Ok(Box::new(FilePathStore::new(
            home.join(".rigup").join("env"),
        )))
    }
}

/// Drop-in file store: one `export PATH="$PATH:<dir>"` line per entry.
pub struct FilePathStore {
    file: PathBuf,
}

impl FilePathStore {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }
}

impl PathStore for FilePathStore {
    fn load(&self) -> Result<Vec<PathBuf>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&self.file).map_err(|err| RigupError::FileReadFailed {
                path: self.file.display().to_string(),
                reason: err.to_string(),
            })?;
        Ok(content.lines().filter_map(parse_export_line).collect())
    }

    fn persist(&self, entries: &[PathBuf]) -> Result<()> {
        let parent = self.file.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(|err| RigupError::PathPersistFailed {
            reason: format!("creating {}: {err}", parent.display()),
        })?;

        let mut content = String::from("# Managed by rigup. Source this file from your shell rc.\n");
        for entry in entries {
            content.push_str(&export_line(entry));
            content.push('\n');
        }

        // Temp-then-rename keeps a crash from truncating the drop-in.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|err| RigupError::PathPersistFailed {
            reason: err.to_string(),
        })?;
        tmp.write_all(content.as_bytes())
            .map_err(|err| RigupError::PathPersistFailed {
                reason: err.to_string(),
            })?;
        tmp.persist(&self.file)
            .map_err(|err| RigupError::PathPersistFailed {
                reason: err.to_string(),
            })?;
        Ok(())
    }

    fn location(&self) -> String {
        self.file.display().to_string()
    }
}

/// Windows user-scope `Path` variable, reached through powershell.
pub struct WindowsPathStore;

impl PathStore for WindowsPathStore {
    fn load(&self) -> Result<Vec<PathBuf>> {
        let output = Command::new("powershell")
            .args(["-NoProfile", "-Command", GET_USER_PATH])
            .output()
            .map_err(|err| RigupError::PathPersistFailed {
                reason: format!("powershell: {err}"),
            })?;
        if !output.status.success() {
            return Err(RigupError::PathPersistFailed {
                reason: format!("powershell exited with {}", output.status),
            });
        }
        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(raw
            .trim()
            .split(';')
            .filter(|part| !part.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn persist(&self, entries: &[PathBuf]) -> Result<()> {
        let status = Command::new("powershell")
            .args(["-NoProfile", "-Command", &set_user_path_command(entries)])
            .status()
            .map_err(|err| RigupError::PathPersistFailed {
                reason: format!("powershell: {err}"),
            })?;
        if !status.success() {
            return Err(RigupError::PathPersistFailed {
                reason: format!("powershell exited with {status}"),
            });
        }
        Ok(())
    }

    fn location(&self) -> String {
        "user-scope Path variable (via powershell)".to_string()
    }
}

const GET_USER_PATH: &str = "[Environment]::GetEnvironmentVariable('Path','User')";

fn set_user_path_command(entries: &[PathBuf]) -> String {
    let joined = entries
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(";");
    // Single quotes in powershell literals are escaped by doubling.
    let escaped = joined.replace('\'', "''");
    format!("[Environment]::SetEnvironmentVariable('Path','{escaped}','User')")
}

fn export_line(entry: &Path) -> String {
    format!("export PATH=\"$PATH:{}\"", entry.display())
}

fn parse_export_line(line: &str) -> Option<PathBuf> {
    let dir = line
        .trim()
        .strip_prefix("export PATH=\"$PATH:")?
        .strip_suffix('"')?;
    if dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dir))
    }
}
