//! Explicit search-path state
//!
//! Bootstrap operations read and mutate an `EnvironmentState` value instead
//! of the ambient process environment. The orchestrator stays testable
//! without touching real OS state; durable persistence goes through a
//! `PathStore` and child processes receive `path_string()` explicitly.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pathstore::PathStore;

/// Snapshot of the search path and variables visible to one bootstrap run.
///
/// `process_path` is the lookup order used to resolve executables in this
/// run. `durable_path` mirrors what the durable store will persist at the
/// end of the run. Registration appends to both, never reorders.
#[derive(Debug, Clone)]
pub struct EnvironmentState {
    process_path: Vec<PathBuf>,
    durable_path: Vec<PathBuf>,
    vars: BTreeMap<String, String>,
    added: Vec<PathBuf>,
}

impl EnvironmentState {
    /// Build a state from explicit values. Used by tests and diagnostics.
    pub fn new(
        process_path: Vec<PathBuf>,
        durable_path: Vec<PathBuf>,
        vars: BTreeMap<String, String>,
    ) -> Self {
        Self {
            process_path,
            durable_path,
            vars,
            added: Vec::new(),
        }
    }

    /// Capture the live process environment plus the durable store contents.
    ///
    /// Variables that are not valid Unicode are skipped; every lookup this
    /// state serves (`PATHEXT`, CI markers) targets ASCII-named string vars,
    /// and `env::vars()` would panic on such entries mid-iteration.
    pub fn from_process(store: &dyn PathStore) -> Result<Self> {
        let process_path = env::var_os("PATH")
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();
        let durable_path = store.load()?;
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Ok(Self::new(process_path, durable_path, vars))
    }

    /// Register a directory on the search path.
    ///
    /// Appends to both the process and durable lists, skipping entries that
    /// are already present after normalization (trailing separators trimmed,
    /// case-insensitive on Windows). Returns whether the directory was new
    /// to the process path; callers use this to decide CI notification.
    pub fn register_path(&mut self, dir: &Path) -> bool {
        let key = path_key(dir);
        let in_process = self.process_path.iter().any(|p| path_key(p) == key);
        let in_durable = self.durable_path.iter().any(|p| path_key(p) == key);

        if !in_durable {
            self.durable_path.push(dir.to_path_buf());
        }
        if in_process {
            return false;
        }
        self.process_path.push(dir.to_path_buf());
        self.added.push(dir.to_path_buf());
        true
    }

    /// Which-style executable lookup over the state's process path.
    ///
    /// Names containing a path separator bypass the search and are checked
    /// as given.
    pub fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
        if name.contains(['/', '\\']) {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }
        for dir in &self.process_path {
            for candidate in candidate_names(name, &self.vars) {
                let path = dir.join(&candidate);
                if is_executable(&path) {
                    return Some(path);
                }
            }
        }
        None
    }

    /// The process path joined with the platform separator.
    ///
    /// Handed to child processes as their `PATH` so they resolve binaries
    /// exactly the way this state does.
    pub fn path_string(&self) -> OsString {
        env::join_paths(&self.process_path).unwrap_or_else(|_| {
            let sep = if cfg!(windows) { ";" } else { ":" };
            let joined = self
                .process_path
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(sep);
            OsString::from(joined)
        })
    }

    pub fn process_path(&self) -> &[PathBuf] {
        &self.process_path
    }

    pub fn durable_path(&self) -> &[PathBuf] {
        &self.durable_path
    }

    /// Directories registered for the first time during this run.
    pub fn added_paths(&self) -> &[PathBuf] {
        &self.added
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Normalized comparison key for de-duplication.
fn path_key(path: &Path) -> String {
    let mut key = path.to_string_lossy().replace('\\', "/");
    while key.len() > 1 && key.ends_with('/') {
        key.pop();
    }
    if cfg!(windows) {
        key = key.to_lowercase();
    }
    key
}

#[cfg(windows)]
fn candidate_names(name: &str, vars: &BTreeMap<String, String>) -> Vec<String> {
    let pathext = vars
        .get("PATHEXT")
        .map(String::as_str)
        .unwrap_or(".COM;.EXE;.BAT;.CMD;.PS1");
    let lower = name.to_ascii_lowercase();
    let already_extended = pathext
        .split(';')
        .filter(|ext| !ext.is_empty())
        .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()));

    let mut names = vec![name.to_string()];
    if !already_extended {
        for ext in pathext.split(';').filter(|ext| !ext.is_empty()) {
            names.push(format!("{name}{ext}"));
        }
    }
    names
}

#[cfg(not(windows))]
fn candidate_names(name: &str, _vars: &BTreeMap<String, String>) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(not(windows))]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
