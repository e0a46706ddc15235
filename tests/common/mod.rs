//! Common test utilities for rigup integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway machine for integration tests: a temp directory holding
/// the manifest, fake tool directories, and the durable PATH drop-in.
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a manifest file and return its path
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        let manifest = self.path.join("rigup.yaml");
        std::fs::write(&manifest, content).expect("Failed to write manifest");
        manifest
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// File the durable PATH store is redirected to via RIGUP_PATH_FILE
    pub fn path_file(&self) -> PathBuf {
        self.path.join("rigup-env")
    }

    /// Create a directory that plays the role of an install location
    pub fn bin_dir(&self, name: &str) -> PathBuf {
        let dir = self.path.join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create bin directory");
        dir
    }

    /// Drop an executable fake tool into `dir` that reports `version`
    #[cfg(unix)]
    pub fn write_tool(&self, dir: &Path, name: &str, version: &str) -> PathBuf {
        self.write_script_at(
            &dir.join(name),
            &format!("echo '{} version {}'", name, version),
        )
    }

    /// Write an executable shell script at a workspace-relative path
    #[cfg(unix)]
    pub fn write_script(&self, rel: &str, body: &str) -> PathBuf {
        self.write_script_at(&self.path.join(rel), body)
    }

    #[cfg(unix)]
    fn write_script_at(&self, path: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create script directory");
        }
        std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to set script permissions");
        path.to_path_buf()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("nested/file.txt", "hello");
        assert!(workspace.file_exists("nested/file.txt"));
        assert_eq!(workspace.read_file("nested/file.txt"), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_workspace_write_tool_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let workspace = TestWorkspace::new();
        let dir = workspace.bin_dir("bin");
        let tool = workspace.write_tool(&dir, "faketool", "1.2.3");

        let mode = std::fs::metadata(&tool).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}
