//! Error types and handling for Rigup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

#![allow(dead_code)]

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Rigup operations
#[derive(Error, Diagnostic, Debug)]
pub enum RigupError {
    // Tool errors
    #[error("Tool not found: {name}")]
    #[diagnostic(
        code(rigup::tool::not_found),
        help("Check that the tool is on PATH or give it an install action in rigup.yaml")
    )]
    ToolNotFound { name: String },

    // Version errors
    #[error("Failed to parse version from '{tool}' output: {output}")]
    #[diagnostic(
        code(rigup::version::parse_failed),
        help("The probe output did not contain a recognizable x.y.z version number")
    )]
    VersionParseFailed { tool: String, output: String },

    #[error("Version mismatch for '{tool}': found {found}, need >= {required}")]
    #[diagnostic(
        code(rigup::version::mismatch),
        help("Upgrade the tool manually or lower min_version in rigup.yaml")
    )]
    VersionMismatch {
        tool: String,
        found: String,
        required: String,
    },

    // Install errors
    #[error("Install action for '{tool}' failed after {attempts} attempts: {reason}")]
    #[diagnostic(code(rigup::install::action_failed))]
    InstallActionFailed {
        tool: String,
        attempts: u32,
        reason: String,
    },

    #[error("Cancelled: {label}")]
    #[diagnostic(code(rigup::install::cancelled))]
    Cancelled { label: String },

    // Process errors
    #[error("Failed to spawn command: {command}")]
    #[diagnostic(
        code(rigup::process::spawn_failed),
        help("Check that the program is installed and reachable through PATH")
    )]
    CommandSpawnFailed { command: String, reason: String },

    #[error("Command exited with {status}: {command}")]
    #[diagnostic(code(rigup::process::exit_nonzero))]
    CommandFailed { command: String, status: String },

    // Manifest errors
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(rigup::manifest::not_found),
        help("Run 'rigup bootstrap' without --manifest to use the built-in toolset")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest: {path}")]
    #[diagnostic(code(rigup::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(rigup::manifest::invalid))]
    ManifestInvalid { message: String },

    // Environment errors
    #[error("Failed to persist PATH changes: {reason}")]
    #[diagnostic(code(rigup::env::persist_failed))]
    PathPersistFailed { reason: String },

    #[error("Could not determine home directory")]
    #[diagnostic(
        code(rigup::env::home_not_found),
        help("Set HOME (or USERPROFILE on Windows) and retry")
    )]
    HomeDirNotFound,

    // CI errors
    #[error("Failed to emit CI environment directive: {reason}")]
    #[diagnostic(code(rigup::ci::notify_failed))]
    NotifyFailed { reason: String },

    // Auth profile errors
    #[error("Invalid auth profile: {message}")]
    #[diagnostic(code(rigup::auth::profile_invalid))]
    ProfileInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(rigup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(rigup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rigup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for RigupError {
    fn from(err: std::io::Error) -> Self {
        RigupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RigupError {
    fn from(err: serde_yaml::Error) -> Self {
        RigupError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RigupError {
    fn from(err: serde_json::Error) -> Self {
        RigupError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for RigupError {
    fn from(err: inquire::InquireError) -> Self {
        RigupError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RigupError>;
