//! Infrastructure project scaffolding
//!
//! Drops a ready-to-edit Terraform skeleton into a directory. Existing
//! files are never overwritten; each file is reported as created or
//! already present so repeated runs are safe.

use std::path::Path;

use crate::error::{Result, RigupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Exists,
}

#[derive(Debug, Clone)]
pub struct ScaffoldEntry {
    pub name: &'static str,
    pub status: FileStatus,
}

const MAIN_TF: &str = r#"terraform {
  required_version = ">= 1.13.0"

  required_providers {
    azurerm = {
      source  = "hashicorp/azurerm"
      version = "~> 4.0"
    }
  }
}

provider "azurerm" {
  features {}
}

resource "azurerm_resource_group" "main" {
  name     = var.resource_group_name
  location = var.location

  tags = {
    environment = var.environment
    managed_by  = "terraform"
  }
}
"#;

const VARIABLES_TF: &str = r#"variable "resource_group_name" {
  description = "Name of the resource group"
  type        = string
}

variable "location" {
  description = "Azure region for all resources"
  type        = string
  default     = "westeurope"
}

variable "environment" {
  description = "Deployment environment tag (dev, staging, prod)"
  type        = string
  default     = "dev"
}
"#;

const BACKEND_TF: &str = r#"terraform {
  backend "azurerm" {
    resource_group_name  = "tfstate-rg"
    storage_account_name = "tfstateaccount"
    container_name       = "tfstate"
    key                  = "terraform.tfstate"
  }
}
"#;

const TFVARS_EXAMPLE: &str = r#"# Copy to terraform.tfvars and adjust.
resource_group_name = "my-project-rg"
location            = "westeurope"
environment         = "dev"
"#;

const GITIGNORE: &str = r#".terraform/
*.tfstate
*.tfstate.backup
terraform.tfvars
crash.log
"#;

const TEMPLATES: &[(&str, &str)] = &[
    ("main.tf", MAIN_TF),
    ("variables.tf", VARIABLES_TF),
    ("backend.tf", BACKEND_TF),
    ("terraform.tfvars.example", TFVARS_EXAMPLE),
    (".gitignore", GITIGNORE),
];

/// Write the template files into `dir`, creating it if needed.
pub fn scaffold_project(dir: &Path) -> Result<Vec<ScaffoldEntry>> {
    std::fs::create_dir_all(dir).map_err(|err| RigupError::FileWriteFailed {
        path: dir.display().to_string(),
        reason: err.to_string(),
    })?;

    let mut entries = Vec::with_capacity(TEMPLATES.len());
    for (name, content) in TEMPLATES {
        let status = write_if_absent(&dir.join(name), content)?;
        tracing::debug!("scaffold {name}: {status:?}");
        entries.push(ScaffoldEntry { name, status });
    }
    Ok(entries)
}

fn write_if_absent(path: &Path, content: &str) -> Result<FileStatus> {
    if path.exists() {
        return Ok(FileStatus::Exists);
    }
    std::fs::write(path, content).map_err(|err| RigupError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    Ok(FileStatus::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let entries = scaffold_project(dir.path()).unwrap();

        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.status == FileStatus::Created));
        let main_tf = std::fs::read_to_string(dir.path().join("main.tf")).unwrap();
        assert!(main_tf.contains("azurerm"));
        assert!(dir.path().join(".gitignore").exists());
    }

    #[test]
    fn test_scaffold_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tf"), "# hand-edited\n").unwrap();

        let entries = scaffold_project(dir.path()).unwrap();
        let main_entry = entries.iter().find(|e| e.name == "main.tf").unwrap();
        assert_eq!(main_entry.status, FileStatus::Exists);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("main.tf")).unwrap(),
            "# hand-edited\n"
        );

        let created = entries
            .iter()
            .filter(|e| e.status == FileStatus::Created)
            .count();
        assert_eq!(created, 4);
    }

    #[test]
    fn test_scaffold_second_run_reports_exists() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_project(dir.path()).unwrap();
        let second = scaffold_project(dir.path()).unwrap();
        assert!(second.iter().all(|e| e.status == FileStatus::Exists));
    }

    #[test]
    fn test_scaffold_creates_missing_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("infra").join("azure");
        let entries = scaffold_project(&nested).unwrap();
        assert!(nested.join("variables.tf").exists());
        assert_eq!(entries.len(), 5);
    }
}
