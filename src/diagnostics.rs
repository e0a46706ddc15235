//! Environment diagnostics
//!
//! Collects what a bootstrap run would see: platform, CI orchestrator,
//! durable store location, search path and per-tool presence. Probe
//! failures are reported inline so one broken tool does not hide the
//! rest of the picture.

use serde::Serialize;

use crate::ci;
use crate::environment::EnvironmentState;
use crate::installer::probe::VersionProbe;
use crate::installer::{CommandProbe, Presence};
use crate::manifest::Manifest;

#[derive(Debug, Serialize)]
pub struct EnvReport {
    pub os: String,
    pub arch: String,
    pub ci: String,
    pub path_store: String,
    pub search_path: Vec<String>,
    pub tools: Vec<ToolReport>,
}

#[derive(Debug, Serialize)]
pub struct ToolReport {
    pub name: String,
    pub status: String,
}

impl ToolReport {
    fn is_present(&self) -> bool {
        self.status != "absent" && !self.status.starts_with("error:")
    }
}

/// Probe every manifest tool against `env` and assemble the report.
pub fn collect(manifest: &Manifest, env: &EnvironmentState, store_location: &str) -> EnvReport {
    let tools = manifest
        .tools
        .iter()
        .map(|tool| {
            let probe = CommandProbe::new(tool.effective_bin(), tool.version_args.clone());
            let status = match probe.probe(env) {
                Ok(Presence::Present { version: Some(v) }) => v.to_string(),
                Ok(Presence::Present { version: None }) => "present".to_string(),
                Ok(Presence::Absent) => "absent".to_string(),
                Err(err) => format!("error: {err}"),
            };
            ToolReport {
                name: tool.name.clone(),
                status,
            }
        })
        .collect();

    EnvReport {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        ci: ci::detect(env).as_str().to_string(),
        path_store: store_location.to_string(),
        search_path: env
            .process_path()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        tools,
    }
}

/// Human-readable rendering for the terminal.
pub fn render_text(report: &EnvReport) -> String {
    use console::style;

    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Environment").bold()));
    out.push_str(&format!("  os          {} {}\n", report.os, report.arch));
    out.push_str(&format!("  ci          {}\n", report.ci));
    out.push_str(&format!("  path store  {}\n", report.path_store));

    out.push_str(&format!("\n{}\n", style("Search path").bold()));
    if report.search_path.is_empty() {
        out.push_str("  (empty)\n");
    }
    for entry in &report.search_path {
        out.push_str(&format!("  {entry}\n"));
    }

    out.push_str(&format!("\n{}\n", style("Tools").bold()));
    for tool in &report.tools {
        let mark = if tool.is_present() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        out.push_str(&format!("  {mark} {:<12} {}\n", tool.name, tool.status));
    }
    out
}
