//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::profile::AuthMode;

/// Rigup - developer machine bootstrap
///
/// Ensure the tools a build machine needs are installed, current and on the search path.
#[derive(Parser, Debug)]
#[command(
    name = "rigup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Idempotent bootstrap tool for developer and CI machines",
    long_about = "Rigup ensures a machine has its required command-line tools (package manager, \
                  Git, Terraform, cloud CLIs) installed with the right versions, registers their \
                  directories on the search path, and scaffolds project configuration. Runs are \
                  idempotent: everything already in place is left untouched.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rigup bootstrap\n    \
                  rigup bootstrap --only terraform --yes\n    \
                  rigup doctor --json\n    \
                  rigup scaffold --dir infra\n    \
                  rigup auth --host https://adb-123.azuredatabricks.net --mode azure-cli\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/vegesg/rigup"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the required tools, idempotently
    Bootstrap(BootstrapArgs),

    /// Report what is installed and what the environment looks like
    Doctor(DoctorArgs),

    /// Scaffold Terraform project files
    Scaffold(ScaffoldArgs),

    /// Write a Databricks CLI authentication profile
    Auth(AuthArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the bootstrap command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bootstrap the built-in toolset:\n    rigup bootstrap\n\n\
                  Bootstrap from a manifest:\n    rigup bootstrap --manifest rigup.yaml\n\n\
                  Only specific tools:\n    rigup bootstrap --only git --only terraform\n\n\
                  Non-interactive (CI):\n    rigup bootstrap --yes")]
pub struct BootstrapArgs {
    /// Manifest file to read the toolset from (defaults to ./rigup.yaml, then the built-in set)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Restrict the run to the named tools, keeping manifest order
    #[arg(long = "only", value_name = "TOOL", num_args = 1..)]
    pub only: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the doctor command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Human-readable report:\n    rigup doctor\n\n\
                  Machine-readable report:\n    rigup doctor --json\n\n\
                  Probe a custom toolset:\n    rigup doctor --manifest rigup.yaml")]
pub struct DoctorArgs {
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Manifest whose tools should be probed
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

/// Arguments for the scaffold command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Scaffold into the current directory:\n    rigup scaffold\n\n\
                  Scaffold into a subdirectory:\n    rigup scaffold --dir infra/azure")]
pub struct ScaffoldArgs {
    /// Target directory for the project files
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Arguments for the auth command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Token authentication:\n    rigup auth --host https://adb-123.azuredatabricks.net --token dapi...\n\n\
                  Azure CLI authentication:\n    rigup auth --host https://adb-123.azuredatabricks.net --mode azure-cli\n\n\
                  A named profile:\n    rigup auth --profile ci --host https://adb-123.azuredatabricks.net --mode azure-cli")]
pub struct AuthArgs {
    /// Workspace URL to authenticate against
    #[arg(long)]
    pub host: String,

    /// Profile section name
    #[arg(long, default_value = "DEFAULT")]
    pub profile: String,

    /// Authentication mode
    #[arg(long, value_enum, default_value_t = AuthMode::Token)]
    pub mode: AuthMode,

    /// Personal access token (token mode)
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file to write (defaults to ~/.databrickscfg)
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rigup completions bash > ~/.bash_completion.d/rigup\n\n\
                  Generate zsh completions:\n    rigup completions zsh > ~/.zfunc/_rigup\n\n\
                  Generate fish completions:\n    rigup completions fish > ~/.config/fish/completions/rigup.fish\n\n\
                  Generate PowerShell completions:\n    rigup completions powershell")]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
