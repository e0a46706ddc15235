//! Shell completions command

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Print a completion script for the requested shell on stdout.
///
/// Unsupported shell names never reach this point; the argument is a
/// value enum and clap rejects anything else at parse time.
pub fn run(args: CompletionsArgs) -> Result<()> {
    write_script(args.shell, &mut io::stdout().lock());
    Ok(())
}

fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "rigup", out);
}
