//! Logging setup for Rigup
//!
//! Emits human-readable events to stderr so stdout stays clean for
//! command output. `RUST_LOG` overrides the level chosen by `--verbose`.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Called once from `main` before any command runs.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
