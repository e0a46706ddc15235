//! Version extraction and comparison
//!
//! Tool version output is free-form ("Terraform v1.13.7", "git version
//! 2.30.1", multi-line JSON from az). The first `x.y.z` integer group in
//! the output is taken as the tool version.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

#[allow(clippy::unwrap_used)]
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").unwrap());

/// Extract the first `major.minor.patch` group from probe output.
///
/// Returns `None` when no three-part version number is present.
pub fn extract_version(output: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps.get(3)?.as_str().parse().ok()?;
    Some(Version::new(major, minor, patch))
}

/// Parse a minimum-version bound, padding missing parts with zeroes.
///
/// "1.13" becomes 1.13.0 and "2" becomes 2.0.0 so manifests can state
/// bounds as loosely as humans write them.
pub fn parse_minimum(input: &str) -> Option<Version> {
    let trimmed = input.trim().trim_start_matches('v');
    if trimmed.is_empty() {
        return None;
    }

    let mut padded = trimmed.to_string();
    for _ in trimmed.matches('.').count()..2 {
        padded.push_str(".0");
    }
    Version::parse(&padded).ok()
}

/// True when `found` satisfies the inclusive minimum bound.
pub fn meets_minimum(found: &Version, minimum: &Version) -> bool {
    found >= minimum
}
