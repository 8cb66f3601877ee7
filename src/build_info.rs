//! Build-time information
//!
//! Metadata captured by `vergen` when the crate is compiled.

use std::fmt;

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Snapshot of the build metadata, for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub package_version: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub opt_level: &'static str,
    pub rustc: &'static str,
    pub channel: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            package_version: env!("CARGO_PKG_VERSION"),
            timestamp: BUILD_TIMESTAMP,
            target: CARGO_TARGET_TRIPLE,
            opt_level: CARGO_OPT_LEVEL,
            rustc: RUSTC_SEMVER,
            channel: RUSTC_CHANNEL,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "onion {} ({}-opt{}, rustc {} {}, built {})",
            self.package_version,
            self.target,
            self.opt_level,
            self.rustc,
            self.channel,
            self.timestamp
        )
    }
}

/// Returns a formatted build version string
///
/// Format: `{target_triple}-opt{opt_level}`
/// Example: `x86_64-unknown-linux-gnu-opt0`
pub fn version_string() -> String {
    format!("{}-opt{}", CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL)
}
