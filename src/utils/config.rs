//! Application configuration constants.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file read by the CLI (e.g. `.dirstream.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Streaming channel cap ----

/// Bounded buffer sizes between the producer and each pipe stage.
pub struct StreamConsts;

impl StreamConsts {
    /// Records buffered on the output channel before the producer blocks.
    pub const DEFAULT_CHANNEL_CAP: usize = 16;
    /// Floor applied to configured caps; a zero-capacity channel would turn every push into a rendezvous.
    pub const MIN_CHANNEL_CAP: usize = 1;
}

/// Clamp a configured channel capacity.
pub fn channel_cap(requested: usize) -> usize {
    requested.max(StreamConsts::MIN_CHANNEL_CAP)
}
