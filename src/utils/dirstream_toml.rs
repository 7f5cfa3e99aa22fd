//! Load `.dirstream.toml` from a directory (CLI only). The library takes its configuration through `ReaddirOpts`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::cli::RunSettings;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DirstreamToml {
    #[serde(default)]
    settings: SettingsSection,
    /// Extra fields copied into every record's `options`.
    #[serde(default)]
    file: Option<toml::Table>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    cwd: Option<String>,
    plugins: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    #[serde(rename = "match")]
    matches: Option<Vec<String>>,
    json: Option<bool>,
    verbose: Option<bool>,
    channel_cap: Option<usize>,
}

/// Parse config text. Exposed separately from the loader so callers can validate a string.
pub fn parse_dirstream_toml(s: &str) -> Result<DirstreamToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load `.dirstream.toml` from `dir` if present. Returns None if file missing, unreadable or malformed.
pub fn load_dirstream_toml(dir: &Path) -> Option<DirstreamToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_dirstream_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite settings field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $settings:expr, $field:ident) => {
        if let Some(v) = $section.$field.clone() {
            $settings.$field = v;
        }
    };
}

/// Apply file config to settings (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_settings(file: &DirstreamToml, settings: &mut RunSettings) {
    let s = &file.settings;
    if let Some(ref cwd) = s.cwd {
        settings.cwd = Some(PathBuf::from(cwd));
    }
    apply_file_opt!(s, settings, plugins);
    apply_file_opt!(s, settings, exclude);
    apply_file_opt!(s, settings, matches);
    apply_file_opt!(s, settings, json);
    apply_file_opt!(s, settings, verbose);
    if let Some(cap) = s.channel_cap {
        settings.channel_cap = Some(cap);
    }
    if let Some(ref table) = file.file {
        match serde_json::to_value(table) {
            Ok(serde_json::Value::Object(map)) => settings.file_options.extend(map),
            Ok(_) => {}
            Err(e) => log::warn!("[file] table could not be converted: {}", e),
        }
    }
}
