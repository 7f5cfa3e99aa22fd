//! Built-in plugins, selectable by name from the CLI and `.dirstream.toml`.

use log::debug;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::registry::{BoxedInstallHook, RecordHook, record_hook};
use crate::engine::tools::{filter_by_globs, glob_match, is_hidden_name};
use crate::error::ReaddirError;
use crate::pipeline::Readdir;

/// Verb plugin: narrow the listing by glob patterns before any record is built.
///
/// Patterns match entry names; a leading `!` removes matches. Calling `src` again
/// replaces the previous filter, since a pipeline has a single path filter.
pub trait GlobExt {
    fn src<S: AsRef<str>>(&mut self, patterns: &[S]) -> &mut Self;
}

impl GlobExt for Readdir {
    fn src<S: AsRef<str>>(&mut self, patterns: &[S]) -> &mut Self {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        debug!("path filter: {:?}", patterns);
        self.set_path_filter(Arc::new(move |names| filter_by_globs(names, &patterns)))
    }
}

/// A built-in plugin parsed from `name[:arg]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginSpec {
    /// `no-hidden`: drop dotfiles by setting `include = false`.
    NoHidden,
    /// `exclude:<glob>`: set `exclude = true` on basenames matching the glob.
    Exclude(String),
    /// `ext:.rs,.toml`: keep only these extensions.
    Ext(Vec<String>),
    /// `tag:key=value`: set an options field on every record.
    Tag(String, String),
    /// `match:<glob>`: install a path filter; contributes no record hook.
    Match(String),
}

impl FromStr for PluginSpec {
    type Err = ReaddirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None => (s.trim(), None),
        };
        let required = |arg: Option<&str>| match arg {
            Some(a) if !a.is_empty() => Ok(a.to_string()),
            _ => Err(ReaddirError::invalid(format!(
                "plugin `{name}` expects an argument (`{name}:<value>`)"
            ))),
        };
        match name {
            "no-hidden" => Ok(PluginSpec::NoHidden),
            "exclude" => Ok(PluginSpec::Exclude(required(arg)?)),
            "match" => Ok(PluginSpec::Match(required(arg)?)),
            "ext" => {
                let exts = required(arg)?
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(|e| {
                        if e.starts_with('.') {
                            e.to_string()
                        } else {
                            format!(".{e}")
                        }
                    })
                    .collect();
                Ok(PluginSpec::Ext(exts))
            }
            "tag" => {
                let pair = required(arg)?;
                match pair.split_once('=') {
                    Some((k, v)) if !k.trim().is_empty() => {
                        Ok(PluginSpec::Tag(k.trim().to_string(), v.trim().to_string()))
                    }
                    _ => Err(ReaddirError::invalid(format!(
                        "plugin `tag` expects `tag:key=value`, got `{pair}`"
                    ))),
                }
            }
            other => Err(ReaddirError::invalid(format!("unknown plugin `{other}`"))),
        }
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSpec::NoHidden => write!(f, "no-hidden"),
            PluginSpec::Exclude(g) => write!(f, "exclude:{g}"),
            PluginSpec::Ext(exts) => write!(f, "ext:{}", exts.join(",")),
            PluginSpec::Tag(k, v) => write!(f, "tag:{k}={v}"),
            PluginSpec::Match(g) => write!(f, "match:{g}"),
        }
    }
}

/// Box an install closure; the explicit bound keeps the `&mut Readdir` argument higher-ranked.
fn install<F>(f: F) -> BoxedInstallHook
where
    F: FnOnce(&mut Readdir) -> Option<RecordHook> + 'static,
{
    Box::new(f)
}

impl PluginSpec {
    pub fn into_install_hook(self) -> BoxedInstallHook {
        match self {
            PluginSpec::NoHidden => install(|_| {
                record_hook(|file| {
                    if is_hidden_name(&file.basename()) {
                        file.include = false;
                    }
                })
            }),
            PluginSpec::Exclude(glob) => install(move |_| {
                record_hook(move |file| {
                    if glob_match(&glob, &file.basename()) {
                        file.exclude = true;
                    }
                })
            }),
            PluginSpec::Ext(exts) => install(move |_| {
                record_hook(move |file| {
                    let ext = file.extname();
                    if !exts.iter().any(|e| *e == ext) {
                        file.include = false;
                    }
                })
            }),
            PluginSpec::Tag(key, value) => install(move |_| {
                record_hook(move |file| file.set(key.clone(), value.clone()))
            }),
            PluginSpec::Match(glob) => install(move |readdir| {
                readdir.src(&[glob]);
                None
            }),
        }
    }
}
