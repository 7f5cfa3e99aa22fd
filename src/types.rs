//! Public types for the dirstream API and pipeline.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::tools::path_relative_to;
use crate::error::{ReaddirError, Result};
use crate::utils::config::StreamConsts;

/// One directory entry flowing through the pipeline.
///
/// Built once per listed name, handed to every record hook in registration order,
/// then pushed downstream when [`is_emitted`](Self::is_emitted) holds. Ownership moves
/// to the consumer on push; the pipeline keeps nothing.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FileDescriptor {
    /// Working directory the listing was resolved against.
    pub cwd: PathBuf,
    /// Resolved root directory the entry was listed from.
    pub base: PathBuf,
    path: PathBuf,
    /// Every path this record has held, oldest first. The last one is [`path`](Self::path).
    history: Vec<PathBuf>,
    /// Emit only when `include && !exclude`.
    pub include: bool,
    pub exclude: bool,
    /// Free-form extra fields, seeded from the pipeline's file defaults.
    pub options: Map<String, Value>,
}

impl FileDescriptor {
    /// Build a record for `path` using the pipeline's file defaults.
    pub fn new(defaults: &FileDefaults, cwd: &Path, base: &Path, path: PathBuf) -> Self {
        FileDescriptor {
            cwd: cwd.to_path_buf(),
            base: base.to_path_buf(),
            history: vec![path.clone()],
            path,
            include: defaults.include,
            exclude: defaults.exclude,
            options: defaults.options.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    /// Point the record at a new path. Records the change in [`history`](Self::history).
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path != self.path {
            self.history.push(path.clone());
            self.path = path;
        }
    }

    /// Final component of the path (`index.js`).
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension including the leading dot (`.js`). Empty for dotfiles and names without one.
    pub fn extname(&self) -> String {
        let name = self.basename();
        if name.chars().all(|c| c == '.') {
            return String::new();
        }
        match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx..].to_string(),
            _ => String::new(),
        }
    }

    /// Basename without [`extname`](Self::extname).
    pub fn stem(&self) -> String {
        let name = self.basename();
        let ext_len = self.extname().len();
        name[..name.len() - ext_len].to_string()
    }

    pub fn dirname(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Path relative to [`base`](Self::base); the full path when it lies outside.
    pub fn relative(&self) -> PathBuf {
        path_relative_to(&self.path, &self.base).unwrap_or_else(|| self.path.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn is_emitted(&self) -> bool {
        self.include && !self.exclude
    }
}

/// Seed values for every [`FileDescriptor`] a pipeline builds.
#[derive(Clone, Debug, PartialEq)]
pub struct FileDefaults {
    pub include: bool,
    pub exclude: bool,
    pub options: Map<String, Value>,
}

impl Default for FileDefaults {
    fn default() -> Self {
        Self {
            include: true,
            exclude: false,
            options: Map::new(),
        }
    }
}

/// Narrows the whole ordered list of entry names before any record is built.
/// May drop and reorder names; an empty result is a successful, empty listing.
pub type PathFilter = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Instance options. Use [`ListOpts`] for per-call overrides.
#[derive(Clone)]
pub struct ReaddirOpts {
    /// Directory that relative `dir` arguments are resolved against.
    pub cwd: PathBuf,
    pub file: FileDefaults,
    /// Optional path filter, applied once per listing to the raw names.
    pub plugin: Option<PathFilter>,
    /// Capacity of the bounded output channel.
    pub channel_cap: usize,
}

impl Default for ReaddirOpts {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            file: FileDefaults::default(),
            plugin: None,
            channel_cap: StreamConsts::DEFAULT_CHANNEL_CAP,
        }
    }
}

impl fmt::Debug for ReaddirOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaddirOpts")
            .field("cwd", &self.cwd)
            .field("file", &self.file)
            .field("plugin", &self.plugin.as_ref().map(|_| "<path filter>"))
            .field("channel_cap", &self.channel_cap)
            .finish()
    }
}

impl ReaddirOpts {
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Shallow merge: every key set on `over` replaces the instance key.
    pub fn merge(&mut self, over: ListOpts) {
        if let Some(cwd) = over.cwd {
            self.cwd = cwd;
        }
        if let Some(file) = over.file {
            self.file = file;
        }
        if let Some(plugin) = over.plugin {
            self.plugin = Some(plugin);
        }
    }
}

/// Per-call overrides for [`Readdir::list_with`](crate::Readdir::list_with).
#[derive(Clone, Default)]
pub struct ListOpts {
    pub cwd: Option<PathBuf>,
    pub file: Option<FileDefaults>,
    pub plugin: Option<PathFilter>,
}

/// The `dir` argument of a listing: text, raw bytes, a path, or something unusable.
#[derive(Clone, Debug, PartialEq)]
pub enum DirInput {
    Str(String),
    Bytes(Vec<u8>),
    /// Taken as-is, whatever its encoding.
    Path(PathBuf),
    /// Any other kind of value; always rejected with `InvalidArgument`.
    Unsupported { kind: &'static str },
}

impl DirInput {
    /// Validate and convert to a path. No I/O happens here.
    pub fn into_path(self) -> Result<PathBuf> {
        const EXPECT: &str = "expect `dir` to be a string or bytes";
        match self {
            DirInput::Str(s) => Ok(PathBuf::from(s)),
            DirInput::Path(p) => Ok(p),
            DirInput::Bytes(b) => String::from_utf8(b)
                .map(PathBuf::from)
                .map_err(|_| ReaddirError::invalid(format!("{EXPECT}, got non-UTF-8 bytes"))),
            DirInput::Unsupported { kind } => {
                Err(ReaddirError::invalid(format!("{EXPECT}, got {kind}")))
            }
        }
    }
}

impl From<&str> for DirInput {
    fn from(s: &str) -> Self {
        DirInput::Str(s.to_string())
    }
}

impl From<String> for DirInput {
    fn from(s: String) -> Self {
        DirInput::Str(s)
    }
}

impl From<&Path> for DirInput {
    fn from(p: &Path) -> Self {
        DirInput::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for DirInput {
    fn from(p: PathBuf) -> Self {
        DirInput::Path(p)
    }
}

impl From<&PathBuf> for DirInput {
    fn from(p: &PathBuf) -> Self {
        DirInput::from(p.as_path())
    }
}

impl From<&[u8]> for DirInput {
    fn from(b: &[u8]) -> Self {
        DirInput::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for DirInput {
    fn from(b: Vec<u8>) -> Self {
        DirInput::Bytes(b)
    }
}

impl From<Value> for DirInput {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => DirInput::Str(s),
            Value::Array(items) => {
                let bytes: Option<Vec<u8>> = items
                    .iter()
                    .map(|i| i.as_u64().and_then(|n| u8::try_from(n).ok()))
                    .collect();
                match bytes {
                    Some(b) => DirInput::Bytes(b),
                    None => DirInput::Unsupported { kind: "array" },
                }
            }
            Value::Null => DirInput::Unsupported { kind: "null" },
            Value::Bool(_) => DirInput::Unsupported { kind: "boolean" },
            Value::Number(_) => DirInput::Unsupported { kind: "number" },
            Value::Object(_) => DirInput::Unsupported { kind: "object" },
        }
    }
}
