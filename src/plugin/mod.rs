//! Plugin system: install hooks run once at registration, record hooks run per record.

pub mod builtin;
pub mod registry;

pub use builtin::{GlobExt, PluginSpec};
pub use registry::{BoxedInstallHook, HookChain, PluginRegistry, RecordHook, record_hook};
