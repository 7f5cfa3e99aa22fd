//! Dirstream: list one directory as a stream of file records, shaped by ordered plugins.
//!
//! ```ignore
//! use dirstream::{ReaddirOpts, record_hook};
//!
//! let mut readdir = dirstream::create(ReaddirOpts::default());
//! readdir.register(|_| {
//!     record_hook(|file| {
//!         if file.basename() == "index.js" {
//!             file.exclude = true;
//!         }
//!     })
//! });
//! for file in readdir.list("./src")? {
//!     println!("{}", file?.path().display());
//! }
//! ```

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod plugin;
pub mod stream;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{ReaddirError, Result};
pub use pipeline::{CancelToken, DirLister, ListHandles, Readdir, StaticLister, WalkdirLister};
pub use plugin::{GlobExt, PluginSpec, RecordHook, record_hook};
pub use stream::{ReaddirStream, StagePush, StreamEvent};

/// Factory entry point; same as [`Readdir::new`].
pub fn create(opts: ReaddirOpts) -> Readdir {
    log::debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    Readdir::new(opts)
}
