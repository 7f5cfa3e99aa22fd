//! Pipeline components: instance, per-listing context, listing collaborator, producer loop.

pub mod context;
pub mod listing;
pub mod orchestrator;
pub mod producer;

pub use context::{CancelToken, ListContext};
pub use listing::{DirLister, StaticLister, WalkdirLister};
pub use orchestrator::{ListHandles, Readdir};
pub use producer::{run_listing, spawn_producer};
