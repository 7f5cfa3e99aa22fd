//! Ordered record hooks collected from install hooks.

use std::sync::{Arc, Mutex, PoisonError};

use crate::FileDescriptor;
use crate::pipeline::Readdir;

/// Per-record hook: runs once for every record built during a listing, in registration order.
pub type RecordHook = Box<dyn FnMut(&mut FileDescriptor) + Send>;

/// Install hook in boxed form, for plugins chosen at runtime (see [`PluginSpec`](super::PluginSpec)).
/// Runs once, immediately, with the pipeline; may hand back a [`RecordHook`].
pub type BoxedInstallHook = Box<dyn FnOnce(&mut Readdir) -> Option<RecordHook>>;

/// Box a closure as the record hook returned from an install hook.
pub fn record_hook<F>(f: F) -> Option<RecordHook>
where
    F: FnMut(&mut FileDescriptor) + Send + 'static,
{
    Some(Box::new(f))
}

type SharedHook = Arc<Mutex<RecordHook>>;

/// Record hooks owned by one pipeline instance.
///
/// Each listing takes a [`HookChain`] snapshot, so registering while a listing is
/// running never blocks; the new hook applies from the next listing on.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    hooks: Vec<SharedHook>,
    installed: usize,
}

impl PluginRegistry {
    pub(crate) fn note_installed(&mut self) {
        self.installed += 1;
    }

    pub(crate) fn add(&mut self, hook: RecordHook) {
        self.hooks.push(Arc::new(Mutex::new(hook)));
    }

    /// Install hooks run so far, including those that returned no record hook.
    pub fn installed(&self) -> usize {
        self.installed
    }

    /// Record hooks currently registered.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn snapshot(&self) -> HookChain {
        HookChain {
            hooks: self.hooks.clone(),
        }
    }
}

/// The record hooks of one listing, in registration order.
pub struct HookChain {
    hooks: Vec<SharedHook>,
}

impl HookChain {
    pub fn run(&self, file: &mut FileDescriptor) {
        for hook in &self.hooks {
            // A hook that panicked earlier still gets called; its state is whatever it left.
            let mut hook = hook.lock().unwrap_or_else(PoisonError::into_inner);
            (*hook)(file);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
