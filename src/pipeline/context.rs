//! Per-listing context and the shared state a pipeline instance hands to its producer thread.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::plugin::HookChain;
use crate::{FileDefaults, PathFilter};

/// Cooperative cancellation, honored around the listing call.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arm after a cancelled listing so the instance can list again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Set while a listing on the instance has not sent its terminal event.
#[derive(Clone, Debug, Default)]
pub(crate) struct InFlight(Arc<AtomicBool>);

impl InFlight {
    /// Claim the instance for one listing. None when another listing still holds it.
    pub(crate) fn acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }
}

/// Releases the instance on drop, including when a record hook panics.
#[derive(Debug)]
pub(crate) struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Names of the latest listing after the path filter ran.
pub(crate) type SharedPaths = Arc<Mutex<Vec<String>>>;

pub(crate) fn store_paths(slot: &SharedPaths, names: &[String]) {
    let mut paths = slot.lock().unwrap_or_else(PoisonError::into_inner);
    paths.clear();
    paths.extend_from_slice(names);
}

/// Everything one listing needs, moved onto its producer thread.
pub struct ListContext {
    pub cwd: PathBuf,
    pub root: PathBuf,
    pub file: FileDefaults,
    pub filter: Option<PathFilter>,
    pub hooks: HookChain,
    pub cancel: CancelToken,
    pub(crate) paths: SharedPaths,
    pub(crate) guard: InFlightGuard,
}
