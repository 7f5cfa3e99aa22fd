//! The pipeline instance: options, registered plugins, and the `list` entry point.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use super::context::{CancelToken, InFlight, ListContext, SharedPaths, store_paths};
use super::listing::{DirLister, WalkdirLister};
use super::producer::spawn_producer;
use crate::engine::tools::{normalize, resolve_root};
use crate::error::{ReaddirError, Result};
use crate::plugin::{PluginRegistry, PluginSpec, RecordHook};
use crate::stream::{ReaddirStream, create_stream};
use crate::{DirInput, ListOpts, PathFilter, ReaddirOpts};

/// Stream plus the producer thread of one listing. The handle yields the emitted count.
pub struct ListHandles {
    pub stream: ReaddirStream,
    pub producer: JoinHandle<usize>,
}

/// A directory-listing pipeline with plugins.
///
/// Build with [`Readdir::new`] or [`create`](crate::create), register plugins, then call
/// [`list`](Self::list) as often as needed. Listings on one instance may not overlap:
/// a second `list` before the previous stream delivered its terminal fails with
/// [`ReaddirError::ListingInProgress`].
pub struct Readdir {
    opts: ReaddirOpts,
    root_dir: Option<PathBuf>,
    lister: Arc<dyn DirLister>,
    plugins: PluginRegistry,
    cancel: CancelToken,
    in_flight: InFlight,
    paths: SharedPaths,
}

impl Default for Readdir {
    fn default() -> Self {
        Readdir::new(ReaddirOpts::default())
    }
}

impl Readdir {
    /// A relative `opts.cwd` is anchored at the process working directory here, once.
    pub fn new(mut opts: ReaddirOpts) -> Self {
        if !opts.cwd.is_absolute() {
            let anchor = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
            opts.cwd = normalize(&anchor.join(&opts.cwd));
        }
        Self {
            opts,
            root_dir: None,
            lister: Arc::new(WalkdirLister::default()),
            plugins: PluginRegistry::default(),
            cancel: CancelToken::default(),
            in_flight: InFlight::default(),
            paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the listing collaborator.
    pub fn with_lister(mut self, lister: impl DirLister + 'static) -> Self {
        self.lister = Arc::new(lister);
        self
    }

    /// Builder form of [`set_path_filter`](Self::set_path_filter).
    pub fn with_path_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.set_path_filter(Arc::new(filter));
        self
    }

    /// Install the single path filter, replacing any previous one.
    pub fn set_path_filter(&mut self, filter: PathFilter) -> &mut Self {
        self.opts.plugin = Some(filter);
        self
    }

    pub fn options(&self) -> &ReaddirOpts {
        &self.opts
    }

    pub fn options_mut(&mut self) -> &mut ReaddirOpts {
        &mut self.opts
    }

    /// Root of the latest listing.
    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }

    /// Names the latest listing turned into records (after the path filter).
    /// Empty until that listing's directory call has resolved.
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run `install` now, with this pipeline. A returned record hook runs on every
    /// record of every later listing, after the hooks registered before it.
    pub fn register<F>(&mut self, install: F) -> &mut Self
    where
        F: FnOnce(&mut Readdir) -> Option<RecordHook>,
    {
        self.plugins.note_installed();
        if let Some(hook) = install(self) {
            self.plugins.add(hook);
        }
        debug!(
            "plugin installed ({} installed, {} record hooks)",
            self.plugins.installed(),
            self.plugins.len()
        );
        self
    }

    /// Register a built-in plugin by spec (`no-hidden`, `exclude:*.log`, ...).
    pub fn register_spec(&mut self, spec: &str) -> Result<&mut Self> {
        let spec: PluginSpec = spec.parse()?;
        debug!("registering built-in plugin {}", spec);
        Ok(self.register(spec.into_install_hook()))
    }

    /// List `dir` with the instance options.
    pub fn list(&mut self, dir: impl Into<DirInput>) -> Result<ReaddirStream> {
        self.list_with(dir, ListOpts::default())
    }

    /// List `dir`, merging `opts` over the instance options first. The merge persists.
    pub fn list_with(&mut self, dir: impl Into<DirInput>, opts: ListOpts) -> Result<ReaddirStream> {
        self.list_handles(dir, opts).map(|h| h.stream)
    }

    /// Like [`list_with`](Self::list_with), also returning the producer thread handle.
    ///
    /// Fails synchronously with `InvalidArgument` or `ListingInProgress`; every
    /// other failure arrives as the stream's terminal error.
    pub fn list_handles(
        &mut self,
        dir: impl Into<DirInput>,
        opts: ListOpts,
    ) -> Result<ListHandles> {
        let dir = dir.into().into_path()?;
        let guard = self
            .in_flight
            .acquire()
            .ok_or(ReaddirError::ListingInProgress)?;

        let prev_cwd = self.opts.cwd.clone();
        self.opts.merge(opts);
        if !self.opts.cwd.is_absolute() {
            self.opts.cwd = normalize(&prev_cwd.join(&self.opts.cwd));
        }
        let root = resolve_root(&self.opts.cwd, &dir, &prev_cwd);
        debug!("resolved {} -> {}", dir.display(), root.display());
        self.root_dir = Some(root.clone());
        store_paths(&self.paths, &[]);

        let ctx = ListContext {
            cwd: self.opts.cwd.clone(),
            root,
            file: self.opts.file.clone(),
            filter: self.opts.plugin.clone(),
            hooks: self.plugins.snapshot(),
            cancel: self.cancel.clone(),
            paths: Arc::clone(&self.paths),
            guard,
        };
        let (sender, stream) = create_stream(self.opts.channel_cap);
        let producer = spawn_producer(ctx, Arc::clone(&self.lister), sender);
        Ok(ListHandles { stream, producer })
    }
}
