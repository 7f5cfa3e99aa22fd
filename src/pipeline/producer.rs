//! Production loop: one listing call, then every name turned into a record, hooked, and pushed in order.

use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::{ListContext, store_paths};
use super::listing::DirLister;
use crate::FileDescriptor;
use crate::error::ReaddirError;
use crate::stream::StreamSender;

/// Run one listing on its own thread. The handle yields the number of records emitted.
pub fn spawn_producer(
    ctx: ListContext,
    lister: Arc<dyn DirLister>,
    sender: StreamSender,
) -> JoinHandle<usize> {
    thread::spawn(move || run_listing(ctx, lister.as_ref(), sender))
}

/// Produce one listing into `sender` and send exactly one terminal event.
///
/// The listing call is the only blocking I/O; everything after it runs in one pass.
/// Returns the number of records pushed. The instance is released before the
/// terminal goes out, so a consumer that saw the terminal can list again at once.
pub fn run_listing(ctx: ListContext, lister: &dyn DirLister, sender: StreamSender) -> usize {
    let ListContext {
        cwd,
        root,
        file: defaults,
        filter,
        hooks,
        cancel,
        paths,
        guard,
    } = ctx;

    if cancel.is_cancelled() {
        drop(guard);
        sender.error(ReaddirError::Cancelled(root));
        return 0;
    }

    let listed = lister.read_names(&root);

    if cancel.is_cancelled() {
        drop(guard);
        sender.error(ReaddirError::Cancelled(root));
        return 0;
    }

    let names = match listed {
        Err(source) => {
            debug!("listing {} failed: {}", root.display(), source);
            drop(guard);
            sender.error(ReaddirError::ListingFailed { root, source });
            return 0;
        }
        Ok(names) if names.is_empty() => {
            drop(guard);
            sender.error(ReaddirError::EmptyDirectory(root));
            return 0;
        }
        Ok(names) => names,
    };
    debug!("listed {} entries in {}", names.len(), root.display());

    let names = match filter {
        Some(filter) => {
            let before = names.len();
            let narrowed = filter(names);
            debug!("path filter kept {} of {} entries", narrowed.len(), before);
            narrowed
        }
        None => names,
    };
    store_paths(&paths, &names);

    let mut sender = sender;
    let mut skipped = 0_usize;
    for name in &names {
        let mut file = FileDescriptor::new(&defaults, &cwd, &root, root.join(name));
        hooks.run(&mut file);
        if !file.is_emitted() {
            skipped += 1;
            continue;
        }
        if !sender.push(file) {
            debug!("consumer dropped the stream; stopping {}", root.display());
            return sender.pushed();
        }
    }

    let emitted = sender.pushed();
    debug!(
        "{}: emitted {} records, skipped {}",
        root.display(),
        emitted,
        skipped
    );
    drop(guard);
    sender.end();
    emitted
}
