//! Transform stages attached with [`ReaddirStream::pipe`].

use crossbeam_channel::bounded;
use log::debug;
use std::thread;

use super::channel::{ReaddirStream, StreamEvent, StreamSender};
use crate::FileDescriptor;
use crate::error::ReaddirError;

/// Output handle given to a stage. A stage may push zero, one or many records per input.
pub struct StagePush {
    sender: StreamSender,
    open: bool,
}

impl StagePush {
    pub fn push(&mut self, file: FileDescriptor) -> bool {
        if self.open {
            self.open = self.sender.push(file);
        }
        self.open
    }

    pub fn pushed(&self) -> usize {
        self.sender.pushed()
    }
}

impl ReaddirStream {
    /// Attach a transform stage on its own thread and return the stream it writes to.
    ///
    /// `stage` receives each record and the downstream handle. Returning `Ok(())`
    /// acknowledges the record and lets the next one through; the upstream stays
    /// blocked on its bounded buffer until then. Returning `Err` ends the downstream
    /// with [`ReaddirError::Stage`]. Upstream `End` and errors are forwarded as-is.
    pub fn pipe<F>(mut self, mut stage: F) -> ReaddirStream
    where
        F: FnMut(FileDescriptor, &mut StagePush) -> anyhow::Result<()> + Send + 'static,
    {
        let cap = self.capacity();
        let (tx, rx) = bounded::<StreamEvent>(cap);
        thread::spawn(move || {
            let mut out = StagePush {
                sender: StreamSender::new(tx),
                open: true,
            };
            while let Some(event) = self.next_event() {
                match event {
                    StreamEvent::Data(file) => {
                        if let Err(e) = stage(file, &mut out) {
                            debug!("pipe stage failed after {} records: {:#}", out.pushed(), e);
                            out.sender.error(ReaddirError::Stage(format!("{e:#}")));
                            return;
                        }
                        if !out.open {
                            // Downstream dropped; dropping `self` stops the upstream too.
                            return;
                        }
                    }
                    terminal => {
                        out.sender.finish(terminal);
                        return;
                    }
                }
            }
        });
        ReaddirStream::from_receiver(rx, cap)
    }
}
