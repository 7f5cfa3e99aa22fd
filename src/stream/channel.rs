//! Output channel: a bounded, record-mode stream with exactly one terminal event.

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::FileDescriptor;
use crate::error::{ReaddirError, Result};
use crate::utils::config::channel_cap;

/// One event on a [`ReaddirStream`].
#[derive(Debug)]
pub enum StreamEvent {
    Data(FileDescriptor),
    End,
    Error(ReaddirError),
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Data(_))
    }
}

/// Create a connected producer/consumer pair with a buffer of `cap` records.
pub fn create_stream(cap: usize) -> (StreamSender, ReaddirStream) {
    let cap = channel_cap(cap);
    let (tx, rx) = bounded::<StreamEvent>(cap);
    (StreamSender::new(tx), ReaddirStream::from_receiver(rx, cap))
}

/// Producer half. `end` and `error` consume it, so only one terminal can ever be sent.
pub struct StreamSender {
    tx: Sender<StreamEvent>,
    pushed: usize,
}

impl StreamSender {
    pub(crate) fn new(tx: Sender<StreamEvent>) -> Self {
        Self { tx, pushed: 0 }
    }

    /// Enqueue one record, blocking while the buffer is full.
    /// Returns false once the consumer has gone away; stop producing then.
    pub fn push(&mut self, file: FileDescriptor) -> bool {
        if self.tx.send(StreamEvent::Data(file)).is_err() {
            return false;
        }
        self.pushed += 1;
        true
    }

    /// Number of records accepted so far.
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    pub fn end(self) {
        let _ = self.tx.send(StreamEvent::End);
    }

    pub fn error(self, err: ReaddirError) {
        let _ = self.tx.send(StreamEvent::Error(err));
    }

    /// Send an already-built terminal event (used when forwarding between pipe stages).
    pub(crate) fn finish(self, terminal: StreamEvent) {
        debug_assert!(terminal.is_terminal());
        let _ = self.tx.send(terminal);
    }
}

/// Consumer half. Yields records in production order, then exactly one terminal.
pub struct ReaddirStream {
    rx: Receiver<StreamEvent>,
    cap: usize,
    done: bool,
}

impl ReaddirStream {
    pub(crate) fn from_receiver(rx: Receiver<StreamEvent>, cap: usize) -> Self {
        Self {
            rx,
            cap,
            done: false,
        }
    }

    /// Buffer size used for this stream and for stages piped from it.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Block for the next event. Returns `None` only after the terminal has been delivered.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        if self.done {
            return None;
        }
        let event = match self.rx.recv() {
            Ok(event) => event,
            Err(_) => StreamEvent::Error(ReaddirError::Disconnected),
        };
        if event.is_terminal() {
            self.done = true;
        }
        Some(event)
    }

    /// Hand every event, terminal included, to `f`.
    pub fn for_each_event<F>(mut self, mut f: F)
    where
        F: FnMut(StreamEvent),
    {
        while let Some(event) = self.next_event() {
            f(event);
        }
    }

    /// Drain the stream. Ok with every record on `End`, the error otherwise.
    pub fn collect_files(self) -> Result<Vec<FileDescriptor>> {
        self.collect()
    }
}

impl Iterator for ReaddirStream {
    type Item = Result<FileDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event()? {
            StreamEvent::Data(file) => Some(Ok(file)),
            StreamEvent::Error(err) => Some(Err(err)),
            StreamEvent::End => None,
        }
    }
}
