//! Error taxonomy for the listing pipeline.
//!
//! Argument and registration problems are returned synchronously from the call site.
//! Everything that comes out of I/O is delivered as the terminal event of the stream.

use std::path::PathBuf;

/// Prefix carried by every pipeline message so consumers can tell where an error came from.
pub const ERROR_TAG: &str = "[dirstream] .list:";

#[derive(Debug, thiserror::Error)]
pub enum ReaddirError {
    /// Malformed `dir` input or an unusable plugin spec. Never sent through a stream.
    #[error("{tag} {0}", tag = ERROR_TAG)]
    InvalidArgument(String),

    /// The listing collaborator failed (missing directory, permission denied, ...).
    #[error("{tag} {source}", tag = ERROR_TAG)]
    ListingFailed {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The raw, unfiltered listing returned no entries.
    #[error("{tag} directory is empty: {}", .0.display(), tag = ERROR_TAG)]
    EmptyDirectory(PathBuf),

    /// `list` was called while an earlier listing on the same instance had not terminated.
    #[error("{tag} a listing is already in flight on this instance", tag = ERROR_TAG)]
    ListingInProgress,

    /// The cancel token fired before the listing resolved.
    #[error("{tag} listing cancelled: {}", .0.display(), tag = ERROR_TAG)]
    Cancelled(PathBuf),

    /// The producing side went away without sending `End` or an error.
    #[error("{tag} stream closed without a terminal signal", tag = ERROR_TAG)]
    Disconnected,

    /// A `pipe` stage rejected a record.
    #[error("{tag} pipe stage failed: {0}", tag = ERROR_TAG)]
    Stage(String),
}

impl ReaddirError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ReaddirError::InvalidArgument(msg.into())
    }

    /// The underlying I/O error kind, when the listing call itself failed.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            ReaddirError::ListingFailed { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaddirError>;
