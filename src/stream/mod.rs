//! Output stream: bounded record channel plus `pipe` stage composition.

pub mod channel;
pub mod pipe;

pub use channel::{ReaddirStream, StreamEvent, StreamSender, create_stream};
pub use pipe::StagePush;
