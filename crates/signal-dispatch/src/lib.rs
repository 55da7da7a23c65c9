//! Signal Dispatch
//!
//! Maps per-frame signal sets to application tokens and hands non-empty
//! token lists to a sink.

mod dispatcher;
mod tokens;

pub use dispatcher::{DispatchConfig, Dispatcher, SignalSink, WriterSink};
pub use tokens::{Token, TokenMap};

use thiserror::Error;

/// Dispatch error types
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Sink rejected message: {0}")]
    Sink(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
