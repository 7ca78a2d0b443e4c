//! Error types for the peripheral host

use thiserror::Error;

use crate::transport::AttStatus;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Failures reported by the radio driver when executing a command
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("radio adapter not available")]
    AdapterUnavailable,

    #[error("transport command failed: {reason}")]
    CommandFailed { reason: String },

    #[error("transport channel closed")]
    ChannelClosed,
}

/// Terminal outcome of dispatching a single inbound request.
///
/// Never propagated past the response: the matching [`AttStatus`] is sent
/// to the requesting central and the session continues unaffected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// No registered characteristic matches the requested handle
    #[error("no characteristic matches the requested handle")]
    UnresolvedCharacteristic,

    /// The application never bound a callback for this operation
    #[error("no handler bound for the requested operation")]
    NoHandlerBound,

    /// The read callback ran but declined to produce data
    #[error("read handler declined the request")]
    HandlerDeclinedRead,

    /// No entry of a write batch was accepted
    #[error("no write in the batch was accepted")]
    AggregateWriteFailure,
}

impl DispatchError {
    /// Status code answered to the central for this outcome. Read
    /// responses only carry a coarse status, so declined requests map to
    /// the generic failure code.
    pub fn status(self) -> AttStatus {
        match self {
            DispatchError::UnresolvedCharacteristic | DispatchError::NoHandlerBound => {
                AttStatus::RequestNotSupported
            }
            DispatchError::HandlerDeclinedRead | DispatchError::AggregateWriteFailure => {
                AttStatus::UnlikelyError
            }
        }
    }
}
