//! Error types for chunked transfers.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::io::writer::WriterState;

/// Result type used throughout `streamify`.
pub type Result<T> = std::result::Result<T, TransferError>;

/// Which side of a transfer an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Coarse classification of a [`TransferError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source unreadable or destination uncreatable.
    Open,
    /// OS-level failure while reading the source.
    Read,
    /// OS-level failure while flushing to the destination.
    Write,
    /// Bad parameters or misuse of the API; no I/O was attempted.
    Usage,
}

/// Errors produced by the transfer engine.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to open {endpoint} {}: {source}", path.display())]
    Open {
        endpoint: Endpoint,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {} at byte {offset}: {source}", path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// The buffered bytes that failed to persist are still held by the writer.
    #[error("failed to write {} ({pending} bytes unflushed): {source}", path.display())]
    Write {
        path: PathBuf,
        pending: usize,
        #[source]
        source: io::Error,
    },

    #[error("invalid range: start {start} > end {end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("cannot {operation} a writer in {state} state")]
    InvalidState {
        operation: &'static str,
        state: WriterState,
    },

    #[error("invalid job file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::Open { .. } => ErrorKind::Open,
            TransferError::Read { .. } => ErrorKind::Read,
            TransferError::Write { .. } => ErrorKind::Write,
            TransferError::InvalidRange { .. }
            | TransferError::ZeroChunkSize
            | TransferError::InvalidState { .. }
            | TransferError::Config { .. } => ErrorKind::Usage,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage => 1,
            ErrorKind::Open => 3,
            ErrorKind::Read => 4,
            ErrorKind::Write => 5,
        }
    }
}
