//! # streamify
//!
//! Chunked, range-aware file copy with bounded memory.
//!
//! A [`RangedReader`] pulls fixed-size chunks from an inclusive byte range of
//! the source, a [`ThresholdWriter`] coalesces them into batched writes, and
//! [`pump`] drives the two on one thread so the writer throttles the reader.

pub mod error;
pub mod io;

pub use error::{Endpoint, ErrorKind, Result, TransferError};
pub use io::*;
