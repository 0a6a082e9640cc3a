//! Chunk values and chunk-size presets
//!
//! A [`Chunk`] is the unit handed from the reader to the writer. The
//! configured chunk size governs both read granularity and the writer's
//! flush threshold.

use crate::error::{Result, TransferError};

/// Default chunk size (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Large chunk size for high-throughput copies (1MB)
pub const LARGE_CHUNK_SIZE: usize = 1024 * 1024;

/// Small chunk size for memory-constrained scenarios (4KB)
pub const SMALL_CHUNK_SIZE: usize = 4 * 1024;

/// Reject a zero chunk size.
///
/// # Examples
/// ```
/// use streamify::validate_chunk_size;
///
/// assert!(validate_chunk_size(4096).is_ok());
/// assert!(validate_chunk_size(0).is_err());
/// ```
pub fn validate_chunk_size(chunk_size: usize) -> Result<usize> {
    if chunk_size == 0 {
        return Err(TransferError::ZeroChunkSize);
    }
    Ok(chunk_size)
}

/// An immutable slice of source bytes tagged with its source offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    offset: u64,
    data: Vec<u8>,
}

impl Chunk {
    pub(crate) fn new(offset: u64, data: Vec<u8>) -> Self {
        debug_assert!(!data.is_empty(), "chunks are never empty");
        Self { offset, data }
    }

    /// Byte offset of the first byte within the source
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset one past the last byte of this chunk
    pub fn end_offset(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
