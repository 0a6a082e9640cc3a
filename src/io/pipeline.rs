//! Reader → writer coordination
//!
//! [`pump`] drives one transfer on the caller's thread. The next chunk is
//! only pulled after the writer has accepted (and, if triggered, flushed)
//! the previous one, so the writer's pace throttles the reader.

use std::io::{Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::chunk::validate_chunk_size;
use super::range::TransferRange;
use super::reader::RangedReader;
use super::writer::ThresholdWriter;
use crate::error::Result;

/// Counters for a completed transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    pub bytes_copied: u64,
    pub chunks: u64,
    pub flushes: u64,
}

/// Move every chunk from `reader` into `writer`, then finish and close both.
///
/// Both handles are closed on every exit path. On error nothing buffered is
/// flushed, so the destination may hold only a prefix of the data.
pub fn pump<R, W>(
    reader: &mut RangedReader<R>,
    writer: &mut ThresholdWriter<W>,
) -> Result<TransferStats>
where
    R: Read + Seek,
    W: Write,
{
    let result = drain(reader, writer);
    reader.close();
    writer.close();

    match &result {
        Ok(stats) => info!(
            source = %reader.path().display(),
            destination = %writer.path().display(),
            bytes = stats.bytes_copied,
            chunks = stats.chunks,
            flushes = stats.flushes,
            "transfer complete"
        ),
        Err(e) => warn!(
            source = %reader.path().display(),
            destination = %writer.path().display(),
            error = %e,
            "transfer aborted"
        ),
    }
    result
}

fn drain<R, W>(
    reader: &mut RangedReader<R>,
    writer: &mut ThresholdWriter<W>,
) -> Result<TransferStats>
where
    R: Read + Seek,
    W: Write,
{
    let mut stats = TransferStats::default();
    let max_size = reader.chunk_size();

    while let Some(chunk) = reader.next_chunk(max_size)? {
        stats.bytes_copied += chunk.len() as u64;
        stats.chunks += 1;
        writer.accept(chunk)?;
    }
    writer.finish()?;

    stats.flushes = writer.flush_count();
    Ok(stats)
}

/// Copy the inclusive byte range `[start, end]` of `source` into `destination`.
///
/// # Examples
/// ```no_run
/// use streamify::copy_range;
///
/// let stats = copy_range("input.bin", "slice.bin", 4096, 1024, 2047).unwrap();
/// assert!(stats.bytes_copied <= 1024);
/// ```
pub fn copy_range<P, Q>(
    source: P,
    destination: Q,
    chunk_size: usize,
    start: u64,
    end: u64,
) -> Result<TransferStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let range = TransferRange::new(start, end)?;
    copy(source.as_ref(), destination.as_ref(), chunk_size, Some(range))
}

/// Copy all of `source` into `destination`.
///
/// # Examples
/// ```no_run
/// use streamify::copy_full;
///
/// let stats = copy_full("input.bin", "copy.bin", 64 * 1024).unwrap();
/// println!("copied {} bytes", stats.bytes_copied);
/// ```
pub fn copy_full<P, Q>(source: P, destination: Q, chunk_size: usize) -> Result<TransferStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    copy(source.as_ref(), destination.as_ref(), chunk_size, None)
}

pub(crate) fn copy(
    source: &Path,
    destination: &Path,
    chunk_size: usize,
    range: Option<TransferRange>,
) -> Result<TransferStats> {
    validate_chunk_size(chunk_size)?;

    // Source first: a missing source must not create the destination.
    let mut reader = RangedReader::open(source, range, chunk_size)?;
    let mut writer = match ThresholdWriter::create(destination, chunk_size) {
        Ok(writer) => writer,
        Err(e) => {
            reader.close();
            return Err(e);
        }
    };

    pump(&mut reader, &mut writer)
}
