//! Ranged sequential reader
//!
//! Reads forward only within an inclusive byte range (or to end-of-file when
//! unranged), producing chunks of at most the requested size. Nothing is read
//! until the consumer pulls, so a slow consumer throttles read-ahead.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::chunk::{validate_chunk_size, Chunk};
use super::range::TransferRange;
use crate::error::{Endpoint, Result, TransferError};

/// Forward-only chunk producer over a byte range of a source.
///
/// The sequence is finite and not restartable; once it ends (range
/// exhausted, end-of-file, or a read error) every later pull yields `None`.
pub struct RangedReader<R> {
    path: PathBuf,
    handle: Option<R>,
    range: Option<TransferRange>,
    chunk_size: usize,
    current: u64,
    terminated: bool,
}

impl RangedReader<File> {
    /// Open `path` for reading, positioned at the start of `range`.
    ///
    /// # Examples
    /// ```no_run
    /// use streamify::{RangedReader, TransferRange};
    ///
    /// let range = TransferRange::new(0, 1023).unwrap();
    /// let mut reader = RangedReader::open("input.bin", Some(range), 256).unwrap();
    /// while let Some(chunk) = reader.next_chunk(256).unwrap() {
    ///     println!("{} bytes at {}", chunk.len(), chunk.offset());
    /// }
    /// reader.close();
    /// ```
    pub fn open<P: AsRef<Path>>(
        path: P,
        range: Option<TransferRange>,
        chunk_size: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        validate_chunk_size(chunk_size)?;
        let file = File::open(path).map_err(|source| TransferError::Open {
            endpoint: Endpoint::Source,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_handle(path, file, range, chunk_size)
    }
}

impl<R: Read + Seek> RangedReader<R> {
    /// Wrap an already-open handle. `path` is only used in errors and logs.
    pub fn from_handle<P: Into<PathBuf>>(
        path: P,
        mut handle: R,
        range: Option<TransferRange>,
        chunk_size: usize,
    ) -> Result<Self> {
        let path = path.into();
        validate_chunk_size(chunk_size)?;

        let start = range.map_or(0, |r| r.start());
        if start > 0 {
            // The handle is dropped (closed) on this path.
            handle
                .seek(SeekFrom::Start(start))
                .map_err(|source| TransferError::Open {
                    endpoint: Endpoint::Source,
                    path: path.clone(),
                    source,
                })?;
        }
        debug!(path = %path.display(), ?range, chunk_size, "opened source");

        Ok(Self {
            path,
            handle: Some(handle),
            range,
            chunk_size,
            current: start,
            terminated: false,
        })
    }

    /// Pull the next chunk of at most `max_size` bytes.
    ///
    /// Returns `Ok(None)` once the range or the file is exhausted. A short
    /// read yields a short chunk; the following pull resumes from the
    /// advanced cursor.
    pub fn next_chunk(&mut self, max_size: usize) -> Result<Option<Chunk>> {
        validate_chunk_size(max_size)?;
        if self.terminated {
            return Ok(None);
        }
        let Some(handle) = self.handle.as_mut() else {
            self.terminated = true;
            return Ok(None);
        };

        let remaining = match self.range {
            Some(range) if self.current > range.end() => {
                self.terminated = true;
                return Ok(None);
            }
            Some(range) => (range.end() - self.current).saturating_add(1),
            None => u64::MAX,
        };
        let bytes_to_read = remaining.min(max_size as u64) as usize;

        let mut buf = Vec::new();
        if let Err(e) = buf.try_reserve_exact(bytes_to_read) {
            self.terminated = true;
            return Err(TransferError::Read {
                path: self.path.clone(),
                offset: self.current,
                source: io::Error::new(io::ErrorKind::OutOfMemory, e),
            });
        }
        buf.resize(bytes_to_read, 0);
        let n = loop {
            match handle.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    self.terminated = true;
                    return Err(TransferError::Read {
                        path: self.path.clone(),
                        offset: self.current,
                        source,
                    });
                }
            }
        };

        if n == 0 {
            trace!(path = %self.path.display(), offset = self.current, "end of file");
            self.terminated = true;
            return Ok(None);
        }

        buf.truncate(n);
        let chunk = Chunk::new(self.current, buf);
        self.current += n as u64;
        trace!(offset = chunk.offset(), len = n, requested = bytes_to_read, "read chunk");
        Ok(Some(chunk))
    }

    /// Release the source handle. Safe to call more than once.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            self.terminated = true;
            debug!(path = %self.path.display(), bytes_read = self.bytes_read(), "closed source");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// True once the sequence has ended, successfully or not.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Current read cursor (offset of the next byte to read)
    pub fn position(&self) -> u64 {
        self.current
    }

    pub fn bytes_read(&self) -> u64 {
        self.current - self.range.map_or(0, |r| r.start())
    }

    pub fn range(&self) -> Option<TransferRange> {
        self.range
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read + Seek> Iterator for RangedReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk_size = self.chunk_size;
        self.next_chunk(chunk_size).transpose()
    }
}

impl<R: Read + Seek> std::iter::FusedIterator for RangedReader<R> {}
