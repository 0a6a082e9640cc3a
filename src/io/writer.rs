//! Threshold-buffered writer
//!
//! Coalesces incoming chunks and writes them to the destination in one call
//! once the buffered byte count reaches the threshold. Whatever remains is
//! written by [`ThresholdWriter::finish`].

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::chunk::{validate_chunk_size, Chunk};
use crate::error::{Endpoint, Result, TransferError};

/// Lifecycle of a [`ThresholdWriter`].
///
/// A writer value only exists once its destination is open, so there is no
/// unopened state to represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Open,
    Finishing,
    Errored,
    Closed,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::Open => "open",
            WriterState::Finishing => "finishing",
            WriterState::Errored => "errored",
            WriterState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Buffers chunks and flushes them in batches of at least `threshold` bytes.
pub struct ThresholdWriter<W: Write> {
    path: PathBuf,
    handle: Option<W>,
    threshold: usize,
    chunks: Vec<Chunk>,
    buffered_bytes: usize,
    bytes_written: u64,
    flushes: u64,
    state: WriterState,
}

impl ThresholdWriter<File> {
    /// Create (or truncate) the destination file.
    ///
    /// # Examples
    /// ```no_run
    /// use streamify::ThresholdWriter;
    ///
    /// let mut writer = ThresholdWriter::create("output.bin", 4096).unwrap();
    /// writer.finish().unwrap();
    /// writer.close();
    /// ```
    pub fn create<P: AsRef<Path>>(path: P, threshold: usize) -> Result<Self> {
        let path = path.as_ref();
        validate_chunk_size(threshold)?;
        let file = File::create(path).map_err(|source| TransferError::Open {
            endpoint: Endpoint::Destination,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_handle(path, file, threshold)
    }
}

impl<W: Write> ThresholdWriter<W> {
    /// Wrap an already-open handle. `path` is only used in errors and logs.
    pub fn from_handle<P: Into<PathBuf>>(path: P, handle: W, threshold: usize) -> Result<Self> {
        let path = path.into();
        validate_chunk_size(threshold)?;
        debug!(path = %path.display(), threshold, "opened destination");
        Ok(Self {
            path,
            handle: Some(handle),
            threshold,
            chunks: Vec::new(),
            buffered_bytes: 0,
            bytes_written: 0,
            flushes: 0,
            state: WriterState::Open,
        })
    }

    /// Buffer a chunk, flushing first-in-first-out once the threshold is met.
    ///
    /// Does not return until a triggered flush has completed. On failure the
    /// buffered chunks are kept and the writer becomes [`WriterState::Errored`].
    pub fn accept(&mut self, chunk: Chunk) -> Result<()> {
        self.expect_open("accept")?;
        trace!(offset = chunk.offset(), len = chunk.len(), "accepted chunk");
        self.buffered_bytes += chunk.len();
        self.chunks.push(chunk);

        if self.buffered_bytes >= self.threshold {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Write any remainder regardless of the threshold.
    pub fn finish(&mut self) -> Result<()> {
        self.expect_open("finish")?;
        self.state = WriterState::Finishing;
        if self.buffered_bytes > 0 {
            self.flush_buffer()?;
        }
        if let Some(handle) = self.handle.as_mut() {
            if let Err(source) = handle.flush() {
                self.state = WriterState::Errored;
                return Err(TransferError::Write {
                    path: self.path.clone(),
                    pending: self.buffered_bytes,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Release the destination handle. Unflushed chunks are not written.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!(
                path = %self.path.display(),
                bytes_written = self.bytes_written,
                unflushed = self.buffered_bytes,
                "closed destination"
            );
        }
        self.state = WriterState::Closed;
    }

    fn expect_open(&self, operation: &'static str) -> Result<()> {
        match self.state {
            WriterState::Open => Ok(()),
            state => Err(TransferError::InvalidState { operation, state }),
        }
    }

    fn flush_buffer(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(TransferError::InvalidState {
                operation: "flush",
                state: self.state,
            });
        };

        let mut batch = Vec::with_capacity(self.buffered_bytes);
        for chunk in &self.chunks {
            batch.extend_from_slice(chunk.as_bytes());
        }

        if let Err(source) = handle.write_all(&batch) {
            self.state = WriterState::Errored;
            return Err(TransferError::Write {
                path: self.path.clone(),
                pending: self.buffered_bytes,
                source,
            });
        }

        self.bytes_written += batch.len() as u64;
        self.flushes += 1;
        debug!(
            path = %self.path.display(),
            bytes = batch.len(),
            chunks = self.chunks.len(),
            "flushed"
        );
        self.chunks.clear();
        self.buffered_bytes = 0;
        Ok(())
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Bytes accepted but not yet written
    pub fn buffered_bytes(&self) -> usize {
        self.buffered_bytes
    }

    pub fn buffered_chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Concatenation of the unflushed chunks, in arrival order.
    pub fn pending_bytes(&self) -> Vec<u8> {
        self.chunks
            .iter()
            .flat_map(|c| c.as_bytes().iter().copied())
            .collect()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.handle.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Records every `write` call separately.
    #[derive(Default)]
    struct Recorder {
        writes: Vec<Vec<u8>>,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn chunk(offset: u64, data: &[u8]) -> Chunk {
        Chunk::new(offset, data.to_vec())
    }

    #[test]
    fn test_no_write_below_threshold() {
        let mut writer = ThresholdWriter::from_handle("mem", Recorder::default(), 4).unwrap();
        writer.accept(chunk(0, b"ab")).unwrap();
        writer.accept(chunk(2, b"c")).unwrap();
        assert!(writer.get_ref().unwrap().writes.is_empty());
        assert_eq!(writer.buffered_bytes(), 3);

        writer.accept(chunk(3, b"de")).unwrap();
        assert_eq!(writer.get_ref().unwrap().writes, vec![b"abcde".to_vec()]);
        assert_eq!(writer.buffered_bytes(), 0);
        assert_eq!(writer.flush_count(), 1);
    }

    #[test]
    fn test_finish_flushes_remainder_once() {
        let mut writer = ThresholdWriter::from_handle("mem", Recorder::default(), 10).unwrap();
        writer.accept(chunk(0, b"xyz")).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.state(), WriterState::Finishing);
        assert_eq!(writer.get_ref().unwrap().writes, vec![b"xyz".to_vec()]);

        writer.close();
        assert_eq!(writer.state(), WriterState::Closed);
        assert!(writer.is_closed());
    }

    #[test]
    fn test_finish_with_empty_buffer_writes_nothing() {
        let mut writer = ThresholdWriter::from_handle("mem", Recorder::default(), 8).unwrap();
        writer.finish().unwrap();
        assert!(writer.get_ref().unwrap().writes.is_empty());
        assert_eq!(writer.flush_count(), 0);
    }

    #[test]
    fn test_write_error_retains_buffer() {
        let mut writer = ThresholdWriter::from_handle("mem", Broken, 4).unwrap();
        writer.accept(chunk(0, b"ab")).unwrap();
        let err = writer.accept(chunk(2, b"cd")).unwrap_err();

        assert!(matches!(err, TransferError::Write { pending: 4, .. }));
        assert_eq!(writer.state(), WriterState::Errored);
        assert_eq!(writer.buffered_bytes(), 4);
        assert_eq!(writer.buffered_chunks().len(), 2);
        assert_eq!(writer.pending_bytes(), b"abcd");
    }

    #[test]
    fn test_errored_writer_only_closes() {
        let mut writer = ThresholdWriter::from_handle("mem", Broken, 1).unwrap();
        assert!(writer.accept(chunk(0, b"a")).is_err());

        assert!(matches!(
            writer.accept(chunk(1, b"b")),
            Err(TransferError::InvalidState {
                operation: "accept",
                state: WriterState::Errored
            })
        ));
        assert!(matches!(
            writer.finish(),
            Err(TransferError::InvalidState { .. })
        ));

        writer.close();
        writer.close();
        assert_eq!(writer.state(), WriterState::Closed);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(matches!(
            ThresholdWriter::from_handle("mem", Recorder::default(), 0),
            Err(TransferError::ZeroChunkSize)
        ));
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old contents that are long").unwrap();

        let mut writer = ThresholdWriter::create(&path, 16).unwrap();
        writer.accept(chunk(0, b"new")).unwrap();
        writer.finish().unwrap();
        writer.close();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
