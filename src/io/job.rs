//! Transfer jobs and reports
//!
//! A [`TransferJob`] is the resolved parameter set for one transfer; it can
//! be built in code or loaded from a JSON job file. Running it yields a
//! [`TransferReport`] that can be saved back out as JSON.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::chunk::{validate_chunk_size, DEFAULT_CHUNK_SIZE};
use super::pipeline::{copy, TransferStats};
use super::range::TransferRange;
use crate::error::{Result, TransferError};

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Parameters for a single copy.
///
/// # Examples
/// ```
/// use streamify::TransferJob;
///
/// let job: TransferJob = serde_json::from_str(
///     r#"{ "source": "in.bin", "destination": "out.bin", "range": { "start": 2, "end": 6 } }"#,
/// ).unwrap();
/// assert_eq!(job.chunk_size, streamify::DEFAULT_CHUNK_SIZE);
/// assert_eq!(job.range.unwrap().len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TransferRange>,
}

impl TransferJob {
    /// Copy the whole source.
    pub fn full<P: Into<PathBuf>, Q: Into<PathBuf>>(
        source: P,
        destination: Q,
        chunk_size: usize,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            chunk_size,
            range: None,
        }
    }

    /// Copy only `[start, end]` of the source.
    pub fn ranged<P: Into<PathBuf>, Q: Into<PathBuf>>(
        source: P,
        destination: Q,
        chunk_size: usize,
        start: u64,
        end: u64,
    ) -> Result<Self> {
        Ok(Self {
            source: source.into(),
            destination: destination.into(),
            chunk_size,
            range: Some(TransferRange::new(start, end)?),
        })
    }

    /// Load a job from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let job: Self = read_json_file(path).map_err(|e| TransferError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<()> {
        validate_chunk_size(self.chunk_size)?;
        Ok(())
    }

    pub fn run(&self) -> Result<TransferReport> {
        self.validate()?;
        let stats = copy(&self.source, &self.destination, self.chunk_size, self.range)?;
        Ok(TransferReport {
            source: self.source.clone(),
            destination: self.destination.clone(),
            chunk_size: self.chunk_size,
            range: self.range,
            stats,
        })
    }
}

/// Outcome of a successful [`TransferJob`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub chunk_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TransferRange>,
    #[serde(flatten)]
    pub stats: TransferStats,
}

impl TransferReport {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        write_json_file(path, self)
    }
}

/// Write a value to a file as pretty-printed JSON
pub fn write_json_file<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value).map_err(io::Error::other)
}

/// Read a value from a JSON file
pub fn read_json_file<P: AsRef<Path>, T: serde::de::DeserializeOwned>(path: P) -> io::Result<T> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(io::BufReader::new(file)).map_err(io::Error::other)
}
