//! Inclusive byte ranges

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferError};

/// Inclusive `[start, end]` window of source bytes.
///
/// # Examples
/// ```
/// use streamify::TransferRange;
///
/// let range = TransferRange::new(2, 6).unwrap();
/// assert_eq!(range.len(), 5);
/// assert!(TransferRange::new(7, 3).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TransferRange {
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawRange {
    start: u64,
    end: u64,
}

impl TryFrom<RawRange> for TransferRange {
    type Error = TransferError;

    fn try_from(raw: RawRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TransferRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(TransferError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered, saturating at `u64::MAX`
    pub fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Always false: a range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, offset: u64) -> bool {
        (self.start..=self.end).contains(&offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_range() {
        let range = TransferRange::new(5, 5).unwrap();
        assert_eq!(range.len(), 1);
        assert!(range.contains(5));
        assert!(!range.contains(6));
    }

    #[test]
    fn test_full_width_range_saturates() {
        let range = TransferRange::new(0, u64::MAX).unwrap();
        assert_eq!(range.len(), u64::MAX);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = TransferRange::new(9, 2).unwrap_err();
        assert!(matches!(err, TransferError::InvalidRange { start: 9, end: 2 }));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TransferRange = serde_json::from_str(r#"{"start":2,"end":6}"#).unwrap();
        assert_eq!(ok, TransferRange::new(2, 6).unwrap());

        let bad: std::result::Result<TransferRange, _> =
            serde_json::from_str(r#"{"start":6,"end":2}"#);
        assert!(bad.is_err());
    }
}
