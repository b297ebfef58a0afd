// Error handling for the PLW reader

use crate::core::constants::HeaderField;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlwError>;

#[derive(Error, Debug)]
pub enum PlwError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot seek backwards from byte {position} to byte {target}")]
    BackwardSeek { position: u64, target: u64 },

    #[error("Truncated read at byte {position}: needed {wanted} more bytes")]
    TruncatedRead { position: u64, wanted: u64 },

    #[error("Unsupported read width: {0} bytes")]
    UnsupportedWidth(usize),

    #[error("Cursor is unusable after an earlier failure at byte {0}")]
    CursorUnusable(u64),

    #[error("Unsupported format version: {0}")]
    UnsupportedFormatVersion(u32),

    #[error("Invalid sampling unit index: {0}")]
    InvalidSamplingUnit(u16),

    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(u32),

    #[error("Start timestamp out of range: day {date}, second {time}")]
    InvalidStartTimestamp { date: u32, time: u32 },

    #[error("Error reading {field}: {source}")]
    HeaderField {
        field: HeaderField,
        #[source]
        source: Box<PlwError>,
    },

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
}

impl PlwError {
    /// Attaches the header field that was being decoded.
    pub fn in_field(self, field: HeaderField) -> Self {
        PlwError::HeaderField {
            field,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping header field context.
    pub fn root(&self) -> &PlwError {
        match self {
            PlwError::HeaderField { source, .. } => source.root(),
            other => other,
        }
    }
}
