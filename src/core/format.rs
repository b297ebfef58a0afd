// Data structures handed to consumers of a decoded PLW file

use crate::core::constants::{SamplingUnit, READER_VERSION};
use crate::core::header::RawHeader;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Human-readable description of a PLW header.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderSummary {
    pub reader_version: &'static str,
    pub format_version: u32,
    pub file_name: String,
    pub start: Option<DateTime<Utc>>,
    pub channel_count: u32,
    pub record_count: u32,
    pub sampling_interval: u32,
    pub sampling_unit: SamplingUnit,
}

impl HeaderSummary {
    pub fn new(header: &RawHeader, file_name: String, start: Option<DateTime<Utc>>) -> Self {
        Self {
            reader_version: READER_VERSION,
            format_version: header.format_version,
            file_name,
            start,
            channel_count: header.channel_count,
            record_count: header.valid_record_count(),
            sampling_interval: header.sampling_interval,
            sampling_unit: header.sampling_unit,
        }
    }

    /// Day/month/year without padding, as the logger software prints it.
    pub fn start_text(&self) -> String {
        match self.start {
            Some(start) => start.format("%-d/%-m/%Y %-H:%-M:%-S").to_string(),
            None => "invalid date".to_string(),
        }
    }
}

impl fmt::Display for HeaderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reader Version: {}", self.reader_version)?;
        writeln!(f, "PLW Version: {}", self.format_version)?;
        writeln!(f, "File Name: {}", self.file_name)?;
        writeln!(f, "Date of Test: {}", self.start_text())?;
        writeln!(f, "Number of Channels: {}", self.channel_count)?;
        writeln!(f, "Last Sample Number: {}", self.record_count)?;
        write!(
            f,
            "Sample Interval: {}{}",
            self.sampling_interval, self.sampling_unit
        )
    }
}

/// One channel as parallel timestamp/value columns.
#[derive(Debug, Clone)]
pub struct TimeseriesChunk {
    /// Unix seconds.
    pub timestamps: Vec<f64>,
    pub values: Vec<f64>,
}

impl TimeseriesChunk {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(cap),
            values: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
