// Format constants for PicoLog PLW files

use serde::Serialize;

/// Version string reported in header summaries.
pub const READER_VERSION: &str = concat!("plw-reader ", env!("CARGO_PKG_VERSION"));

/// Oldest header layout this reader understands.
pub const MIN_FORMAT_VERSION: u32 = 3;

/// The parameter table in the header holds 250 channel slots.
pub const MAX_CHANNELS: u32 = 250;

// Days between the header's day-zero and 1970-01-01
pub const ORDINAL_TO_UNIX_DAYS: i64 = 719_163;
pub const MS_PER_DAY: i64 = 86_400_000;

// Record format: time_marker(i32) followed by one f32 per channel
pub const TIME_MARKER_SIZE: usize = 4;
pub const SAMPLE_SIZE: usize = 4;

pub fn record_size(channel_count: u32) -> usize {
    TIME_MARKER_SIZE + SAMPLE_SIZE * channel_count as usize
}

/// Header fields read by the decoder, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    HeaderSize,
    FormatVersion,
    ChannelCount,
    SampleCountPrimary,
    SampleCountSecondary,
    SamplingInterval,
    SamplingUnit,
    StartDate,
    StartTime,
}

impl HeaderField {
    pub const ALL: [HeaderField; 9] = [
        HeaderField::HeaderSize,
        HeaderField::FormatVersion,
        HeaderField::ChannelCount,
        HeaderField::SampleCountPrimary,
        HeaderField::SampleCountSecondary,
        HeaderField::SamplingInterval,
        HeaderField::SamplingUnit,
        HeaderField::StartDate,
        HeaderField::StartTime,
    ];

    /// Byte offset from the start of the file.
    pub const fn offset(self) -> u64 {
        match self {
            HeaderField::HeaderSize => 0,
            HeaderField::FormatVersion => 42,
            HeaderField::ChannelCount => 46,
            HeaderField::SampleCountPrimary => 550,
            HeaderField::SampleCountSecondary => 554,
            HeaderField::SamplingInterval => 562,
            HeaderField::SamplingUnit => 566,
            HeaderField::StartDate => 586,
            HeaderField::StartTime => 590,
        }
    }

    /// Width in bytes as stored on disk.
    pub const fn width(self) -> usize {
        match self {
            HeaderField::HeaderSize | HeaderField::SamplingUnit => 2,
            _ => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HeaderField::HeaderSize => "header size",
            HeaderField::FormatVersion => "format version",
            HeaderField::ChannelCount => "channel count",
            HeaderField::SampleCountPrimary => "sample count (primary)",
            HeaderField::SampleCountSecondary => "sample count (secondary)",
            HeaderField::SamplingInterval => "sampling interval",
            HeaderField::SamplingUnit => "sampling unit",
            HeaderField::StartDate => "start date",
            HeaderField::StartTime => "start time",
        }
    }
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// End of the furthest header field the decoder inspects.
pub const HEADER_FIELDS_END: u64 = HeaderField::StartTime.offset() + 4;

// Sampling unit codes
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SamplingUnit {
    Femtosecond = 0,
    Picosecond = 1,
    Nanosecond = 2,
    Microsecond = 3,
    Millisecond = 4,
    Second = 5,
    Minute = 6,
    Hour = 7,
}

const UNIT_SYMBOLS: [&str; 8] = ["fs", "ps", "ns", "us", "ms", "s", "min", "hour"];

const UNIT_SECONDS: [f64; 8] = [1e-15, 1e-12, 1e-9, 1e-6, 1e-3, 1.0, 60.0, 3600.0];

impl SamplingUnit {
    pub fn from_u16(val: u16) -> Option<Self> {
        match val {
            0 => Some(SamplingUnit::Femtosecond),
            1 => Some(SamplingUnit::Picosecond),
            2 => Some(SamplingUnit::Nanosecond),
            3 => Some(SamplingUnit::Microsecond),
            4 => Some(SamplingUnit::Millisecond),
            5 => Some(SamplingUnit::Second),
            6 => Some(SamplingUnit::Minute),
            7 => Some(SamplingUnit::Hour),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        UNIT_SYMBOLS[self as usize]
    }

    /// Seconds per unit.
    pub fn seconds(self) -> f64 {
        UNIT_SECONDS[self as usize]
    }
}

impl std::fmt::Display for SamplingUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
