// Fixed-layout PLW header decoding

use crate::core::constants::*;
use crate::core::cursor::{ByteCursor, FieldValue};
use crate::core::error::{PlwError, Result};
use chrono::{DateTime, Duration, Utc};
use std::io::Read;
use tracing::{debug, error, warn};

/// Header fields needed to decode the data section.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHeader {
    pub header_size: u16,
    pub format_version: u32,
    pub channel_count: u32,
    pub sample_count_primary: u32,
    pub sample_count_secondary: u32,
    pub sampling_interval: u32,
    pub sampling_unit: SamplingUnit,
    pub start_date_ordinal: u32,
    pub start_time_of_day: u32,
}

impl RawHeader {
    /// The logger keeps two sample counters; only the lower one is trusted.
    pub fn valid_record_count(&self) -> u32 {
        self.sample_count_primary.min(self.sample_count_secondary)
    }

    pub fn record_size(&self) -> usize {
        record_size(self.channel_count)
    }

    pub fn start_timestamp(&self) -> Result<DateTime<Utc>> {
        start_timestamp(self.start_date_ordinal, self.start_time_of_day)
    }

    /// Start timestamp, or `None` with a warning when the date fields are
    /// corrupt. A bad date never costs the data records.
    pub fn recoverable_start(&self) -> Option<DateTime<Utc>> {
        match self.start_timestamp() {
            Ok(start) => Some(start),
            Err(e) => {
                warn!("Ignoring unusable start date: {}", e);
                None
            }
        }
    }
}

/// Decodes the header from a cursor at the start of the file.
///
/// On success the cursor sits at `header_size`, the first byte of the data
/// section.
pub fn decode_header<R: Read>(cursor: &mut ByteCursor<R>) -> Result<RawHeader> {
    let header_size = read_field(cursor, HeaderField::HeaderSize)? as u16;

    let format_version = read_field(cursor, HeaderField::FormatVersion)?;
    if format_version < MIN_FORMAT_VERSION {
        error!("Header version {} not supported", format_version);
        return Err(PlwError::UnsupportedFormatVersion(format_version));
    }

    let channel_count = read_field(cursor, HeaderField::ChannelCount)?;
    if channel_count == 0 || channel_count > MAX_CHANNELS {
        error!("Header declares {} channels", channel_count);
        return Err(PlwError::InvalidChannelCount(channel_count));
    }

    let sample_count_primary = read_field(cursor, HeaderField::SampleCountPrimary)?;
    let sample_count_secondary = read_field(cursor, HeaderField::SampleCountSecondary)?;
    if sample_count_primary != sample_count_secondary {
        warn!(
            "Sample counters disagree ({} vs {}), trusting the lower",
            sample_count_primary, sample_count_secondary
        );
    }

    let sampling_interval = read_field(cursor, HeaderField::SamplingInterval)?;

    let unit_index = read_field(cursor, HeaderField::SamplingUnit)? as u16;
    let sampling_unit = SamplingUnit::from_u16(unit_index).ok_or_else(|| {
        error!("Sampling unit index {} is out of range", unit_index);
        PlwError::InvalidSamplingUnit(unit_index)
    })?;

    let start_date_ordinal = read_field(cursor, HeaderField::StartDate)?;
    let start_time_of_day = read_field(cursor, HeaderField::StartTime)?;

    let header = RawHeader {
        header_size,
        format_version,
        channel_count,
        sample_count_primary,
        sample_count_secondary,
        sampling_interval,
        sampling_unit,
        start_date_ordinal,
        start_time_of_day,
    };

    cursor.advance_to(header_size as u64).map_err(|e| {
        error!("Cannot reach data section at byte {}: {}", header_size, e);
        e
    })?;

    debug!(
        "Header decoded: version={} channels={} records={} interval={}{}",
        format_version,
        channel_count,
        header.valid_record_count(),
        sampling_interval,
        sampling_unit
    );

    Ok(header)
}

fn read_field<R: Read>(cursor: &mut ByteCursor<R>, field: HeaderField) -> Result<u32> {
    cursor
        .skip_or_read_to(field.offset(), field.width())
        .map(FieldValue::as_u32)
        .map_err(|e| {
            error!("Error reading {}: {}", field, e);
            e.in_field(field)
        })
}

/// Splits seconds-of-day into whole hours, minutes and seconds.
///
/// Each step takes the fractional remainder of the previous one, so values
/// follow the logger's own floating point arithmetic.
pub fn split_time_of_day(seconds: u32) -> (u32, u32, u32) {
    let hour = seconds as f64 / 3600.0;
    let hour_int = hour.floor();
    let minute = (hour - hour_int) * 60.0;
    let minute_int = minute.floor();
    let second = (minute - minute_int) * 60.0;
    (hour_int as u32, minute_int as u32, second.floor() as u32)
}

/// Start of recording: the date from the day ordinal, the clock time from
/// the separate seconds-of-day field. Hours past 23 roll into the next day.
pub fn start_timestamp(date_ordinal: u32, time_of_day: u32) -> Result<DateTime<Utc>> {
    let invalid = || PlwError::InvalidStartTimestamp {
        date: date_ordinal,
        time: time_of_day,
    };

    let unix_days = date_ordinal as i64 - ORDINAL_TO_UNIX_DAYS;
    let date = DateTime::<Utc>::from_timestamp_millis(unix_days * MS_PER_DAY).ok_or_else(invalid)?;

    let (hour, minute, second) = split_time_of_day(time_of_day);
    let clock = Duration::try_seconds(hour as i64 * 3600 + minute as i64 * 60 + second as i64)
        .ok_or_else(invalid)?;

    date.checked_add_signed(clock).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::PlwBuilder;
    use chrono::TimeZone;
    use std::io::Cursor;

    fn decode(bytes: Vec<u8>) -> Result<(RawHeader, u64)> {
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let header = decode_header(&mut cursor)?;
        Ok((header, cursor.position()))
    }

    #[test]
    fn test_decode_header_fields() {
        let bytes = PlwBuilder::new(2)
            .counts(5, 3)
            .interval(100, 4)
            .start(737_425, 45_000)
            .build();
        let (header, position) = decode(bytes).unwrap();

        assert_eq!(header.format_version, 5);
        assert_eq!(header.channel_count, 2);
        assert_eq!(header.valid_record_count(), 3);
        assert_eq!(header.sampling_interval, 100);
        assert_eq!(header.sampling_unit, SamplingUnit::Millisecond);
        assert_eq!(header.record_size(), 12);
        assert_eq!(position, header.header_size as u64);
    }

    #[test]
    fn test_version_floor() {
        let err = decode(PlwBuilder::new(1).version(2).build()).unwrap_err();
        assert!(matches!(err, PlwError::UnsupportedFormatVersion(2)));

        let (header, _) = decode(PlwBuilder::new(1).version(3).build()).unwrap();
        assert_eq!(header.format_version, 3);
    }

    #[test]
    fn test_out_of_range_unit_is_flagged() {
        let err = decode(PlwBuilder::new(1).interval(1, 8).build()).unwrap_err();
        assert!(matches!(err, PlwError::InvalidSamplingUnit(8)));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let err = decode(PlwBuilder::new(0).build()).unwrap_err();
        assert!(matches!(err, PlwError::InvalidChannelCount(0)));
    }

    #[test]
    fn test_truncated_header_names_field() {
        let mut bytes = PlwBuilder::new(1).build();
        bytes.truncate(556);
        let err = decode(bytes).unwrap_err();
        match err {
            PlwError::HeaderField { field, source } => {
                assert_eq!(field, HeaderField::SampleCountSecondary);
                assert!(matches!(*source, PlwError::TruncatedRead { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_size_inside_fields_is_backward_seek() {
        let err = decode(PlwBuilder::new(1).header_size(100).build()).unwrap_err();
        assert!(matches!(err, PlwError::BackwardSeek { target: 100, .. }));
    }

    #[test]
    fn test_split_time_of_day() {
        assert_eq!(split_time_of_day(0), (0, 0, 0));
        assert_eq!(split_time_of_day(45_000), (12, 30, 0));
        assert_eq!(split_time_of_day(9_000), (2, 30, 0));
    }

    #[test]
    fn test_start_timestamp() {
        let ts = start_timestamp(737_425, 45_000).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 1, 1, 12, 30, 0).unwrap());

        let epoch = start_timestamp(ORDINAL_TO_UNIX_DAYS as u32, 0).unwrap();
        assert_eq!(epoch.timestamp(), 0);
    }

    #[test]
    fn test_start_time_rolls_over() {
        let ts = start_timestamp(737_425, 90_000).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 1, 2, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_corrupt_date_does_not_fail_header() {
        let (header, position) = decode(PlwBuilder::new(1).start(u32::MAX, 0).build()).unwrap();
        assert_eq!(position, 1684);
        assert_eq!(header.recoverable_start(), None);
        assert!(header.start_timestamp().is_err());
    }

    #[test]
    fn test_unrepresentable_date() {
        let err = start_timestamp(u32::MAX, 0).unwrap_err();
        assert!(matches!(err, PlwError::InvalidStartTimestamp { .. }));
    }
}
