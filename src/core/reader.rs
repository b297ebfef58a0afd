// Main PLW reader: one forward pass from file to decoded table

use crate::core::constants::SamplingUnit;
use crate::core::cursor::ByteCursor;
use crate::core::error::{PlwError, Result};
use crate::core::format::{HeaderSummary, TimeseriesChunk};
use crate::core::header::{decode_header, RawHeader};
use crate::core::record::RecordStream;
use crate::core::table::{aggregate, ResultTable, RunningStats};
use chrono::{DateTime, Duration, Utc};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// A fully decoded PLW file.
///
/// The source file is closed once [`PlwReader::open`] returns; everything
/// here is held in memory and never changes.
#[derive(Debug, Clone)]
pub struct PlwReader {
    path: PathBuf,
    header: RawHeader,
    start: Option<DateTime<Utc>>,
    table: ResultTable,
    stats: RunningStats,
}

impl PlwReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            error!("Failed to open {}: {}", path.display(), e);
            e
        })?;

        info!("Decoding {}", path.display());
        Self::decode(BufReader::new(file), path)
    }

    /// Decodes a PLW byte stream. `path` is only used for naming.
    pub fn decode<R: Read>(source: R, path: PathBuf) -> Result<Self> {
        let mut cursor = ByteCursor::new(source);
        let header = decode_header(&mut cursor)?;
        let start = header.recoverable_start();

        let expected = header.valid_record_count();
        let stream = RecordStream::new(cursor, header.channel_count, expected);
        let (table, stats) = aggregate(stream, header.channel_count as usize)?;

        if (table.len() as u64) < expected as u64 {
            warn!(
                "Recovered {} of {} records from {}",
                table.len(),
                expected,
                path.display()
            );
        } else {
            info!("Decoded {} records from {}", table.len(), path.display());
        }

        Ok(Self {
            path,
            header,
            start,
            table,
            stats,
        })
    }

    /// Reads only the header of a file and summarises it.
    pub fn read_summary<P: AsRef<Path>>(path: P) -> Result<HeaderSummary> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut cursor = ByteCursor::new(BufReader::new(file));
        let header = decode_header(&mut cursor)?;
        let start = header.recoverable_start();
        Ok(HeaderSummary::new(&header, file_name_of(path), start))
    }

    pub fn summary(&self) -> HeaderSummary {
        HeaderSummary::new(&self.header, self.file_name(), self.start)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    pub fn header(&self) -> &RawHeader {
        &self.header
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn channel_count(&self) -> u32 {
        self.header.channel_count
    }

    /// Reconciled record count from the header.
    pub fn sample_count(&self) -> u32 {
        self.header.valid_record_count()
    }

    pub fn rows_decoded(&self) -> usize {
        self.table.len()
    }

    /// True when fewer rows were recovered than the header promises.
    pub fn is_truncated(&self) -> bool {
        (self.table.len() as u64) < self.sample_count() as u64
    }

    pub fn sample_interval(&self) -> u32 {
        self.header.sampling_interval
    }

    pub fn sampling_unit(&self) -> SamplingUnit {
        self.header.sampling_unit
    }

    /// `None` when the header's date fields are corrupt.
    pub fn start_timestamp(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn stats(&self) -> RunningStats {
        self.stats
    }

    pub fn minimum_sample(&self) -> Option<f32> {
        self.stats.minimum
    }

    pub fn maximum_sample(&self) -> Option<f32> {
        self.stats.maximum
    }

    /// Absolute time of a record: start plus `time_marker` sampling units.
    pub fn timestamp_for_record(&self, time_marker: i32) -> Option<DateTime<Utc>> {
        let start = self.start?;
        let seconds = time_marker as f64 * self.sampling_unit().seconds();
        let whole = seconds.trunc();
        let nanos = ((seconds - whole) * 1e9).round() as i64;
        let offset = Duration::try_seconds(whole as i64)?.checked_add(&Duration::nanoseconds(nanos))?;
        start.checked_add_signed(offset)
    }

    /// Same projection as [`Self::timestamp_for_record`] in Unix seconds.
    ///
    /// Without a usable start date the offset from the start of recording
    /// is returned instead.
    pub fn unix_seconds_for_record(&self, time_marker: i32) -> f64 {
        let start = self.start.map_or(0.0, |s| {
            s.timestamp() as f64 + s.timestamp_subsec_nanos() as f64 * 1e-9
        });
        start + time_marker as f64 * self.sampling_unit().seconds()
    }

    pub fn list_channels(&self) -> Vec<(usize, &str)> {
        self.table
            .columns()
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, name)| (i, name.as_str()))
            .collect()
    }

    pub fn get_channel_index_by_name(&self, name: &str) -> Option<usize> {
        self.table.channel_index(name)
    }

    /// One channel with record times projected to Unix seconds.
    pub fn read_channel(&self, index: usize) -> Result<TimeseriesChunk> {
        if index >= self.table.channel_count() {
            return Err(PlwError::ChannelNotFound(index.to_string()));
        }

        let mut chunk = TimeseriesChunk::with_capacity(self.table.len());
        for (time_marker, value) in self.table.channel_values(index) {
            chunk.timestamps.push(self.unix_seconds_for_record(time_marker));
            chunk.values.push(value as f64);
        }
        Ok(chunk)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}
