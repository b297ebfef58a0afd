// Result table and running sample statistics

use crate::core::error::Result;
use crate::core::record::DecodedRecord;
use serde::Serialize;

pub const TIME_COLUMN: &str = "time";

pub fn channel_column(index: usize) -> String {
    format!("channel_{}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub time: i32,
    pub channels: Vec<f32>,
}

/// Decoded rows in file order under the columns `time, channel_1..channel_N`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn new(channel_count: usize) -> Self {
        let mut columns = Vec::with_capacity(channel_count + 1);
        columns.push(TIME_COLUMN.to_string());
        columns.extend((0..channel_count).map(channel_column));
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn channel_count(&self) -> usize {
        self.columns.len() - 1
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zero-based channel index of a `channel_N` column.
    pub fn channel_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .skip(1)
            .position(|name| name == column)
    }

    /// `(time_marker, value)` pairs of one channel, in row order.
    pub fn channel_values(&self, index: usize) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.rows.iter().map(move |row| (row.time, row.channels[index]))
    }

    fn push(&mut self, record: DecodedRecord) {
        assert_eq!(
            record.samples.len(),
            self.channel_count(),
            "record width differs from declared channel count"
        );
        self.rows.push(TableRow {
            time: record.time_marker,
            channels: record.samples,
        });
    }
}

/// Smallest and largest sample seen across all channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningStats {
    pub minimum: Option<f32>,
    pub maximum: Option<f32>,
}

impl RunningStats {
    pub fn update(&mut self, sample: f32) {
        self.minimum = Some(self.minimum.map_or(sample, |m| m.min(sample)));
        self.maximum = Some(self.maximum.map_or(sample, |m| m.max(sample)));
    }

    pub fn is_set(&self) -> bool {
        self.minimum.is_some()
    }
}

/// Drains a record sequence into a table, tracking min/max on the way.
///
/// Stops at the first error; rows gathered before it are discarded with the
/// error.
pub fn aggregate<I>(records: I, channel_count: usize) -> Result<(ResultTable, RunningStats)>
where
    I: IntoIterator<Item = Result<DecodedRecord>>,
{
    let mut table = ResultTable::new(channel_count);
    let mut stats = RunningStats::default();

    for record in records {
        let record = record?;
        for &sample in &record.samples {
            stats.update(sample);
        }
        table.push(record);
    }

    Ok((table, stats))
}
