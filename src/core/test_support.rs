// Synthetic PLW files for tests, shared with tests/

use crate::core::constants::{HeaderField, HEADER_FIELDS_END};

pub struct PlwBuilder {
    header_size: u16,
    version: u32,
    channels: u32,
    count_primary: u32,
    count_secondary: u32,
    interval: u32,
    unit: u16,
    date: u32,
    time: u32,
    records: Vec<(i32, Vec<f32>)>,
    trailing: Vec<u8>,
}

impl PlwBuilder {
    pub fn new(channels: u32) -> Self {
        Self {
            header_size: 1684,
            version: 5,
            channels,
            count_primary: 0,
            count_secondary: 0,
            interval: 1,
            unit: 5,
            date: 737_425,
            time: 0,
            records: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn header_size(mut self, size: u16) -> Self {
        self.header_size = size;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn counts(mut self, primary: u32, secondary: u32) -> Self {
        self.count_primary = primary;
        self.count_secondary = secondary;
        self
    }

    pub fn interval(mut self, interval: u32, unit: u16) -> Self {
        self.interval = interval;
        self.unit = unit;
        self
    }

    pub fn start(mut self, date: u32, time: u32) -> Self {
        self.date = date;
        self.time = time;
        self
    }

    pub fn record(mut self, time_marker: i32, samples: &[f32]) -> Self {
        self.records.push((time_marker, samples.to_vec()));
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let len = (self.header_size as usize).max(HEADER_FIELDS_END as usize);
        let mut bytes = vec![0u8; len];

        let mut put = |field: HeaderField, value: u32| {
            let at = field.offset() as usize;
            let le = value.to_le_bytes();
            bytes[at..at + field.width()].copy_from_slice(&le[..field.width()]);
        };
        put(HeaderField::HeaderSize, self.header_size as u32);
        put(HeaderField::FormatVersion, self.version);
        put(HeaderField::ChannelCount, self.channels);
        put(HeaderField::SampleCountPrimary, self.count_primary);
        put(HeaderField::SampleCountSecondary, self.count_secondary);
        put(HeaderField::SamplingInterval, self.interval);
        put(HeaderField::SamplingUnit, self.unit as u32);
        put(HeaderField::StartDate, self.date);
        put(HeaderField::StartTime, self.time);

        for (time_marker, samples) in &self.records {
            bytes.extend_from_slice(&time_marker.to_le_bytes());
            for sample in samples {
                bytes.extend_from_slice(&sample.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&self.trailing);
        bytes
    }
}
