// PicoLog PLW recovery reader
// Main library entry point

pub mod core;

// Re-export main types
pub use core::constants::{HeaderField, SamplingUnit};
pub use core::data_handle::handle_ws_fetch;
pub use core::error::{PlwError, Result};
pub use core::format::{HeaderSummary, TimeseriesChunk};
pub use core::header::RawHeader;
pub use core::reader::PlwReader;
pub use core::record::DecodedRecord;
pub use core::table::{ResultTable, RunningStats, TableRow};

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(HEADER_FIELDS_END, 594);
        assert_eq!(record_size(2), 12);
        assert_eq!(SamplingUnit::from_u16(7), Some(SamplingUnit::Hour));
        assert_eq!(SamplingUnit::from_u16(8), None);
        assert_eq!(SamplingUnit::Minute.seconds(), 60.0);
        assert_eq!(SamplingUnit::Microsecond.to_string(), "us");
    }

    #[test]
    fn test_field_offsets_ascend() {
        use crate::core::constants::HeaderField;
        let offsets: Vec<u64> = HeaderField::ALL.iter().map(|f| f.offset()).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }
}
