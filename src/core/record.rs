// Streaming decoder for the PLW data section

use crate::core::constants::{record_size, TIME_MARKER_SIZE};
use crate::core::cursor::{le_f32, le_i32, ByteCursor};
use crate::core::error::Result;
use std::io::Read;
use std::iter::FusedIterator;
use tracing::{debug, warn};

/// One data record: a raw logger time marker and one sample per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub time_marker: i32,
    pub samples: Vec<f32>,
}

/// Decodes one complete record chunk.
pub fn decode_record(chunk: &[u8]) -> DecodedRecord {
    let (marker, samples) = chunk.split_at(TIME_MARKER_SIZE);
    DecodedRecord {
        time_marker: le_i32([marker[0], marker[1], marker[2], marker[3]]),
        samples: samples
            .chunks_exact(4)
            .map(|b| le_f32([b[0], b[1], b[2], b[3]]))
            .collect(),
    }
}

/// Lazy, single-pass sequence of records following the header.
///
/// The stream ends quietly when the reconciled record count is reached or
/// when the source cannot supply another whole record. A torn trailing
/// record is dropped, never padded. I/O failures are yielded once as an
/// error, after which the stream is exhausted.
pub struct RecordStream<R> {
    cursor: ByteCursor<R>,
    limit: u32,
    emitted: u32,
    chunk: Vec<u8>,
    finished: bool,
}

impl<R: Read> RecordStream<R> {
    /// `cursor` must already sit at the start of the data section.
    pub fn new(cursor: ByteCursor<R>, channel_count: u32, valid_record_count: u32) -> Self {
        Self {
            cursor,
            limit: valid_record_count,
            emitted: 0,
            chunk: vec![0u8; record_size(channel_count)],
            finished: false,
        }
    }

    /// Records produced so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<DecodedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.emitted >= self.limit {
            debug!("Reached reconciled record count {}", self.limit);
            self.finish();
            return None;
        }

        let start = self.cursor.position();
        match self.cursor.read_chunk(&mut self.chunk) {
            Ok(n) if n == self.chunk.len() => {
                self.emitted += 1;
                Some(Ok(decode_record(&self.chunk)))
            }
            Ok(0) => {
                debug!("End of data after {} records", self.emitted);
                self.finish();
                None
            }
            Ok(n) => {
                warn!(
                    "Dropping torn record at byte {}: {} of {} bytes present",
                    start,
                    n,
                    self.chunk.len()
                );
                self.finish();
                None
            }
            Err(e) => {
                self.finish();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some((self.limit - self.emitted) as usize))
        }
    }
}

impl<R: Read> FusedIterator for RecordStream<R> {}
