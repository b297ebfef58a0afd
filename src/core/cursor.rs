// Forward-only positioned reader over a PLW byte source

use crate::core::error::{PlwError, Result};
use std::io::{self, Read};
use tracing::warn;

/// Value produced by [`ByteCursor::skip_or_read_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Width 0: the cursor only moved.
    Unit,
    U16(u16),
    U32(u32),
}

impl FieldValue {
    pub fn as_u32(self) -> u32 {
        match self {
            FieldValue::Unit => 0,
            FieldValue::U16(v) => v as u32,
            FieldValue::U32(v) => v,
        }
    }
}

pub fn le_u16(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

pub fn le_u32(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

pub fn le_i32(bytes: [u8; 4]) -> i32 {
    i32::from_le_bytes(bytes)
}

/// IEEE-754 single precision from the same little-endian byte assembly as [`le_u32`].
pub fn le_f32(bytes: [u8; 4]) -> f32 {
    f32::from_bits(le_u32(bytes))
}

/// Reads a byte source strictly front to back.
///
/// The cursor tracks how many bytes have been consumed. Any failed read
/// leaves it unusable: later calls return [`PlwError::CursorUnusable`].
pub struct ByteCursor<R> {
    inner: R,
    position: u64,
    broken: bool,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            broken: false,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn is_usable(&self) -> bool {
        !self.broken
    }

    /// Skips forward to `target` and decodes `width` bytes there.
    ///
    /// Width 0 only repositions, 2 yields a `u16` and 4 a `u32`, both
    /// little-endian.
    pub fn skip_or_read_to(&mut self, target: u64, width: usize) -> Result<FieldValue> {
        self.check_usable()?;

        if target < self.position {
            return Err(PlwError::BackwardSeek {
                position: self.position,
                target,
            });
        }
        if !matches!(width, 0 | 2 | 4) {
            return Err(PlwError::UnsupportedWidth(width));
        }

        self.skip(target - self.position)?;

        match width {
            2 => {
                let mut buf = [0u8; 2];
                self.read_exact(&mut buf)?;
                Ok(FieldValue::U16(le_u16(buf)))
            }
            4 => {
                let mut buf = [0u8; 4];
                self.read_exact(&mut buf)?;
                Ok(FieldValue::U32(le_u32(buf)))
            }
            _ => Ok(FieldValue::Unit),
        }
    }

    pub fn read_u16_at(&mut self, target: u64) -> Result<u16> {
        // Width 2 always yields U16
        Ok(self.skip_or_read_to(target, 2)?.as_u32() as u16)
    }

    pub fn read_u32_at(&mut self, target: u64) -> Result<u32> {
        Ok(self.skip_or_read_to(target, 4)?.as_u32())
    }

    pub fn advance_to(&mut self, target: u64) -> Result<()> {
        self.skip_or_read_to(target, 0).map(|_| ())
    }

    /// Fills `buf` with as many bytes as the source still holds.
    ///
    /// Returns the number of bytes read; fewer than `buf.len()` means the
    /// source ran dry. End of data is not an error here.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_usable()?;
        match self.fill(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.broken = true;
                Err(PlwError::Io(e))
            }
        }
    }

    fn check_usable(&self) -> Result<()> {
        if self.broken {
            Err(PlwError::CursorUnusable(self.position))
        } else {
            Ok(())
        }
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let copied = io::copy(&mut (&mut self.inner).take(count), &mut io::sink());
        match copied {
            Ok(n) => {
                self.position += n;
                if n < count {
                    return Err(self.truncated(count - n));
                }
                Ok(())
            }
            Err(e) => {
                warn!("skip failed at byte {}: {}", self.position, e);
                Err(self.truncated(count))
            }
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.fill(buf) {
            Ok(n) if n == buf.len() => Ok(()),
            Ok(n) => Err(self.truncated((buf.len() - n) as u64)),
            Err(e) => {
                warn!("read failed at byte {}: {}", self.position, e);
                Err(self.truncated(buf.len() as u64))
            }
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn truncated(&mut self, wanted: u64) -> PlwError {
        self.broken = true;
        PlwError::TruncatedRead {
            position: self.position,
            wanted,
        }
    }
}
