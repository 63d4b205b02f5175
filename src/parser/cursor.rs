use super::error::UndumpError;
use nom::{
    IResult,
    bytes::complete::take,
    number::complete::{le_u32, le_u64, u8},
};

/// Length prefix announcing that a 64-bit length follows
pub const LONG_STRING_MARKER: u8 = 0xFF;

/// Upper bound, in bytes, on what a table reserves before its records are read
pub const MAX_INITIAL_CAPACITY_BYTES: usize = 65536;

/// Elements to reserve for a table declaring `len` records, bounded both by
/// the bytes left to read and by `MAX_INITIAL_CAPACITY_BYTES`.
pub fn initial_capacity<T>(len: usize, remaining: usize) -> usize {
    len.min(remaining)
        .min(MAX_INITIAL_CAPACITY_BYTES / std::mem::size_of::<T>().max(1))
}

/// Forward-only reader over an immutable chunk buffer
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Number of bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Runs a complete-input nom parser at the current position and
    /// advances past whatever it consumed.
    fn run<T, F>(&mut self, needed: usize, mut parser: F) -> Result<T, UndumpError>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        match parser(self.input) {
            Ok((rest, value)) => {
                self.offset += self.input.len() - rest.len();
                self.input = rest;
                Ok(value)
            }
            Err(_) => Err(UndumpError::TruncatedInput {
                offset: self.offset,
                needed,
                remaining: self.input.len(),
            }),
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, UndumpError> {
        self.run(1, |i| u8(i))
    }

    pub fn read_u32(&mut self) -> Result<u32, UndumpError> {
        self.run(4, |i| le_u32(i))
    }

    pub fn read_u64(&mut self) -> Result<u64, UndumpError> {
        self.run(8, |i| le_u64(i))
    }

    /// Two's-complement view of the next 8 bytes
    pub fn read_i64(&mut self) -> Result<i64, UndumpError> {
        self.read_u64().map(|v| v as i64)
    }

    /// IEEE-754 view of the next 8 bytes, bit for bit
    pub fn read_f64(&mut self) -> Result<f64, UndumpError> {
        self.read_u64().map(f64::from_bits)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], UndumpError> {
        self.run(n, |i| take(n)(i))
    }

    /// Reads a length-prefixed string.
    ///
    /// The prefix byte holds `len + 1`, or `0` for the empty string. A prefix
    /// of `0xFF` means the real `len + 1` follows as a little-endian `u64`.
    pub fn read_string(&mut self) -> Result<Vec<u8>, UndumpError> {
        let size = match self.read_byte()? {
            0 => return Ok(Vec::new()),
            LONG_STRING_MARKER => self.read_u64()?,
            n => u64::from(n),
        };
        let Some(len) = size.checked_sub(1) else {
            return Ok(Vec::new());
        };
        let len = usize::try_from(len).map_err(|_| UndumpError::TruncatedInput {
            offset: self.offset,
            needed: usize::MAX,
            remaining: self.input.len(),
        })?;

        Ok(self.read_bytes(len)?.to_vec())
    }

    /// Reads a `u32` element count followed by exactly that many records.
    pub fn read_table<T, F>(&mut self, mut read: F) -> Result<Vec<T>, UndumpError>
    where
        F: FnMut(&mut Self) -> Result<T, UndumpError>,
    {
        let len = self.read_u32()? as usize;
        let mut items = Vec::with_capacity(initial_capacity::<T>(len, self.remaining()));
        for _ in 0..len {
            items.push(read(self)?);
        }
        Ok(items)
    }
}
