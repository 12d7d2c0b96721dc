//! Bit-level cursors layered over flat byte buffers.
//!
//! Both cursors deliver bits MSB-first within each underlying byte, which is
//! the order the Huffman block format uses. A reader must know how many items
//! it expects; trailing padding bits written by [`BitWriter::finish`] are
//! indistinguishable from data.

use crate::error::{Error, Result};

/// Reads bits MSB-first from a byte slice.
///
/// Holds the current byte and a remaining-bit counter; the next underlying
/// byte is pulled only once the current one is exhausted.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the next byte to pull
    pos: usize,
    current: u8,
    /// Bits left in `current` (0-8)
    remaining: u8,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`, positioned before the first bit.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            current: 0,
            remaining: 0,
        }
    }

    /// Read a single bit, returning 0 or 1.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.remaining == 0 {
            self.current = *self
                .data
                .get(self.pos)
                .ok_or(Error::Truncated { offset: self.pos })?;
            self.pos += 1;
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok((self.current >> self.remaining) & 1)
    }

    /// Read `count` bits, accumulating the most-significant requested bit
    /// first. Reads spanning multiple underlying bytes are handled.
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        if count > 32 {
            return Err(Error::InvalidBitCount { count });
        }
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Number of unread bits left in the buffer.
    pub fn bits_remaining(&self) -> usize {
        (self.data.len() - self.pos) * 8 + self.remaining as usize
    }
}

/// Writes bits MSB-first into an owned byte buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    /// Bits accumulated in `current` (0-7)
    pending: u8,
}

impl BitWriter {
    /// Create a writer with an empty output buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single bit; only the lowest bit of `bit` is used.
    pub fn write_bit(&mut self, bit: u8) {
        self.current = (self.current << 1) | (bit & 1);
        self.pending += 1;
        if self.pending == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.pending = 0;
        }
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u32) -> Result<()> {
        if count > 32 {
            return Err(Error::InvalidBitCount { count });
        }
        for shift in (0..count).rev() {
            self.write_bit(((value >> shift) & 1) as u8);
        }
        Ok(())
    }

    /// Left-align any pending bits into one final zero-padded byte.
    ///
    /// Emits nothing when the writer sits exactly on a byte boundary.
    pub fn flush(&mut self) {
        if self.pending > 0 {
            self.bytes.push(self.current << (8 - self.pending));
            self.current = 0;
            self.pending = 0;
        }
    }

    /// Flush and return the accumulated bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.bytes
    }

    /// Total number of bits written so far, including the partial byte.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending as usize
    }
}
