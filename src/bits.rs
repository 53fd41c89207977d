// bits.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Bit and byte helpers
use std::io::{self, Write};

/// Maximum length of one data sub-block
pub const SUB_BLOCK_MAX: usize = 0xFF;

/// Get the least power of two which is at least `n`.
///
/// Zero maps to one.
pub fn next_po2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Check whether `n` is a power of two (or zero)
pub fn is_po2(n: usize) -> bool {
    n & n.wrapping_sub(1) == 0
}

/// Get base-2 logarithm of a power of two
pub fn log2(n: usize) -> u8 {
    debug_assert!(n > 0 && is_po2(n));
    n.trailing_zeros() as u8
}

/// Join a sequence of bits, most significant first, into an integer.
///
/// ```
/// assert_eq!(gifweave::bits::join_bits([true, true, false, true]), 13);
/// ```
pub fn join_bits<I: IntoIterator<Item = bool>>(bits: I) -> u32 {
    bits.into_iter().fold(0, |acc, bit| (acc << 1) | u32::from(bit))
}

/// Split a payload into length-prefixed sub-blocks.
///
/// The result ends with a zero-length block terminator.
pub fn sub_blockify(data: &[u8]) -> Vec<u8> {
    let n_blocks = data.len() / SUB_BLOCK_MAX + 1;
    let mut buf = Vec::with_capacity(data.len() + n_blocks + 1);
    for chunk in data.chunks(SUB_BLOCK_MAX) {
        buf.push(chunk.len() as u8); // block size
        buf.extend_from_slice(chunk);
    }
    buf.push(0); // block terminator
    buf
}

/// Writer which splits data into sub-blocks
pub struct SubBlockWriter<W: Write> {
    /// Wrapped writer
    writer: W,
    /// Pending bytes for current sub-block
    buf: Vec<u8>,
}

impl<W: Write> SubBlockWriter<W> {
    /// Create a new sub-block writer
    pub fn new(writer: W) -> Self {
        let buf = Vec::with_capacity(SUB_BLOCK_MAX);
        SubBlockWriter { writer, buf }
    }

    /// Write final partial sub-block and the block terminator
    pub fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        self.writer.write_all(&[0])?;
        Ok(self.writer)
    }
}

impl<W: Write> Write for SubBlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = SUB_BLOCK_MAX - self.buf.len();
        let consumed = remaining.min(buf.len());
        self.buf.extend_from_slice(&buf[..consumed]);
        if self.buf.len() == SUB_BLOCK_MAX {
            self.writer.write_all(&[SUB_BLOCK_MAX as u8])?;
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        let len = self.buf.len();
        if len > 0 {
            self.writer.write_all(&[len as u8])?;
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.writer.flush()
    }
}
