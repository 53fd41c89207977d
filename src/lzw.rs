// lzw.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Lempel-Ziv-Welch compression for GIF
use crate::color::ColorTable;
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::ops::AddAssign;

/// Code Bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }
}

/// Code type
type Code = u16;

/// Minimum code size for palette indices (one byte each)
const MAX_MIN_CODE_SIZE: u8 = 8;

/// Get the LZW minimum code size for a color table
pub fn min_code_size(table: &ColorTable) -> u8 {
    (table.size_field() + 1).clamp(2, Bits::MAX.0)
}

/// Dictionary trie node.
///
/// Nodes with the same prefix form a binary search tree (by index), linked
/// through `left` and `right`; `next` links to the first extension.
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Next node code
    next: Option<Code>,
    /// Left node code
    left: Option<Code>,
    /// Right node code
    right: Option<Code>,
    /// Palette index
    index: u8,
}

impl Node {
    /// Create a new leaf node
    fn new(index: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            index,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

/// Code dictionary, mapping index sequences to codes
#[derive(Debug)]
pub struct CodeTable {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code size
    min_code_size: u8,
}

impl CodeTable {
    /// Create a new code dictionary
    pub fn new(min_code_size: u8) -> Self {
        let mut table = CodeTable {
            table: Vec::with_capacity(usize::from(Bits::MAX.entries()) + 1),
            min_code_size,
        };
        table.reset();
        table
    }

    /// Get the minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// Get the clear code
    pub fn clear_code(&self) -> Code {
        1 << self.min_code_size
    }

    /// Get the end code
    pub fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    pub fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset to the initial single-index entries
    pub fn reset(&mut self) {
        self.table.clear();
        for index in 0..self.clear_code() {
            self.table.push(Node::new(index as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Get a mutable node
    fn node_mut(&mut self, code: Code) -> &mut Node {
        debug_assert!(code < self.next_code());
        &mut self.table[code as usize]
    }

    /// Look up the extension of `code` by one index, adding it if missing.
    ///
    /// Returns the extended code if it was already known, or `None` if a new
    /// entry was assigned.
    pub fn search_insert(&mut self, code: Code, index: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut node = self.node_mut(code);
        let mut ordering = Ordering::Equal;
        while let Some(code) = node.link(ordering) {
            node = self.node_mut(code);
            ordering = index.cmp(&node.index);
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        node.set_link(ordering, next_code);
        self.table.push(Node::new(index));
        None
    }
}

/// Variable-width code packer, least significant bit first
#[derive(Debug, Default)]
pub struct BitStream {
    /// Packed bytes
    buffer: Vec<u8>,
    /// Pending bits
    code: u32,
    /// Number of pending bits
    n_bits: u8,
    /// Total bits appended
    bit_len: usize,
}

impl BitStream {
    /// Create a new bit stream
    pub fn new() -> Self {
        BitStream::default()
    }

    /// Create a new bit stream with byte capacity
    pub fn with_capacity(capacity: usize) -> Self {
        BitStream {
            buffer: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Append a code of `width` bits
    pub fn push(&mut self, code: Code, width: u8) {
        debug_assert!(width <= Bits::MAX.0);
        debug_assert!(u32::from(code) >> width == 0);
        self.code |= u32::from(code) << self.n_bits;
        self.n_bits += width;
        self.bit_len += usize::from(width);
        while self.n_bits >= 8 {
            self.buffer.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Get the number of bits appended (not including padding)
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Flush pending bits, zero-padded, and get the packed bytes
    pub fn finish(mut self) -> Vec<u8> {
        if self.n_bits > 0 {
            self.buffer.push(self.code as u8);
        }
        self.buffer
    }
}

/// LZW Data Compressor
pub struct Compressor {
    /// Code dictionary
    table: CodeTable,
    /// Current code bits
    code_bits: Bits,
}

impl Compressor {
    /// Create a new compressor
    pub fn new(min_code_size: u8) -> Self {
        let min_code_size = min_code_size.clamp(2, MAX_MIN_CODE_SIZE);
        Compressor {
            table: CodeTable::new(min_code_size),
            code_bits: Bits::from(min_code_size + 1),
        }
    }

    /// Get the minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.table.min_code_size()
    }

    /// Get the current code width
    pub fn code_width(&self) -> u8 {
        self.code_bits.into()
    }

    /// Pack a code at the current width
    fn pack(&self, code: Code, stream: &mut BitStream) {
        stream.push(code, self.code_bits.into());
    }

    /// Grow code width or reset after assigning a new code
    fn assigned(&mut self, stream: &mut BitStream) {
        let next_code = self.table.next_code();
        if next_code > self.code_bits.entries() {
            if next_code > Bits::MAX.entries() {
                trace!("dictionary full, resetting");
                self.pack(self.table.clear_code(), stream);
                self.table.reset();
                self.code_bits = Bits::from(self.min_code_size() + 1);
            } else {
                self.code_bits += 1;
            }
        }
    }

    /// Grow code width for the entry a decoder adds on reading the last code
    fn finished(&mut self) {
        if self.table.next_code() == self.code_bits.entries()
            && self.code_bits != Bits::MAX
        {
            self.code_bits += 1;
        }
    }

    /// Compress a slice of palette indices
    pub fn compress(
        &mut self,
        indices: &[u8],
        stream: &mut BitStream,
    ) -> Result<()> {
        let clear_code = self.table.clear_code();
        self.pack(clear_code, stream);
        let mut code: Option<Code> = None;
        for &index in indices {
            if Code::from(index) >= clear_code {
                return Err(Error::IndexOutOfRange(index.into()));
            }
            code = match code {
                None => Some(index.into()),
                Some(c) => match self.table.search_insert(c, index) {
                    Some(ext) => Some(ext),
                    None => {
                        self.pack(c, stream);
                        self.assigned(stream);
                        Some(index.into())
                    }
                },
            };
        }
        if let Some(code) = code {
            self.pack(code, stream);
            self.finished();
        }
        self.pack(self.table.end_code(), stream);
        Ok(())
    }
}

/// Compress palette indices with a fresh dictionary and bit stream
pub fn compress(min_code_size: u8, indices: &[u8]) -> Result<Vec<u8>> {
    let mut stream = BitStream::with_capacity(indices.len() / 2 + 4);
    Compressor::new(min_code_size).compress(indices, &mut stream)?;
    Ok(stream.finish())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Color;

    /// Minimal GIF LZW decoder, returning indices and number of clear codes
    fn decompress(min_code_size: u8, data: &[u8]) -> (Vec<u8>, usize) {
        let clear = 1usize << min_code_size;
        let init = |dict: &mut Vec<Vec<u8>>| {
            dict.clear();
            dict.extend((0..clear).map(|i| vec![i as u8]));
            dict.push(vec![]); // clear
            dict.push(vec![]); // end
        };
        let mut dict = vec![];
        init(&mut dict);
        let mut width = min_code_size + 1;
        let mut acc = 0u32;
        let mut n_bits = 0;
        let mut bytes = data.iter();
        let mut prev: Option<Vec<u8>> = None;
        let mut out = vec![];
        let mut clears = 0;
        loop {
            while n_bits < width {
                acc |= u32::from(*bytes.next().unwrap()) << n_bits;
                n_bits += 8;
            }
            let code = (acc & ((1 << width) - 1)) as usize;
            acc >>= width;
            n_bits -= width;
            if code == clear {
                init(&mut dict);
                width = min_code_size + 1;
                prev = None;
                clears += 1;
                continue;
            }
            if code == clear + 1 {
                break;
            }
            let entry = if code < dict.len() {
                dict[code].clone()
            } else {
                let mut p = prev.clone().unwrap();
                p.push(p[0]);
                p
            };
            if let Some(mut p) = prev.take() {
                if dict.len() < 4096 {
                    p.push(entry[0]);
                    dict.push(p);
                }
            }
            out.extend_from_slice(&entry);
            prev = Some(entry);
            if dict.len() == 1 << width && width < 12 {
                width += 1;
            }
        }
        assert!(bytes.next().is_none(), "trailing data");
        (out, clears)
    }

    /// Pseudo-random indices
    fn noise(len: usize, modulus: u32) -> Vec<u8> {
        let mut x = 0x1234_5678u32;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((x >> 16) % modulus) as u8
            })
            .collect()
    }

    #[test]
    fn single_index() {
        let data = compress(2, &[0]).unwrap();
        // clear (4), 0, end (5) at 3 bits each
        assert_eq!(data, vec![0x44, 0x01]);
        assert_eq!(decompress(2, &data), (vec![0], 1));
    }

    #[test]
    fn empty() {
        let data = compress(2, &[]).unwrap();
        assert_eq!(decompress(2, &data), (vec![], 1));
    }

    #[test]
    fn width_growth() {
        // codes: clear, 1, 0, 0 (3 bits), 1, end (4 bits)
        let data = compress(2, &[1, 0, 0, 1]).unwrap();
        assert_eq!(data, vec![0x0C, 0x10, 0x05]);
    }

    #[test]
    fn end_code_width() {
        // after ten codes of a uniform run, next code is 16
        for n in 56..=66 {
            let mut stream = BitStream::new();
            let mut comp = Compressor::new(2);
            comp.compress(&vec![0; n], &mut stream).unwrap();
            assert_eq!(comp.code_width(), 5);
            // clear and 3 codes at 3 bits, 7 codes and last at 4, end at 5
            assert_eq!(stream.bit_len(), 3 * 4 + 4 * 8 + 5);
        }
        for n in 1..=100 {
            let indices = vec![0; n];
            let data = compress(2, &indices).unwrap();
            assert_eq!(decompress(2, &data), (indices, 1));
        }
    }

    #[test]
    fn width_boundaries() {
        for min_code_size in 2..=8 {
            let indices = noise(1200, 1 << min_code_size);
            for len in 0..=indices.len() {
                let data = compress(min_code_size, &indices[..len]).unwrap();
                let (out, _) = decompress(min_code_size, &data);
                assert_eq!(&out[..], &indices[..len], "len {}", len);
            }
        }
    }

    #[test]
    fn uniform_run() {
        let indices = vec![3; 5000];
        let data = compress(2, &indices).unwrap();
        let (out, _) = decompress(2, &data);
        assert_eq!(out, indices);
    }

    #[test]
    fn dictionary_reset() {
        let indices = noise(200_000, 4);
        let mut stream = BitStream::new();
        let mut comp = Compressor::new(2);
        comp.compress(&indices, &mut stream).unwrap();
        assert!(comp.code_width() <= 12);
        let data = stream.finish();
        let (out, clears) = decompress(2, &data);
        assert_eq!(out, indices);
        assert!(clears > 1, "clears: {}", clears);
    }

    #[test]
    fn full_palette() {
        let tbl = ColorTable::with_colors(
            (0..=255).map(|i| Color::new(i, 255 - i, i / 2)),
        )
        .unwrap();
        assert_eq!(tbl.declared_len(), 256);
        let min = min_code_size(&tbl);
        assert_eq!(min, 8);
        let mut indices: Vec<u8> = (0..=255).collect();
        indices.extend(noise(20_000, 256));
        let data = compress(min, &indices).unwrap();
        let (out, clears) = decompress(min, &data);
        assert_eq!(out, indices);
        assert!(clears > 1);
    }

    #[test]
    fn min_code_sizes() {
        let tbl = ColorTable::new();
        assert_eq!(min_code_size(&tbl), 2);
        let tbl = ColorTable::with_colors(
            (0..5).map(|i| Color::new(i, i, i)),
        )
        .unwrap();
        assert_eq!(min_code_size(&tbl), 3);
        let tbl = ColorTable::with_colors(
            (0..17).map(|i| Color::new(i, i, i)),
        )
        .unwrap();
        assert_eq!(min_code_size(&tbl), 5);
    }

    #[test]
    fn index_out_of_range() {
        assert!(matches!(
            compress(2, &[0, 1, 4]),
            Err(Error::IndexOutOfRange(4))
        ));
    }

    #[test]
    fn bit_stream_padding() {
        let mut stream = BitStream::new();
        let mut total = 0;
        for width in 2..=12u8 {
            stream.push((1 << width) - 1, width);
            total += usize::from(width);
        }
        assert_eq!(stream.bit_len(), total);
        assert_eq!(total % 8, 5);
        let bytes = stream.finish();
        assert_eq!(bytes.len(), (total + 7) / 8);
        // all ones, then three zero padding bits
        assert!(bytes[..bytes.len() - 1].iter().all(|b| *b == 0xFF));
        assert_eq!(bytes[bytes.len() - 1], 0b0001_1111);
    }

    #[test]
    fn bit_stream_lsb_first() {
        let mut stream = BitStream::new();
        stream.push(0b101, 3);
        stream.push(0b1, 2);
        stream.push(0b1111_0000_1, 9);
        assert_eq!(stream.bit_len(), 14);
        assert_eq!(stream.finish(), vec![0b0010_1101, 0b0011_1100]);
    }
}
