// color.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Colors and color tables
use crate::bits::{log2, next_po2};
use crate::error::{Error, Result};
use pix::rgb::{Rgb, SRgb8};
use std::collections::HashMap;
use std::iter::repeat;

/// Number of bytes per color
const CHANNELS: usize = 3;

/// Maximum number of entries in a color table
pub const MAX_TABLE_LEN: usize = 256;

/// 24-bit RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Black, used for table padding
    pub const BLACK: Self = Color::new(0, 0, 0);

    /// Create a new color
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    /// Get the color as RGB bytes
    pub fn rgb(self) -> [u8; CHANNELS] {
        [self.red, self.green, self.blue]
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Color::new(red, green, blue)
    }
}

impl From<SRgb8> for Color {
    fn from(p: SRgb8) -> Self {
        Color::new(Rgb::red(p).into(), Rgb::green(p).into(), Rgb::blue(p).into())
    }
}

/// Insertion-ordered color table (palette).
///
/// Each inserted color gets the next sequential index.  The declared length
/// is always a power of two between 2 and 256; entries past the inserted
/// colors are padded with black.
#[derive(Clone, Debug, Default)]
pub struct ColorTable {
    /// Colors in insertion order
    colors: Vec<Color>,
    /// Index lookup
    indices: HashMap<Color, u8>,
    /// Keep one free slot for a transparent index
    transparent: bool,
}

impl ColorTable {
    /// Create a new empty color table
    pub fn new() -> Self {
        ColorTable::default()
    }

    /// Create a color table from distinct colors
    pub fn with_colors<C, I>(colors: I) -> Result<Self>
    where
        C: Into<Color>,
        I: IntoIterator<Item = C>,
    {
        let mut tbl = ColorTable::new();
        for clr in colors {
            tbl.insert(clr.into())?;
        }
        Ok(tbl)
    }

    /// Maximum number of explicit colors
    fn capacity(&self) -> usize {
        if self.transparent {
            MAX_TABLE_LEN - 1
        } else {
            MAX_TABLE_LEN
        }
    }

    /// Check if no more colors can be inserted
    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.capacity()
    }

    /// Insert a color, returning its index
    pub fn insert(&mut self, clr: Color) -> Result<u8> {
        if self.indices.contains_key(&clr) {
            return Err(Error::DuplicateColor(clr));
        }
        if self.is_full() {
            return Err(Error::TableFull);
        }
        let idx = self.colors.len() as u8;
        self.colors.push(clr);
        self.indices.insert(clr, idx);
        Ok(idx)
    }

    /// Insert every color which is not yet in the table
    pub fn extend_missing<I>(&mut self, colors: I) -> Result<()>
    where
        I: IntoIterator<Item = Color>,
    {
        for clr in colors {
            if !self.contains(clr) {
                self.insert(clr)?;
            }
        }
        Ok(())
    }

    /// Check if a color has been inserted
    pub fn contains(&self, clr: Color) -> bool {
        self.indices.contains_key(&clr)
    }

    /// Get the index of a color
    pub fn index_of(&self, clr: Color) -> Result<u8> {
        self.indices
            .get(&clr)
            .copied()
            .ok_or(Error::ColorNotFound(clr))
    }

    /// Get the color at an index (black for padding entries)
    pub fn color_at(&self, idx: usize) -> Result<Color> {
        match self.colors.get(idx) {
            Some(clr) => Ok(*clr),
            None if idx < self.declared_len() => Ok(Color::BLACK),
            None => Err(Error::IndexOutOfRange(idx)),
        }
    }

    /// Reserve a slot for the transparent index
    pub fn reserve_transparent(&mut self) -> Result<()> {
        if !self.transparent && self.colors.len() >= MAX_TABLE_LEN {
            return Err(Error::TableFull);
        }
        self.transparent = true;
        Ok(())
    }

    /// Check if a transparent slot is reserved
    pub fn has_transparent(&self) -> bool {
        self.transparent
    }

    /// Get the transparent index, reserving its slot first
    pub fn transparent_index(&mut self) -> Result<u8> {
        self.reserve_transparent()?;
        Ok((self.declared_len() - 1) as u8)
    }

    /// Get the number of inserted colors
    pub fn underlying_len(&self) -> usize {
        self.colors.len()
    }

    /// Get the declared (power-of-two) length
    pub fn declared_len(&self) -> usize {
        let n = self.colors.len() + usize::from(self.transparent);
        next_po2(n).max(2)
    }

    /// Get the 3-bit size field: `declared_len == 2 << size_field`
    pub fn size_field(&self) -> u8 {
        log2(self.declared_len()) - 1
    }

    /// Get the serialized length in bytes
    pub fn byte_len(&self) -> usize {
        self.declared_len() * CHANNELS
    }

    /// Iterate over colors, including black padding
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        let padding = self.declared_len() - self.colors.len();
        self.colors
            .iter()
            .copied()
            .chain(repeat(Color::BLACK).take(padding))
    }

    /// Serialize as RGB triples
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_len());
        for clr in self.iter() {
            buf.extend_from_slice(&clr.rgb());
        }
        buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn color(i: usize) -> Color {
        Color::new(i as u8, (i >> 8) as u8 + 1, 0x80)
    }

    #[test]
    fn conversions() {
        let c = Color::new(1, 2, 3);
        assert_eq!(Color::from([1, 2, 3]), c);
        assert_eq!(Color::from((1, 2, 3)), c);
        assert_eq!(Color::from(SRgb8::new(1, 2, 3)), c);
        assert_eq!(c.rgb(), [1, 2, 3]);
    }

    fn table(n: usize) -> ColorTable {
        ColorTable::with_colors((0..n).map(color)).unwrap()
    }

    #[test]
    fn declared_len() {
        for n in 0..=MAX_TABLE_LEN {
            let tbl = table(n);
            let len = tbl.declared_len();
            assert_eq!(len, n.max(2).next_power_of_two(), "n = {}", n);
            assert!(len.is_power_of_two());
            assert!(tbl.underlying_len() <= len);
            assert_eq!(len, 2 << tbl.size_field());
            assert!(tbl.size_field() <= 7);
        }
    }

    #[test]
    fn declared_len_transparent() {
        for n in 0..MAX_TABLE_LEN {
            let mut tbl = table(n);
            tbl.reserve_transparent().unwrap();
            let len = tbl.declared_len();
            assert!(len > n, "n = {}", n);
            assert!(len.is_power_of_two() && (2..=256).contains(&len));
            if n > 1 && n.is_power_of_two() {
                assert_eq!(len, n * 2);
            }
            assert_eq!(len, 2 << tbl.size_field());
            let idx = tbl.transparent_index().unwrap() as usize;
            assert_eq!(idx, len - 1);
            assert_eq!(tbl.color_at(idx).unwrap(), Color::BLACK);
        }
    }

    #[test]
    fn transparent_full() {
        let mut tbl = table(MAX_TABLE_LEN);
        assert!(tbl.is_full());
        assert!(matches!(tbl.reserve_transparent(), Err(Error::TableFull)));
        let mut tbl = table(255);
        tbl.reserve_transparent().unwrap();
        assert_eq!(tbl.declared_len(), 256);
        assert!(matches!(tbl.insert(color(999)), Err(Error::TableFull)));
    }

    #[test]
    fn iteration_order() {
        for n in [0, 1, 3, 5, 8, 100] {
            let tbl = table(n);
            let colors: Vec<Color> = tbl.iter().collect();
            assert_eq!(colors.len(), tbl.declared_len());
            for (i, clr) in colors.iter().enumerate() {
                if i < n {
                    assert_eq!(*clr, color(i));
                } else {
                    assert_eq!(*clr, Color::BLACK);
                }
            }
        }
    }

    #[test]
    fn insert_lookup() {
        let mut tbl = ColorTable::new();
        assert_eq!(tbl.declared_len(), 2);
        assert_eq!(tbl.insert(Color::new(1, 2, 3)).unwrap(), 0);
        assert_eq!(tbl.insert(Color::new(4, 5, 6)).unwrap(), 1);
        assert_eq!(tbl.insert(Color::new(7, 8, 9)).unwrap(), 2);
        assert!(matches!(
            tbl.insert(Color::new(4, 5, 6)),
            Err(Error::DuplicateColor(_))
        ));
        assert_eq!(tbl.index_of(Color::new(7, 8, 9)).unwrap(), 2);
        assert!(matches!(
            tbl.index_of(Color::new(0, 0, 1)),
            Err(Error::ColorNotFound(_))
        ));
        assert_eq!(tbl.color_at(1).unwrap(), Color::new(4, 5, 6));
        assert_eq!(tbl.color_at(3).unwrap(), Color::BLACK);
        assert!(matches!(tbl.color_at(4), Err(Error::IndexOutOfRange(4))));
    }

    #[test]
    fn extend_missing() {
        let mut tbl = table(2);
        tbl.extend_missing([color(1), color(5), color(0), color(5)])
            .unwrap();
        assert_eq!(tbl.underlying_len(), 3);
        assert_eq!(tbl.index_of(color(5)).unwrap(), 2);
    }

    #[test]
    fn bytes() {
        let tbl = ColorTable::with_colors([[255, 0, 0], [0, 255, 0], [0, 0, 255]])
            .unwrap();
        assert_eq!(tbl.byte_len(), 12);
        assert_eq!(
            tbl.to_bytes(),
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0]
        );
    }
}
