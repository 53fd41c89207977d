// field.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Packed bit fields
use crate::error::{Error, Result};

/// Builder which packs sub-fields into one byte, most significant first
#[derive(Debug, Default)]
pub struct Packer {
    /// Packed bits so far
    value: u8,
    /// Number of bits packed
    n_bits: u8,
}

impl Packer {
    /// Create a new empty packer
    pub fn new() -> Self {
        Packer::default()
    }

    /// Append a numeric sub-field of `width` bits
    pub fn bits(mut self, value: u8, width: u8) -> Result<Self> {
        let n_bits = self.n_bits + width;
        if n_bits > 8 {
            return Err(Error::FieldWidth(n_bits));
        }
        if width < 8 && value >> width != 0 {
            return Err(Error::FieldOverflow { value, width });
        }
        // shifting by 8 would overflow on an empty packer
        self.value = ((u16::from(self.value) << width) as u8) | value;
        self.n_bits = n_bits;
        Ok(self)
    }

    /// Append a one-bit boolean sub-field
    pub fn flag(self, flag: bool) -> Result<Self> {
        self.bits(u8::from(flag), 1)
    }

    /// Append reserved (zero) bits
    pub fn reserved(self, width: u8) -> Result<Self> {
        self.bits(0, width)
    }

    /// Get the packed byte
    pub fn finish(self) -> Result<u8> {
        if self.n_bits == 8 {
            Ok(self.value)
        } else {
            Err(Error::FieldWidth(self.n_bits))
        }
    }
}

/// Disposal method for a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    Unspecified,
    /// Leave the frame in place
    Keep,
    /// Restore frame area to background color
    RestoreBackground,
    /// Restore frame area to previous contents
    RestorePrevious,
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            Unspecified => 0,
            Keep => 1,
            RestoreBackground => 2,
            RestorePrevious => 3,
        }
    }
}

/// Color field of the logical screen descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableColorField {
    /// Global color table present
    pub has_table: bool,
    /// Bits per primary color, minus one
    pub color_resolution: u8,
    /// Table sorted by importance
    pub sorted: bool,
    /// Table size field
    pub size: u8,
}

impl TableColorField {
    /// Pack into one byte
    pub fn pack(&self) -> Result<u8> {
        Packer::new()
            .flag(self.has_table)?
            .bits(self.color_resolution, 3)?
            .flag(self.sorted)?
            .bits(self.size, 3)?
            .finish()
    }
}

/// Color field of an image descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageColorField {
    /// Local color table present
    pub has_table: bool,
    /// Rows are interlaced
    pub interlaced: bool,
    /// Table sorted by importance
    pub sorted: bool,
    /// Table size field
    pub size: u8,
}

impl ImageColorField {
    /// Pack into one byte
    pub fn pack(&self) -> Result<u8> {
        Packer::new()
            .flag(self.has_table)?
            .flag(self.interlaced)?
            .flag(self.sorted)?
            .reserved(2)?
            .bits(self.size, 3)?
            .finish()
    }
}

/// Packed field of a graphic control extension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicControlField {
    /// Frame disposal method
    pub disposal_method: DisposalMethod,
    /// Wait for user input before continuing
    pub user_input: bool,
    /// Transparent color index is valid
    pub has_transparency: bool,
}

impl GraphicControlField {
    /// Pack into one byte
    pub fn pack(&self) -> Result<u8> {
        Packer::new()
            .reserved(3)?
            .bits(self.disposal_method.into(), 3)?
            .flag(self.user_input)?
            .flag(self.has_transparency)?
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_color_field() {
        let f = TableColorField {
            has_table: true,
            color_resolution: 3,
            sorted: false,
            size: 5,
        };
        assert_eq!(f.pack().unwrap(), 0b1_011_0_101);
        assert_eq!(f.pack().unwrap(), 0xB5);
        assert_eq!(TableColorField::default().pack().unwrap(), 0);
    }

    #[test]
    fn image_color_field() {
        let f = ImageColorField {
            has_table: true,
            interlaced: false,
            sorted: true,
            size: 7,
        };
        assert_eq!(f.pack().unwrap(), 0b1_0_1_00_111);
        let f = ImageColorField::default();
        assert_eq!(f.pack().unwrap(), 0);
    }

    #[test]
    fn graphic_control_field() {
        let f = GraphicControlField {
            disposal_method: DisposalMethod::RestoreBackground,
            user_input: false,
            has_transparency: true,
        };
        assert_eq!(f.pack().unwrap(), 0b000_010_0_1);
        let f = GraphicControlField {
            disposal_method: DisposalMethod::RestorePrevious,
            user_input: true,
            has_transparency: false,
        };
        assert_eq!(f.pack().unwrap(), 0b000_011_1_0);
    }

    #[test]
    fn overflow() {
        let f = TableColorField {
            has_table: true,
            color_resolution: 8,
            sorted: false,
            size: 0,
        };
        match f.pack() {
            Err(Error::FieldOverflow { value: 8, width: 3 }) => (),
            r => panic!("unexpected {:?}", r),
        }
    }

    #[test]
    fn widths() {
        assert!(matches!(
            Packer::new().bits(1, 3).unwrap().finish(),
            Err(Error::FieldWidth(3))
        ));
        assert!(matches!(
            Packer::new().bits(0, 5).unwrap().bits(0, 4),
            Err(Error::FieldWidth(9))
        ));
        assert_eq!(Packer::new().bits(0xA5, 8).unwrap().finish().unwrap(), 0xA5);
    }
}
