// error.rs
//
// Copyright (c) 2026  The gifweave Developers
//
use crate::color::Color;
use std::fmt;
use std::io;

/// Errors encountered while building or encoding a GIF
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// GIF version not supported (89a only).
    UnsupportedVersion([u8; 3]),
    /// A required descriptor field was never set.
    MissingField(&'static str),
    /// Packed sub-field value does not fit in its declared width.
    FieldOverflow {
        /// Value of the sub-field
        value: u8,
        /// Declared bit width
        width: u8,
    },
    /// Packed sub-field widths do not add up to one byte.
    FieldWidth(u8),
    /// Color already exists in a [ColorTable](struct.ColorTable.html).
    DuplicateColor(Color),
    /// Color was never inserted into the effective color table.
    ColorNotFound(Color),
    /// Palette index beyond the declared table length.
    IndexOutOfRange(usize),
    /// Color table cannot hold another entry.
    TableFull,
    /// Canvas or frame larger than 65535 pixels in either dimension.
    TooLargeImage,
    /// Frames cannot be compared or placed as requested.
    InvalidFrameDimensions,
    /// Pixel buffer does not match its stated dimensions.
    MalformedImage,
}

/// Gifweave result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
