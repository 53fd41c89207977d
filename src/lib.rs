// lib.rs      gifweave crate.
//
// Copyright (c) 2026  The gifweave Developers
//
//! An encoder for animated GIF images.
//!
//! Frames are added to a [Container] as grids of RGB [Color]s.  Each frame
//! maps its colors through a [ColorTable] (the container's global table, or
//! one of its own) and the resulting palette indices are LZW-compressed when
//! the container is encoded.
//!
//! ## Example
//! ```
//! use gifweave::{Color, ColorGrid, Container};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let black = Color::new(0, 0, 0);
//! let white = Color::new(255, 255, 255);
//! let mut gif = Container::new();
//! for step in 0..4u16 {
//!     let mut grid = ColorGrid::with_color(4, 4, black);
//!     grid.set_pixel(step, step, white);
//!     let i = gif.add_frame(grid)?;
//!     gif.frame_mut(i).set_delay_time_cs(25);
//! }
//! let mut out = Vec::new();
//! gif.encode(&mut out)?;
//! assert_eq!(out.last(), Some(&0x3B));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod bits;
pub mod block;
mod color;
mod container;
mod encode;
mod error;
pub mod field;
mod frame;
pub mod lzw;

pub use crate::color::{Color, ColorTable};
pub use crate::container::Container;
pub use crate::encode::BlockEnc;
pub use crate::error::{Error, Result};
pub use crate::field::DisposalMethod;
pub use crate::frame::{ColorGrid, Frame, TableRef};
