// container.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Animated GIF container
use crate::block::{
    Application, Block, Comment, GlobalColorTable, Header, LogicalScreenDesc,
    Preamble, Trailer, Version,
};
use crate::color::ColorTable;
use crate::encode::BlockEnc;
use crate::error::{Error, Result};
use crate::field::{DisposalMethod, TableColorField};
use crate::frame::{ColorGrid, Frame, TableRef};
use std::io::{BufWriter, Write};

/// Animated GIF, built frame by frame
///
/// ## Example
/// ```
/// use gifweave::{Color, ColorGrid, Container};
///
/// # fn main() -> Result<(), gifweave::Error> {
/// let red = Color::new(255, 0, 0);
/// let blue = Color::new(0, 0, 255);
/// let mut gif = Container::new();
/// let first = gif.add_frame(ColorGrid::with_rows(&[[red, blue], [blue, red]])?)?;
/// gif.frame_mut(first).set_delay_time_cs(50);
/// gif.add_frame(ColorGrid::with_rows(&[[blue, red], [red, blue]])?)?;
/// let bytes = gif.to_bytes()?;
/// assert_eq!(&bytes[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Container {
    /// Format version
    version: Version,
    /// Minimum canvas size
    screen_size: Option<(u16, u16)>,
    /// Color resolution field
    color_resolution: Option<u8>,
    /// Background color index
    background_color_idx: Option<u8>,
    /// Pixel aspect ratio
    pixel_aspect_ratio: Option<u8>,
    /// Global color table
    global_table: ColorTable,
    /// Loop count (zero: forever)
    loop_count: Option<u16>,
    /// Comments
    comments: Vec<Vec<u8>>,
    /// Frames, in display order
    frames: Vec<Frame>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create a new container with default canvas settings
    pub fn new() -> Self {
        Container {
            color_resolution: Some(7),
            background_color_idx: Some(0),
            pixel_aspect_ratio: Some(0),
            ..Self::empty()
        }
    }

    /// Create a new container with canvas settings unset
    pub fn empty() -> Self {
        Container {
            version: Version::V89a,
            screen_size: None,
            color_resolution: None,
            background_color_idx: None,
            pixel_aspect_ratio: None,
            global_table: ColorTable::new(),
            loop_count: Some(0),
            comments: vec![],
            frames: vec![],
        }
    }

    /// Create a new container with a version tag
    pub fn with_version(tag: &[u8]) -> Result<Self> {
        let version = Version::try_from(tag)?;
        Ok(Container {
            version,
            ..Self::new()
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Set the minimum canvas size
    pub fn set_screen_size(&mut self, width: u16, height: u16) {
        self.screen_size = Some((width, height));
    }

    /// Set the color resolution field (bits per primary, minus one)
    pub fn set_color_resolution(&mut self, color_resolution: u8) {
        self.color_resolution = Some(color_resolution);
    }

    pub fn set_background_color_idx(&mut self, background_color_idx: u8) {
        self.background_color_idx = Some(background_color_idx);
    }

    pub fn set_pixel_aspect_ratio(&mut self, pixel_aspect_ratio: u8) {
        self.pixel_aspect_ratio = Some(pixel_aspect_ratio);
    }

    /// Set the loop count; `None` plays once with no loop extension
    pub fn set_loop_count(&mut self, loop_count: Option<u16>) {
        self.loop_count = loop_count;
    }

    pub fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    /// Add a comment extension
    pub fn add_comment(&mut self, comment: &str) {
        self.comments.push(comment.as_bytes().to_vec());
    }

    pub fn global_table(&self) -> &ColorTable {
        &self.global_table
    }

    /// Get the global table, to insert colors before adding frames
    pub fn global_table_mut(&mut self) -> &mut ColorTable {
        &mut self.global_table
    }

    /// Get all frames
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get one frame, to set its timing or position
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not the index of an added frame.
    pub fn frame_mut(&mut self, idx: usize) -> &mut Frame {
        &mut self.frames[idx]
    }

    /// Add a frame which uses the global color table.
    ///
    /// Colors missing from the global table are inserted first.  Returns
    /// the frame's index.
    pub fn add_frame(&mut self, grid: ColorGrid) -> Result<usize> {
        self.global_table.extend_missing(grid.distinct_colors())?;
        let frame = Frame::new(grid, TableRef::Global, &self.global_table)?;
        Ok(self.push_frame(frame))
    }

    /// Add a frame with its own local color table
    pub fn add_frame_local(&mut self, grid: ColorGrid) -> Result<usize> {
        let table = ColorTable::with_colors(grid.distinct_colors())?;
        let frame = Frame::new(grid, TableRef::Local(table), &self.global_table)?;
        Ok(self.push_frame(frame))
    }

    /// Push a frame
    fn push_frame(&mut self, frame: Frame) -> usize {
        debug!(
            "frame {}: {}x{}, {}",
            self.frames.len(),
            frame.width(),
            frame.height(),
            match frame.table() {
                TableRef::Global => "global table",
                TableRef::Local(_) => "local table",
            }
        );
        self.frames.push(frame);
        self.frames.len() - 1
    }

    /// Replace pixels unchanged since the previous frame with transparency.
    ///
    /// Frames which cannot be compared with their predecessor, or whose
    /// color table has no room for a transparent index, are left as-is.
    /// Returns the total number of transparent pixels.
    pub fn diff_frames(&mut self) -> Result<usize> {
        let mut total = 0;
        for i in (1..self.frames.len()).rev() {
            let (head, tail) = self.frames.split_at_mut(i);
            let prev = &head[i - 1];
            let frame = &mut tail[0];
            let comparable = match prev.disposal_method() {
                DisposalMethod::Unspecified | DisposalMethod::Keep => {
                    matches!(
                        (prev.table(), frame.table()),
                        (TableRef::Global, TableRef::Global)
                            | (TableRef::Local(_), TableRef::Local(_))
                    )
                }
                _ => false,
            };
            if !comparable {
                warn!("frame {}: not comparable with previous frame", i);
                continue;
            }
            match frame.diff(prev, &mut self.global_table) {
                Ok(n) => total += n,
                Err(Error::InvalidFrameDimensions) => {
                    warn!("frame {}: area differs from previous frame", i);
                }
                Err(Error::TableFull) => {
                    warn!("frame {}: no room for transparent color", i);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(total)
    }

    /// Get the canvas size: largest frame extent
    pub fn screen_size(&self) -> Result<(u16, u16)> {
        let (mut width, mut height) = match self.screen_size {
            Some((w, h)) => (u32::from(w), u32::from(h)),
            None if self.frames.is_empty() => {
                return Err(Error::MissingField("screen_size"))
            }
            None => (0, 0),
        };
        for frame in &self.frames {
            width = width.max(frame.right());
            height = height.max(frame.bottom());
        }
        let width = u16::try_from(width).map_err(|_| Error::TooLargeImage)?;
        let height = u16::try_from(height).map_err(|_| Error::TooLargeImage)?;
        Ok((width, height))
    }

    /// Check if the global table is written
    fn has_global_table(&self) -> bool {
        self.global_table.underlying_len() > 0
            || self
                .frames
                .iter()
                .any(|f| matches!(f.table(), TableRef::Global))
    }

    /// Build the preamble blocks
    fn preamble(&self) -> Result<Preamble> {
        let (width, height) = self.screen_size()?;
        let has_table = self.has_global_table();
        let color_field = TableColorField {
            has_table,
            color_resolution: self
                .color_resolution
                .ok_or(Error::MissingField("color_resolution"))?,
            sorted: false,
            size: if has_table {
                self.global_table.size_field()
            } else {
                0
            },
        };
        let logical_screen_desc = LogicalScreenDesc::default()
            .with_screen_width(width)
            .with_screen_height(height)
            .with_color_field(color_field)
            .with_background_color_idx(
                self.background_color_idx
                    .ok_or(Error::MissingField("background_color_idx"))?,
            )
            .with_pixel_aspect_ratio(
                self.pixel_aspect_ratio
                    .ok_or(Error::MissingField("pixel_aspect_ratio"))?,
            );
        // validate packed fields before anything is written
        logical_screen_desc.flags()?;
        let global_color_table = if has_table {
            Some(GlobalColorTable::with_table(&self.global_table))
        } else {
            None
        };
        Ok(Preamble {
            header: Header::with_version(self.version),
            logical_screen_desc,
            global_color_table,
            loop_count_ext: self.loop_count.map(Application::with_loop_count),
            comments: self.comments.iter().map(|c| Comment::with_comment(c)).collect(),
        })
    }

    /// Build all blocks, in file order
    pub fn to_blocks(&self) -> Result<Vec<Block>> {
        let mut blocks = self.preamble()?.into_blocks();
        for frame in &self.frames {
            blocks.extend(frame.to_blocks(&self.global_table)?.into_blocks());
        }
        blocks.push(Trailer::default().into());
        debug!(
            "{} frames, {} blocks, {} global colors",
            self.frames.len(),
            blocks.len(),
            self.global_table.underlying_len()
        );
        Ok(blocks)
    }

    /// Encode to a writer
    pub fn encode<W: Write>(&self, writer: W) -> Result<()> {
        let blocks = self.to_blocks()?;
        let mut enc = BlockEnc::new(BufWriter::new(writer));
        for block in blocks {
            enc.encode(block)?;
        }
        enc.flush()
    }

    /// Encode to a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut enc = BlockEnc::new(Vec::new());
        for block in self.to_blocks()? {
            enc.encode(block)?;
        }
        Ok(enc.into_inner())
    }
}
