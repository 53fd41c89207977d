// frame.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Animation frames
use crate::block::{FrameBlocks, GraphicControl, ImageData, ImageDesc, LocalColorTable};
use crate::color::{Color, ColorTable};
use crate::error::{Error, Result};
use crate::field::{DisposalMethod, ImageColorField};
use crate::lzw;
use pix::rgb::SRgb8;
use pix::Raster;

/// Row-major grid of colors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    width: u16,
    height: u16,
    pixels: Vec<Color>,
}

impl ColorGrid {
    /// Create a grid filled with one color
    pub fn with_color(width: u16, height: u16, clr: Color) -> Self {
        let pixels = vec![clr; usize::from(width) * usize::from(height)];
        ColorGrid {
            width,
            height,
            pixels,
        }
    }

    /// Create a grid from row-major pixels
    pub fn with_pixels(width: u16, height: u16, pixels: Vec<Color>) -> Result<Self> {
        if pixels.len() != usize::from(width) * usize::from(height) {
            return Err(Error::MalformedImage);
        }
        Ok(ColorGrid {
            width,
            height,
            pixels,
        })
    }

    /// Create a grid from rows of equal length
    pub fn with_rows<R, C>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[C]>,
        C: Into<Color> + Copy,
    {
        let height = u16::try_from(rows.len()).map_err(|_| Error::TooLargeImage)?;
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let width = u16::try_from(width).map_err(|_| Error::TooLargeImage)?;
        let mut pixels = Vec::with_capacity(usize::from(width) * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != usize::from(width) {
                return Err(Error::MalformedImage);
            }
            pixels.extend(row.iter().map(|c| (*c).into()));
        }
        Ok(ColorGrid {
            width,
            height,
            pixels,
        })
    }

    /// Create a grid from an sRGB raster
    pub fn with_raster(raster: &Raster<SRgb8>) -> Result<Self> {
        let width = u16::try_from(raster.width()).map_err(|_| Error::TooLargeImage)?;
        let height = u16::try_from(raster.height()).map_err(|_| Error::TooLargeImage)?;
        let pixels = raster.pixels().iter().map(|p| Color::from(*p)).collect();
        ColorGrid::with_pixels(width, height, pixels)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get pixels in row-major order
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Color {
        self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Set one pixel
    pub fn set_pixel(&mut self, x: u16, y: u16, clr: Color) {
        let i = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.pixels[i] = clr;
    }

    /// Iterate over distinct colors, in first-seen order
    pub fn distinct_colors(&self) -> Vec<Color> {
        let mut seen = std::collections::HashSet::new();
        self.pixels
            .iter()
            .copied()
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Color table used by a frame
#[derive(Clone, Debug)]
pub enum TableRef {
    /// The container's global table
    Global,
    /// A table owned by the frame
    Local(ColorTable),
}

/// One frame of an animation
#[derive(Clone, Debug)]
pub struct Frame {
    /// Frame pixels
    grid: ColorGrid,
    /// Effective color table
    table: TableRef,
    /// Palette index for each pixel
    indices: Vec<u8>,
    /// Pixels replaced by the transparent index
    transparent: Option<Vec<bool>>,
    /// Position on the canvas
    left: u16,
    top: u16,
    /// Delay in centiseconds
    delay_time_cs: u16,
    disposal_method: DisposalMethod,
    user_input: bool,
}

impl Frame {
    /// Create a new frame.
    ///
    /// Every color of `grid` must already be in the effective table: the
    /// local one, or `global` for [TableRef::Global].
    pub fn new(grid: ColorGrid, table: TableRef, global: &ColorTable) -> Result<Self> {
        let indices = {
            let tbl = match &table {
                TableRef::Global => global,
                TableRef::Local(tbl) => tbl,
            };
            grid.pixels
                .iter()
                .map(|c| tbl.index_of(*c))
                .collect::<Result<Vec<u8>>>()?
        };
        Ok(Frame {
            grid,
            table,
            indices,
            transparent: None,
            left: 0,
            top: 0,
            delay_time_cs: 0,
            disposal_method: DisposalMethod::default(),
            user_input: false,
        })
    }

    pub fn width(&self) -> u16 {
        self.grid.width
    }

    pub fn height(&self) -> u16 {
        self.grid.height
    }

    pub fn grid(&self) -> &ColorGrid {
        &self.grid
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Get palette indices, row-major
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn left(&self) -> u16 {
        self.left
    }

    pub fn top(&self) -> u16 {
        self.top
    }

    /// Set position on the canvas
    pub fn set_position(&mut self, left: u16, top: u16) {
        self.left = left;
        self.top = top;
    }

    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }

    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }

    pub fn disposal_method(&self) -> DisposalMethod {
        self.disposal_method
    }

    pub fn set_disposal_method(&mut self, disposal_method: DisposalMethod) {
        self.disposal_method = disposal_method;
    }

    pub fn user_input(&self) -> bool {
        self.user_input
    }

    pub fn set_user_input(&mut self, user_input: bool) {
        self.user_input = user_input;
    }

    /// Check if any pixels are transparent
    pub fn has_transparency(&self) -> bool {
        self.transparent.is_some()
    }

    /// Get the right edge (left + width)
    pub(crate) fn right(&self) -> u32 {
        u32::from(self.left) + u32::from(self.width())
    }

    /// Get the bottom edge (top + height)
    pub(crate) fn bottom(&self) -> u32 {
        u32::from(self.top) + u32::from(self.height())
    }

    /// Check if the frame needs a graphic control extension
    fn has_graphic_control(&self) -> bool {
        self.delay_time_cs != 0
            || self.disposal_method != DisposalMethod::Unspecified
            || self.user_input
            || self.transparent.is_some()
    }

    /// Get the effective color table
    pub fn effective_table<'a>(&'a self, global: &'a ColorTable) -> &'a ColorTable {
        match &self.table {
            TableRef::Global => global,
            TableRef::Local(tbl) => tbl,
        }
    }

    /// Get mutable effective color table
    fn effective_table_mut<'a>(&'a mut self, global: &'a mut ColorTable) -> &'a mut ColorTable {
        match &mut self.table {
            TableRef::Global => global,
            TableRef::Local(tbl) => tbl,
        }
    }

    /// Check if the frame covers the same area as another
    fn same_area(&self, other: &Frame) -> bool {
        self.left == other.left
            && self.top == other.top
            && self.width() == other.width()
            && self.height() == other.height()
    }

    /// Mark pixels unchanged from the previous frame as transparent.
    ///
    /// The transparent slot is reserved in the effective table.  Returns
    /// the number of transparent pixels.
    pub fn diff(&mut self, prev: &Frame, global: &mut ColorTable) -> Result<usize> {
        if !self.same_area(prev) {
            return Err(Error::InvalidFrameDimensions);
        }
        self.effective_table_mut(global).reserve_transparent()?;
        let mask: Vec<bool> = self
            .grid
            .pixels
            .iter()
            .zip(prev.grid.pixels.iter())
            .map(|(a, b)| a == b)
            .collect();
        let n_transparent = mask.iter().filter(|t| **t).count();
        self.transparent = Some(mask);
        Ok(n_transparent)
    }

    /// Get the transparent index within the effective table
    fn transparent_idx(&self, global: &ColorTable) -> Option<u8> {
        let tbl = self.effective_table(global);
        match (&self.transparent, tbl.has_transparent()) {
            (Some(_), true) => Some((tbl.declared_len() - 1) as u8),
            _ => None,
        }
    }

    /// Get the index stream, with transparent pixels substituted
    fn index_stream(&self, global: &ColorTable) -> Vec<u8> {
        match (&self.transparent, self.transparent_idx(global)) {
            (Some(mask), Some(t)) => self
                .indices
                .iter()
                .zip(mask.iter())
                .map(|(i, m)| if *m { t } else { *i })
                .collect(),
            _ => self.indices.clone(),
        }
    }

    /// Build on-wire blocks for this frame
    pub fn to_blocks(&self, global: &ColorTable) -> Result<FrameBlocks> {
        let graphic_control_ext = if self.has_graphic_control() {
            let mut gc = GraphicControl::default();
            gc.set_delay_time_cs(self.delay_time_cs);
            gc.set_disposal_method(self.disposal_method);
            gc.set_user_input(self.user_input);
            gc.set_transparent_color(self.transparent_idx(global));
            Some(gc)
        } else {
            None
        };
        let tbl = self.effective_table(global);
        let (color_field, local_color_table) = match &self.table {
            TableRef::Global => (ImageColorField::default(), None),
            TableRef::Local(tbl) => {
                let field = ImageColorField {
                    has_table: true,
                    size: tbl.size_field(),
                    ..Default::default()
                };
                (field, Some(LocalColorTable::with_table(tbl)))
            }
        };
        let image_desc = ImageDesc::default()
            .with_left(self.left)
            .with_top(self.top)
            .with_width(self.width())
            .with_height(self.height())
            .with_color_field(color_field);
        let image_data =
            ImageData::with_indices(self.index_stream(global), lzw::min_code_size(tbl));
        Ok(FrameBlocks {
            graphic_control_ext,
            image_desc,
            local_color_table,
            image_data,
        })
    }
}
