// block.rs
//
// Copyright (c) 2026  The gifweave Developers
//
//! Blocks of a GIF file, in the order they are written
use crate::color::ColorTable;
use crate::error::{Error, Result};
use crate::field::{
    DisposalMethod, GraphicControlField, ImageColorField, TableColorField,
};

/// GIF format version
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Version {
    /// GIF89a, the only supported version
    #[default]
    V89a,
}

impl Version {
    /// Get the version tag
    pub fn tag(self) -> [u8; 3] {
        match self {
            Version::V89a => *b"89a",
        }
    }
}

impl TryFrom<&[u8]> for Version {
    type Error = Error;

    fn try_from(tag: &[u8]) -> Result<Self> {
        match tag {
            b"89a" => Ok(Version::V89a),
            _ => {
                let mut v = [0; 3];
                let len = tag.len().min(3);
                v[..len].copy_from_slice(&tag[..len]);
                Err(Error::UnsupportedVersion(v))
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    pub fn signature(&self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Comment_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Comment_ => 0xFE,
            Application_ => 0xFF,
        }
    }
}

/// File header: signature and version
#[derive(Clone, Debug, Default)]
pub struct Header {
    version: Version,
}

impl Header {
    pub fn with_version(version: Version) -> Self {
        Header { version }
    }
    pub fn version(&self) -> Version {
        self.version
    }
}

/// Logical screen (canvas) descriptor
#[derive(Clone, Debug, Default)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    color_field: TableColorField,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn with_color_field(mut self, color_field: TableColorField) -> Self {
        self.color_field = color_field;
        self
    }
    /// Get packed flags byte
    pub fn flags(&self) -> Result<u8> {
        self.color_field.pack()
    }
    pub fn with_background_color_idx(mut self, background_color_idx: u8) -> Self {
        self.background_color_idx = background_color_idx;
        self
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn with_pixel_aspect_ratio(mut self, pixel_aspect_ratio: u8) -> Self {
        self.pixel_aspect_ratio = pixel_aspect_ratio;
        self
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Global color table
#[derive(Clone, Debug)]
pub struct GlobalColorTable {
    colors: Vec<u8>,
}

impl GlobalColorTable {
    pub fn with_table(table: &ColorTable) -> Self {
        let colors = table.to_bytes();
        GlobalColorTable { colors }
    }
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Graphic control extension
#[derive(Clone, Debug, Default)]
pub struct GraphicControl {
    field: GraphicControlField,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

impl GraphicControl {
    /// Get packed flags byte
    pub fn flags(&self) -> Result<u8> {
        self.field.pack()
    }
    pub fn set_disposal_method(&mut self, disposal_method: DisposalMethod) {
        self.field.disposal_method = disposal_method;
    }
    pub fn set_user_input(&mut self, user_input: bool) {
        self.field.user_input = user_input;
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }
    pub fn transparent_color(&self) -> Option<u8> {
        if self.field.has_transparency {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }
    pub fn set_transparent_color(&mut self, transparent_color: Option<u8>) {
        self.field.has_transparency = transparent_color.is_some();
        self.transparent_color_idx = transparent_color.unwrap_or(0);
    }
}

/// Comment extension
#[derive(Clone, Debug, Default)]
pub struct Comment {
    comment: Vec<u8>, // ascii only comments recommended
}

impl Comment {
    pub fn with_comment(comment: &[u8]) -> Self {
        let comment = comment.to_vec();
        Comment { comment }
    }
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }
}

/// Application extension
#[derive(Clone, Debug, Default)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

impl Application {
    /// Create a looping extension.
    ///
    /// A loop count of zero means loop forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        let [lo, hi] = loop_count.to_le_bytes();
        let app_data = vec![b"NETSCAPE2.0".to_vec(), vec![1, lo, hi]];
        Application { app_data }
    }
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }
}

/// Image descriptor
#[derive(Clone, Debug, Default)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    color_field: ImageColorField,
}

impl ImageDesc {
    pub fn with_left(mut self, left: u16) -> Self {
        self.left = left;
        self
    }
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn with_top(mut self, top: u16) -> Self {
        self.top = top;
        self
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn with_color_field(mut self, color_field: ImageColorField) -> Self {
        self.color_field = color_field;
        self
    }
    pub fn color_field(&self) -> ImageColorField {
        self.color_field
    }
    /// Get packed flags byte
    pub fn flags(&self) -> Result<u8> {
        self.color_field.pack()
    }
}

/// Local color table
#[derive(Clone, Debug)]
pub struct LocalColorTable {
    colors: Vec<u8>,
}

impl LocalColorTable {
    pub fn with_table(table: &ColorTable) -> Self {
        let colors = table.to_bytes();
        LocalColorTable { colors }
    }
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Image data: palette indices, compressed when written
#[derive(Clone, Debug)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>, // palette indices, row-major
}

impl ImageData {
    pub fn with_indices(indices: Vec<u8>, min_code_size: u8) -> Self {
        ImageData {
            min_code_size,
            data: indices,
        }
    }
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size.max(2) // must be >= 2
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Trailer, ends the file
#[derive(Clone, Debug, Default)]
pub struct Trailer {}

/// One block of a GIF file
#[derive(Clone, Debug)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GlobalColorTable(GlobalColorTable),
    GraphicControl(GraphicControl),
    Comment(Comment),
    Application(Application),
    ImageDesc(ImageDesc),
    LocalColorTable(LocalColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

macro_rules! impl_from_block {
    ($($b:ident),*) => {
        $(
            impl From<$b> for Block {
                fn from(b: $b) -> Self {
                    Block::$b(b)
                }
            }
        )*
    };
}

impl_from_block!(
    Header,
    LogicalScreenDesc,
    GlobalColorTable,
    GraphicControl,
    Comment,
    Application,
    ImageDesc,
    LocalColorTable,
    ImageData,
    Trailer
);

/// Blocks at the start of a file, before any frames
#[derive(Debug)]
pub struct Preamble {
    pub header: Header,
    pub logical_screen_desc: LogicalScreenDesc,
    pub global_color_table: Option<GlobalColorTable>,
    pub loop_count_ext: Option<Application>,
    pub comments: Vec<Comment>,
}

/// Blocks for one frame
#[derive(Debug)]
pub struct FrameBlocks {
    pub graphic_control_ext: Option<GraphicControl>,
    pub image_desc: ImageDesc,
    pub local_color_table: Option<LocalColorTable>,
    pub image_data: ImageData,
}

impl Preamble {
    /// Get blocks in file order
    pub fn into_blocks(self) -> Vec<Block> {
        let mut blocks = vec![
            self.header.into(),
            self.logical_screen_desc.into(),
        ];
        blocks.extend(self.global_color_table.map(Block::from));
        blocks.extend(self.loop_count_ext.map(Block::from));
        blocks.extend(self.comments.into_iter().map(Block::from));
        blocks
    }
}

impl FrameBlocks {
    /// Get blocks in file order
    pub fn into_blocks(self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(4);
        blocks.extend(self.graphic_control_ext.map(Block::from));
        blocks.push(self.image_desc.into());
        blocks.extend(self.local_color_table.map(Block::from));
        blocks.push(self.image_data.into());
        blocks
    }
}
