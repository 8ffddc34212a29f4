//! The fixed 18 byte header at the start of every TGA file.

use binrw::{BinRead, BinWrite};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bytes::bytes_for_bits;

/// Size of the header in bytes
pub const HEADER_SIZE: u64 = 18;

/// Whether the file carries a color map
///
/// Values 2-127 are reserved by Truevision and 128-255 are available to developers, both are kept as
/// [`ColorMapType::Other`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorMapType {
    /// No color map is included
    #[default]
    NoColorMap,

    /// A color map is included
    ColorMap,

    /// Reserved or developer defined value
    Other(u8),
}

impl From<u8> for ColorMapType {
    fn from(value: u8) -> Self {
        match value {
            0 => ColorMapType::NoColorMap,
            1 => ColorMapType::ColorMap,
            v => ColorMapType::Other(v),
        }
    }
}

impl From<ColorMapType> for u8 {
    fn from(value: ColorMapType) -> Self {
        match value {
            ColorMapType::NoColorMap => 0,
            ColorMapType::ColorMap => 1,
            ColorMapType::Other(v) => v,
        }
    }
}

/// Image data type and compression
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageType {
    /// The file holds no pixel data
    NoImageData,

    /// Uncompressed indices into the color map
    UncompressedColorMapped,

    /// Uncompressed direct color pixels
    #[default]
    UncompressedTrueColor,

    /// Uncompressed grayscale pixels
    UncompressedBlackWhite,

    /// Run-length encoded indices into the color map
    RleColorMapped,

    /// Run-length encoded direct color pixels
    RleTrueColor,

    /// Run-length encoded grayscale pixels
    RleBlackWhite,

    /// Reserved or developer defined value
    Other(u8),
}

impl ImageType {
    /// Whether pixel data is stored as run-length packets
    pub const fn is_rle(&self) -> bool {
        matches!(
            self,
            ImageType::RleColorMapped | ImageType::RleTrueColor | ImageType::RleBlackWhite
        )
    }

    /// Whether pixels are indices into the color map
    pub const fn is_color_mapped(&self) -> bool {
        matches!(
            self,
            ImageType::UncompressedColorMapped | ImageType::RleColorMapped
        )
    }

    /// Whether pixels are grayscale values
    pub const fn is_black_white(&self) -> bool {
        matches!(
            self,
            ImageType::UncompressedBlackWhite | ImageType::RleBlackWhite
        )
    }

    /// The run-length encoded counterpart of this type, if there is one
    pub const fn compressed(self) -> Self {
        match self {
            ImageType::UncompressedColorMapped => ImageType::RleColorMapped,
            ImageType::UncompressedTrueColor => ImageType::RleTrueColor,
            ImageType::UncompressedBlackWhite => ImageType::RleBlackWhite,
            other => other,
        }
    }

    /// The uncompressed counterpart of this type, if there is one
    pub const fn uncompressed(self) -> Self {
        match self {
            ImageType::RleColorMapped => ImageType::UncompressedColorMapped,
            ImageType::RleTrueColor => ImageType::UncompressedTrueColor,
            ImageType::RleBlackWhite => ImageType::UncompressedBlackWhite,
            other => other,
        }
    }
}

impl From<u8> for ImageType {
    fn from(value: u8) -> Self {
        match value {
            0 => ImageType::NoImageData,
            1 => ImageType::UncompressedColorMapped,
            2 => ImageType::UncompressedTrueColor,
            3 => ImageType::UncompressedBlackWhite,
            9 => ImageType::RleColorMapped,
            10 => ImageType::RleTrueColor,
            11 => ImageType::RleBlackWhite,
            v => ImageType::Other(v),
        }
    }
}

impl From<ImageType> for u8 {
    fn from(value: ImageType) -> Self {
        match value {
            ImageType::NoImageData => 0,
            ImageType::UncompressedColorMapped => 1,
            ImageType::UncompressedTrueColor => 2,
            ImageType::UncompressedBlackWhite => 3,
            ImageType::RleColorMapped => 9,
            ImageType::RleTrueColor => 10,
            ImageType::RleBlackWhite => 11,
            ImageType::Other(v) => v,
        }
    }
}

/// Bits per color map entry
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorMapEntrySize {
    /// X1R5G5B5
    Bits15,

    /// A1R5G5B5
    Bits16,

    /// R8G8B8
    Bits24,

    /// A8R8G8B8
    Bits32,

    /// Any other width, including zero when there is no color map
    Other(u8),
}

impl Default for ColorMapEntrySize {
    fn default() -> Self {
        ColorMapEntrySize::Other(0)
    }
}

impl ColorMapEntrySize {
    /// Width of one entry in bits
    pub fn bits(&self) -> u8 {
        u8::from(*self)
    }

    /// Width of one entry in the file
    pub fn bytes_per_entry(&self) -> usize {
        bytes_for_bits(self.bits())
    }
}

impl From<u8> for ColorMapEntrySize {
    fn from(value: u8) -> Self {
        match value {
            15 => ColorMapEntrySize::Bits15,
            16 => ColorMapEntrySize::Bits16,
            24 => ColorMapEntrySize::Bits24,
            32 => ColorMapEntrySize::Bits32,
            v => ColorMapEntrySize::Other(v),
        }
    }
}

impl From<ColorMapEntrySize> for u8 {
    fn from(value: ColorMapEntrySize) -> Self {
        match value {
            ColorMapEntrySize::Bits15 => 15,
            ColorMapEntrySize::Bits16 => 16,
            ColorMapEntrySize::Bits24 => 24,
            ColorMapEntrySize::Bits32 => 32,
            ColorMapEntrySize::Other(v) => v,
        }
    }
}

/// Bits per pixel, attribute bits included
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelDepth {
    /// One byte per pixel
    Bits8,

    /// Two bytes per pixel
    Bits16,

    /// Three bytes per pixel
    #[default]
    Bits24,

    /// Four bytes per pixel
    Bits32,

    /// Any other depth
    Other(u8),
}

impl PixelDepth {
    /// Depth in bits
    pub fn bits(&self) -> u8 {
        u8::from(*self)
    }

    /// Width of one pixel in the file
    pub fn bytes_per_pixel(&self) -> usize {
        bytes_for_bits(self.bits())
    }
}

impl From<u8> for PixelDepth {
    fn from(value: u8) -> Self {
        match value {
            8 => PixelDepth::Bits8,
            16 => PixelDepth::Bits16,
            24 => PixelDepth::Bits24,
            32 => PixelDepth::Bits32,
            v => PixelDepth::Other(v),
        }
    }
}

impl From<PixelDepth> for u8 {
    fn from(value: PixelDepth) -> Self {
        match value {
            PixelDepth::Bits8 => 8,
            PixelDepth::Bits16 => 16,
            PixelDepth::Bits24 => 24,
            PixelDepth::Bits32 => 32,
            PixelDepth::Other(v) => v,
        }
    }
}

/// Corner of the screen the first stored pixel belongs to
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageOrigin {
    /// Rows are stored bottom to top, pixels left to right
    #[default]
    BottomLeft,

    /// Rows are stored bottom to top, pixels right to left
    BottomRight,

    /// Rows are stored top to bottom, pixels left to right
    TopLeft,

    /// Rows are stored top to bottom, pixels right to left
    TopRight,
}

impl ImageOrigin {
    /// Whether rows are stored bottom to top
    pub const fn is_bottom(&self) -> bool {
        matches!(self, ImageOrigin::BottomLeft | ImageOrigin::BottomRight)
    }

    /// Whether pixels in a row are stored right to left
    pub const fn is_right(&self) -> bool {
        matches!(self, ImageOrigin::BottomRight | ImageOrigin::TopRight)
    }
}

/// The image descriptor byte
///
/// | Bits | Meaning                                  |
/// |------|------------------------------------------|
/// | 0-3  | Attribute (alpha) bits per pixel         |
/// | 4    | Set when pixels are stored right to left |
/// | 5    | Set when rows are stored top to bottom   |
/// | 6-7  | Reserved, must be zero but kept as read  |
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageDescriptor {
    /// Number of attribute bits per pixel
    pub alpha_bits: u8,

    /// Screen origin of the first pixel
    pub origin: ImageOrigin,

    /// The two reserved high bits, unshifted
    pub reserved: u8,
}

impl From<u8> for ImageDescriptor {
    fn from(value: u8) -> Self {
        let origin = match (value & 0x20 != 0, value & 0x10 != 0) {
            (false, false) => ImageOrigin::BottomLeft,
            (false, true) => ImageOrigin::BottomRight,
            (true, false) => ImageOrigin::TopLeft,
            (true, true) => ImageOrigin::TopRight,
        };

        ImageDescriptor {
            alpha_bits: value & 0x0F,
            origin,
            reserved: value & 0xC0,
        }
    }
}

impl From<ImageDescriptor> for u8 {
    fn from(value: ImageDescriptor) -> Self {
        let mut byte = (value.alpha_bits & 0x0F) | (value.reserved & 0xC0);
        if value.origin.is_right() {
            byte |= 0x10;
        }
        if !value.origin.is_bottom() {
            byte |= 0x20;
        }
        byte
    }
}

/// Describes the color map stored after the image id
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct ColorMapSpec {
    /// Index of the first color map entry
    pub first_entry_index: u16,

    /// Number of color map entries stored in the file
    pub length: u16,

    /// Width of every entry
    #[br(map = |value: u8| ColorMapEntrySize::from(value))]
    #[bw(map = |size: &ColorMapEntrySize| u8::from(*size))]
    pub entry_size: ColorMapEntrySize,
}

impl ColorMapSpec {
    /// Size in bytes of the color map data
    pub fn data_len(&self) -> usize {
        self.length as usize * self.entry_size.bytes_per_entry()
    }
}

/// Position, dimensions and pixel format of the image
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct ImageSpec {
    /// Horizontal screen position of the lower left corner
    pub x_origin: u16,

    /// Vertical screen position of the lower left corner
    pub y_origin: u16,

    /// Width in pixels
    pub width: u16,

    /// Height in pixels
    pub height: u16,

    /// Bits per pixel
    #[br(map = |value: u8| PixelDepth::from(value))]
    #[bw(map = |depth: &PixelDepth| u8::from(*depth))]
    pub pixel_depth: PixelDepth,

    /// Attribute bits and pixel ordering
    #[br(map = |value: u8| ImageDescriptor::from(value))]
    #[bw(map = |descriptor: &ImageDescriptor| u8::from(*descriptor))]
    pub descriptor: ImageDescriptor,
}

impl ImageSpec {
    /// Size in bytes of the uncompressed pixel buffer
    pub fn data_len(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel_depth.bytes_per_pixel()
    }

    /// Size in bytes of a single uncompressed scanline
    pub fn stride(&self) -> usize {
        self.width as usize * self.pixel_depth.bytes_per_pixel()
    }
}

/// TGA file header
///
/// All multi byte fields are stored in little endian format.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct Header {
    /// Length of the image id field that follows the header
    pub id_length: u8,

    /// Whether a color map is included
    #[br(map = |value: u8| ColorMapType::from(value))]
    #[bw(map = |kind: &ColorMapType| u8::from(*kind))]
    pub color_map_type: ColorMapType,

    /// Pixel data type and compression
    #[br(map = |value: u8| ImageType::from(value))]
    #[bw(map = |kind: &ImageType| u8::from(*kind))]
    pub image_type: ImageType,

    /// Color map layout
    pub color_map_spec: ColorMapSpec,

    /// Image layout
    pub image_spec: ImageSpec,
}
