//! Conversion between TGA pixel encodings and a generic top-down raster.
//!
//! | TGA image                       | Raster format                        |
//! |---------------------------------|--------------------------------------|
//! | 8 bit color mapped              | [`PixelFormat::Indexed8`]            |
//! | 8 bit black and white           | [`PixelFormat::Indexed8`], gray ramp |
//! | 16 bit black and white          | [`PixelFormat::Gray16`], inverted    |
//! | 16 bit true color               | `Rgb555` or `Argb1555`               |
//! | 24 bit true color               | [`PixelFormat::Rgb24`]               |
//! | 32 bit true color               | `Rgb32`, `Argb32` or `PArgb32`       |
//!
//! Raster pixels use the same little endian byte order as TGA, so a 24 bit pixel is `B, G, R`.
//! Rows are always top to bottom and left to right, padded to a multiple of four bytes.

use bon::Builder;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::color_map::{encode_palette, unpack_555};
use crate::error::{Error, Result, Section};
use crate::extension::{AttributesType, ExtensionArea, SoftwareVersion};
use crate::header::{
    ColorMapSpec, ColorMapType, ImageDescriptor, ImageOrigin, ImageType, PixelDepth,
};
use crate::tga::Tga;

/// A palette color
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha, 255 is opaque
    pub a: u8,
}

impl Rgba {
    /// Build a color from its channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Pixel layouts a [`RasterImage`] can hold
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    /// One byte palette index
    Indexed8,
    /// 16 bit gray level
    Gray16,
    /// `X1R5G5B5`
    Rgb555,
    /// `A1R5G5B5`
    Argb1555,
    /// `B, G, R`
    Rgb24,
    /// `B, G, R, X`
    Rgb32,
    /// `B, G, R, A`
    Argb32,
    /// `B, G, R, A` with color multiplied by alpha
    PArgb32,
}

impl PixelFormat {
    /// Width of one pixel
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Gray16 | PixelFormat::Rgb555 | PixelFormat::Argb1555 => 2,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgb32 | PixelFormat::Argb32 | PixelFormat::PArgb32 => 4,
        }
    }

    /// Whether the format carries alpha
    pub const fn has_alpha(&self) -> bool {
        matches!(
            self,
            PixelFormat::Argb1555 | PixelFormat::Argb32 | PixelFormat::PArgb32
        )
    }
}

/// A top-down, left-to-right pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Layout of every pixel
    pub format: PixelFormat,
    /// Bytes from one row to the next, padding included
    pub stride: usize,
    /// Rows of pixels
    pub data: Vec<u8>,
    /// Colors for [`PixelFormat::Indexed8`]
    pub palette: Vec<Rgba>,
}

impl RasterImage {
    /// A zeroed image with rows padded to four bytes
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = (width * format.bytes_per_pixel()).next_multiple_of(4);
        Self {
            width,
            height,
            format,
            stride,
            data: vec![0; stride * height],
            palette: Vec::new(),
        }
    }

    /// Bytes of the pixels in row `y`, padding excluded
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.format.bytes_per_pixel()]
    }

    /// Mutable bytes of the pixels in row `y`, padding excluded
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let len = self.width * self.format.bytes_per_pixel();
        &mut self.data[start..start + len]
    }

    /// Bytes of the pixel at `x, y`
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        &self.row(y)[x * bpp..(x + 1) * bpp]
    }

    /// Color of the pixel at `x, y`
    ///
    /// Palette indices without an entry come back as transparent black.
    pub fn color(&self, x: usize, y: usize) -> Rgba {
        let p = self.pixel(x, y);
        match self.format {
            PixelFormat::Indexed8 => self.palette.get(p[0] as usize).copied().unwrap_or_default(),
            PixelFormat::Gray16 => {
                let level = p[1];
                Rgba::new(level, level, level, 255)
            }
            PixelFormat::Rgb555 => unpack_555(u16::from_le_bytes([p[0], p[1]]), false),
            PixelFormat::Argb1555 => unpack_555(u16::from_le_bytes([p[0], p[1]]), true),
            PixelFormat::Rgb24 | PixelFormat::Rgb32 => Rgba::new(p[2], p[1], p[0], 255),
            PixelFormat::Argb32 | PixelFormat::PArgb32 => Rgba::new(p[2], p[1], p[0], p[3]),
        }
    }

    fn check_len(&self) -> Result<()> {
        let row_len = self.width * self.format.bytes_per_pixel();
        if self.stride < row_len || self.data.len() < self.stride * self.height {
            return Err(Error::SizeMismatch {
                section: Section::ImageData,
                expected: self.stride.max(row_len) * self.height,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// How [`Tga::from_raster`] encodes an image
#[derive(Debug, Clone, Copy, Builder)]
pub struct RasterOptions {
    /// Store the pixels run-length encoded
    #[builder(default)]
    pub use_rle: bool,

    /// Add the 2.0 extension area and footer
    #[builder(default = true)]
    pub new_format: bool,

    /// Store the palette as 15 or 16 bit entries instead of 24 or 32 bit
    #[builder(default)]
    pub two_byte_color_map_entries: bool,

    /// Include a postage stamp in new format images
    #[builder(default = true)]
    pub postage_stamp: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions::builder().build()
    }
}

/// Gray ramp used for 8 bit black and white images
fn gray_palette() -> Vec<Rgba> {
    (0..=255u8).map(|v| Rgba::new(v, v, v, 255)).collect()
}

/// Bitwise inversion applied to 16 bit gray levels in both directions
fn invert_gray(row: &mut [u8]) {
    for byte in row {
        *byte = !*byte;
    }
}

/// Software version derived from the crate version, 1.2.0 is stored as 102
fn crate_version() -> u16 {
    let mut parts = env!("CARGO_PKG_VERSION")
        .split('.')
        .map(|part| part.parse::<u16>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    major * 100 + minor.min(99)
}

impl Tga {
    /// How the alpha channel of a 16 or 32 bit true color image should be read
    fn alpha_attributes(&self, force_alpha: bool) -> AttributesType {
        let declared = self.extension_area.as_ref().map(|area| area.attributes_type);
        match declared {
            Some(kind @ (AttributesType::PreMultiplied | AttributesType::UsefulAlpha)) => kind,
            _ if force_alpha => AttributesType::UsefulAlpha,
            None if self.header.image_spec.descriptor.alpha_bits > 0 => AttributesType::UsefulAlpha,
            Some(kind) => kind,
            None => AttributesType::NoAlpha,
        }
    }

    /// The raster format that matches this image's pixel encoding
    pub fn raster_format(&self, force_alpha: bool) -> Result<PixelFormat> {
        let kind = self.header.image_type;
        let depth = self.header.image_spec.pixel_depth;
        let alpha = self.alpha_attributes(force_alpha);

        let format = match (depth, kind.uncompressed()) {
            (PixelDepth::Bits8, ImageType::UncompressedColorMapped) => PixelFormat::Indexed8,
            (PixelDepth::Bits8, ImageType::UncompressedBlackWhite) => PixelFormat::Indexed8,
            (PixelDepth::Bits16, ImageType::UncompressedBlackWhite) => PixelFormat::Gray16,
            (PixelDepth::Bits16, ImageType::UncompressedTrueColor) if alpha.has_alpha() => {
                PixelFormat::Argb1555
            }
            (PixelDepth::Bits16, ImageType::UncompressedTrueColor) => PixelFormat::Rgb555,
            (PixelDepth::Bits24, ImageType::UncompressedTrueColor) => PixelFormat::Rgb24,
            (PixelDepth::Bits32, ImageType::UncompressedTrueColor) => match alpha {
                AttributesType::PreMultiplied => PixelFormat::PArgb32,
                AttributesType::UsefulAlpha => PixelFormat::Argb32,
                _ => PixelFormat::Rgb32,
            },
            _ => {
                return Err(Error::UnsupportedPixelFormat(format!(
                    "{} bit pixels in image type {}",
                    depth.bits(),
                    u8::from(kind)
                )))
            }
        };
        Ok(format)
    }

    /// Convert the pixels into a top-down raster
    ///
    /// `force_alpha` reads the attribute bits of 16 and 32 bit images as alpha even when the image
    /// does not declare them as such.
    #[instrument(skip(self), err)]
    pub fn to_raster(&self, force_alpha: bool) -> Result<RasterImage> {
        let format = self.raster_format(force_alpha)?;
        let expected = self.header.image_spec.data_len();
        if self.image_data.len() != expected {
            return Err(Error::SizeMismatch {
                section: Section::ImageData,
                expected,
                actual: self.image_data.len(),
            });
        }

        let (width, height) = (self.width(), self.height());
        let mut image = RasterImage::new(width, height, format);
        image.palette = match self.header.image_type.uncompressed() {
            ImageType::UncompressedColorMapped => {
                let first = self.header.color_map_spec.first_entry_index as usize;
                let mut palette = vec![Rgba::default(); first];
                palette.extend(self.palette()?);
                palette
            }
            ImageType::UncompressedBlackWhite if format == PixelFormat::Indexed8 => gray_palette(),
            _ => Vec::new(),
        };

        let origin = self.header.image_spec.descriptor.origin;
        let bpp = format.bytes_per_pixel();
        let source_stride = width * bpp;
        debug!(?format, ?origin, width, height, "converting to raster");

        for y in 0..height {
            let source_y = if origin.is_bottom() { height - 1 - y } else { y };
            let source = &self.image_data[source_y * source_stride..(source_y + 1) * source_stride];
            let row = image.row_mut(y);

            if origin.is_right() {
                for (target, pixel) in row.chunks_exact_mut(bpp).zip(source.chunks_exact(bpp).rev()) {
                    target.copy_from_slice(pixel);
                }
            } else {
                row.copy_from_slice(source);
            }

            if format == PixelFormat::Gray16 {
                invert_gray(row);
            }
        }

        Ok(image)
    }

    /// Encode a raster as a TGA image stored bottom to top
    #[instrument(skip(image), fields(width = image.width, height = image.height, format = ?image.format), err)]
    pub fn from_raster(image: &RasterImage, options: RasterOptions) -> Result<Tga> {
        image.check_len()?;
        let width = u16::try_from(image.width)
            .map_err(|_| Error::UnsupportedPixelFormat(format!("width {}", image.width)))?;
        let height = u16::try_from(image.height)
            .map_err(|_| Error::UnsupportedPixelFormat(format!("height {}", image.height)))?;

        let (image_type, pixel_depth, alpha_bits, attributes_type) = match image.format {
            PixelFormat::Indexed8 => (
                ImageType::UncompressedColorMapped,
                PixelDepth::Bits8,
                0,
                AttributesType::NoAlpha,
            ),
            PixelFormat::Gray16 => (
                ImageType::UncompressedBlackWhite,
                PixelDepth::Bits16,
                0,
                AttributesType::NoAlpha,
            ),
            PixelFormat::Rgb555 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits16,
                0,
                AttributesType::NoAlpha,
            ),
            PixelFormat::Argb1555 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits16,
                1,
                AttributesType::UsefulAlpha,
            ),
            PixelFormat::Rgb24 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits24,
                0,
                AttributesType::NoAlpha,
            ),
            PixelFormat::Rgb32 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits32,
                0,
                AttributesType::NoAlpha,
            ),
            PixelFormat::Argb32 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits32,
                8,
                AttributesType::UsefulAlpha,
            ),
            PixelFormat::PArgb32 => (
                ImageType::UncompressedTrueColor,
                PixelDepth::Bits32,
                8,
                AttributesType::PreMultiplied,
            ),
        };
        let image_type = if options.use_rle {
            image_type.compressed()
        } else {
            image_type
        };

        let mut tga = Tga::new(width, height, pixel_depth, image_type);
        tga.header.image_spec.descriptor = ImageDescriptor {
            alpha_bits,
            origin: ImageOrigin::BottomLeft,
            reserved: 0,
        };

        if image.format == PixelFormat::Indexed8 {
            let length = u16::try_from(image.palette.len()).map_err(|_| {
                Error::UnsupportedPixelFormat(format!("{} palette entries", image.palette.len()))
            })?;
            let (entry_size, color_map) =
                encode_palette(&image.palette, options.two_byte_color_map_entries)?;
            tga.header.color_map_type = ColorMapType::ColorMap;
            tga.header.color_map_spec = ColorMapSpec {
                first_entry_index: 0,
                length,
                entry_size,
            };
            tga.color_map = color_map;
        }

        let row_len = image.width * image.format.bytes_per_pixel();
        tga.image_data.clear();
        for y in (0..image.height).rev() {
            let start = tga.image_data.len();
            tga.image_data.extend_from_slice(image.row(y));
            if image.format == PixelFormat::Gray16 {
                invert_gray(&mut tga.image_data[start..start + row_len]);
            }
        }

        if options.new_format {
            *tga.extension_area_mut() = ExtensionArea {
                software_id: env!("CARGO_PKG_NAME").into(),
                software_version: SoftwareVersion {
                    number: crate_version(),
                    letter: b' ',
                },
                attributes_type,
                ..Default::default()
            };
            if options.postage_stamp {
                tga.update_postage_stamp();
            }
        }

        Ok(tga)
    }

    /// Render the postage stamp through the same pixel mapping as the main image
    pub fn postage_stamp_raster(&self, force_alpha: bool) -> Result<Option<RasterImage>> {
        let Some(area) = &self.extension_area else {
            return Ok(None);
        };
        let Some(stamp) = &area.postage_stamp else {
            return Ok(None);
        };

        let mut thumbnail = Tga {
            header: self.header,
            color_map: self.color_map.clone(),
            image_data: stamp.data.clone(),
            extension_area: Some(ExtensionArea {
                attributes_type: area.attributes_type,
                ..Default::default()
            }),
            ..Default::default()
        };
        thumbnail.header.image_type = self.header.image_type.uncompressed();
        thumbnail.header.image_spec.width = stamp.width as u16;
        thumbnail.header.image_spec.height = stamp.height as u16;

        thumbnail.to_raster(force_alpha).map(Some)
    }
}
