//! The in-memory form of a whole TGA file.

use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::color_map::decode_palette;
use crate::developer::DeveloperArea;
use crate::error::{Error, Result, Section};
use crate::extension::{ExtensionArea, PostageStamp, ScanLineTable};
use crate::footer::Footer;
use crate::header::{Header, ImageDescriptor, ImageSpec, ImageType, PixelDepth, HEADER_SIZE};
use crate::image_data::encode_rle;
use crate::raster::Rgba;

/// A decoded TGA image
///
/// Pixel data is always held uncompressed, whatever the image type. A file is in the 2.0 "new
/// format" exactly when it carries a [`Footer`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tga {
    /// The fixed header
    pub header: Header,

    /// Free form identification field, at most 255 bytes
    pub image_id: Vec<u8>,

    /// Raw color map entries
    pub color_map: Vec<u8>,

    /// Uncompressed pixels in file order
    pub image_data: Vec<u8>,

    /// Private tagged data
    pub developer_area: Option<DeveloperArea>,

    /// 2.0 metadata
    pub extension_area: Option<ExtensionArea>,

    /// 2.0 trailer
    pub footer: Option<Footer>,
}

impl Tga {
    /// A blank legacy image with zeroed pixels and bottom-left origin
    pub fn new(width: u16, height: u16, pixel_depth: PixelDepth, image_type: ImageType) -> Self {
        let header = Header {
            image_type,
            image_spec: ImageSpec {
                width,
                height,
                pixel_depth,
                descriptor: ImageDescriptor::default(),
                ..Default::default()
            },
            ..Default::default()
        };
        let len = match image_type {
            ImageType::NoImageData => 0,
            _ => header.image_spec.data_len(),
        };

        Self {
            header,
            image_data: vec![0; len],
            ..Default::default()
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.header.image_spec.width as usize
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.header.image_spec.height as usize
    }

    /// Width of one pixel in bytes
    pub fn bytes_per_pixel(&self) -> usize {
        self.header.image_spec.pixel_depth.bytes_per_pixel()
    }

    /// Whether the image is stored in the 2.0 format
    pub fn is_new_format(&self) -> bool {
        self.footer.is_some()
    }

    /// The image id as text
    pub fn image_id_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.image_id)
    }

    /// Replace the image id, the header is updated when the file is written
    pub fn set_image_id(&mut self, id: &str) {
        self.image_id = id.as_bytes().to_vec();
    }

    /// The color map as RGBA, empty when there is none
    pub fn palette(&self) -> Result<Vec<Rgba>> {
        if self.color_map.is_empty() {
            return Ok(Vec::new());
        }
        decode_palette(&self.color_map, self.header.color_map_spec.entry_size)
    }

    /// The extension area, created together with a footer when missing
    pub fn extension_area_mut(&mut self) -> &mut ExtensionArea {
        if self.footer.is_none() {
            self.footer = Some(Footer::default());
        }
        self.extension_area.get_or_insert_with(ExtensionArea::default)
    }

    /// The developer area, created together with a footer when missing
    pub fn developer_area_mut(&mut self) -> &mut DeveloperArea {
        if self.footer.is_none() {
            self.footer = Some(Footer::default());
        }
        self.developer_area.get_or_insert_with(DeveloperArea::default)
    }

    /// Length of the decoded pixel buffer the header describes, zero without image data
    pub fn expected_image_data_len(&self) -> usize {
        match self.header.image_type {
            ImageType::NoImageData => 0,
            _ => self.header.image_spec.data_len(),
        }
    }

    /// Regenerate the postage stamp from the current pixels
    ///
    /// Images without pixels, or whose pixels disagree with the header, lose their stamp.
    #[instrument(skip(self))]
    pub fn update_postage_stamp(&mut self) {
        let complete = self.header.image_type != ImageType::NoImageData
            && self.image_data.len() == self.expected_image_data_len();
        let stamp = if complete {
            PostageStamp::from_image(
                &self.image_data,
                self.width(),
                self.height(),
                self.bytes_per_pixel(),
            )
        } else {
            None
        };

        self.extension_area_mut().postage_stamp = stamp;
    }

    /// Offset of the first pixel in the written file
    pub fn image_data_offset(&self) -> u64 {
        HEADER_SIZE + self.image_id.len() as u64 + self.color_map.len() as u64
    }

    /// Recompute the offset of every stored scanline
    ///
    /// For run-length images the offsets point at the first packet of each line. Images without
    /// pixel data have no scanlines to point at and lose the table.
    #[instrument(skip(self), err)]
    pub fn rebuild_scan_line_table(&mut self) -> Result<()> {
        let start = self.image_data_offset();
        let height = self.height();
        let stride = self.header.image_spec.stride();
        let expected = self.expected_image_data_len();
        if self.image_data.len() != expected {
            return Err(Error::SizeMismatch {
                section: Section::ImageData,
                expected,
                actual: self.image_data.len(),
            });
        }

        if self.header.image_type == ImageType::NoImageData {
            self.extension_area_mut().scan_line_table = None;
            return Ok(());
        }

        let line_offsets = if self.header.image_type.is_rle() {
            encode_rle(
                &self.image_data,
                self.width(),
                height,
                self.bytes_per_pixel(),
            )
            .1
        } else {
            (0..height).map(|y| y * stride).collect()
        };

        let table = line_offsets
            .into_iter()
            .map(|offset| crate::bytes::checked_offset(start + offset as u64))
            .collect::<Result<Vec<_>>>()?;

        self.extension_area_mut().scan_line_table = Some(ScanLineTable(table));
        Ok(())
    }
}
