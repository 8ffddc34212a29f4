//! Placement of every variable section before a file is written.
//!
//! Sections are laid out in this order:
//!
//! | Section                 | Size                               |
//! |-------------------------|------------------------------------|
//! | Header                  | 18                                 |
//! | Image id                | `id_length`                        |
//! | Color map               | `length * bytes_per_entry`         |
//! | Image data              | raw or run-length packets          |
//! | Developer blobs         | sum of entry sizes                 |
//! | Developer directory     | `2 + 10 * entries`                 |
//! | Extension area          | `495 + trailing`                   |
//! | Scan line table         | `4 * height`                       |
//! | Postage stamp           | `2 + width * height * bpp`         |
//! | Color correction table  | 2048                               |
//! | Footer                  | 26                                 |
//!
//! Nothing is written unless every section passes validation.

use tracing::{debug, instrument, trace};

use crate::bytes::checked_offset;
use crate::error::{Error, Result, Section};
use crate::footer::{Footer, FOOTER_SIZE};
use crate::header::HEADER_SIZE;
use crate::image_data::encode_rle;
use crate::tga::Tga;

/// Largest image id the header can describe
pub const MAX_IMAGE_ID: usize = u8::MAX as usize;

/// Result of resolving the offsets of a [`Tga`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Run-length packets for the image data, `None` when pixels are stored raw
    pub encoded_image: Option<Vec<u8>>,

    /// Offset of the first pixel byte
    pub image_data_offset: u32,

    /// Total length of the file
    pub file_len: u64,
}

/// Running position while sections are placed
struct Placer {
    position: u64,
}

impl Placer {
    /// Reserve `len` bytes and return the offset they start at
    fn place(&mut self, section: &str, len: usize) -> Result<u32> {
        let offset = checked_offset(self.position)?;
        trace!(section, offset, len, "placed section");
        self.position += len as u64;
        Ok(offset)
    }
}

impl Tga {
    /// Validate every section and store the offsets they will be written at
    ///
    /// A legacy image that carries an extension or developer area is promoted to the new format.
    /// Empty developer entries are dropped and the rest sorted by tag.
    #[instrument(skip(self), err)]
    pub fn resolve(&mut self) -> Result<Layout> {
        self.validate()?;

        self.header.id_length = self.image_id.len() as u8;

        if self.footer.is_none()
            && (self.developer_area.is_some() || self.extension_area.is_some())
        {
            debug!("promoting legacy image to the new format");
            self.footer = Some(Footer::default());
        }

        if let Some(area) = self.developer_area.as_mut() {
            area.normalize();
        }
        if self.developer_area.as_ref().is_some_and(|area| area.is_empty()) {
            self.developer_area = None;
        }

        let encoded_image = if self.header.image_type.is_rle() && self.bytes_per_pixel() > 0 {
            Some(
                encode_rle(
                    &self.image_data,
                    self.width(),
                    self.height(),
                    self.bytes_per_pixel(),
                )
                .0,
            )
        } else {
            None
        };
        let image_len = encoded_image
            .as_ref()
            .map_or(self.image_data.len(), |packets| packets.len());

        let mut cursor = Placer { position: 0 };
        cursor.place("header", HEADER_SIZE as usize)?;
        cursor.place("image id", self.image_id.len())?;
        cursor.place("color map", self.color_map.len())?;
        let image_data_offset = cursor.place("image data", image_len)?;

        let mut developer_directory_offset = 0;
        if let Some(area) = self.developer_area.as_mut() {
            for entry in area.entries.values_mut() {
                entry.offset = cursor.place("developer entry", entry.data.len())?;
            }
            developer_directory_offset = cursor.place("developer directory", area.directory_len())?;
        }

        let mut extension_area_offset = 0;
        if let Some(area) = self.extension_area.as_mut() {
            area.extension_size = area.byte_len() as u16;
            extension_area_offset = cursor.place("extension area", area.byte_len())?;

            area.scan_line_offset = match &area.scan_line_table {
                Some(table) => cursor.place("scan line table", table.byte_len())?,
                None => 0,
            };
            area.postage_stamp_offset = match &area.postage_stamp {
                Some(stamp) => cursor.place("postage stamp", stamp.byte_len())?,
                None => 0,
            };
            area.color_correction_offset = match &area.color_correction_table {
                Some(table) => cursor.place("color correction table", table.byte_len())?,
                None => 0,
            };
        }

        if self.footer.is_some() {
            self.footer = Some(Footer {
                extension_area_offset,
                developer_directory_offset,
                ..Default::default()
            });
            cursor.place("footer", FOOTER_SIZE as usize)?;
        }
        checked_offset(cursor.position)?;

        debug!(file_len = cursor.position, "resolved layout");
        Ok(Layout {
            encoded_image,
            image_data_offset,
            file_len: cursor.position,
        })
    }

    /// Check every section against the dimensions that describe it
    pub fn validate(&self) -> Result<()> {
        if self.image_id.len() > MAX_IMAGE_ID {
            return Err(Error::SizeMismatch {
                section: Section::ImageId,
                expected: MAX_IMAGE_ID,
                actual: self.image_id.len(),
            });
        }

        let expected = self.header.color_map_spec.data_len();
        if self.color_map.len() != expected {
            return Err(Error::SizeMismatch {
                section: Section::ColorMap,
                expected,
                actual: self.color_map.len(),
            });
        }

        let expected = self.expected_image_data_len();
        if self.image_data.len() != expected {
            return Err(Error::SizeMismatch {
                section: Section::ImageData,
                expected,
                actual: self.image_data.len(),
            });
        }

        if let Some(area) = &self.extension_area {
            if area.byte_len() > u16::MAX as usize {
                return Err(Error::SizeMismatch {
                    section: Section::ExtensionArea,
                    expected: u16::MAX as usize,
                    actual: area.byte_len(),
                });
            }
            if let Some(table) = &area.scan_line_table {
                table.validate(self.height())?;
            }
            if let Some(stamp) = &area.postage_stamp {
                stamp.validate(self.bytes_per_pixel())?;
            }
            if let Some(table) = &area.color_correction_table {
                table.validate()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::TableError;
    use crate::extension::{ColorCorrectionTable, ExtensionArea, PostageStamp, ScanLineTable};
    use crate::header::{ImageType, PixelDepth};

    fn image() -> Tga {
        Tga::new(2, 2, PixelDepth::Bits24, ImageType::UncompressedTrueColor)
    }

    #[test]
    fn legacy_image_has_no_footer() -> Result<()> {
        let mut tga = image();
        let layout = tga.resolve()?;

        assert_eq!(layout.image_data_offset, 18);
        assert_eq!(layout.file_len, 18 + 12);
        assert!(tga.footer.is_none());
        Ok(())
    }

    #[test]
    fn sections_are_placed_in_order() -> Result<()> {
        let mut tga = image();
        tga.set_image_id("abc");
        tga.developer_area_mut().insert(9, vec![1, 2, 3, 4])?;
        tga.developer_area_mut().insert(1, vec![5])?;
        let area = tga.extension_area_mut();
        area.trailing = vec![0; 5];
        area.scan_line_table = Some(ScanLineTable(vec![0, 0]));
        area.postage_stamp = Some(PostageStamp {
            width: 1,
            height: 1,
            data: vec![1, 2, 3],
        });
        area.color_correction_table = Some(ColorCorrectionTable::default());

        let layout = tga.resolve()?;

        assert_eq!(tga.header.id_length, 3);
        assert_eq!(layout.image_data_offset, 21);

        let developer = tga.developer_area.as_ref().unwrap();
        assert_eq!(developer.entries.keys().copied().collect::<Vec<_>>(), vec![1, 9]);
        assert_eq!(developer.entries[&1].offset, 33);
        assert_eq!(developer.entries[&9].offset, 34);

        let footer = tga.footer.unwrap();
        assert_eq!(footer.developer_directory_offset, 38);
        assert_eq!(footer.extension_area_offset, 60);

        let area = tga.extension_area.as_ref().unwrap();
        assert_eq!(area.extension_size, 500);
        assert_eq!(area.scan_line_offset, 560);
        assert_eq!(area.postage_stamp_offset, 568);
        assert_eq!(area.color_correction_offset, 573);
        assert_eq!(layout.file_len, 573 + 2048 + 26);
        Ok(())
    }

    #[test]
    fn legacy_image_with_metadata_is_promoted() -> Result<()> {
        let mut tga = image();
        tga.extension_area = Some(ExtensionArea::default());

        tga.resolve()?;

        let footer = tga.footer.unwrap();
        assert!(footer.is_valid());
        assert_eq!(footer.extension_area_offset, 30);
        assert_eq!(footer.developer_directory_offset, 0);
        Ok(())
    }

    #[test]
    fn emptied_developer_area_is_dropped() -> Result<()> {
        let mut tga = image();
        tga.developer_area_mut().insert(4, vec![])?;

        let layout = tga.resolve()?;

        assert!(tga.developer_area.is_none());
        assert_eq!(tga.footer.unwrap().developer_directory_offset, 0);
        assert_eq!(layout.file_len, 30 + 26);
        Ok(())
    }

    #[test]
    fn run_length_image_is_encoded_once() -> Result<()> {
        let mut tga = Tga::new(4, 2, PixelDepth::Bits8, ImageType::RleBlackWhite);
        let layout = tga.resolve()?;

        assert_eq!(layout.encoded_image, Some(vec![0x83, 0, 0x83, 0]));
        assert_eq!(layout.file_len, 18 + 4);
        Ok(())
    }

    #[test]
    fn invalid_sections_are_rejected() {
        let mut tga = image();
        tga.image_id = vec![b'x'; 256];
        assert!(matches!(
            tga.resolve(),
            Err(Error::SizeMismatch {
                section: Section::ImageId,
                ..
            })
        ));

        let mut tga = image();
        tga.image_data.pop();
        assert!(matches!(
            tga.resolve(),
            Err(Error::SizeMismatch {
                section: Section::ImageData,
                expected: 12,
                actual: 11,
            })
        ));

        let mut tga = image();
        tga.color_map = vec![0; 3];
        assert!(matches!(
            tga.resolve(),
            Err(Error::SizeMismatch {
                section: Section::ColorMap,
                ..
            })
        ));

        let mut tga = image();
        tga.extension_area_mut().scan_line_table = Some(ScanLineTable(vec![0]));
        assert!(matches!(
            tga.resolve(),
            Err(Error::InvalidTableDimensions(TableError::ScanLine {
                expected: 2,
                actual: 1
            }))
        ));
    }

    #[test]
    fn failed_validation_changes_nothing() {
        let mut tga = image();
        tga.extension_area = Some(ExtensionArea::default());
        tga.image_data.clear();
        let before = tga.clone();

        assert!(tga.resolve().is_err());
        assert_eq!(tga, before);
    }
}
