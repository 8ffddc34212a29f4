//! Encoding TGA files
//!

use std::io::{Cursor, Write};

use binrw::BinWrite;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::tga::Tga;

impl Tga {
    /// Encode the image into `writer`
    ///
    /// Offsets are resolved and every section validated first. The file is assembled in memory and
    /// only handed to `writer` once it is complete, so a failure never leaves partial output.
    ///
    /// ```
    /// # fn doit() -> tga_codec::error::Result<()>
    /// # {
    /// use tga_codec::{ImageType, PixelDepth, Tga};
    ///
    /// let mut tga = Tga::new(2, 2, PixelDepth::Bits24, ImageType::RleTrueColor);
    /// tga.extension_area_mut().author_name = "Tester".into();
    ///
    /// let mut file = Vec::new();
    /// tga.write_to(&mut file)?;
    ///
    /// assert!(file.ends_with(b"TRUEVISION-XFILE.\0"));
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    #[instrument(skip(self, writer), err)]
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let layout = self.resolve()?;
        let mut buffer = Cursor::new(Vec::with_capacity(layout.file_len as usize));

        self.header.write(&mut buffer)?;
        buffer.write_all(&self.image_id)?;
        buffer.write_all(&self.color_map)?;
        match &layout.encoded_image {
            Some(packets) => buffer.write_all(packets)?,
            None => buffer.write_all(&self.image_data)?,
        }

        if let Some(area) = &self.developer_area {
            area.write(&mut buffer)?;
        }

        if let Some(area) = &self.extension_area {
            area.write(&mut buffer)?;
            if let Some(table) = &area.scan_line_table {
                table.write(&mut buffer)?;
            }
            if let Some(stamp) = &area.postage_stamp {
                stamp.write(&mut buffer)?;
            }
            if let Some(table) = &area.color_correction_table {
                table.write(&mut buffer)?;
            }
        }

        if let Some(footer) = &self.footer {
            footer.write(&mut buffer)?;
        }

        let bytes = buffer.into_inner();
        debug!(len = bytes.len(), "encoded image");
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Encode the image into a new buffer
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extension::{ColorCorrectionTable, PostageStamp};
    use crate::header::{ImageType, PixelDepth};

    #[test]
    fn write_legacy_image() -> Result<()> {
        let mut tga = Tga::new(2, 1, PixelDepth::Bits8, ImageType::UncompressedBlackWhite);
        tga.image_data = vec![0x10, 0x20];
        tga.set_image_id("hi");

        let actual = tga.to_bytes()?;

        #[rustfmt::skip]
        assert_eq!(actual, vec![
            0x02, 0x00, 0x03,
            0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x08, 0x00,
            b'h', b'i',
            0x10, 0x20,
        ]);
        Ok(())
    }

    #[test]
    fn written_length_matches_layout() -> Result<()> {
        let mut tga = Tga::new(9, 7, PixelDepth::Bits16, ImageType::RleTrueColor);
        tga.developer_area_mut().insert(3, vec![1, 2, 3])?;
        tga.update_postage_stamp();
        tga.rebuild_scan_line_table()?;
        tga.extension_area_mut().color_correction_table = Some(ColorCorrectionTable::default());

        let expected = tga.clone().resolve()?.file_len;
        let actual = tga.to_bytes()?;

        assert_eq!(actual.len() as u64, expected);
        Ok(())
    }

    #[test]
    fn failed_validation_writes_nothing() {
        let mut tga = Tga::new(4, 4, PixelDepth::Bits24, ImageType::UncompressedTrueColor);
        tga.extension_area_mut().postage_stamp = Some(PostageStamp {
            width: 2,
            height: 2,
            data: vec![0; 5],
        });

        let mut output = Vec::new();
        assert!(tga.write_to(&mut output).is_err());
        assert!(output.is_empty());
    }
}
