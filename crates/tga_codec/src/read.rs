//! Decoding TGA files
//!

use std::io::{Cursor, Read, Seek, SeekFrom};

use binrw::BinRead;
use tracing::{debug, instrument, warn};

use crate::bytes::read_section;
use crate::developer::DeveloperArea;
use crate::error::{Error, Result, Section};
use crate::extension::{
    ColorCorrectionTable, ExtensionArea, PostageStamp, ScanLineTable, EXTENSION_AREA_SIZE,
};
use crate::footer::Footer;
use crate::header::{Header, ImageType};
use crate::image_data::{decode_raw, decode_rle};
use crate::tga::Tga;

impl Tga {
    /// Decode an image starting at the current position of `reader`
    ///
    /// Offsets stored in the footer and extension area are taken relative to that position.
    ///
    /// ```no_run
    /// # fn doit() -> tga_codec::error::Result<()>
    /// # {
    /// use std::fs::File;
    /// use std::io::BufReader;
    ///
    /// let mut reader = BufReader::new(File::open("image.tga")?);
    /// let tga = tga_codec::Tga::read_from(&mut reader)?;
    /// println!("{}x{}", tga.width(), tga.height());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(reader), err)]
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let base = reader.stream_position()?;

        let header = Header::read(reader).map_err(|err| {
            debug!(%err, "unreadable header");
            Error::MalformedHeader
        })?;
        debug!(?header, "read header");

        let image_id = read_section(reader, header.id_length as usize, Section::ImageId)?;

        let color_map = if header.color_map_spec.length > 0 {
            read_section(reader, header.color_map_spec.data_len(), Section::ColorMap)?
        } else {
            Vec::new()
        };

        let spec = header.image_spec;
        let image_data = match header.image_type {
            ImageType::NoImageData => Vec::new(),
            kind if kind.is_rle() => decode_rle(
                reader,
                spec.width as usize,
                spec.height as usize,
                spec.pixel_depth.bytes_per_pixel(),
            )?,
            _ => decode_raw(reader, spec.data_len())?,
        };

        let mut tga = Tga {
            header,
            image_id,
            color_map,
            image_data,
            ..Default::default()
        };

        let Some(footer) = Footer::probe(reader, base)? else {
            return Ok(tga);
        };

        if footer.developer_directory_offset != 0 {
            tga.developer_area = Some(DeveloperArea::read(
                reader,
                base,
                footer.developer_directory_offset,
            )?);
        }

        if footer.extension_area_offset != 0 {
            tga.extension_area = Some(read_extension_area(
                reader,
                base,
                footer.extension_area_offset,
                &tga,
            )?);
        }

        tga.footer = Some(footer);
        Ok(tga)
    }

    /// Decode an image held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(bytes))
    }
}

#[instrument(skip(reader, tga), err)]
fn read_extension_area<R: Read + Seek>(
    reader: &mut R,
    base: u64,
    offset: u32,
    tga: &Tga,
) -> Result<ExtensionArea> {
    reader.seek(SeekFrom::Start(base + offset as u64))?;
    let mut area = ExtensionArea::read(reader)?;
    if area.extension_size < EXTENSION_AREA_SIZE {
        return Err(Error::SizeMismatch {
            section: Section::ExtensionArea,
            expected: EXTENSION_AREA_SIZE as usize,
            actual: area.extension_size as usize,
        });
    }

    if area.scan_line_offset != 0 {
        reader.seek(SeekFrom::Start(base + area.scan_line_offset as u64))?;
        area.scan_line_table = Some(ScanLineTable::read(reader, tga.height())?);
    }

    if area.postage_stamp_offset != 0 {
        reader.seek(SeekFrom::Start(base + area.postage_stamp_offset as u64))?;
        let stamp = PostageStamp::read(reader, tga.bytes_per_pixel())?;
        if stamp.width == 0 || stamp.height == 0 {
            warn!(width = stamp.width, height = stamp.height, "empty postage stamp");
        }
        area.postage_stamp = Some(stamp);
    }

    if area.color_correction_offset != 0 {
        reader.seek(SeekFrom::Start(base + area.color_correction_offset as u64))?;
        area.color_correction_table = Some(ColorCorrectionTable::read(reader)?);
    }

    Ok(area)
}
