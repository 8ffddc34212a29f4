//! The TGA 2.0 extension area and the three optional tables it points to.
//!
//! The fixed region is always 495 bytes long:
//!
//! | Offset | Size | Field                     |
//! |--------|------|---------------------------|
//! | 0      | 2    | Extension size            |
//! | 2      | 41   | Author name               |
//! | 43     | 324  | Author comments (4 x 81)  |
//! | 367    | 12   | Date/time stamp           |
//! | 379    | 41   | Job name/id               |
//! | 420    | 6    | Job time                  |
//! | 426    | 41   | Software id               |
//! | 467    | 3    | Software version          |
//! | 470    | 4    | Key color                 |
//! | 474    | 4    | Pixel aspect ratio        |
//! | 478    | 4    | Gamma value               |
//! | 482    | 4    | Color correction offset   |
//! | 486    | 4    | Postage stamp offset      |
//! | 490    | 4    | Scan line offset          |
//! | 494    | 1    | Attributes type           |
//!
//! Anything between byte 495 and the declared extension size is kept as an opaque blob.

use std::fmt;
use std::io::{Read, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use derive_more::{AsRef, Deref};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bytes::{pixel, read_section, FixedString};
use crate::error::{Result, Section, TableError};

/// Size of the fixed region of the extension area
pub const EXTENSION_AREA_SIZE: u16 = 495;

/// Number of values in the color correction table
pub const COLOR_CORRECTION_LEN: usize = 1024;

/// Largest postage stamp edge
pub const POSTAGE_STAMP_MAX: usize = 64;

/// Smallest postage stamp edge
pub const POSTAGE_STAMP_MIN: usize = 4;

/// Four lines of 80 characters plus terminator
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq, Deref)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct AuthorComments(pub [FixedString<81>; 4]);

impl AuthorComments {
    /// Spread text over the four comment lines, extra lines are dropped
    pub fn from_text(text: &str) -> Self {
        let mut comments = Self::default();
        for (line, slot) in text.lines().zip(comments.0.iter_mut()) {
            *slot = FixedString::new(line);
        }
        comments
    }

    /// The non-empty lines
    pub fn lines(&self) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
        self.0
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.as_str())
    }
}

impl fmt::Display for AuthorComments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Date and time the image was saved
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct Timestamp {
    /// 1-12
    pub month: u16,
    /// 1-31
    pub day: u16,
    /// Four digit year
    pub year: u16,
    /// 0-23
    pub hour: u16,
    /// 0-59
    pub minute: u16,
    /// 0-59
    pub second: u16,
}

impl Timestamp {
    /// Whether no timestamp was recorded
    pub fn is_unset(&self) -> bool {
        *self == Timestamp::default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Time spent on the job the image belongs to
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct JobTime {
    /// 0-65535
    pub hours: u16,
    /// 0-59
    pub minutes: u16,
    /// 0-59
    pub seconds: u16,
}

impl fmt::Display for JobTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Version of the software that created the image
///
/// `number` holds the version multiplied by 100, so 4.17 is stored as 417.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct SoftwareVersion {
    /// Version times 100
    pub number: u16,
    /// Revision letter, a space when unused
    pub letter: u8,
}

impl Default for SoftwareVersion {
    fn default() -> Self {
        Self {
            number: 0,
            letter: b' ',
        }
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.number / 100, self.number % 100)?;
        if self.letter != b' ' && self.letter != 0 {
            write!(f, "{}", self.letter as char)?;
        }
        Ok(())
    }
}

/// Background or transparent color stored as `A8R8G8B8`
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct KeyColor(pub u32);

impl KeyColor {
    /// Pack the four channels
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Alpha channel
    pub const fn a(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel
    pub const fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel
    pub const fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel
    pub const fn b(&self) -> u8 {
        self.0 as u8
    }
}

/// A ratio stored as two shorts, used for pixel aspect ratio and gamma
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct Fraction {
    /// Numerator
    pub numerator: u16,
    /// Denominator, zero when the value is unspecified
    pub denominator: u16,
}

impl Fraction {
    /// The ratio, when specified
    pub fn value(&self) -> Option<f32> {
        (self.denominator != 0).then(|| self.numerator as f32 / self.denominator as f32)
    }
}

/// How the attribute bits of each pixel should be interpreted
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributesType {
    /// No alpha data is included
    #[default]
    NoAlpha,

    /// Undefined data in the alpha field, can be ignored
    UndefinedIgnorable,

    /// Undefined data in the alpha field, should be retained
    UndefinedRetained,

    /// Useful alpha channel data
    UsefulAlpha,

    /// Pre-multiplied alpha
    PreMultiplied,

    /// Reserved value
    Reserved(u8),
}

impl AttributesType {
    /// Whether pixels carry a meaningful alpha channel
    pub const fn has_alpha(&self) -> bool {
        matches!(self, AttributesType::UsefulAlpha | AttributesType::PreMultiplied)
    }
}

impl From<u8> for AttributesType {
    fn from(value: u8) -> Self {
        match value {
            0 => AttributesType::NoAlpha,
            1 => AttributesType::UndefinedIgnorable,
            2 => AttributesType::UndefinedRetained,
            3 => AttributesType::UsefulAlpha,
            4 => AttributesType::PreMultiplied,
            v => AttributesType::Reserved(v),
        }
    }
}

impl From<AttributesType> for u8 {
    fn from(value: AttributesType) -> Self {
        match value {
            AttributesType::NoAlpha => 0,
            AttributesType::UndefinedIgnorable => 1,
            AttributesType::UndefinedRetained => 2,
            AttributesType::UsefulAlpha => 3,
            AttributesType::PreMultiplied => 4,
            AttributesType::Reserved(v) => v,
        }
    }
}

/// Absolute file offset of every scanline, one entry per row
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref, AsRef)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanLineTable(pub Vec<u32>);

impl ScanLineTable {
    /// Read `rows` offsets
    pub fn read<R: Read>(reader: &mut R, rows: usize) -> Result<Self> {
        let mut table = Vec::with_capacity(rows);
        for _ in 0..rows {
            table.push(reader.read_u32::<LittleEndian>()?);
        }
        Ok(Self(table))
    }

    /// Write every offset
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for offset in &self.0 {
            writer.write_u32::<LittleEndian>(*offset)?;
        }
        Ok(())
    }

    /// Size in the file
    pub fn byte_len(&self) -> usize {
        self.0.len() * 4
    }

    /// Check the table holds exactly one entry per row
    pub fn validate(&self, rows: usize) -> Result<()> {
        if self.0.len() != rows {
            return Err(TableError::ScanLine {
                expected: rows,
                actual: self.0.len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Color correction table of 256 `A, R, G, B` entries with 16 bits per channel
#[derive(Debug, Clone, PartialEq, Eq, Deref, AsRef)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorCorrectionTable(pub Vec<u16>);

impl Default for ColorCorrectionTable {
    /// The identity mapping, fully opaque
    fn default() -> Self {
        let mut table = Vec::with_capacity(COLOR_CORRECTION_LEN);
        for i in 0..256u16 {
            let value = i * 257;
            table.extend_from_slice(&[u16::MAX, value, value, value]);
        }
        Self(table)
    }
}

impl ColorCorrectionTable {
    /// Read all 1024 values
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut table = vec![0u16; COLOR_CORRECTION_LEN];
        reader.read_u16_into::<LittleEndian>(&mut table)?;
        Ok(Self(table))
    }

    /// Write every value
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for value in &self.0 {
            writer.write_u16::<LittleEndian>(*value)?;
        }
        Ok(())
    }

    /// Size in the file
    pub fn byte_len(&self) -> usize {
        self.0.len() * 2
    }

    /// The `[a, r, g, b]` entry for palette slot `index`
    pub fn entry(&self, index: u8) -> Option<[u16; 4]> {
        let start = index as usize * 4;
        self.0
            .get(start..start + 4)
            .map(|e| [e[0], e[1], e[2], e[3]])
    }

    /// Check the table has exactly 1024 values
    pub fn validate(&self) -> Result<()> {
        if self.0.len() != COLOR_CORRECTION_LEN {
            return Err(TableError::ColorCorrection(self.0.len()).into());
        }
        Ok(())
    }
}

/// Small uncompressed thumbnail using the pixel encoding of the main image
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PostageStamp {
    /// Width in pixels
    pub width: u8,
    /// Height in pixels
    pub height: u8,
    /// Pixels stored in the same order and format as the main image
    pub data: Vec<u8>,
}

impl PostageStamp {
    /// Read a stamp whose pixels are `bytes_per_pixel` wide
    pub fn read<R: Read>(reader: &mut R, bytes_per_pixel: usize) -> Result<Self> {
        let width = reader.read_u8()?;
        let height = reader.read_u8()?;
        let len = width as usize * height as usize * bytes_per_pixel;
        let data = read_section(reader, len, Section::PostageStamp)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Write dimensions and pixels
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.width)?;
        writer.write_u8(self.height)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    /// Size in the file
    pub fn byte_len(&self) -> usize {
        2 + self.data.len()
    }

    /// Check the dimensions agree with the pixel data
    pub fn validate(&self, bytes_per_pixel: usize) -> Result<()> {
        if (self.width == 0 || self.height == 0) && !self.data.is_empty() {
            return Err(TableError::PostageStamp {
                width: self.width,
                height: self.height,
            }
            .into());
        }

        let expected = self.width as usize * self.height as usize * bytes_per_pixel;
        if self.data.len() != expected {
            return Err(crate::error::Error::SizeMismatch {
                section: Section::PostageStamp,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Stamp dimensions for an image, keeping the aspect ratio inside 4x4..=64x64
    pub fn dimensions_for(width: usize, height: usize) -> (usize, usize) {
        let longest = width.max(height).max(1);
        let (w, h) = if longest > POSTAGE_STAMP_MAX {
            (
                width * POSTAGE_STAMP_MAX / longest,
                height * POSTAGE_STAMP_MAX / longest,
            )
        } else {
            (width, height)
        };

        (
            w.clamp(POSTAGE_STAMP_MIN, POSTAGE_STAMP_MAX),
            h.clamp(POSTAGE_STAMP_MIN, POSTAGE_STAMP_MAX),
        )
    }

    /// Nearest neighbour downsample of an uncompressed pixel buffer
    ///
    /// Returns `None` for an empty image or one with fewer pixels than its dimensions describe.
    pub fn from_image(
        pixels: &[u8],
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
    ) -> Option<Self> {
        if width == 0 || height == 0 || bytes_per_pixel == 0 {
            return None;
        }
        if pixels.len() < width * height * bytes_per_pixel {
            return None;
        }

        let (stamp_width, stamp_height) = Self::dimensions_for(width, height);
        let mut data = Vec::with_capacity(stamp_width * stamp_height * bytes_per_pixel);
        for y in 0..stamp_height {
            let source_y = y * height / stamp_height;
            for x in 0..stamp_width {
                let source_x = x * width / stamp_width;
                data.extend_from_slice(pixel(pixels, source_y * width + source_x, bytes_per_pixel));
            }
        }

        Some(Self {
            width: stamp_width as u8,
            height: stamp_height as u8,
            data,
        })
    }
}

/// The fixed region of the extension area plus the tables it references
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct ExtensionArea {
    /// Size of the fixed region plus trailing data, 495 for files written by this crate
    pub extension_size: u16,

    /// Name of the author
    pub author_name: FixedString<41>,

    /// Free form comments
    pub author_comments: AuthorComments,

    /// Date and time the image was saved
    pub timestamp: Timestamp,

    /// Name or id of the job
    pub job_name: FixedString<41>,

    /// Time spent on the job
    pub job_time: JobTime,

    /// Name of the program that created the image
    pub software_id: FixedString<41>,

    /// Version of the program that created the image
    pub software_version: SoftwareVersion,

    /// Background or transparent color
    pub key_color: KeyColor,

    /// Width to height ratio of a pixel
    pub pixel_aspect_ratio: Fraction,

    /// Gamma the image was authored for
    pub gamma: Fraction,

    /// Absolute offset of the color correction table, zero when absent
    pub color_correction_offset: u32,

    /// Absolute offset of the postage stamp, zero when absent
    pub postage_stamp_offset: u32,

    /// Absolute offset of the scan line table, zero when absent
    pub scan_line_offset: u32,

    /// Meaning of the attribute bits
    #[br(map = |value: u8| AttributesType::from(value))]
    #[bw(map = |kind: &AttributesType| u8::from(*kind))]
    pub attributes_type: AttributesType,

    /// Bytes between the fixed region and the declared extension size
    #[br(count = extension_size.saturating_sub(EXTENSION_AREA_SIZE) as usize)]
    pub trailing: Vec<u8>,

    /// Offset of every scanline
    #[brw(ignore)]
    pub scan_line_table: Option<ScanLineTable>,

    /// Thumbnail of the image
    #[brw(ignore)]
    pub postage_stamp: Option<PostageStamp>,

    /// Color correction table
    #[brw(ignore)]
    pub color_correction_table: Option<ColorCorrectionTable>,
}

impl Default for ExtensionArea {
    fn default() -> Self {
        Self {
            extension_size: EXTENSION_AREA_SIZE,
            author_name: Default::default(),
            author_comments: Default::default(),
            timestamp: Default::default(),
            job_name: Default::default(),
            job_time: Default::default(),
            software_id: Default::default(),
            software_version: Default::default(),
            key_color: Default::default(),
            pixel_aspect_ratio: Default::default(),
            gamma: Default::default(),
            color_correction_offset: 0,
            postage_stamp_offset: 0,
            scan_line_offset: 0,
            attributes_type: Default::default(),
            trailing: Vec::new(),
            scan_line_table: None,
            postage_stamp: None,
            color_correction_table: None,
        }
    }
}

impl ExtensionArea {
    /// Size of the fixed region and trailing blob in the file
    pub fn byte_len(&self) -> usize {
        EXTENSION_AREA_SIZE as usize + self.trailing.len()
    }

    /// Author comments as text
    pub fn comments(&self) -> String {
        self.author_comments.to_string()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    #[test]
    fn fixed_region_is_495_bytes() -> Result<()> {
        let area = ExtensionArea::default();

        let mut actual = Vec::new();
        area.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual.len(), EXTENSION_AREA_SIZE as usize);
        assert_eq!(&actual[..2], &[0xEF, 0x01]);
        Ok(())
    }

    #[test]
    fn fields_land_at_their_offsets() -> Result<()> {
        let area = ExtensionArea {
            author_name: FixedString::new("Tester"),
            timestamp: Timestamp {
                month: 12,
                day: 31,
                year: 1999,
                ..Default::default()
            },
            software_version: SoftwareVersion {
                number: 417,
                letter: b'b',
            },
            key_color: KeyColor::from_argb(0xFF, 0x10, 0x20, 0x30),
            gamma: Fraction {
                numerator: 22,
                denominator: 10,
            },
            scan_line_offset: 0x0102_0304,
            attributes_type: AttributesType::PreMultiplied,
            ..Default::default()
        };

        let mut actual = Vec::new();
        area.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(&actual[2..9], b"Tester\0");
        assert_eq!(&actual[367..373], &[12, 0, 31, 0, 0xCF, 0x07]);
        assert_eq!(&actual[467..470], &[0xA1, 0x01, b'b']);
        assert_eq!(&actual[470..474], &[0x30, 0x20, 0x10, 0xFF]);
        assert_eq!(&actual[478..482], &[22, 0, 10, 0]);
        assert_eq!(&actual[490..494], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(actual[494], 4);

        let decoded = ExtensionArea::read(&mut Cursor::new(actual))?;
        assert_eq!(decoded, area);
        Ok(())
    }

    #[test]
    fn trailing_bytes_are_kept() -> Result<()> {
        let area = ExtensionArea {
            extension_size: EXTENSION_AREA_SIZE + 3,
            trailing: vec![1, 2, 3],
            ..Default::default()
        };

        let mut actual = Vec::new();
        area.write(&mut Cursor::new(&mut actual))?;
        assert_eq!(actual.len(), 498);

        let decoded = ExtensionArea::read(&mut Cursor::new(actual))?;
        assert_eq!(decoded.trailing, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn typed_values_display() {
        let version = SoftwareVersion {
            number: 417,
            letter: b'b',
        };
        assert_eq!(version.to_string(), "4.17b");
        assert_eq!(SoftwareVersion::default().to_string(), "0.00");

        let time = JobTime {
            hours: 100,
            minutes: 5,
            seconds: 9,
        };
        assert_eq!(time.to_string(), "100:05:09");

        let fraction = Fraction {
            numerator: 3,
            denominator: 2,
        };
        assert_eq!(fraction.value(), Some(1.5));
        assert_eq!(Fraction::default().value(), None);

        let key = KeyColor::from_argb(1, 2, 3, 4);
        assert_eq!((key.a(), key.r(), key.g(), key.b()), (1, 2, 3, 4));
    }

    #[test]
    fn comment_lines() {
        let comments = AuthorComments::from_text("first\nsecond\nthird\nfourth\nfifth");
        assert_eq!(comments[3].as_str(), "fourth");
        assert_eq!(comments.to_string(), "first\nsecond\nthird\nfourth");

        let comments = AuthorComments::from_text("only");
        assert_eq!(comments.lines().count(), 1);
        assert_eq!(comments.to_string(), "only");
    }

    #[test]
    fn table_dimensions_are_checked() {
        assert!(ScanLineTable(vec![0; 3]).validate(3).is_ok());
        assert!(matches!(
            ScanLineTable(vec![0; 2]).validate(3),
            Err(Error::InvalidTableDimensions(TableError::ScanLine { .. }))
        ));

        assert!(ColorCorrectionTable::default().validate().is_ok());
        assert!(matches!(
            ColorCorrectionTable(vec![0; 12]).validate(),
            Err(Error::InvalidTableDimensions(TableError::ColorCorrection(12)))
        ));

        let stamp = PostageStamp {
            width: 0,
            height: 4,
            data: vec![1],
        };
        assert!(matches!(
            stamp.validate(1),
            Err(Error::InvalidTableDimensions(TableError::PostageStamp { .. }))
        ));

        let stamp = PostageStamp {
            width: 2,
            height: 2,
            data: vec![1, 2, 3],
        };
        assert!(matches!(stamp.validate(1), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn tables_read_back() -> Result<()> {
        let table = ColorCorrectionTable::default();
        let mut bytes = Vec::new();
        table.write(&mut bytes)?;
        assert_eq!(bytes.len(), 2048);
        assert_eq!(ColorCorrectionTable::read(&mut Cursor::new(bytes))?, table);
        assert_eq!(table.entry(1), Some([u16::MAX, 257, 257, 257]));

        let stamp = PostageStamp {
            width: 2,
            height: 1,
            data: vec![1, 2, 3, 4, 5, 6],
        };
        let mut bytes = Vec::new();
        stamp.write(&mut bytes)?;
        assert_eq!(bytes, vec![2, 1, 1, 2, 3, 4, 5, 6]);
        assert_eq!(PostageStamp::read(&mut Cursor::new(bytes), 3)?, stamp);
        Ok(())
    }

    #[test]
    fn stamp_dimensions_keep_aspect() {
        assert_eq!(PostageStamp::dimensions_for(256, 128), (64, 32));
        assert_eq!(PostageStamp::dimensions_for(100, 1000), (6, 64));
        assert_eq!(PostageStamp::dimensions_for(2, 2), (4, 4));
        assert_eq!(PostageStamp::dimensions_for(30, 20), (30, 20));
        assert_eq!(PostageStamp::dimensions_for(1000, 10), (64, 4));
    }

    #[test]
    fn stamp_samples_nearest_pixel() {
        // 8x8 single byte image where every pixel stores its own column
        let pixels: Vec<u8> = (0..64u8).map(|i| i % 8).collect();
        let stamp = PostageStamp::from_image(&pixels, 8, 8, 1).unwrap();

        assert_eq!((stamp.width, stamp.height), (8, 8));
        assert_eq!(stamp.data, pixels);

        let pixels: Vec<u8> = (0..128 * 128u32).map(|i| (i % 128) as u8).collect();
        let stamp = PostageStamp::from_image(&pixels, 128, 128, 1).unwrap();
        assert_eq!((stamp.width, stamp.height), (64, 64));
        assert_eq!(&stamp.data[..4], &[0, 2, 4, 6]);

        assert!(PostageStamp::from_image(&[], 0, 0, 3).is_none());
    }

    #[test]
    fn stamp_needs_every_pixel() {
        assert!(PostageStamp::from_image(&[], 3, 2, 4).is_none());
        assert!(PostageStamp::from_image(&[0; 23], 3, 2, 4).is_none());
        assert!(PostageStamp::from_image(&[0; 24], 3, 2, 4).is_some());
    }
}
