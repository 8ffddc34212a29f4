//! Palette encoding and decoding for the four color map entry widths.
//!
//! Entries are stored little endian, so a 24 bit entry is the byte sequence `B, G, R` and a 16 bit
//! entry is the word `ARRRRRGG GGGBBBBB`.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::instrument;

use crate::error::{Error, Result, Section};
use crate::header::ColorMapEntrySize;
use crate::raster::Rgba;

/// Alpha values at or above this are treated as opaque when choosing an entry width
const OPAQUE_THRESHOLD: u8 = 248;

/// Expand a 5 bit channel to 8 bits
#[inline]
pub(crate) const fn expand5(value: u16) -> u8 {
    ((value & 0x1F) as u32 * 255 / 31) as u8
}

/// Reduce an 8 bit channel to 5 bits
#[inline]
pub(crate) const fn reduce5(value: u8) -> u16 {
    (value as u16 * 32) / 256
}

/// Unpack an `A1R5G5B5` word, ignoring the attribute bit unless `with_alpha` is set
pub(crate) fn unpack_555(word: u16, with_alpha: bool) -> Rgba {
    Rgba {
        r: expand5(word >> 10),
        g: expand5(word >> 5),
        b: expand5(word),
        a: if !with_alpha || word & 0x8000 != 0 {
            255
        } else {
            0
        },
    }
}

/// Pack a color into an `A1R5G5B5` word, the top bit is set for alpha of 128 and above
pub(crate) fn pack_555(color: Rgba, with_alpha: bool) -> u16 {
    let mut word = (reduce5(color.r) << 10) | (reduce5(color.g) << 5) | reduce5(color.b);
    if with_alpha && color.a >= 128 {
        word |= 0x8000;
    }
    word
}

/// Decode color map bytes into a palette
///
/// Entries of widths other than 15, 16, 24 and 32 bits cannot be interpreted and yield an
/// [`Error::UnsupportedPixelFormat`].
#[instrument(skip(data), err)]
pub fn decode_palette(data: &[u8], entry_size: ColorMapEntrySize) -> Result<Vec<Rgba>> {
    let width = entry_size.bytes_per_entry();
    if width == 0 {
        return Err(Error::UnsupportedPixelFormat(format!(
            "{} bit color map entries",
            entry_size.bits()
        )));
    }
    if data.len() % width != 0 {
        return Err(Error::SizeMismatch {
            section: Section::ColorMap,
            expected: data.len() - data.len() % width,
            actual: data.len(),
        });
    }

    let mut reader = data;
    let mut palette = Vec::with_capacity(data.len() / width);
    for _ in 0..data.len() / width {
        let color = match entry_size {
            ColorMapEntrySize::Bits15 => unpack_555(reader.read_u16::<LittleEndian>()?, false),
            ColorMapEntrySize::Bits16 => unpack_555(reader.read_u16::<LittleEndian>()?, true),
            ColorMapEntrySize::Bits24 => {
                let b = reader.read_u8()?;
                let g = reader.read_u8()?;
                let r = reader.read_u8()?;
                Rgba { r, g, b, a: 255 }
            }
            ColorMapEntrySize::Bits32 => {
                let b = reader.read_u8()?;
                let g = reader.read_u8()?;
                let r = reader.read_u8()?;
                let a = reader.read_u8()?;
                Rgba { r, g, b, a }
            }
            ColorMapEntrySize::Other(bits) => {
                return Err(Error::UnsupportedPixelFormat(format!(
                    "{bits} bit color map entries"
                )))
            }
        };
        palette.push(color);
    }

    Ok(palette)
}

/// Whether a palette makes use of its alpha channel
///
/// A palette whose entries are all (nearly) opaque, or all fully transparent, carries no useful
/// alpha information.
pub fn palette_uses_alpha(palette: &[Rgba]) -> bool {
    palette.iter().any(|c| c.a < OPAQUE_THRESHOLD) && palette.iter().any(|c| c.a != 0)
}

/// Encode a palette, returning the chosen entry width and the color map bytes
///
/// With `two_byte_entries` the palette is stored as 15 bit entries, or 16 bit entries when alpha is
/// in use. Otherwise 24 or 32 bit entries are chosen the same way.
#[instrument(skip(palette), err)]
pub fn encode_palette(
    palette: &[Rgba],
    two_byte_entries: bool,
) -> Result<(ColorMapEntrySize, Vec<u8>)> {
    let with_alpha = palette_uses_alpha(palette);
    let entry_size = match (two_byte_entries, with_alpha) {
        (true, false) => ColorMapEntrySize::Bits15,
        (true, true) => ColorMapEntrySize::Bits16,
        (false, false) => ColorMapEntrySize::Bits24,
        (false, true) => ColorMapEntrySize::Bits32,
    };

    let mut data = Vec::with_capacity(palette.len() * entry_size.bytes_per_entry());
    for color in palette {
        match entry_size {
            ColorMapEntrySize::Bits15 | ColorMapEntrySize::Bits16 => {
                data.write_u16::<LittleEndian>(pack_555(*color, with_alpha))?
            }
            ColorMapEntrySize::Bits24 => data.extend_from_slice(&[color.b, color.g, color.r]),
            _ => data.extend_from_slice(&[color.b, color.g, color.r, color.a]),
        }
    }

    Ok((entry_size, data))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_24_bit_entries() -> Result<()> {
        let data = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00];
        let palette = decode_palette(&data, ColorMapEntrySize::Bits24)?;

        assert_eq!(
            palette,
            vec![
                Rgba::new(255, 0, 0, 255),
                Rgba::new(0, 0, 255, 255),
            ]
        );
        Ok(())
    }

    #[test]
    fn decode_16_bit_entries_use_attribute_bit() -> Result<()> {
        // 0x7C00 is pure red without the attribute bit, 0x83E0 is green with it
        let data = [0x00, 0x7C, 0xE0, 0x83];

        let palette = decode_palette(&data, ColorMapEntrySize::Bits16)?;
        assert_eq!(
            palette,
            vec![Rgba::new(255, 0, 0, 0), Rgba::new(0, 255, 0, 255)]
        );

        let palette = decode_palette(&data, ColorMapEntrySize::Bits15)?;
        assert_eq!(
            palette,
            vec![Rgba::new(255, 0, 0, 255), Rgba::new(0, 255, 0, 255)]
        );
        Ok(())
    }

    #[test]
    fn unknown_entry_width_is_unsupported() {
        assert!(matches!(
            decode_palette(&[0u8; 4], ColorMapEntrySize::Other(0)),
            Err(Error::UnsupportedPixelFormat(_))
        ));
        assert!(matches!(
            decode_palette(&[0u8; 4], ColorMapEntrySize::Other(12)),
            Err(Error::UnsupportedPixelFormat(_))
        ));
    }

    #[test]
    fn choose_entry_width_from_alpha() -> Result<()> {
        let opaque = [Rgba::new(1, 2, 3, 255), Rgba::new(4, 5, 6, 250)];
        let translucent = [Rgba::new(1, 2, 3, 255), Rgba::new(4, 5, 6, 0)];
        let invisible = [Rgba::new(1, 2, 3, 0)];

        assert_eq!(encode_palette(&opaque, false)?.0, ColorMapEntrySize::Bits24);
        assert_eq!(encode_palette(&opaque, true)?.0, ColorMapEntrySize::Bits15);
        assert_eq!(encode_palette(&translucent, false)?.0, ColorMapEntrySize::Bits32);
        assert_eq!(encode_palette(&translucent, true)?.0, ColorMapEntrySize::Bits16);
        assert_eq!(encode_palette(&invisible, false)?.0, ColorMapEntrySize::Bits24);
        Ok(())
    }

    #[test]
    fn wide_entries_round_trip_exactly() -> Result<()> {
        let palette: Vec<Rgba> = (0..=255u8)
            .map(|v| Rgba::new(v, 255 - v, v / 2, v))
            .collect();

        let (size, data) = encode_palette(&palette, false)?;
        assert_eq!(size, ColorMapEntrySize::Bits32);
        assert_eq!(decode_palette(&data, size)?, palette);
        Ok(())
    }

    #[test]
    fn five_bit_quantization_stays_close() -> Result<()> {
        let palette: Vec<Rgba> = (0..=255u8)
            .map(|v| Rgba::new(v, v.wrapping_mul(7), 255 - v, 255))
            .collect();

        let (size, data) = encode_palette(&palette, true)?;
        assert_eq!(size, ColorMapEntrySize::Bits15);

        let decoded = decode_palette(&data, size)?;
        for (source, actual) in palette.iter().zip(&decoded) {
            for (s, a) in [(source.r, actual.r), (source.g, actual.g), (source.b, actual.b)] {
                assert!((s as i32 - a as i32).abs() as f32 <= 255.0 / 31.0);
            }
            assert_eq!(actual.a, 255);
        }
        Ok(())
    }
}
