//! Fixed width field packing and small buffer helpers shared by the section codecs.

use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::fmt;
use std::io::{self, Read, Seek, Write};

use crate::error::{Error, Result, Section};

/// Number of whole bytes needed to store `bits` bits
#[inline]
pub const fn bytes_for_bits(bits: u8) -> usize {
    (bits as usize).div_ceil(8)
}

/// Convert an absolute stream position into a 32 bit file offset
pub fn checked_offset(position: u64) -> Result<u32> {
    u32::try_from(position).map_err(|_| Error::OffsetOverflow(position))
}

/// Largest buffer reserved before any data has been read
const MAX_PREALLOCATION: usize = 1 << 20;

/// Read up to `len` bytes, growing the buffer only as data arrives
fn read_up_to<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(len.min(MAX_PREALLOCATION));
    reader.by_ref().take(len as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Read exactly `len` bytes into a new buffer
pub fn read_vec<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let buffer = read_up_to(reader, len)?;
    if buffer.len() < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes but the stream held {}", len, buffer.len()),
        ));
    }
    Ok(buffer)
}

/// Read the `len` bytes of `section`, a stream that ends early is a [`Error::SizeMismatch`]
pub fn read_section<R: Read>(reader: &mut R, len: usize, section: Section) -> Result<Vec<u8>> {
    let buffer = read_up_to(reader, len)?;
    if buffer.len() < len {
        return Err(Error::SizeMismatch {
            section,
            expected: len,
            actual: buffer.len(),
        });
    }
    Ok(buffer)
}

/// Turn an early end of stream inside `section` into a [`Error::SizeMismatch`]
pub(crate) fn short_read(err: io::Error, section: Section, expected: usize, actual: usize) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::SizeMismatch {
            section,
            expected,
            actual,
        }
    } else {
        Error::IOError(err)
    }
}

/// The bytes of pixel `index` in a packed buffer of `bytes_per_pixel` wide pixels
#[inline]
pub fn pixel(buffer: &[u8], index: usize, bytes_per_pixel: usize) -> &[u8] {
    &buffer[index * bytes_per_pixel..(index + 1) * bytes_per_pixel]
}

/// A NUL padded ASCII field of exactly `N` bytes
///
/// Text stored through [`FixedString::new`] is truncated to `N - 1` bytes so the field always ends
/// with a terminator. Bytes read from a file are kept verbatim, including anything after the first
/// NUL, so that a decoded field writes back unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize>([u8; N]);

impl<const N: usize> FixedString<N> {
    /// Pack `text` into the field
    pub fn new(text: &str) -> Self {
        let mut field = [0u8; N];
        let len = text.len().min(N.saturating_sub(1));
        field[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self(field)
    }

    /// Wrap raw field bytes
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// The text before the first NUL
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.trimmed())
    }

    /// The bytes before the first NUL
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(N);
        &self.0[..end]
    }

    /// Whether the field holds no text
    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// The raw field, padding included
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl<const N: usize> From<&str> for FixedString<N> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> BinRead for FixedString<N> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        <[u8; N]>::read_options(reader, endian, args).map(Self)
    }
}

impl<const N: usize> BinWrite for FixedString<N> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.0.write_options(writer, endian, args)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::{bytes_for_bits, checked_offset, read_section, read_vec, FixedString};
    use crate::error::{Error, Result, Section};

    #[test]
    fn bits_round_up_to_bytes() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(15), 2);
        assert_eq!(bytes_for_bits(16), 2);
        assert_eq!(bytes_for_bits(24), 3);
        assert_eq!(bytes_for_bits(32), 4);
    }

    #[test]
    fn offsets_past_u32_are_rejected() {
        assert_eq!(checked_offset(26).unwrap(), 26);
        assert!(matches!(
            checked_offset(u32::MAX as u64 + 1),
            Err(Error::OffsetOverflow(_))
        ));
    }

    #[test]
    fn short_sections_report_their_length() -> Result<()> {
        let mut reader = Cursor::new([1u8, 2, 3, 4]);
        assert_eq!(read_section(&mut reader, 3, Section::ColorMap)?, vec![1, 2, 3]);

        assert!(matches!(
            read_section(&mut reader, 2, Section::ColorMap),
            Err(Error::SizeMismatch {
                section: Section::ColorMap,
                expected: 2,
                actual: 1,
            })
        ));
        Ok(())
    }

    #[test]
    fn huge_declared_lengths_fail_without_allocating() {
        // a length no allocator could satisfy is only a short read
        let len = usize::MAX / 2;
        assert!(matches!(
            read_section(&mut Cursor::new([0u8; 8]), len, Section::ImageData),
            Err(Error::SizeMismatch { actual: 8, .. })
        ));

        let err = read_vec(&mut Cursor::new([0u8; 8]), len).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn fixed_string_keeps_a_terminator() {
        let field = FixedString::<4>::new("Tester");
        assert_eq!(field.as_bytes(), b"Tes\0");
        assert_eq!(field.as_str(), "Tes");
    }

    #[test]
    fn fixed_string_stops_at_first_nul() {
        let field = FixedString::from_bytes(*b"ab\0cd\0");
        assert_eq!(field.as_str(), "ab");
        assert!(!field.is_empty());
        assert!(FixedString::<6>::default().is_empty());
    }

    #[test]
    fn fixed_string_writes_verbatim() -> Result<()> {
        let input = *b"ab\0cd\0";
        let field = FixedString::<6>::read_le(&mut Cursor::new(input))?;

        let mut actual = Vec::new();
        field.write_le(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, input.to_vec());
        Ok(())
    }
}
