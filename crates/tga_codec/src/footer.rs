//! The 26 byte trailer that marks a file as TGA 2.0.

use std::io::{Read, Seek, SeekFrom};

use binrw::{BinRead, BinWrite};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// Size of the footer in bytes
pub const FOOTER_SIZE: u64 = 26;

/// Signature stored in every 2.0 footer
pub const SIGNATURE: &[u8; 16] = b"TRUEVISION-XFILE";

/// Footer of a new format file
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[brw(little)]
pub struct Footer {
    /// Offset of the extension area, zero when absent
    pub extension_area_offset: u32,
    /// Offset of the developer directory, zero when absent
    pub developer_directory_offset: u32,
    /// Always `TRUEVISION-XFILE`
    pub signature: [u8; 16],
    /// Always `.`
    pub reserved: u8,
    /// Always NUL
    pub terminator: u8,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            extension_area_offset: 0,
            developer_directory_offset: 0,
            signature: *SIGNATURE,
            reserved: b'.',
            terminator: 0,
        }
    }
}

impl Footer {
    /// Whether the trailer carries the 2.0 signature
    pub fn is_valid(&self) -> bool {
        &self.signature == SIGNATURE && self.reserved == b'.' && self.terminator == 0
    }

    /// Look for a footer in the last 26 bytes of the stream
    ///
    /// `base` is the position the image starts at. Returns `None` for legacy files.
    #[instrument(skip(reader), err)]
    pub fn probe<R: Read + Seek>(reader: &mut R, base: u64) -> Result<Option<Self>> {
        let end = reader.seek(SeekFrom::End(0))?;
        if end < base + FOOTER_SIZE {
            warn!("stream too short for a footer");
            return Ok(None);
        }

        reader.seek(SeekFrom::Start(end - FOOTER_SIZE))?;
        let footer = Footer::read(reader)?;
        if footer.is_valid() {
            debug!(?footer, "found footer");
            Ok(Some(footer))
        } else {
            debug!("no footer signature, reading as legacy format");
            Ok(None)
        }
    }
}
