//! Tag addressed private data blocks and the directory that locates them.
//!
//! Every blob is written first, in tag order, and the directory follows them:
//!
//! | Size   | Field                        |
//! |--------|------------------------------|
//! | 2      | Number of entries            |
//! | 10 x n | `tag: u16, offset: u32, size: u32` |

use std::io::{Read, Seek, SeekFrom, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bytes::read_section;
use crate::error::{Error, Result, Section};

/// Size of one directory record
pub const DIRECTORY_ENTRY_SIZE: usize = 10;

/// One record of the developer directory
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DirectoryEntry {
    /// Developer tag
    pub tag: u16,
    /// Absolute offset of the blob
    pub offset: u32,
    /// Length of the blob
    pub size: u32,
}

/// A private data block
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeveloperEntry {
    /// Absolute offset of the data, assigned when the file is written
    pub offset: u32,
    /// The data itself
    pub data: Vec<u8>,
}

impl DeveloperEntry {
    /// An entry whose offset is not known yet
    pub fn new(data: Vec<u8>) -> Self {
        Self { offset: 0, data }
    }
}

/// The developer area, keyed by tag
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeveloperArea {
    /// Entries in directory order
    pub entries: IndexMap<u16, DeveloperEntry>,
}

impl DeveloperArea {
    /// Add an entry, a tag can only be used once
    pub fn insert(&mut self, tag: u16, data: Vec<u8>) -> Result<()> {
        if self.entries.contains_key(&tag) {
            return Err(Error::DuplicateDeveloperTag(tag));
        }
        self.entries.insert(tag, DeveloperEntry::new(data));
        Ok(())
    }

    /// Data stored under `tag`
    pub fn get(&self, tag: u16) -> Option<&[u8]> {
        self.entries.get(&tag).map(|entry| entry.data.as_slice())
    }

    /// Remove and return the data stored under `tag`
    pub fn remove(&mut self, tag: u16) -> Option<Vec<u8>> {
        self.entries.shift_remove(&tag).map(|entry| entry.data)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the directory that describes these entries
    pub fn directory_len(&self) -> usize {
        2 + self.entries.len() * DIRECTORY_ENTRY_SIZE
    }

    /// Size of every blob together
    pub fn data_len(&self) -> usize {
        self.entries.values().map(|entry| entry.data.len()).sum()
    }

    /// Drop empty entries and put the rest in tag order
    pub fn normalize(&mut self) {
        self.entries.retain(|_, entry| !entry.data.is_empty());
        self.entries.sort_keys();
    }

    /// Read the directory at `base + directory_offset` and every blob it points to
    #[instrument(skip(reader), err)]
    pub fn read<R: Read + Seek>(reader: &mut R, base: u64, directory_offset: u32) -> Result<Self> {
        reader.seek(SeekFrom::Start(base + directory_offset as u64))?;
        let count = reader.read_u16::<LittleEndian>()?;

        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(DirectoryEntry::read(reader)?);
        }

        let mut area = Self::default();
        for record in records {
            debug!(tag = record.tag, offset = record.offset, size = record.size, "developer entry");
            reader.seek(SeekFrom::Start(base + record.offset as u64))?;
            let data = read_section(reader, record.size as usize, Section::DeveloperData)?;

            if area.entries.contains_key(&record.tag) {
                return Err(Error::DuplicateDeveloperTag(record.tag));
            }
            area.entries.insert(
                record.tag,
                DeveloperEntry {
                    offset: record.offset,
                    data,
                },
            );
        }

        Ok(area)
    }

    /// Write every blob followed by the directory
    ///
    /// Offsets must already have been assigned.
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        for entry in self.entries.values() {
            writer.write_all(&entry.data)?;
        }

        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        for (tag, entry) in &self.entries {
            DirectoryEntry {
                tag: *tag,
                offset: entry.offset,
                size: entry.data.len() as u32,
            }
            .write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Result<DeveloperArea> {
        let mut area = DeveloperArea::default();
        area.insert(7, vec![0xAA, 0xBB])?;
        area.insert(2, vec![0x01])?;
        area.insert(5, vec![])?;
        Ok(area)
    }

    #[test]
    fn duplicate_tags_are_rejected() -> Result<()> {
        let mut area = sample()?;
        assert!(matches!(
            area.insert(7, vec![1]),
            Err(Error::DuplicateDeveloperTag(7))
        ));
        Ok(())
    }

    #[test]
    fn normalize_drops_empty_and_sorts() -> Result<()> {
        let mut area = sample()?;
        area.normalize();

        assert_eq!(area.entries.keys().copied().collect::<Vec<_>>(), vec![2, 7]);
        assert_eq!(area.data_len(), 3);
        assert_eq!(area.directory_len(), 22);
        Ok(())
    }

    #[test]
    fn write_then_read_directory() -> Result<()> {
        let mut area = sample()?;
        area.normalize();
        for (entry, offset) in area.entries.values_mut().zip([4, 5]) {
            entry.offset = offset;
        }

        let mut buffer = Cursor::new(vec![0u8; 4]);
        buffer.seek(SeekFrom::End(0))?;
        area.write(&mut buffer)?;
        let bytes = buffer.into_inner();

        #[rustfmt::skip]
        assert_eq!(&bytes[4..], &[
            0x01, 0xAA, 0xBB,
            0x02, 0x00,
            0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x05, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
        ]);

        let decoded = DeveloperArea::read(&mut Cursor::new(bytes), 0, 7)?;
        assert_eq!(decoded, area);
        assert_eq!(decoded.get(7), Some(&[0xAA, 0xBB][..]));
        Ok(())
    }

    #[test]
    fn oversized_record_fails_cleanly() {
        #[rustfmt::skip]
        let bytes = [
            0x01, 0x00,
            0x09, 0x00, 0x0C, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xAA, 0xBB,
        ];

        assert!(matches!(
            DeveloperArea::read(&mut Cursor::new(bytes), 0, 0),
            Err(Error::SizeMismatch {
                section: Section::DeveloperData,
                expected: 0xFFFF_FFFF,
                actual: 2,
            })
        ));
    }

    #[test]
    fn duplicate_tags_in_a_directory_fail() {
        #[rustfmt::skip]
        let bytes = [
            0x02, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        assert!(matches!(
            DeveloperArea::read(&mut Cursor::new(bytes), 0, 0),
            Err(Error::DuplicateDeveloperTag(3))
        ));
    }
}
