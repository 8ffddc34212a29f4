//! This library handles reading from and creating Truevision **TGA** images, including the
//! sections added by the TGA 2.0 "new format".
//!
//! # TGA Format Documentation
//!
//! A TGA file is a fixed header followed by a handful of variable length sections. Legacy files
//! stop after the pixel data. New format files add a developer area, an extension area and a
//! footer whose signature marks the file as TGA 2.0.
//!
//! ## File Structure
//!
//! | Section                 | Size                                   | Present             |
//! |-------------------------|----------------------------------------|---------------------|
//! | Header                  | 18 bytes                               | Always              |
//! | Image ID                | `id_length` bytes                      | When non-empty      |
//! | Color Map               | `length * ceil(entry_size / 8)` bytes  | When color mapped   |
//! | Image Data              | Raw or run-length packets              | Unless no data      |
//! | Developer Area          | Blobs, then `2 + 10 * n` directory     | New format only     |
//! | Extension Area          | 495 bytes plus trailing data           | New format only     |
//! | Extension Tables        | Scan lines, postage stamp, correction  | New format only     |
//! | Footer                  | 26 bytes                               | New format only     |
//!
//! ### Header
//!
//! | Offset (bytes) | Field                  | Description                                         |
//! |----------------|------------------------|-----------------------------------------------------|
//! | 0x0000         | ID Length              | 1 byte: Length of the image id field                |
//! | 0x0001         | Color Map Type         | 1 byte: 0 for none, 1 when a color map is present   |
//! | 0x0002         | Image Type             | 1 byte: Pixel data type and compression             |
//! | 0x0003         | First Entry Index      | 2 bytes: Index of the first color map entry         |
//! | 0x0005         | Color Map Length       | 2 bytes: Number of color map entries                |
//! | 0x0007         | Color Map Entry Size   | 1 byte: 15, 16, 24 or 32 bits per entry             |
//! | 0x0008         | X Origin               | 2 bytes: Horizontal screen position                 |
//! | 0x000A         | Y Origin               | 2 bytes: Vertical screen position                   |
//! | 0x000C         | Width                  | 2 bytes: Width in pixels                            |
//! | 0x000E         | Height                 | 2 bytes: Height in pixels                           |
//! | 0x0010         | Pixel Depth            | 1 byte: 8, 16, 24 or 32 bits per pixel              |
//! | 0x0011         | Image Descriptor       | 1 byte: Alpha bits and pixel ordering               |
//!
//! The image types understood by this crate are:
//!
//! - `0`: No image data
//! - `1`: Uncompressed, color mapped
//! - `2`: Uncompressed, true color
//! - `3`: Uncompressed, black and white
//! - `9`: Run-length encoded, color mapped
//! - `10`: Run-length encoded, true color
//! - `11`: Run-length encoded, black and white
//!
//! Any other value is preserved as read and its pixels are kept as an uncompressed block.
//!
//! ### Image Data
//!
//! Pixels are stored as whole bytes per pixel in little endian order, so true color pixels are
//! `B, G, R` or `B, G, R, A`. Run-length packets start with a control byte: the top bit selects a
//! run of one repeated pixel, the low seven bits hold the pixel count minus one. This crate never
//! lets a packet cross a scanline when encoding, but accepts such packets when decoding.
//!
//! ### Developer Area
//!
//! Private data blocks addressed by a 16 bit tag. The blocks come first, then a directory of
//! `tag: u16, offset: u32, size: u32` records preceded by a 16 bit count.
//!
//! ### Extension Area
//!
//! A 495 byte block of metadata: author, comments, timestamps, job information, software version,
//! key color, pixel aspect ratio, gamma and the meaning of the alpha bits. It also holds the
//! offsets of three optional tables: one offset per scanline, a postage stamp thumbnail of at most
//! 64x64 pixels and a 256 entry color correction table.
//!
//! ### Footer
//!
//! | Offset (bytes) | Field                  | Description                                         |
//! |----------------|------------------------|-----------------------------------------------------|
//! | 0x0000         | Extension Offset       | 4 bytes: Offset of the extension area, or zero      |
//! | 0x0004         | Developer Offset       | 4 bytes: Offset of the developer directory, or zero |
//! | 0x0008         | Signature              | 16 bytes: `TRUEVISION-XFILE`                        |
//! | 0x0018         | Reserved               | 1 byte: `.`                                         |
//! | 0x0019         | Terminator             | 1 byte: `0x00`                                      |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tga`, `.targa`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Offsets**: Absolute from the start of the file
//!

pub mod bytes;
pub mod color_map;
pub mod developer;
pub mod error;
pub mod extension;
pub mod footer;
pub mod header;
pub mod image_data;
pub mod layout;
pub mod raster;
pub mod read;
#[cfg(feature = "serde")]
mod serde;
pub mod tga;
pub mod write;

pub use bytes::FixedString;
pub use developer::DeveloperArea;
pub use extension::{AttributesType, ExtensionArea, PostageStamp};
pub use footer::Footer;
pub use header::{Header, ImageOrigin, ImageType, PixelDepth};
pub use raster::{PixelFormat, RasterImage, RasterOptions, Rgba};
pub use tga::Tga;
