//! Error types that can be emitted from this library

use derive_more::Display;
use miette::Diagnostic;
use thiserror::Error;

/// The file sections whose byte length is checked against their declared dimensions
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    /// The image identification field following the header
    #[display("image id")]
    ImageId,

    /// The color map data
    #[display("color map")]
    ColorMap,

    /// The decoded pixel buffer
    #[display("image data")]
    ImageData,

    /// The fixed region of the extension area
    #[display("extension area")]
    ExtensionArea,

    /// The postage stamp pixel buffer
    #[display("postage stamp")]
    PostageStamp,

    /// A data block of the developer area
    #[display("developer data")]
    DeveloperData,
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// the fixed 18 byte header is truncated or unreadable
    #[error("malformed tga header")]
    MalformedHeader,

    /// a section's length disagrees with its declared dimensions
    #[error("{section} is {actual} bytes but {expected} bytes were expected")]
    SizeMismatch {
        /// The section that failed validation
        section: Section,
        /// The length implied by the header or extension area
        expected: usize,
        /// The length actually present
        actual: usize,
    },

    /// two developer entries share a tag
    #[error("developer tag {0} is used more than once")]
    DuplicateDeveloperTag(u16),

    /// an extension area table has invalid dimensions
    #[error("invalid table dimensions: {0}")]
    InvalidTableDimensions(#[from] TableError),

    /// the raster adapter cannot map this pixel layout
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// a resolved section offset does not fit in 32 bits
    #[error("offset {0} does not fit in a tga file")]
    OffsetOverflow(u64),
}

/// Error type to provide further information when an extension table is invalid
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum TableError {
    /// the scan line table must hold one offset per row
    #[error("scan line table has {actual} entries but the image has {expected} rows")]
    ScanLine {
        /// Image height
        expected: usize,
        /// Table length
        actual: usize,
    },

    /// the color correction table must hold exactly 1024 values
    #[error("color correction table has {0} values instead of 1024")]
    ColorCorrection(usize),

    /// a postage stamp carries data but has a zero dimension
    #[error("postage stamp is {width}x{height} but carries data")]
    PostageStamp {
        /// Stamp width
        width: u8,
        /// Stamp height
        height: u8,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
