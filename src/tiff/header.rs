//! TIFF header parsing
//!
//! The classic header is 8 bytes: byte order marker, version, and the offset
//! of the first IFD.

use log::debug;
use std::io::{Seek, SeekFrom};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{FormatError, TiffResult};

/// Parsed TIFF file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Byte order of every multi-byte value in the file
    pub byte_order: ByteOrder,
    /// Version field (always 42 for files we accept)
    pub version: u16,
    /// Offset of the first Image File Directory
    pub first_ifd_offset: u32,
}

impl FileHeader {
    /// Reads and validates the header from the start of the stream
    pub fn read(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());

        let handler = byte_order.create_handler();
        let version = handler.read_u16(reader)?;
        if version != header::TIFF_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let first_ifd_offset = handler.read_u32(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        Ok(FileHeader {
            byte_order,
            version,
            first_ifd_offset,
        })
    }

    /// Creates a byte order handler matching this header
    pub fn handler(&self) -> Box<dyn ByteOrderHandler> {
        self.byte_order.create_handler()
    }

    /// Whether samples wider than a byte need swapping to little-endian
    pub fn is_big_endian(&self) -> bool {
        self.byte_order == ByteOrder::BigEndian
    }
}
