//! TIFF file reader implementation
//!
//! Reads the header and walks the linked list of IFDs. Pixel data is not
//! touched here; see the extractor module for strip decoding.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::{seek_to, stream_len, SeekableReader};
use crate::tiff::constants::{directory, header};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::header::FileHeader;
use crate::tiff::ifd::{ImageFileDirectory, TagEntry};
use crate::tiff::types::TiffFile;

/// Default upper bound on the number of IFDs in one chain
pub const DEFAULT_MAX_DIRECTORIES: usize = 65_536;

/// Reader for classic TIFF files
pub struct TiffReader {
    /// Byte order handler, set once the header has been read
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Refuse chains longer than this
    max_directories: usize,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIRECTORIES)
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new(max_directories: usize) -> Self {
        TiffReader {
            byte_order_handler: None,
            max_directories,
        }
    }

    /// Loads the header and IFD chain of a TIFF file from disk
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> TiffResult<TiffFile> {
        info!("Loading TIFF file: {}", path.as_ref().display());
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        self.read(&mut reader)
    }

    /// Reads the header and every IFD from the given reader
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TiffFile> {
        let header = FileHeader::read(reader)?;
        self.byte_order_handler = Some(header.handler());

        let ifds = self.read_ifd_chain(reader, header.first_ifd_offset as u64)?;
        info!("Read {} IFDs from TIFF file", ifds.len());

        Ok(TiffFile { header, ifds })
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| FormatError::InvalidDirectory {
                offset: 0,
                reason: "byte order not yet determined".to_string(),
            })
    }

    /// Walks the IFD chain starting at `first_ifd_offset`
    ///
    /// Offsets that fall outside the file or that were already visited stop
    /// the decode; a cyclic chain would otherwise never terminate.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64) -> TiffResult<Vec<ImageFileDirectory>> {
        let file_size = stream_len(reader)?;
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 {
            if ifds.len() >= self.max_directories {
                return Err(FormatError::InvalidDirectory {
                    offset: ifd_offset,
                    reason: format!("chain longer than {} directories", self.max_directories),
                });
            }
            if ifd_offset < header::HEADER_SIZE || ifd_offset >= file_size {
                return Err(FormatError::InvalidDirectory {
                    offset: ifd_offset,
                    reason: format!("offset outside file of {} bytes", file_size),
                });
            }
            if !visited.insert(ifd_offset) {
                return Err(FormatError::InvalidDirectory {
                    offset: ifd_offset,
                    reason: "IFD chain loops back to an earlier directory".to_string(),
                });
            }

            debug!("Reading IFD #{} at offset: {}", ifds.len(), ifd_offset);
            let ifd = self.read_ifd(reader, ifd_offset, ifds.len())?;
            ifd_offset = ifd.next_ifd_offset as u64;
            ifds.push(ifd);
        }

        if ifds.is_empty() {
            return Err(FormatError::InvalidDirectory {
                offset: first_ifd_offset,
                reason: "file contains no image directories".to_string(),
            });
        }

        Ok(ifds)
    }

    /// Reads one IFD: entry count, tag records, next-IFD offset
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<ImageFileDirectory> {
        let handler = self.handler()?;
        let byte_order = handler.byte_order();
        seek_to(reader, offset)?;

        let entry_count = handler.read_u16(reader).map_err(|e| truncated(e, offset))?;
        if entry_count == 0 {
            return Err(FormatError::InvalidDirectory {
                offset,
                reason: "IFD has no entries".to_string(),
            });
        }
        debug!("IFD entry count: {}", entry_count);

        let mut table = vec![0u8; entry_count as usize * directory::ENTRY_SIZE as usize];
        reader.read_exact(&mut table).map_err(|e| truncated(e, offset))?;

        let mut ifd = ImageFileDirectory::new(number, offset);
        for record in table.chunks_exact(directory::ENTRY_SIZE as usize) {
            ifd.add_entry(parse_record(record, byte_order));
        }

        // A file cut off right after the tag table still holds a usable last IFD
        ifd.next_ifd_offset = match handler.read_u32(reader) {
            Ok(next) => next,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                warn!("IFD #{} has no next-IFD link, ending the chain", number);
                0
            }
            Err(e) => return Err(FormatError::Io(e)),
        };
        debug!("IFD #{}: {} entries, next IFD at {}", number, ifd.entry_count(), ifd.next_ifd_offset);

        Ok(ifd)
    }

    /// Byte order of the file last read, if any
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|h| h.byte_order())
    }
}

/// Splits a 12-byte tag record into its fields
fn parse_record(record: &[u8], byte_order: ByteOrder) -> TagEntry {
    let tag = byte_order.u16_from(&record[0..2]);
    let field_type = byte_order.u16_from(&record[2..4]);
    let count = byte_order.u32_from(&record[4..8]);
    let raw = [record[8], record[9], record[10], record[11]];
    TagEntry::new(tag, field_type, count, raw, byte_order)
}

fn truncated(error: io::Error, offset: u64) -> FormatError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        FormatError::TruncatedDirectory { offset }
    } else {
        FormatError::Io(error)
    }
}
