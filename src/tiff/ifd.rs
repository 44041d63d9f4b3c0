//! Image File Directory (IFD) structures and methods
//!
//! An IFD is a flat table of 12-byte tag records followed by the offset of
//! the next IFD. Each record's 4-byte value field holds the value itself when
//! it fits, and a file offset to the value block otherwise. That choice is
//! made once, when the record is parsed, and captured in [`TagValue`].

use byteorder::ReadBytesExt;
use log::{trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::{seek_to, SeekableReader};
use crate::tiff::constants::{directory, field_types};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::utils::string_utils;
use crate::utils::tag_utils;

/// Element vectors are grown past this instead of reserved up front
const MAX_PREALLOCATED_VALUES: usize = 65_536;

/// Scalar type of a tag's elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
    /// A type code this decoder does not know
    Unknown(u16),
}

impl FieldType {
    /// Maps a raw type code to a field type
    pub fn from_code(code: u16) -> Self {
        match code {
            field_types::BYTE => FieldType::Byte,
            field_types::ASCII => FieldType::Ascii,
            field_types::SHORT => FieldType::Short,
            field_types::LONG => FieldType::Long,
            field_types::RATIONAL => FieldType::Rational,
            field_types::SBYTE => FieldType::SByte,
            field_types::UNDEFINED => FieldType::Undefined,
            field_types::SSHORT => FieldType::SShort,
            field_types::SLONG => FieldType::SLong,
            field_types::SRATIONAL => FieldType::SRational,
            field_types::FLOAT => FieldType::Float,
            field_types::DOUBLE => FieldType::Double,
            other => FieldType::Unknown(other),
        }
    }

    /// Returns the raw type code
    pub fn code(&self) -> u16 {
        match self {
            FieldType::Byte => field_types::BYTE,
            FieldType::Ascii => field_types::ASCII,
            FieldType::Short => field_types::SHORT,
            FieldType::Long => field_types::LONG,
            FieldType::Rational => field_types::RATIONAL,
            FieldType::SByte => field_types::SBYTE,
            FieldType::Undefined => field_types::UNDEFINED,
            FieldType::SShort => field_types::SSHORT,
            FieldType::SLong => field_types::SLONG,
            FieldType::SRational => field_types::SRATIONAL,
            FieldType::Float => field_types::FLOAT,
            FieldType::Double => field_types::DOUBLE,
            FieldType::Unknown(code) => *code,
        }
    }

    /// Size in bytes of a single element
    pub fn size(&self) -> u64 {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
            // Unknown types are treated as opaque bytes
            FieldType::Unknown(_) => 1,
        }
    }
}

/// Where a tag's value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue {
    /// Value fits in the record; holds the first element, byte order resolved
    Inline(u32),
    /// Value block lives elsewhere in the file
    FileOffset { offset: u32, count: u32, field_type: FieldType },
}

/// One 12-byte tag record of an IFD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Element type
    pub field_type: FieldType,
    /// Number of elements
    pub count: u32,
    /// Value field exactly as stored in the file
    pub raw: [u8; 4],
    /// Resolved value or offset
    pub value: TagValue,
    byte_order: ByteOrder,
}

impl TagEntry {
    /// Builds an entry from the fields of a tag record
    ///
    /// The value is inline when `count * typeSize <= 4`. Numeric inline
    /// values are decoded in the file's byte order; byte and ASCII blobs keep
    /// their stored order.
    pub fn new(tag: u16, type_code: u16, count: u32, raw: [u8; 4], byte_order: ByteOrder) -> Self {
        let field_type = FieldType::from_code(type_code);
        let total = field_type.size() * count as u64;

        let value = if total <= directory::INLINE_VALUE_SIZE {
            let first = match field_type {
                FieldType::Short | FieldType::SShort => byte_order.u16_from(&raw[..2]) as u32,
                FieldType::Long | FieldType::SLong | FieldType::Float => byte_order.u32_from(&raw),
                _ => raw[0] as u32,
            };
            TagValue::Inline(first)
        } else {
            TagValue::FileOffset {
                offset: byte_order.u32_from(&raw),
                count,
                field_type,
            }
        };

        trace!("Tag {} ({}) type={:?} count={} value={:?}",
               tag, tag_utils::get_tag_name(tag), field_type, count, value);

        TagEntry {
            tag,
            field_type,
            count,
            raw,
            value,
            byte_order,
        }
    }

    /// Returns the inline scalar value, if the value is stored inline
    pub fn inline_value(&self) -> Option<u32> {
        match self.value {
            TagValue::Inline(v) => Some(v),
            TagValue::FileOffset { .. } => None,
        }
    }

    /// Returns the file offset of the value block, if any
    pub fn value_offset(&self) -> Option<u32> {
        match self.value {
            TagValue::Inline(_) => None,
            TagValue::FileOffset { offset, .. } => Some(offset),
        }
    }

    /// Reads every element of an unsigned integer tag (BYTE, SHORT or LONG)
    pub fn read_values(&self, reader: &mut dyn SeekableReader) -> TiffResult<Vec<u32>> {
        let count = self.count as usize;
        let elem_size = match self.field_type {
            FieldType::Byte | FieldType::Undefined => 1,
            FieldType::Short => 2,
            FieldType::Long => 4,
            other => {
                return Err(FormatError::UnsupportedEncoding {
                    tag: self.tag,
                    value: other.code() as u32,
                })
            }
        };

        match self.value {
            TagValue::Inline(_) => Ok((0..count)
                .map(|i| {
                    let bytes = &self.raw[i * elem_size..(i + 1) * elem_size];
                    match elem_size {
                        1 => bytes[0] as u32,
                        2 => self.byte_order.u16_from(bytes) as u32,
                        _ => self.byte_order.u32_from(bytes),
                    }
                })
                .collect()),
            TagValue::FileOffset { offset, .. } => {
                seek_to(reader, offset as u64)?;
                let handler = self.byte_order.create_handler();
                let mut values = Vec::with_capacity(count.min(MAX_PREALLOCATED_VALUES));
                for _ in 0..count {
                    let value = match elem_size {
                        1 => reader.read_u8()? as u32,
                        2 => handler.read_u16(reader)? as u32,
                        _ => handler.read_u32(reader)?,
                    };
                    values.push(value);
                }
                Ok(values)
            }
        }
    }

    /// Reads the raw bytes of the value (ASCII text, opaque blobs)
    pub fn read_bytes(&self, reader: &mut dyn SeekableReader) -> TiffResult<Vec<u8>> {
        let len = (self.field_type.size() * self.count as u64) as usize;
        let mut buffer = match self.value {
            TagValue::Inline(_) => self.raw[..len].to_vec(),
            TagValue::FileOffset { offset, .. } => {
                seek_to(reader, offset as u64)?;
                // Counts come from the file; never allocate more than it holds
                let mut buffer = Vec::new();
                (&mut *reader).take(len as u64).read_to_end(&mut buffer)?;
                if buffer.len() < len {
                    return Err(FormatError::Io(io::Error::from(io::ErrorKind::UnexpectedEof)));
                }
                buffer
            }
        };
        if self.field_type == FieldType::Ascii {
            string_utils::trim_trailing_nulls(&mut buffer);
        }
        Ok(buffer)
    }

    /// Reads a RATIONAL value as (numerator, denominator)
    pub fn read_rational(&self, reader: &mut dyn SeekableReader) -> TiffResult<(u32, u32)> {
        match (self.field_type, self.value) {
            (FieldType::Rational, TagValue::FileOffset { offset, .. }) => {
                seek_to(reader, offset as u64)?;
                Ok(self.byte_order.create_handler().read_rational(reader)?)
            }
            // Some writers store resolution as a plain integer
            (_, TagValue::Inline(v)) => Ok((v, 1)),
            (other, _) => Err(FormatError::UnsupportedEncoding {
                tag: self.tag,
                value: other.code() as u32,
            }),
        }
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        let value_display = match self.value {
            TagValue::Inline(v) => v.to_string(),
            TagValue::FileOffset { offset, .. } => format!("@{}", offset),
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag, tag_utils::get_tag_name(self.tag),
                self.field_type.code(), tag_utils::get_field_type_name(self.field_type.code()),
                self.count, value_display)
    }
}

/// Represents an Image File Directory (IFD) in a TIFF file
///
/// One IFD describes exactly one image plane of the stack.
#[derive(Debug, Clone)]
pub struct ImageFileDirectory {
    /// IFD number (0-based, file order)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Offset of the next IFD (0 = end of chain)
    pub next_ifd_offset: u32,
    entries: Vec<TagEntry>,
    tag_map: HashMap<u16, usize>,
}

impl ImageFileDirectory {
    /// Creates an empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        ImageFileDirectory {
            number,
            offset,
            next_ifd_offset: 0,
            entries: Vec::new(),
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry; a repeated tag keeps its first occurrence
    pub fn add_entry(&mut self, entry: TagEntry) {
        if self.tag_map.contains_key(&entry.tag) {
            warn!("IFD #{} repeats tag {}, keeping the first occurrence", self.number, entry.tag);
            return;
        }
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets an entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&TagEntry> {
        self.tag_map.get(&tag).map(|&i| &self.entries[i])
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for ImageFileDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }
        writeln!(f, "  Next IFD offset: {}", self.next_ifd_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_short_inline_value_big_endian() {
        let entry = TagEntry::new(258, field_types::SHORT, 1, [0x00, 0x10, 0x00, 0x00], ByteOrder::BigEndian);
        assert_eq!(entry.value, TagValue::Inline(16));
    }

    #[test]
    fn test_short_inline_value_little_endian() {
        let entry = TagEntry::new(258, field_types::SHORT, 1, [0x10, 0x00, 0x00, 0x00], ByteOrder::LittleEndian);
        assert_eq!(entry.inline_value(), Some(16));
    }

    #[test]
    fn test_two_shorts_fit_inline() {
        let entry = TagEntry::new(273, field_types::SHORT, 2, [0x08, 0x00, 0x10, 0x00], ByteOrder::LittleEndian);
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(entry.read_values(&mut cursor).unwrap(), vec![8, 16]);
    }

    #[test]
    fn test_long_array_is_offset() {
        let entry = TagEntry::new(273, field_types::LONG, 2, [0x04, 0x00, 0x00, 0x00], ByteOrder::LittleEndian);
        assert_eq!(entry.value_offset(), Some(4));

        let data = vec![0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0];
        let mut cursor = Cursor::new(data);
        assert_eq!(entry.read_values(&mut cursor).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_short_ascii_inline_and_trimmed() {
        let entry = TagEntry::new(270, field_types::ASCII, 3, [b'h', b'i', 0, 0], ByteOrder::BigEndian);
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(entry.read_bytes(&mut cursor).unwrap(), b"hi".to_vec());
    }

    #[test]
    fn test_rational_read_from_offset() {
        let entry = TagEntry::new(282, field_types::RATIONAL, 1, [0, 0, 0, 2], ByteOrder::BigEndian);
        let data = vec![0xFF, 0xFF, 0, 0, 0, 72, 0, 0, 0, 1];
        let mut cursor = Cursor::new(data);
        assert_eq!(entry.read_rational(&mut cursor).unwrap(), (72, 1));
    }

    #[test]
    fn test_duplicate_tag_keeps_first() {
        let mut ifd = ImageFileDirectory::new(0, 8);
        ifd.add_entry(TagEntry::new(256, field_types::LONG, 1, [5, 0, 0, 0], ByteOrder::LittleEndian));
        ifd.add_entry(TagEntry::new(256, field_types::LONG, 1, [9, 0, 0, 0], ByteOrder::LittleEndian));
        assert_eq!(ifd.entry_count(), 1);
        assert_eq!(ifd.get_entry(256).and_then(|e| e.inline_value()), Some(5));
    }
}
