//! Seekable reader trait and implementations
//!
//! This module provides a unified trait for readers that support both
//! reading and seeking operations.

use std::io::{self, Read, Seek, SeekFrom};

use crate::tiff::constants::directory::MAX_SIGNED_SEEK;

/// Trait for readers that can both read and seek
///
/// This trait combines the Read and Seek traits for use with
/// various readers throughout the application.
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Seeks to an absolute offset, splitting offsets past 0x7FFFFFFF in two hops
///
/// Some platform file APIs only accept signed 32-bit seek distances, and TIFF
/// offsets are unsigned 32-bit values.
pub fn seek_to(reader: &mut dyn SeekableReader, offset: u64) -> io::Result<u64> {
    if offset > MAX_SIGNED_SEEK {
        reader.seek(SeekFrom::Start(MAX_SIGNED_SEEK))?;
        reader.seek(SeekFrom::Current((offset - MAX_SIGNED_SEEK) as i64))
    } else {
        reader.seek(SeekFrom::Start(offset))
    }
}

/// Returns the total length of the stream, restoring the current position
pub fn stream_len(reader: &mut dyn SeekableReader) -> io::Result<u64> {
    let current = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(current))?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_seek_to_small_offset() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        assert_eq!(seek_to(&mut cursor, 10).unwrap(), 10);
    }

    #[test]
    fn test_seek_to_offset_past_signed_range() {
        // Cursor allows seeking past the end, which is enough to check the arithmetic
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let target = 0x8000_0010u64;
        assert_eq!(seek_to(&mut cursor, target).unwrap(), target);
        assert_eq!(cursor.position(), target);
    }

    #[test]
    fn test_stream_len_keeps_position() {
        let mut cursor = Cursor::new(vec![0u8; 32]);
        cursor.set_position(5);
        assert_eq!(stream_len(&mut cursor).unwrap(), 32);
        assert_eq!(cursor.position(), 5);
    }
}
