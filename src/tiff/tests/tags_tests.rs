//! Tests for tag interpretation

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use super::test_utils::{gray8_tiff, write_header, write_ifd, Record};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::tiff::tags::{BitDepth, Compression, Photometric, PlaneTags, StripDescriptor};

fn interpret(data: Vec<u8>) -> TiffResult<PlaneTags> {
    let mut cursor = Cursor::new(data);
    let tiff = TiffReader::default().read(&mut cursor)?;
    PlaneTags::interpret(tiff.main_ifd().unwrap(), &mut cursor)
}

/// Plane whose description and resolutions live at file offsets
fn with_blobs<B: byteorder::ByteOrder>(description: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 0);
    buffer.extend_from_slice(&[7u8; 6]); // 3x2 pixels at offset 8

    let description_offset = buffer.len() as u32;
    buffer.extend_from_slice(description);
    if buffer.len() % 2 == 1 {
        buffer.push(0);
    }
    let rational_offset = buffer.len() as u32;
    buffer.write_u32::<B>(300).unwrap();
    buffer.write_u32::<B>(100).unwrap();
    buffer.write_u32::<B>(0).unwrap();
    buffer.write_u32::<B>(0).unwrap();

    let ifd_offset = buffer.len() as u32;
    B::write_u32(&mut buffer[4..8], ifd_offset);
    let records: Vec<Record> = vec![
        (256, 3, 1, 3),
        (257, 3, 1, 2),
        (258, 3, 1, 8),
        (262, 3, 1, 0),
        (270, 2, description.len() as u32, description_offset),
        (273, 4, 1, 8),
        (279, 4, 1, 6),
        (282, 5, 1, rational_offset),
        (283, 5, 1, rational_offset + 8),
    ];
    write_ifd::<B>(&mut buffer, &records, 0);
    buffer
}

#[test]
fn test_defaults_for_minimal_plane() {
    let tags = interpret(gray8_tiff::<LittleEndian>(4, 2, &[1; 8], &[])).unwrap();

    std::assert_eq!((tags.width, tags.height), (4, 2));
    std::assert_eq!(tags.bit_depth, BitDepth::Eight);
    std::assert_eq!(tags.samples_per_pixel, 1);
    std::assert_eq!(tags.compression, Compression::None);
    std::assert_eq!(tags.photometric, Photometric::MinIsBlack);
    std::assert_eq!(tags.rows_per_strip, 2);
    std::assert_eq!(tags.strips, vec![StripDescriptor { offset: 8, byte_count: 8 }]);
    std::assert_eq!(tags.x_resolution, 1.0);
    std::assert!(tags.description.is_none());
    std::assert_eq!(tags.plane_size(), 8);
}

#[test]
fn test_description_and_resolution_from_offsets() {
    for data in [
        with_blobs::<LittleEndian>(b"ImageJ=1.0\nchannels=1\n\0"),
        with_blobs::<BigEndian>(b"ImageJ=1.0\nchannels=1\n\0"),
    ] {
        let tags = interpret(data).unwrap();
        std::assert_eq!(tags.description.as_deref(), Some("ImageJ=1.0\nchannels=1\n"));
        std::assert_eq!(tags.x_resolution, 3.0);
        // 0/0 falls back to one pixel per unit
        std::assert_eq!(tags.y_resolution, 1.0);
        std::assert_eq!(tags.photometric, Photometric::MinIsWhite);
    }
}

#[test]
fn test_jpeg_compression_rejected() {
    let result = interpret(gray8_tiff::<LittleEndian>(2, 2, &[0; 4], &[(259, 3, 1, 7)]));
    std::assert!(matches!(result, Err(FormatError::UnsupportedEncoding { tag: 259, value: 7 })));
}

#[test]
fn test_twelve_bit_samples_rejected() {
    let mut data = gray8_tiff::<LittleEndian>(2, 2, &[0; 4], &[]);
    // Patch BitsPerSample (third record) from 8 to 12
    let value_at = 12 + 2 + 2 * 12 + 8;
    data[value_at] = 12;
    let result = interpret(data);
    std::assert!(matches!(result, Err(FormatError::UnsupportedEncoding { tag: 258, value: 12 })));
}

#[test]
fn test_missing_dimensions() {
    let mut buffer = Vec::new();
    write_header::<LittleEndian>(&mut buffer, 8);
    write_ifd::<LittleEndian>(&mut buffer, &[(257, 4, 1, 2), (258, 3, 1, 8)], 0);
    std::assert!(matches!(interpret(buffer), Err(FormatError::MissingRequiredTag(256))));
}

#[test]
fn test_missing_strip_offsets() {
    let mut buffer = Vec::new();
    write_header::<LittleEndian>(&mut buffer, 8);
    write_ifd::<LittleEndian>(&mut buffer, &[(256, 4, 1, 2), (257, 4, 1, 2), (258, 3, 1, 8)], 0);
    std::assert!(matches!(interpret(buffer), Err(FormatError::MissingRequiredTag(273))));
}

#[test]
fn test_missing_byte_counts_computed_when_uncompressed() {
    let mut buffer = Vec::new();
    write_header::<LittleEndian>(&mut buffer, 8);
    write_ifd::<LittleEndian>(
        &mut buffer,
        &[(256, 4, 1, 10), (257, 4, 1, 3), (258, 3, 1, 8), (273, 4, 1, 100)],
        0,
    );
    let tags = interpret(buffer).unwrap();
    std::assert_eq!(tags.strips, vec![StripDescriptor { offset: 100, byte_count: 30 }]);
}

#[test]
fn test_missing_byte_counts_fatal_for_lzw() {
    let mut buffer = Vec::new();
    write_header::<LittleEndian>(&mut buffer, 8);
    write_ifd::<LittleEndian>(
        &mut buffer,
        &[(256, 4, 1, 10), (257, 4, 1, 3), (258, 3, 1, 8), (259, 3, 1, 5), (273, 4, 1, 100)],
        0,
    );
    std::assert!(matches!(interpret(buffer), Err(FormatError::MissingRequiredTag(279))));
}

#[test]
fn test_unknown_tags_ignored() {
    let extra = [(305, 2, 4, u32::from_le_bytes(*b"abc\0")), (262, 3, 1, 2)];
    let tags = interpret(gray8_tiff::<LittleEndian>(2, 1, &[0; 2], &extra)).unwrap();
    std::assert_eq!(tags.photometric, Photometric::MinIsBlack);
}

#[test]
fn test_inline_two_shorts_big_endian() {
    // Two-element BitsPerSample fits inline; both elements must agree
    let mut buffer = Vec::new();
    write_header::<BigEndian>(&mut buffer, 8);
    buffer.write_u16::<BigEndian>(3).unwrap();
    for (tag, field_type, count, value) in [(256u16, 4u16, 1u32, 1u32), (257, 4, 1, 1)] {
        buffer.write_u16::<BigEndian>(tag).unwrap();
        buffer.write_u16::<BigEndian>(field_type).unwrap();
        buffer.write_u32::<BigEndian>(count).unwrap();
        buffer.write_u32::<BigEndian>(value).unwrap();
    }
    buffer.write_u16::<BigEndian>(258).unwrap();
    buffer.write_u16::<BigEndian>(3).unwrap();
    buffer.write_u32::<BigEndian>(2).unwrap();
    buffer.write_u16::<BigEndian>(16).unwrap();
    buffer.write_u16::<BigEndian>(8).unwrap();
    buffer.write_u32::<BigEndian>(0).unwrap();

    let result = interpret(buffer);
    std::assert!(matches!(result, Err(FormatError::UnsupportedEncoding { tag: 258, value: 8 })));
}
