//! TIFF tag utilities
//!
//! Human-readable names for the numeric codes found in IFDs.

use crate::tiff::constants::{compression, field_types, photometric, tags};

/// Get the name of a TIFF tag
///
/// If the tag is not recognized, returns "Unknown".
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::IMAGE_DESCRIPTION => "ImageDescription",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::X_RESOLUTION => "XResolution",
        tags::Y_RESOLUTION => "YResolution",
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        _ => "Unknown",
    }
}

/// Get the name of a compression method, including ones the decoder rejects
pub fn get_compression_name(code: u32) -> &'static str {
    match u16::try_from(code) {
        Ok(compression::NONE) => "None",
        Ok(compression::LZW) => "LZW",
        Ok(compression::JPEG) => "JPEG",
        Ok(compression::DEFLATE) => "Adobe Deflate",
        Ok(compression::PACKBITS) => "PackBits",
        _ => "Unknown",
    }
}

/// Get the name of a photometric interpretation
pub fn get_photometric_name(code: u32) -> &'static str {
    match u16::try_from(code) {
        Ok(photometric::WHITE_IS_ZERO) => "WhiteIsZero",
        Ok(photometric::BLACK_IS_ZERO) => "BlackIsZero",
        Ok(photometric::RGB) => "RGB",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(get_tag_name(270), "ImageDescription");
        assert_eq!(get_tag_name(33550), "Unknown");
        assert_eq!(get_field_type_name(5), "RATIONAL");
        assert_eq!(get_compression_name(7), "JPEG");
        assert_eq!(get_photometric_name(0), "WhiteIsZero");
    }
}
