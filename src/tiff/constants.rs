//! TIFF format constants
//!
//! Numeric identifiers from the baseline TIFF 6.0 layout that the volume
//! decoder understands. Anything not listed here is skipped while reading.

/// TIFF header constants
pub mod header {
    /// Classic TIFF version number (42)
    pub const TIFF_VERSION: u16 = 0x2A;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: u16 = 0x4949;

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: u16 = 0x4D4D;

    /// Size of the classic header in bytes
    pub const HEADER_SIZE: u64 = 8;
}

/// Directory layout constants
pub mod directory {
    /// Size of one tag record inside an IFD
    pub const ENTRY_SIZE: u64 = 12;

    /// Bytes available for an inline tag value
    pub const INLINE_VALUE_SIZE: u64 = 4;

    /// Largest offset some platform file APIs accept in a single seek
    pub const MAX_SIGNED_SEEK: u64 = 0x7FFF_FFFF;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// Tags read by the tag interpreter
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;              // Width of the image in pixels
    pub const IMAGE_LENGTH: u16 = 257;             // Height of the image in pixels
    pub const BITS_PER_SAMPLE: u16 = 258;          // Bits per component
    pub const COMPRESSION: u16 = 259;              // Compression scheme
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262; // Meaning of a zero sample
    pub const IMAGE_DESCRIPTION: u16 = 270;        // Free-text description (OME-XML, ImageJ)
    pub const STRIP_OFFSETS: u16 = 273;            // Offsets to the data strips
    pub const SAMPLES_PER_PIXEL: u16 = 277;        // Number of components per pixel
    pub const ROWS_PER_STRIP: u16 = 278;           // Rows per strip of data
    pub const STRIP_BYTE_COUNTS: u16 = 279;        // Byte counts for strips
    pub const X_RESOLUTION: u16 = 282;             // Horizontal resolution
    pub const Y_RESOLUTION: u16 = 283;             // Vertical resolution
}

/// Compression types
pub mod compression {
    pub const NONE: u16 = 1;              // No compression
    pub const LZW: u16 = 5;               // LZW compression
    pub const JPEG: u16 = 7;              // JPEG compression (rejected)
    pub const DEFLATE: u16 = 8;           // Adobe Deflate (rejected)
    pub const PACKBITS: u16 = 32773;      // PackBits compression (rejected)
}

/// Photometric interpretation values
pub mod photometric {
    pub const WHITE_IS_ZERO: u16 = 0;     // Minimum value is white
    pub const BLACK_IS_ZERO: u16 = 1;     // Minimum value is black
    pub const RGB: u16 = 2;               // RGB color model
}

/// LZW stream constants
pub mod lzw {
    /// Resets the dictionary and code width
    pub const CLEAR_CODE: u16 = 256;

    /// Terminates the stream
    pub const EOI_CODE: u16 = 257;

    /// First code assigned to a multi-byte entry
    pub const FIRST_FREE_CODE: usize = 258;

    /// Code width after a clear
    pub const MIN_CODE_WIDTH: u8 = 9;

    /// Widest code TIFF allows
    pub const MAX_CODE_WIDTH: u8 = 12;

    /// Dictionary can never hold more than 2^12 entries
    pub const MAX_ENTRIES: usize = 4096;

    /// Default page size of the dictionary arena
    pub const DEFAULT_PAGE_SIZE: usize = 16 * 1024;
}
