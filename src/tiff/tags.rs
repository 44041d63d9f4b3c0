//! Tag interpretation
//!
//! Turns the raw tag records of one IFD into the validated description of an
//! image plane. Encodings the decoder cannot handle are rejected here, so
//! later stages match on closed enums instead of re-checking tag values.

use log::{debug, warn};

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, photometric, tags};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::ifd::ImageFileDirectory;

/// Compression schemes the decoder accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lzw,
}

impl Compression {
    /// Validates a raw compression tag value
    pub fn from_code(code: u32) -> TiffResult<Self> {
        match code {
            c if c == compression::NONE as u32 => Ok(Compression::None),
            c if c == compression::LZW as u32 => Ok(Compression::Lzw),
            other => Err(FormatError::UnsupportedEncoding {
                tag: tags::COMPRESSION,
                value: other,
            }),
        }
    }

    /// Get the name of this compression method
    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "Uncompressed",
            Compression::Lzw => "LZW",
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Compression::None => compression::NONE,
            Compression::Lzw => compression::LZW,
        }
    }
}

/// Meaning of a zero sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Photometric {
    MinIsWhite,
    MinIsBlack,
}

impl Photometric {
    /// Maps a raw photometric value; anything but 0 reads as min-is-black
    pub fn from_code(code: u32) -> Self {
        match code {
            c if c == photometric::WHITE_IS_ZERO as u32 => Photometric::MinIsWhite,
            c if c == photometric::BLACK_IS_ZERO as u32 => Photometric::MinIsBlack,
            c if c == photometric::RGB as u32 => Photometric::MinIsBlack,
            other => {
                warn!("Photometric interpretation {} treated as min-is-black", other);
                Photometric::MinIsBlack
            }
        }
    }
}

/// Supported sample widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    /// Validates a raw bits-per-sample value
    pub fn from_bits(bits: u32) -> TiffResult<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(FormatError::UnsupportedEncoding {
                tag: tags::BITS_PER_SAMPLE,
                value: other,
            }),
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    pub fn bytes(&self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }
}

/// One contiguous compressed-or-raw byte range of a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripDescriptor {
    pub offset: u64,
    pub byte_count: u64,
}

/// Everything the decoder needs to know about one plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneTags {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    pub samples_per_pixel: u16,
    pub compression: Compression,
    pub photometric: Photometric,
    pub rows_per_strip: u32,
    pub strips: Vec<StripDescriptor>,
    /// Pixels per unit along X (1.0 when absent or zero)
    pub x_resolution: f64,
    /// Pixels per unit along Y (1.0 when absent or zero)
    pub y_resolution: f64,
    pub description: Option<String>,
}

impl PlaneTags {
    /// Extracts and validates the tags of one IFD
    ///
    /// Unrecognized tags are ignored.
    pub fn interpret(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let width = required_scalar(ifd, reader, tags::IMAGE_WIDTH)?;
        let height = required_scalar(ifd, reader, tags::IMAGE_LENGTH)?;
        let bit_depth = read_bit_depth(ifd, reader)?;

        let compression = match scalar(ifd, reader, tags::COMPRESSION)? {
            Some(code) => Compression::from_code(code)?,
            None => Compression::None,
        };
        let photometric = scalar(ifd, reader, tags::PHOTOMETRIC_INTERPRETATION)?
            .map(Photometric::from_code)
            .unwrap_or(Photometric::MinIsBlack);
        let samples_per_pixel = scalar(ifd, reader, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1).max(1) as u16;
        let rows_per_strip = scalar(ifd, reader, tags::ROWS_PER_STRIP)?
            .filter(|&rows| rows > 0)
            .unwrap_or(height)
            .min(height.max(1));

        let x_resolution = read_resolution(ifd, reader, tags::X_RESOLUTION)?;
        let y_resolution = read_resolution(ifd, reader, tags::Y_RESOLUTION)?;

        let description = match ifd.get_entry(tags::IMAGE_DESCRIPTION) {
            Some(entry) if entry.count > 0 => match entry.read_bytes(reader) {
                Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    // Pixels stay decodable without the description
                    warn!("IFD #{}: unreadable image description: {}", ifd.number, e);
                    None
                }
            },
            _ => None,
        };

        let mut plane = PlaneTags {
            width,
            height,
            bit_depth,
            samples_per_pixel,
            compression,
            photometric,
            rows_per_strip,
            strips: Vec::new(),
            x_resolution,
            y_resolution,
            description,
        };
        plane.strips = read_strips(ifd, reader, &plane)?;

        debug!("IFD #{}: {}x{} {} bits, {} samples, {}, {} strips",
               ifd.number, width, height, bit_depth.bits(), samples_per_pixel,
               compression.name(), plane.strips.len());

        Ok(plane)
    }

    /// Bytes in one decoded row
    pub fn row_size(&self) -> usize {
        self.width as usize * self.samples_per_pixel as usize * self.bit_depth.bytes()
    }

    /// Bytes in the whole decoded plane
    pub fn plane_size(&self) -> usize {
        self.row_size() * self.height as usize
    }
}

/// Reads the first element of a tag, if present
fn scalar(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader, tag: u16) -> TiffResult<Option<u32>> {
    match ifd.get_entry(tag) {
        None => Ok(None),
        Some(entry) => match entry.inline_value() {
            Some(v) => Ok(Some(v)),
            None => Ok(entry.read_values(reader)?.first().copied()),
        },
    }
}

fn required_scalar(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader, tag: u16) -> TiffResult<u32> {
    scalar(ifd, reader, tag)?.ok_or(FormatError::MissingRequiredTag(tag))
}

/// BitsPerSample has one element per sample; all must agree
fn read_bit_depth(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader) -> TiffResult<BitDepth> {
    let entry = ifd
        .get_entry(tags::BITS_PER_SAMPLE)
        .ok_or(FormatError::MissingRequiredTag(tags::BITS_PER_SAMPLE))?;
    let values = entry.read_values(reader)?;
    let first = *values
        .first()
        .ok_or(FormatError::MissingRequiredTag(tags::BITS_PER_SAMPLE))?;
    if let Some(&other) = values.iter().find(|&&v| v != first) {
        return Err(FormatError::UnsupportedEncoding {
            tag: tags::BITS_PER_SAMPLE,
            value: other,
        });
    }
    BitDepth::from_bits(first)
}

fn read_resolution(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader, tag: u16) -> TiffResult<f64> {
    let entry = match ifd.get_entry(tag) {
        Some(entry) => entry,
        None => return Ok(1.0),
    };
    let (numerator, denominator) = entry.read_rational(reader)?;
    if numerator == 0 || denominator == 0 {
        warn!("Resolution tag {} is {}/{}, using 1.0", tag, numerator, denominator);
        return Ok(1.0);
    }
    Ok(numerator as f64 / denominator as f64)
}

fn read_strips(ifd: &ImageFileDirectory, reader: &mut dyn SeekableReader, plane: &PlaneTags) -> TiffResult<Vec<StripDescriptor>> {
    let offsets = ifd
        .get_entry(tags::STRIP_OFFSETS)
        .ok_or(FormatError::MissingRequiredTag(tags::STRIP_OFFSETS))?
        .read_values(reader)?;

    let byte_counts = match ifd.get_entry(tags::STRIP_BYTE_COUNTS) {
        Some(entry) => entry.read_values(reader)?,
        None if plane.compression == Compression::None => {
            // Uncompressed strips without counts hold rows_per_strip full rows each
            let rows = plane.rows_per_strip as usize;
            let total_rows = plane.height as usize;
            (0..offsets.len())
                .map(|i| {
                    let remaining = total_rows.saturating_sub(i * rows);
                    (remaining.min(rows) * plane.row_size()) as u32
                })
                .collect()
        }
        None => return Err(FormatError::MissingRequiredTag(tags::STRIP_BYTE_COUNTS)),
    };

    if offsets.is_empty() || offsets.len() != byte_counts.len() {
        return Err(FormatError::InvalidDirectory {
            offset: ifd.offset,
            reason: format!("{} strip offsets but {} strip byte counts", offsets.len(), byte_counts.len()),
        });
    }

    Ok(offsets
        .into_iter()
        .zip(byte_counts)
        .map(|(offset, byte_count)| StripDescriptor {
            offset: offset as u64,
            byte_count: byte_count as u64,
        })
        .collect())
}
