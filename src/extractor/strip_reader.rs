//! Strip-based image data extraction
//!
//! Stripped TIFFs store a plane as horizontal bands of rows. Each strip is
//! read whole, decompressed, and appended to the plane buffer until the
//! buffer holds exactly one plane.

use log::{debug, trace};
use std::io::Read;

use crate::compression::CompressionHandler;
use crate::io::seekable::{seek_to, SeekableReader};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::tags::{PlaneTags, StripDescriptor};

/// Reads the pixel data of one plane from its strips
pub struct StripReader<'a> {
    /// Reader for accessing the TIFF file
    reader: &'a mut dyn SeekableReader,
    /// Interpreted tags of the plane being read
    plane: &'a PlaneTags,
}

impl<'a> StripReader<'a> {
    pub fn new(reader: &'a mut dyn SeekableReader, plane: &'a PlaneTags) -> Self {
        StripReader { reader, plane }
    }

    /// Reads the raw bytes of one strip
    fn read_strip(&mut self, strip: &StripDescriptor) -> TiffResult<Vec<u8>> {
        seek_to(&mut *self.reader, strip.offset)?;
        let mut data = Vec::new();
        (&mut *self.reader).take(strip.byte_count).read_to_end(&mut data)?;
        if (data.len() as u64) < strip.byte_count {
            return Err(FormatError::TruncatedStrip {
                expected: strip.byte_count as usize,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// Decodes every strip in order into one plane-sized buffer
    ///
    /// Strips past the point where the buffer is full are not read. Running
    /// out of strips first is a [`FormatError::TruncatedStrip`].
    pub fn read_plane(&mut self, handler: &dyn CompressionHandler) -> TiffResult<Vec<u8>> {
        let expected = self.plane.plane_size();
        // Tag values are untrusted; reserve no more than the strips can plausibly hold
        let stored: u64 = self.plane.strips.iter().map(|s| s.byte_count).sum();
        let mut pixels = Vec::with_capacity(expected.min(stored as usize));

        for (index, strip) in self.plane.strips.iter().enumerate() {
            if pixels.len() >= expected {
                debug!("Plane complete after {} of {} strips", index, self.plane.strips.len());
                break;
            }

            trace!("Reading strip {} at offset {} with {} bytes", index, strip.offset, strip.byte_count);
            let raw = self.read_strip(strip)?;
            let decoded = handler.decompress(&raw, expected - pixels.len())?;
            pixels.extend_from_slice(&decoded);
        }

        if pixels.len() < expected {
            return Err(FormatError::TruncatedStrip {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(pixels)
    }
}
