//! Decoding one IFD into a plane of pixels

use log::debug;

use crate::compression::CompressionFactory;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::ImageFileDirectory;
use crate::tiff::tags::{BitDepth, Photometric, PlaneTags};

use super::strip_reader::StripReader;

/// One decoded image plane, still in the file's sample byte order
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPlane {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    pub samples_per_pixel: u16,
    pub photometric: Photometric,
    /// Byte order of 16-bit samples in `pixels`
    pub byte_order: ByteOrder,
    /// Row-major samples, `samples_per_pixel` per pixel
    pub pixels: Vec<u8>,
    pub x_resolution: f64,
    pub y_resolution: f64,
    pub description: Option<String>,
}

impl DecodedPlane {
    /// Interprets the tags of `ifd` and reads its strips
    ///
    /// `page_size` sizes the LZW string table pages.
    pub fn decode(
        ifd: &ImageFileDirectory,
        reader: &mut dyn SeekableReader,
        byte_order: ByteOrder,
        page_size: usize,
    ) -> TiffResult<Self> {
        let tags = PlaneTags::interpret(ifd, reader)?;
        let handler = CompressionFactory::create_handler(tags.compression, page_size);
        let pixels = StripReader::new(reader, &tags).read_plane(handler.as_ref())?;
        debug!("Decoded plane #{}: {} bytes", ifd.number, pixels.len());

        Ok(DecodedPlane {
            width: tags.width,
            height: tags.height,
            bit_depth: tags.bit_depth,
            samples_per_pixel: tags.samples_per_pixel,
            photometric: tags.photometric,
            byte_order,
            pixels,
            x_resolution: tags.x_resolution,
            y_resolution: tags.y_resolution,
            description: tags.description,
        })
    }

    /// Number of pixels in the plane
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
