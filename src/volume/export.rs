//! Converting volume slices into `image` buffers

use std::path::Path;
use std::io;

use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use log::info;

use crate::tiff::errors::{FormatError, TiffResult};
use super::types::{PixelType, Volume};

impl Volume {
    /// Slice `z` as an image, or `None` when out of range
    pub fn slice_image(&self, z: usize) -> Option<DynamicImage> {
        let bytes = self.slice(z)?;
        let (width, height) = (self.width, self.height);

        match self.pixel_type() {
            PixelType::Gray8 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, bytes.to_vec())
                .map(DynamicImage::ImageLuma8),
            PixelType::Rgb8 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, bytes.to_vec())
                .map(DynamicImage::ImageRgb8),
            PixelType::Gray16 => ImageBuffer::<Luma<u16>, _>::from_raw(width, height, samples_u16(bytes))
                .map(DynamicImage::ImageLuma16),
            PixelType::Rgb16 => ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, samples_u16(bytes))
                .map(DynamicImage::ImageRgb16),
        }
    }

    /// Writes slice `z` to `path`; the format follows the file extension
    pub fn save_slice<P: AsRef<Path>>(&self, z: usize, path: P) -> TiffResult<()> {
        let image = self.slice_image(z).ok_or_else(|| {
            FormatError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("slice {} out of range 0..{}", z, self.depth),
            ))
        })?;
        image
            .save(path.as_ref())
            .map_err(|e| FormatError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?;
        info!("Saved slice {} to {}", z, path.as_ref().display());
        Ok(())
    }
}

/// Volume 16-bit samples are little-endian
fn samples_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
