//! Handler for uncompressed data

use crate::tiff::constants::compression;
use crate::tiff::errors::TiffResult;
use super::handler::CompressionHandler;

/// Uncompressed data handler (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        // Strips may be padded past the plane; the tail is not image data
        let len = data.len().min(max_output);
        Ok(data[..len].to_vec())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u16 {
        compression::NONE
    }
}
