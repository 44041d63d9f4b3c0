//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip, producing at most `max_output` bytes
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u16;
}
