//! Factory for creating compression handlers

use crate::tiff::tags::Compression;
use super::handler::CompressionHandler;
use super::lzw::LzwHandler;
use super::uncompressed::UncompressedHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for an already validated compression
    ///
    /// `page_size` sizes the LZW string table pages.
    pub fn create_handler(compression: Compression, page_size: usize) -> Box<dyn CompressionHandler> {
        match compression {
            Compression::None => Box::new(UncompressedHandler),
            Compression::Lzw => Box::new(LzwHandler::new(page_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_codes() {
        assert_eq!(CompressionFactory::create_handler(Compression::None, 1024).code(), 1);
        let lzw = CompressionFactory::create_handler(Compression::Lzw, 1024);
        assert_eq!(lzw.code(), 5);
        assert_eq!(lzw.name(), "LZW");
    }
}
