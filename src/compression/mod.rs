//! Compression handling for TIFF files
//!
//! Strip decompression strategies. Only uncompressed and LZW strips are
//! supported; the tag interpreter rejects everything else up front.

mod handler;
mod uncompressed;
mod factory;
pub mod dictionary;
pub mod lzw;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use factory::CompressionFactory;
pub use lzw::{LzwDecoder, LzwHandler};
