//! TIFF file format parsing module
//!
//! Header, IFD chain and tag interpretation for classic (32-bit offset)
//! TIFF files.

pub mod errors;
pub mod header;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod tags;
pub mod constants;
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{FormatError, TiffResult};
pub use header::FileHeader;
pub use ifd::{ImageFileDirectory, TagEntry, TagValue};
pub use reader::TiffReader;
pub use tags::{BitDepth, Compression, Photometric, PlaneTags, StripDescriptor};
pub use types::TiffFile;
