pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod metadata;
pub mod volume;
pub mod config;
pub mod commands;
pub mod api;

pub use crate::api::{CancellationToken, DecodeObserver, VolumeDecoder};
pub use crate::config::DecoderConfig;
pub use crate::metadata::{DimensionOrder, VolumeMetadata};
pub use crate::volume::{BoundingBox3, PixelType, Volume};

pub use tiff::{FormatError, TiffReader, TiffResult};
