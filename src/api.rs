//! Decoder facade
//!
//! [`VolumeDecoder`] runs the whole pipeline: header, IFD chain, one decoded
//! plane per IFD, metadata, and volume assembly.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::config::DecoderConfig;
use crate::extractor::DecodedPlane;
use crate::io::seekable::SeekableReader;
use crate::metadata::VolumeMetadata;
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::reader::TiffReader;
use crate::tiff::types::TiffFile;
use crate::volume::{Volume, VolumeAssembler};

/// Receives progress reports from a running decode
///
/// Called from worker threads when planes are decoded in parallel.
pub trait DecodeObserver: Send + Sync {
    /// A new phase started
    fn task(&self, name: &str);

    /// `done` of `total` planes have been decoded
    fn progress(&self, done: usize, total: usize);
}

/// Shared flag for stopping a decode from another thread
///
/// The decoder checks it between phases and between planes. A cancel stops
/// the decode in flight, or the next one if none is running; the flag is
/// cleared when that decode returns, so the decoder stays usable.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clears a pending cancel
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`FormatError::Cancelled`] once cancelled
    pub fn check(&self) -> TiffResult<()> {
        if self.is_cancelled() {
            Err(FormatError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Main interface to the volumetiff library
pub struct VolumeDecoder {
    config: DecoderConfig,
    observer: Option<Arc<dyn DecodeObserver>>,
    cancellation: CancellationToken,
}

impl Default for VolumeDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl VolumeDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        VolumeDecoder {
            config,
            observer: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Reports phases and plane progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn DecodeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Token that cancels decodes started by this decoder
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Reads the header and IFD chain without touching pixel data
    pub fn inspect_reader(&self, reader: &mut dyn SeekableReader) -> TiffResult<TiffFile> {
        TiffReader::new(self.config.max_directories).read(reader)
    }

    pub fn inspect_file<P: AsRef<Path>>(&self, path: P) -> TiffResult<TiffFile> {
        TiffReader::new(self.config.max_directories).load(path)
    }

    /// Decodes a volume from a reader, one plane after another
    pub fn decode_reader(&self, reader: &mut dyn SeekableReader) -> TiffResult<Volume> {
        self.scoped(|| {
            let tiff = self.read_directories(reader)?;
            let planes = self.decode_sequential(&tiff, reader)?;
            self.assemble(planes)
        })
    }

    /// Decodes a volume from a file on disk
    ///
    /// With parallel decoding enabled every plane gets its own file handle.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> TiffResult<Volume> {
        let path = path.as_ref();
        info!("Decoding volume from {}", path.display());
        self.scoped(|| {
            let mut reader = BufReader::new(File::open(path)?);
            let tiff = self.read_directories(&mut reader)?;

            let planes = if self.config.parallel && tiff.ifd_count() > 1 {
                self.decode_parallel(&tiff, || Ok(BufReader::new(File::open(path)?)))?
            } else {
                self.decode_sequential(&tiff, &mut reader)?
            };
            self.assemble(planes)
        })
    }

    /// Decodes a volume held in memory
    pub fn decode_bytes(&self, bytes: &[u8]) -> TiffResult<Volume> {
        self.scoped(|| {
            let mut reader = Cursor::new(bytes);
            let tiff = self.read_directories(&mut reader)?;

            let planes = if self.config.parallel && tiff.ifd_count() > 1 {
                self.decode_parallel(&tiff, || Ok(Cursor::new(bytes)))?
            } else {
                self.decode_sequential(&tiff, &mut reader)?
            };
            self.assemble(planes)
        })
    }

    /// Runs one decode; the cancellation flag is cleared once it returns
    fn scoped<T>(&self, decode: impl FnOnce() -> TiffResult<T>) -> TiffResult<T> {
        let result = decode();
        self.cancellation.reset();
        result
    }

    fn task(&self, name: &str) {
        debug!("{}", name);
        if let Some(observer) = &self.observer {
            observer.task(name);
        }
    }

    fn progress(&self, done: usize, total: usize) {
        if let Some(observer) = &self.observer {
            observer.progress(done, total);
        }
    }

    fn read_directories(&self, reader: &mut dyn SeekableReader) -> TiffResult<TiffFile> {
        self.cancellation.check()?;
        self.task("reading IFDs");
        let tiff = self.inspect_reader(reader)?;
        self.cancellation.check()?;
        Ok(tiff)
    }

    fn decode_sequential(&self, tiff: &TiffFile, reader: &mut dyn SeekableReader) -> TiffResult<Vec<DecodedPlane>> {
        let total = tiff.ifd_count();
        let mut planes = Vec::with_capacity(total);

        for (index, ifd) in tiff.ifds.iter().enumerate() {
            self.cancellation.check()?;
            self.task(&format!("reading image [{}/{}]", index + 1, total));
            planes.push(DecodedPlane::decode(ifd, reader, tiff.header.byte_order, self.config.lzw_page_size)?);
            self.progress(index + 1, total);
        }

        Ok(planes)
    }

    /// Decodes planes on the rayon pool; results keep IFD order
    fn decode_parallel<R, F>(&self, tiff: &TiffFile, open: F) -> TiffResult<Vec<DecodedPlane>>
    where
        R: SeekableReader,
        F: Fn() -> TiffResult<R> + Sync,
    {
        let total = tiff.ifd_count();
        let done = AtomicUsize::new(0);
        self.task(&format!("reading {} images in parallel", total));

        tiff.ifds
            .par_iter()
            .map(|ifd| {
                self.cancellation.check()?;
                let mut reader = open()?;
                let plane = DecodedPlane::decode(ifd, &mut reader, tiff.header.byte_order, self.config.lzw_page_size)?;
                self.progress(done.fetch_add(1, Ordering::SeqCst) + 1, total);
                Ok(plane)
            })
            .collect()
    }

    fn assemble(&self, planes: Vec<DecodedPlane>) -> TiffResult<Volume> {
        self.cancellation.check()?;
        self.task("assembling volume");

        let description = planes.first().and_then(|plane| plane.description.as_deref());
        let metadata = VolumeMetadata::parse(description);
        let volume = VolumeAssembler::new(self.config.invert_min_is_white).assemble(planes, &metadata)?;

        info!("Assembled {}x{}x{} volume ({}), bounding box {}",
              volume.width, volume.height, volume.depth, volume.pixel_type().name(), volume.bounding_box());
        Ok(volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_shared() {
        let decoder = VolumeDecoder::default();
        let token = decoder.cancellation_token();
        assert!(decoder.cancellation.check().is_ok());
        token.cancel();
        assert!(matches!(decoder.cancellation.check(), Err(FormatError::Cancelled)));
    }

    #[test]
    fn test_cancelled_decoder_stops_before_reading() {
        let decoder = VolumeDecoder::default();
        decoder.cancellation_token().cancel();
        let err = decoder.decode_bytes(b"II*\0").unwrap_err();
        assert!(matches!(err, FormatError::Cancelled));
        assert!(!decoder.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_token_reset() {
        let token = CancellationToken::new();
        token.cancel();
        token.reset();
        assert!(token.check().is_ok());
    }
}
