//! Volume decoding command

use std::sync::Arc;

use clap::ArgMatches;
use log::info;

use crate::api::VolumeDecoder;
use crate::commands::command_traits::Command;
use crate::config::DecoderConfig;
use crate::tiff::errors::{FormatError, TiffResult};
use crate::utils::progress::ProgressTracker;

/// Command for decoding a TIFF stack into a volume
pub struct DecodeCommand {
    input_file: String,
    config: DecoderConfig,
    show_progress: bool,
    /// Slice index and output path for an optional slice export
    slice_export: Option<(usize, String)>,
}

impl DecodeCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        let input_file = super::input_path(args)?;

        let config = super::load_config(args)?;

        let slice_export = match (args.get_one::<usize>("slice"), args.get_one::<String>("slice-out")) {
            (Some(&z), Some(path)) => Some((z, path.clone())),
            (None, None) => None,
            _ => return Err(FormatError::Config("--slice and --slice-out must be given together".to_string())),
        };

        Ok(DecodeCommand {
            input_file,
            config,
            show_progress: args.get_flag("progress"),
            slice_export,
        })
    }
}

impl Command for DecodeCommand {
    fn execute(&self) -> TiffResult<()> {
        let mut decoder = VolumeDecoder::new(self.config.clone());
        let tracker = if self.show_progress {
            let tracker = Arc::new(ProgressTracker::new(0, "decoding"));
            decoder = decoder.with_observer(tracker.clone());
            Some(tracker)
        } else {
            None
        };

        let volume = decoder.decode_file(&self.input_file)?;
        if let Some(tracker) = tracker {
            tracker.finish();
        }

        for line in volume.to_string().lines() {
            info!("{}", line);
        }

        if let Some((z, path)) = &self.slice_export {
            volume.save_slice(*z, path)?;
        }

        Ok(())
    }
}
