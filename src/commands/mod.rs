//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod decode_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use decode_command::DecodeCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;
use crate::config::DecoderConfig;
use crate::tiff::errors::{FormatError, TiffResult};

/// Factory for creating command instances based on CLI arguments
pub struct VolumeCommandFactory;

impl VolumeCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        VolumeCommandFactory
    }
}

impl Default for VolumeCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for VolumeCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> TiffResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args)?))
        } else {
            // Default to decoding the volume
            Ok(Box::new(DecodeCommand::new(args)?))
        }
    }
}

/// Reads the positional input path
pub(crate) fn input_path(args: &ArgMatches) -> TiffResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| FormatError::Config("Missing input file".to_string()))
}

/// Decoder settings from `--config` and `--sequential`
pub(crate) fn load_config(args: &ArgMatches) -> TiffResult<DecoderConfig> {
    let config = match args.get_one::<String>("config") {
        Some(path) => DecoderConfig::from_file(path)?,
        None => DecoderConfig::default(),
    };
    if args.get_flag("sequential") {
        Ok(config.sequential())
    } else {
        Ok(config)
    }
}
