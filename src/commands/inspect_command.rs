//! TIFF structure inspection command
//!
//! Prints the header, the IFD chain and the interpreted plane tags without
//! decoding any pixel data.

use std::fs::File;
use std::io::BufReader;

use clap::ArgMatches;
use log::{info, warn};

use crate::api::VolumeDecoder;
use crate::commands::command_traits::Command;
use crate::config::DecoderConfig;
use crate::metadata::VolumeMetadata;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::ImageFileDirectory;
use crate::tiff::tags::PlaneTags;
use crate::utils::string_utils::truncate_for_display;
use crate::tiff::constants::tags as tag_ids;
use crate::utils::tag_utils::{get_compression_name, get_photometric_name};

/// Command for inspecting TIFF file structure
pub struct InspectCommand {
    /// Path to the input file
    input_file: String,
    /// Whether to list every tag entry
    verbose: bool,
    config: DecoderConfig,
}

impl InspectCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(InspectCommand {
            input_file: super::input_path(args)?,
            verbose: args.get_flag("verbose"),
            config: super::load_config(args)?,
        })
    }

    fn display_plane(&self, ifd: &ImageFileDirectory, tags: &PlaneTags) {
        info!("IFD #{} (offset: {})", ifd.number, ifd.offset);
        info!("  Dimensions: {}x{}", tags.width, tags.height);
        info!("  Bits per sample: {}, samples per pixel: {}", tags.bit_depth.bits(), tags.samples_per_pixel);
        info!("  Compression: {}", get_compression_name(tags.compression.code() as u32));
        match ifd.get_entry(tag_ids::PHOTOMETRIC_INTERPRETATION).and_then(|e| e.inline_value()) {
            Some(code) => info!("  Photometric: {} (read as {:?})", get_photometric_name(code), tags.photometric),
            None => info!("  Photometric: {:?}", tags.photometric),
        }
        info!("  Strips: {} ({} rows each)", tags.strips.len(), tags.rows_per_strip);
        info!("  Resolution: {} x {}", tags.x_resolution, tags.y_resolution);
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> TiffResult<()> {
        let decoder = VolumeDecoder::new(self.config.clone());
        let mut reader = BufReader::new(File::open(&self.input_file)?);
        let tiff = decoder.inspect_reader(&mut reader)?;

        info!("TIFF Inspection Results:");
        info!("  Byte order: {}", tiff.header.byte_order.name());
        info!("  Number of IFDs: {}", tiff.ifd_count());

        let mut description = None;
        for ifd in &tiff.ifds {
            if self.verbose {
                info!("{}", ifd);
            }
            match PlaneTags::interpret(ifd, &mut reader) {
                Ok(tags) => {
                    self.display_plane(ifd, &tags);
                    if ifd.number == 0 {
                        description = tags.description;
                    }
                }
                Err(e) => warn!("IFD #{} cannot be decoded: {}", ifd.number, e),
            }
        }

        if let Some(text) = &description {
            info!("Description: {}", truncate_for_display(text, 200));
        }
        let metadata = VolumeMetadata::parse(description.as_deref());
        info!("Channels: {}, dimension order: {}, z spacing: {}",
              metadata.channel_count, metadata.dimension_order.name(), metadata.z_spacing);

        Ok(())
    }
}
