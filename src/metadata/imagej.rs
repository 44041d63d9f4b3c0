//! ImageJ description parsing
//!
//! ImageJ writes one `key=value` pair per line, starting with
//! `ImageJ=<version>`. Only `channels` and `spacing` matter here.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use super::VolumeMetadata;

lazy_static! {
    // key up to the first '=', value is the rest of the line
    static ref KEY_VALUE: Regex = Regex::new(r"^\s*([^=\s]+)\s*=\s*(.*?)\s*$").unwrap();
}

/// Parses an ImageJ description block
///
/// Unknown keys and unparsable values are skipped.
pub fn parse_imagej(text: &str) -> VolumeMetadata {
    let mut metadata = VolumeMetadata::default();

    for line in text.lines() {
        let captures = match KEY_VALUE.captures(line) {
            Some(captures) => captures,
            None => continue,
        };
        let value = &captures[2];

        match &captures[1] {
            "channels" => match value.parse::<usize>() {
                Ok(channels) if channels > 0 => metadata.channel_count = channels,
                _ => warn!("Ignoring ImageJ channels value {:?}", value),
            },
            "spacing" => match value.parse::<f64>() {
                Ok(spacing) if spacing.is_finite() && spacing >= 0.0 => metadata.z_spacing = spacing,
                _ => warn!("Ignoring ImageJ spacing value {:?}", value),
            },
            _ => {}
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DimensionOrder;

    #[test]
    fn test_channels_and_spacing() {
        let metadata = parse_imagej("ImageJ=1.0\nchannels=2\nspacing=2.5\n");
        assert_eq!(metadata.channel_count, 2);
        assert_eq!(metadata.z_spacing, 2.5);
        assert_eq!(metadata.dimension_order, DimensionOrder::Unspecified);
    }

    #[test]
    fn test_other_keys_ignored() {
        let text = "ImageJ=1.53t\nimages=24\nslices=8\nunit=micron\nloop=false\nchannels=3\n";
        let metadata = parse_imagej(text);
        assert_eq!(metadata.channel_count, 3);
        assert_eq!(metadata.z_spacing, 1.0);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let metadata = parse_imagej("ImageJ=1.0\nchannels=many\nspacing=-\n");
        assert_eq!(metadata, VolumeMetadata::default());
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let metadata = parse_imagej("ImageJ=1.0\r\ninfo=a=b\r\nspacing=0.75\r\n");
        assert_eq!(metadata.z_spacing, 0.75);
    }
}
