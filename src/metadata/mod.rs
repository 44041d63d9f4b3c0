//! Volume metadata embedded in the image description
//!
//! Multi-channel and volumetric stacks record their layout as free text in
//! the first plane's ImageDescription tag, either as an OME-XML document or
//! as an ImageJ `key=value` block. Metadata problems never fail a decode;
//! they fall back to [`VolumeMetadata::default`].

mod imagej;
mod ome;

use log::{debug, warn};

pub use imagej::parse_imagej;
pub use ome::parse_ome_xml;

/// How planes of a multi-channel stack are ordered in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionOrder {
    /// Not recorded; assembled as [`DimensionOrder::Xyztc`]
    #[default]
    Unspecified,
    /// All Z slices of channel 0, then all of channel 1, ...
    Xyztc,
    /// All channels of slice 0, then all of slice 1, ...
    Xyczt,
}

impl DimensionOrder {
    /// Recognizes the OME `DimensionOrder` values this decoder interleaves
    pub fn from_ome(value: &str) -> Self {
        match value {
            "XYZTC" => DimensionOrder::Xyztc,
            "XYCZT" => DimensionOrder::Xyczt,
            _ => DimensionOrder::Unspecified,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DimensionOrder::Unspecified => "unspecified",
            DimensionOrder::Xyztc => "XYZTC",
            DimensionOrder::Xyczt => "XYCZT",
        }
    }
}

/// Layout recovered from the description text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMetadata {
    /// Always at least 1
    pub channel_count: usize,
    pub dimension_order: DimensionOrder,
    pub z_spacing: f64,
}

impl Default for VolumeMetadata {
    fn default() -> Self {
        VolumeMetadata {
            channel_count: 1,
            dimension_order: DimensionOrder::Unspecified,
            z_spacing: 1.0,
        }
    }
}

impl VolumeMetadata {
    /// Parses the first plane's description, falling back to defaults
    pub fn parse(description: Option<&str>) -> Self {
        let text = match description {
            Some(text) => text.trim_start(),
            None => return Self::default(),
        };

        let metadata = if text.starts_with("<?xml") {
            parse_ome_xml(text)
        } else if text.starts_with("ImageJ") {
            Some(parse_imagej(text))
        } else {
            None
        };

        match metadata {
            Some(metadata) => {
                debug!("Volume metadata: {} channels, order {}, z spacing {}",
                       metadata.channel_count, metadata.dimension_order.name(), metadata.z_spacing);
                metadata
            }
            None => {
                if text.starts_with("<?xml") {
                    warn!("Image description is XML but not usable OME metadata, using defaults");
                }
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_description_uses_defaults() {
        assert_eq!(VolumeMetadata::parse(None), VolumeMetadata::default());
    }

    #[test]
    fn test_unrecognized_text_uses_defaults() {
        let metadata = VolumeMetadata::parse(Some("acquired on scope 3"));
        assert_eq!(metadata.channel_count, 1);
        assert_eq!(metadata.dimension_order, DimensionOrder::Unspecified);
        assert_eq!(metadata.z_spacing, 1.0);
    }

    #[test]
    fn test_dispatches_to_ome() {
        let xml = r#"<?xml version="1.0"?><OME><Image ID="Image:0"><Pixels SizeC="3" DimensionOrder="XYCZT"/></Image></OME>"#;
        let metadata = VolumeMetadata::parse(Some(xml));
        assert_eq!(metadata.channel_count, 3);
        assert_eq!(metadata.dimension_order, DimensionOrder::Xyczt);
    }

    #[test]
    fn test_dispatches_to_imagej() {
        let metadata = VolumeMetadata::parse(Some("ImageJ=1.0\nchannels=2\nspacing=2.5\n"));
        assert_eq!(metadata.channel_count, 2);
        assert_eq!(metadata.z_spacing, 2.5);
    }

    #[test]
    fn test_broken_xml_uses_defaults() {
        let metadata = VolumeMetadata::parse(Some("<?xml version=\"1.0\"?><OME><Image><Pixels SizeC=\"3\""));
        assert_eq!(metadata, VolumeMetadata::default());
    }
}
