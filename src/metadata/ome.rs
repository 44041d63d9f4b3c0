//! OME-XML description parsing

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{DimensionOrder, VolumeMetadata};

/// Reads `SizeC` and `DimensionOrder` from the first `Image/Pixels` element
///
/// Returns `None` when the document is malformed or has no such element.
pub fn parse_ome_xml(xml: &str) -> Option<VolumeMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Local names of the currently open elements
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if is_image_pixels(&element, &stack) {
                    return Some(read_pixels(&element));
                }
                stack.push(element.local_name().as_ref().to_vec());
            }
            Ok(Event::Empty(element)) => {
                if is_image_pixels(&element, &stack) {
                    return Some(read_pixels(&element));
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => {
                debug!("OME-XML has no Image/Pixels element");
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Malformed OME-XML at byte {}: {}", reader.buffer_position(), e);
                return None;
            }
        }
    }
}

fn is_image_pixels(element: &BytesStart, stack: &[Vec<u8>]) -> bool {
    element.local_name().as_ref() == b"Pixels"
        && stack.last().map_or(false, |parent| parent.as_slice() == b"Image")
}

fn read_pixels(element: &BytesStart) -> VolumeMetadata {
    let mut metadata = VolumeMetadata::default();

    for attribute in element.attributes().flatten() {
        let value = match attribute.unescape_value() {
            Ok(value) => value,
            Err(_) => continue,
        };
        match attribute.key.local_name().as_ref() {
            b"SizeC" => match value.trim().parse::<usize>() {
                Ok(channels) if channels > 0 => metadata.channel_count = channels,
                _ => warn!("Ignoring OME SizeC value {:?}", value),
            },
            b"DimensionOrder" => metadata.dimension_order = DimensionOrder::from_ome(value.trim()),
            _ => {}
        }
    }

    metadata
}
