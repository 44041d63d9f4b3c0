//! Folding decoded planes into a volume

use log::{debug, info};

use crate::extractor::DecodedPlane;
use crate::io::byte_order::ByteOrder;
use crate::metadata::{DimensionOrder, VolumeMetadata};
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::tags::{BitDepth, Photometric};
use super::types::Volume;

/// Builds a [`Volume`] from planes in IFD order
pub struct VolumeAssembler {
    invert_min_is_white: bool,
}

impl Default for VolumeAssembler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VolumeAssembler {
    pub fn new(invert_min_is_white: bool) -> Self {
        VolumeAssembler { invert_min_is_white }
    }

    /// Assembles the planes according to `metadata`
    ///
    /// Single-channel stacks become one slice per plane. Three-channel stacks
    /// are interleaved into RGB voxels following the dimension order.
    pub fn assemble(&self, planes: Vec<DecodedPlane>, metadata: &VolumeMetadata) -> TiffResult<Volume> {
        let channels = metadata.channel_count.max(1);
        let first = planes.first().ok_or(FormatError::InconsistentPlaneCount { planes: 0, channels })?;
        if planes.len() % channels != 0 {
            return Err(FormatError::InconsistentPlaneCount {
                planes: planes.len(),
                channels,
            });
        }
        check_geometry(&planes)?;

        let (width, height, bit_depth, samples) = (first.width, first.height, first.bit_depth, first.samples_per_pixel as usize);
        let depth = planes.len() / channels;
        let voxel_size = [
            1.0 / first.x_resolution,
            1.0 / first.y_resolution,
            if metadata.z_spacing > 0.0 { metadata.z_spacing } else { 1.0 },
        ];
        info!("Assembling {} planes into {}x{}x{} volume, {} channel(s)", planes.len(), width, height, depth, channels);

        let (volume_channels, data) = match (channels, samples) {
            (1, 1) | (1, 3) => (samples, self.stack(planes)),
            (3, 1) => (3, interleave(planes, depth, metadata.dimension_order)),
            (c, s) => {
                return Err(FormatError::UnsupportedChannelLayout {
                    channels: c * s,
                    bits_per_sample: bit_depth.bits(),
                })
            }
        };

        Ok(Volume {
            width,
            height,
            depth,
            channels: volume_channels,
            bit_depth,
            data,
            voxel_size,
        })
    }

    /// One plane per slice
    fn stack(&self, planes: Vec<DecodedPlane>) -> Vec<u8> {
        let mut data = Vec::with_capacity(planes.iter().map(|p| p.pixels.len()).sum());
        for mut plane in planes {
            let invert = self.invert_min_is_white && plane.photometric == Photometric::MinIsWhite;
            match plane.bit_depth {
                BitDepth::Eight => {
                    if invert {
                        plane.pixels.iter_mut().for_each(|v| *v = 255 - *v);
                    }
                }
                BitDepth::Sixteen => normalize_u16(&mut plane.pixels, plane.byte_order, invert),
            }
            data.append(&mut plane.pixels);
        }
        data
    }
}

/// All planes must share the first plane's geometry
fn check_geometry(planes: &[DecodedPlane]) -> TiffResult<()> {
    let Some(first) = planes.first() else {
        return Ok(());
    };
    for (index, plane) in planes.iter().enumerate().skip(1) {
        let reason = if (plane.width, plane.height) != (first.width, first.height) {
            format!("{}x{} differs from {}x{}", plane.width, plane.height, first.width, first.height)
        } else if plane.bit_depth != first.bit_depth {
            format!("{} bits differs from {} bits", plane.bit_depth.bits(), first.bit_depth.bits())
        } else if plane.samples_per_pixel != first.samples_per_pixel {
            format!("{} samples per pixel differs from {}", plane.samples_per_pixel, first.samples_per_pixel)
        } else {
            continue;
        };
        return Err(FormatError::PlaneMismatch { plane: index, reason });
    }
    Ok(())
}

/// Rewrites 16-bit samples as little-endian, optionally inverted
fn normalize_u16(pixels: &mut [u8], byte_order: ByteOrder, invert: bool) {
    if byte_order == ByteOrder::LittleEndian && !invert {
        return;
    }
    for sample in pixels.chunks_exact_mut(2) {
        let mut value = byte_order.u16_from(sample);
        if invert {
            value = u16::MAX - value;
        }
        sample.copy_from_slice(&value.to_le_bytes());
    }
}

/// Scatters single-channel planes into interleaved RGB slices
fn interleave(planes: Vec<DecodedPlane>, depth: usize, order: DimensionOrder) -> Vec<u8> {
    let sample_bytes = planes[0].bit_depth.bytes();
    let slice_samples = planes[0].pixel_count();
    let slice_bytes = slice_samples * 3 * sample_bytes;
    let mut data = vec![0u8; slice_bytes * depth];

    debug!("Interleaving {} planes as {}", planes.len(), order.name());
    for (k, mut plane) in planes.into_iter().enumerate() {
        let (slice, channel) = match order {
            DimensionOrder::Xyczt => (k / 3, k % 3),
            DimensionOrder::Xyztc | DimensionOrder::Unspecified => (k % depth, k / depth),
        };
        if sample_bytes == 2 {
            normalize_u16(&mut plane.pixels, plane.byte_order, false);
        }

        let destination = &mut data[slice * slice_bytes..(slice + 1) * slice_bytes];
        for (i, sample) in plane.pixels.chunks_exact(sample_bytes).enumerate() {
            let at = (i * 3 + channel) * sample_bytes;
            destination[at..at + sample_bytes].copy_from_slice(sample);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(pixels: Vec<u8>, bit_depth: BitDepth, byte_order: ByteOrder) -> DecodedPlane {
        let samples = pixels.len() / bit_depth.bytes();
        DecodedPlane {
            width: samples as u32,
            height: 1,
            bit_depth,
            samples_per_pixel: 1,
            photometric: Photometric::MinIsBlack,
            byte_order,
            pixels,
            x_resolution: 2.0,
            y_resolution: 4.0,
            description: None,
        }
    }

    fn gray8(pixels: Vec<u8>) -> DecodedPlane {
        plane(pixels, BitDepth::Eight, ByteOrder::LittleEndian)
    }

    fn rgb_metadata(order: DimensionOrder) -> VolumeMetadata {
        VolumeMetadata {
            channel_count: 3,
            dimension_order: order,
            z_spacing: 1.0,
        }
    }

    #[test]
    fn test_single_channel_stack() {
        let planes = vec![gray8(vec![1, 2]), gray8(vec![3, 4]), gray8(vec![5, 6])];
        let volume = VolumeAssembler::default().assemble(planes, &VolumeMetadata::default()).unwrap();
        assert_eq!((volume.width, volume.height, volume.depth, volume.channels), (2, 1, 3, 1));
        assert_eq!(volume.data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(volume.voxel_size, [0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_min_is_white_inversion() {
        let mut inverted = gray8(vec![0, 10, 255]);
        inverted.photometric = Photometric::MinIsWhite;
        let volume = VolumeAssembler::default().assemble(vec![inverted.clone()], &VolumeMetadata::default()).unwrap();
        assert_eq!(volume.data, vec![255, 245, 0]);

        let untouched = VolumeAssembler::new(false).assemble(vec![inverted], &VolumeMetadata::default()).unwrap();
        assert_eq!(untouched.data, vec![0, 10, 255]);
    }

    #[test]
    fn test_sixteen_bit_big_endian_normalized() {
        let mut big = plane(vec![0x01, 0x02, 0xFF, 0x00], BitDepth::Sixteen, ByteOrder::BigEndian);
        let volume = VolumeAssembler::default().assemble(vec![big.clone()], &VolumeMetadata::default()).unwrap();
        assert_eq!(volume.data, vec![0x02, 0x01, 0x00, 0xFF]);

        big.photometric = Photometric::MinIsWhite;
        let volume = VolumeAssembler::default().assemble(vec![big], &VolumeMetadata::default()).unwrap();
        // 65535 - 0x0102 = 0xFEFD, 65535 - 0xFF00 = 0x00FF
        assert_eq!(volume.data, vec![0xFD, 0xFE, 0xFF, 0x00]);
    }

    #[test]
    fn test_xyczt_interleaving() {
        // Planes: z0c0, z0c1, z0c2, z1c0, z1c1, z1c2
        let planes = (0..6u8).map(|k| gray8(vec![k * 10, k * 10 + 1])).collect();
        let volume = VolumeAssembler::default()
            .assemble(planes, &rgb_metadata(DimensionOrder::Xyczt))
            .unwrap();
        assert_eq!(volume.depth, 2);
        assert_eq!(volume.channels, 3);
        assert_eq!(volume.slice(0).unwrap(), &[0, 10, 20, 1, 11, 21][..]);
        assert_eq!(volume.slice(1).unwrap(), &[30, 40, 50, 31, 41, 51][..]);
    }

    #[test]
    fn test_xyztc_interleaving() {
        // Planes: z0c0, z1c0, z0c1, z1c1, z0c2, z1c2
        let planes = (0..6u8).map(|k| gray8(vec![k])).collect();
        let volume = VolumeAssembler::default()
            .assemble(planes, &rgb_metadata(DimensionOrder::Xyztc))
            .unwrap();
        assert_eq!(volume.data, vec![0, 2, 4, 1, 3, 5]);

        let planes = (0..6u8).map(|k| gray8(vec![k])).collect();
        let unspecified = VolumeAssembler::default()
            .assemble(planes, &rgb_metadata(DimensionOrder::Unspecified))
            .unwrap();
        assert_eq!(unspecified.data, volume.data);
    }

    #[test]
    fn test_sixteen_bit_rgb_interleaving() {
        let planes = (0..3u8)
            .map(|c| plane(vec![0x00, c + 1], BitDepth::Sixteen, ByteOrder::BigEndian))
            .collect();
        let volume = VolumeAssembler::default()
            .assemble(planes, &rgb_metadata(DimensionOrder::Xyczt))
            .unwrap();
        assert_eq!(volume.data, vec![1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn test_plane_count_must_divide() {
        let planes = vec![gray8(vec![1]), gray8(vec![2])];
        let err = VolumeAssembler::default()
            .assemble(planes, &rgb_metadata(DimensionOrder::Xyczt))
            .unwrap_err();
        assert!(matches!(err, FormatError::InconsistentPlaneCount { planes: 2, channels: 3 }));
    }

    #[test]
    fn test_two_channels_unsupported() {
        let planes = vec![gray8(vec![1]), gray8(vec![2])];
        let metadata = VolumeMetadata { channel_count: 2, ..VolumeMetadata::default() };
        let err = VolumeAssembler::default().assemble(planes, &metadata).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedChannelLayout { channels: 2, bits_per_sample: 8 }));
    }

    #[test]
    fn test_mismatched_planes_rejected() {
        let planes = vec![gray8(vec![1, 2]), gray8(vec![3])];
        let err = VolumeAssembler::default().assemble(planes, &VolumeMetadata::default()).unwrap_err();
        assert!(matches!(err, FormatError::PlaneMismatch { plane: 1, .. }));
    }

    #[test]
    fn test_zero_spacing_uses_unit_depth() {
        let metadata = VolumeMetadata { z_spacing: 0.0, ..VolumeMetadata::default() };
        let volume = VolumeAssembler::default().assemble(vec![gray8(vec![1]), gray8(vec![2])], &metadata).unwrap();
        assert_eq!(volume.bounding_box().depth(), 2.0);
    }
}
