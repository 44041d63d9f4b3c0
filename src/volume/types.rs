//! The assembled volume

use std::fmt;

use crate::tiff::tags::BitDepth;
use super::bbox::BoundingBox3;

/// Sample layout of one voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    Gray8,
    Gray16,
    Rgb8,
    Rgb16,
}

impl PixelType {
    pub fn name(&self) -> &'static str {
        match self {
            PixelType::Gray8 => "8-bit grayscale",
            PixelType::Gray16 => "16-bit grayscale",
            PixelType::Rgb8 => "8-bit RGB",
            PixelType::Rgb16 => "16-bit RGB",
        }
    }
}

/// A 3D image, optionally with three interleaved channels
///
/// Voxels are stored slice by slice, rows within a slice, channels
/// interleaved within a voxel. 16-bit samples are little-endian.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub width: u32,
    pub height: u32,
    pub depth: usize,
    /// 1 (grayscale) or 3 (RGB)
    pub channels: usize,
    pub bit_depth: BitDepth,
    pub data: Vec<u8>,
    /// Physical voxel size along X, Y and Z
    pub voxel_size: [f64; 3],
}

impl Volume {
    pub fn pixel_type(&self) -> PixelType {
        match (self.channels, self.bit_depth) {
            (3, BitDepth::Eight) => PixelType::Rgb8,
            (3, BitDepth::Sixteen) => PixelType::Rgb16,
            (_, BitDepth::Eight) => PixelType::Gray8,
            (_, BitDepth::Sixteen) => PixelType::Gray16,
        }
    }

    /// Bytes per voxel, all channels included
    pub fn voxel_bytes(&self) -> usize {
        self.channels * self.bit_depth.bytes()
    }

    pub fn slice_size(&self) -> usize {
        self.width as usize * self.height as usize * self.voxel_bytes()
    }

    /// Raw bytes of slice `z`
    pub fn slice(&self, z: usize) -> Option<&[u8]> {
        if z >= self.depth {
            return None;
        }
        let size = self.slice_size();
        self.data.get(z * size..(z + 1) * size)
    }

    /// Physical voxel size along X, Y and Z
    pub fn spacing(&self) -> [f64; 3] {
        self.voxel_size
    }

    /// Physical extent, anchored at the origin
    pub fn bounding_box(&self) -> BoundingBox3 {
        BoundingBox3::from_extent(
            self.width as f64 * self.voxel_size[0],
            self.height as f64 * self.voxel_size[1],
            self.depth as f64 * self.voxel_size[2],
        )
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume:")?;
        writeln!(f, "  Dimensions: {} x {} x {}", self.width, self.height, self.depth)?;
        writeln!(f, "  Pixel type: {}", self.pixel_type().name())?;
        writeln!(f, "  Voxel size: {} x {} x {}", self.voxel_size[0], self.voxel_size[1], self.voxel_size[2])?;
        let bbox = self.bounding_box();
        writeln!(f, "  Physical size: {} x {} x {}", bbox.width(), bbox.height(), bbox.depth())?;
        writeln!(f, "  Bounding box: {}", bbox)
    }
}
