//! Core TIFF data structures

use std::fmt;

use crate::tiff::header::FileHeader;
use crate::tiff::ifd::ImageFileDirectory;

/// Header plus the full IFD chain of a TIFF file, in file order
#[derive(Debug, Clone)]
pub struct TiffFile {
    /// Parsed file header
    pub header: FileHeader,
    /// Image File Directories, one per image plane
    pub ifds: Vec<ImageFileDirectory>,
}

impl TiffFile {
    /// Returns the first IFD if available
    pub fn main_ifd(&self) -> Option<&ImageFileDirectory> {
        self.ifds.first()
    }

    /// Returns the number of IFDs in the TIFF file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}

impl fmt::Display for TiffFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Byte order: {}", self.header.byte_order.name())?;
        writeln!(f, "  First IFD offset: {}", self.header.first_ifd_offset)?;
        writeln!(f, "  Number of IFDs: {}", self.ifds.len())?;

        for ifd in &self.ifds {
            write!(f, "{}", ifd)?;
        }

        Ok(())
    }
}
