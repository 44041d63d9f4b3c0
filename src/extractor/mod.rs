//! Pixel extraction from stripped TIFF planes
//!
//! Turns one IFD into a [`DecodedPlane`] by reading and decompressing its
//! strips in order.

mod strip_reader;
mod plane;

pub use strip_reader::StripReader;
pub use plane::DecodedPlane;
