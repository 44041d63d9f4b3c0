//! Volume assembly
//!
//! Folds the decoded planes of a stack into one 3D volume using the layout
//! recovered from the image description.

mod assembler;
mod bbox;
mod export;
mod types;

pub use assembler::VolumeAssembler;
pub use bbox::BoundingBox3;
pub use types::{PixelType, Volume};
