//! I/O utilities for file handling
//!
//! Order-aware integer reads and seek helpers shared by the header, directory
//! and strip readers.

pub mod seekable;
pub mod byte_order;
