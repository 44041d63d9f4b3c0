//! Utility modules for common functionality

pub mod logger;
pub mod progress;
pub(crate) mod string_utils;
pub mod tag_utils;
