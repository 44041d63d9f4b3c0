//! Unit tests for the TIFF parsing layer

#[cfg(test)]
mod tags_tests;
