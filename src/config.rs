//! Decoder configuration
//!
//! Settings can be built in code or read from the `[decoder]` table of a
//! TOML file:
//!
//! ```toml
//! [decoder]
//! parallel = true
//! max_directories = 65536
//! lzw_page_size = 16384
//! invert_min_is_white = true
//! ```

use std::fs;
use std::path::Path;

use log::debug;

use crate::tiff::constants::lzw::DEFAULT_PAGE_SIZE;
use crate::tiff::errors::{FormatError, TiffResult};
use crate::tiff::reader::DEFAULT_MAX_DIRECTORIES;

/// Knobs for [`crate::api::VolumeDecoder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Decode planes on the rayon thread pool when the source can be reopened
    pub parallel: bool,
    /// Longest IFD chain accepted
    pub max_directories: usize,
    /// Page size of the LZW dictionary arena
    pub lzw_page_size: usize,
    /// Flip min-is-white planes so that larger values are brighter
    pub invert_min_is_white: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            parallel: true,
            max_directories: DEFAULT_MAX_DIRECTORIES,
            lzw_page_size: DEFAULT_PAGE_SIZE,
            invert_min_is_white: true,
        }
    }
}

impl DecoderConfig {
    /// Same settings with parallel decoding switched off
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Parses the `[decoder]` table of a TOML document
    ///
    /// Missing keys keep their defaults and unknown keys are ignored.
    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        let value: toml::Value = content
            .parse()
            .map_err(|e: toml::de::Error| FormatError::Config(e.message().to_string()))?;

        let mut config = DecoderConfig::default();
        let table = match value.get("decoder") {
            None => return Ok(config),
            Some(toml::Value::Table(table)) => table,
            Some(_) => return Err(FormatError::Config("[decoder] must be a table".to_string())),
        };

        if let Some(v) = table.get("parallel") {
            config.parallel = read_bool(v, "parallel")?;
        }
        if let Some(v) = table.get("max_directories") {
            config.max_directories = read_positive(v, "max_directories")?;
        }
        if let Some(v) = table.get("lzw_page_size") {
            config.lzw_page_size = read_positive(v, "lzw_page_size")?;
        }
        if let Some(v) = table.get("invert_min_is_white") {
            config.invert_min_is_white = read_bool(v, "invert_min_is_white")?;
        }

        debug!("Loaded decoder config: {:?}", config);
        Ok(config)
    }

    /// Reads a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            FormatError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

fn read_bool(value: &toml::Value, key: &str) -> TiffResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| FormatError::Config(format!("decoder.{} must be a boolean", key)))
}

fn read_positive(value: &toml::Value, key: &str) -> TiffResult<usize> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as usize),
        _ => Err(FormatError::Config(format!("decoder.{} must be a positive integer", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(DecoderConfig::from_toml_str("").unwrap(), DecoderConfig::default());
    }

    #[test]
    fn test_reads_decoder_table() {
        let config = DecoderConfig::from_toml_str(
            "[decoder]\nparallel = false\nlzw_page_size = 4096\nunknown = \"x\"\n",
        )
        .unwrap();
        assert!(!config.parallel);
        assert_eq!(config.lzw_page_size, 4096);
        assert_eq!(config.max_directories, DEFAULT_MAX_DIRECTORIES);
        assert!(config.invert_min_is_white);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = DecoderConfig::from_toml_str("[decoder]\nparallel = \"yes\"\n").unwrap_err();
        assert!(matches!(err, FormatError::Config(_)));

        let err = DecoderConfig::from_toml_str("[decoder]\nmax_directories = 0\n").unwrap_err();
        assert!(matches!(err, FormatError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(DecoderConfig::from_toml_str("[decoder"), Err(FormatError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volumetiff.toml");
        fs::write(&path, "[decoder]\ninvert_min_is_white = false\n").unwrap();
        assert!(!DecoderConfig::from_file(&path).unwrap().invert_min_is_white);
        assert!(DecoderConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
