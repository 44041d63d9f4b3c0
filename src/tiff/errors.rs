//! Custom error types for TIFF volume decoding

use std::fmt;
use std::io;

/// Fatal decode errors
///
/// Every variant terminates the decode of the current file. Metadata problems
/// never show up here; they degrade to defaults instead.
#[derive(Debug)]
pub enum FormatError {
    /// I/O error from the underlying reader
    Io(io::Error),
    /// Byte order marker is neither "II" nor "MM"
    NotATiff(u16),
    /// Version field is not 42
    UnsupportedVersion(u16),
    /// IFD entry count or chain link is unusable
    InvalidDirectory { offset: u64, reason: String },
    /// Tag records of an IFD could not be read completely
    TruncatedDirectory { offset: u64 },
    /// A tag every plane needs is absent
    MissingRequiredTag(u16),
    /// Bit depth or compression scheme outside what the decoder supports
    UnsupportedEncoding { tag: u16, value: u32 },
    /// Strips ran out before the plane buffer was filled
    TruncatedStrip { expected: usize, actual: usize },
    /// LZW bitstream does not decode
    CorruptLzwStream(String),
    /// Plane count is not a multiple of the channel count
    InconsistentPlaneCount { planes: usize, channels: usize },
    /// A plane disagrees with the first plane in geometry or bit depth
    PlaneMismatch { plane: usize, reason: String },
    /// Channel count / bit depth combination with no volume layout
    UnsupportedChannelLayout { channels: usize, bits_per_sample: u16 },
    /// Decode was cancelled through its cancellation token
    Cancelled,
    /// Decoder configuration could not be parsed
    Config(String),
}

impl FormatError {
    /// Name of the pipeline phase that produced this error
    pub fn phase(&self) -> &'static str {
        match self {
            FormatError::Io(_) => "io",
            FormatError::NotATiff(_) | FormatError::UnsupportedVersion(_) => "header",
            FormatError::InvalidDirectory { .. } | FormatError::TruncatedDirectory { .. } => "directory",
            FormatError::MissingRequiredTag(_) | FormatError::UnsupportedEncoding { .. } => "tags",
            FormatError::TruncatedStrip { .. } => "strips",
            FormatError::CorruptLzwStream(_) => "lzw",
            FormatError::InconsistentPlaneCount { .. }
            | FormatError::PlaneMismatch { .. }
            | FormatError::UnsupportedChannelLayout { .. } => "assembly",
            FormatError::Cancelled => "decode",
            FormatError::Config(_) => "config",
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io(e) => write!(f, "I/O error: {}", e),
            FormatError::NotATiff(v) => write!(f, "Not a TIFF file: byte order marker {:#06x}", v),
            FormatError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {:#x}", v),
            FormatError::InvalidDirectory { offset, reason } => {
                write!(f, "Invalid IFD at offset {}: {}", offset, reason)
            }
            FormatError::TruncatedDirectory { offset } => {
                write!(f, "Truncated tag table in IFD at offset {}", offset)
            }
            FormatError::MissingRequiredTag(tag) => write!(f, "Missing required tag: {}", tag),
            FormatError::UnsupportedEncoding { tag, value } => {
                write!(f, "Unsupported value {} for tag {}", value, tag)
            }
            FormatError::TruncatedStrip { expected, actual } => {
                write!(f, "Strip data ended after {} of {} bytes", actual, expected)
            }
            FormatError::CorruptLzwStream(msg) => write!(f, "Corrupt LZW stream: {}", msg),
            FormatError::InconsistentPlaneCount { planes, channels } => {
                write!(f, "{} planes cannot be split into {} channels", planes, channels)
            }
            FormatError::PlaneMismatch { plane, reason } => {
                write!(f, "Plane {} does not match the first plane: {}", plane, reason)
            }
            FormatError::UnsupportedChannelLayout { channels, bits_per_sample } => {
                write!(f, "Unsupported channel layout: {} channels at {} bits", channels, bits_per_sample)
            }
            FormatError::Cancelled => write!(f, "Decode cancelled"),
            FormatError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(error: io::Error) -> Self {
        FormatError::Io(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, FormatError>;
