//! LZW decompression
//!
//! TIFF flavour of LZW: codes are packed MSB-first, 256 clears the table,
//! 257 ends the stream, and the code width grows from 9 to 12 bits one code
//! earlier than classic LZW (at table sizes 511, 1023 and 2047).

use log::trace;

use crate::tiff::constants::compression;
use crate::tiff::constants::lzw::{CLEAR_CODE, DEFAULT_PAGE_SIZE, EOI_CODE, MAX_CODE_WIDTH, MIN_CODE_WIDTH};
use crate::tiff::errors::{FormatError, TiffResult};
use super::dictionary::Dictionary;
use super::handler::CompressionHandler;

/// Decompresses a TIFF LZW stream, producing at most `max_output` bytes
pub fn decompress(data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
    LzwDecoder::new(DEFAULT_PAGE_SIZE).decode(data, max_output)
}

/// Code width for a table holding `len` entries
fn code_width_for(len: usize) -> u8 {
    match len {
        0..=510 => MIN_CODE_WIDTH,
        511..=1022 => 10,
        1023..=2046 => 11,
        _ => MAX_CODE_WIDTH,
    }
}

/// LZW decoder
///
/// The string table lives as long as the decoder; one decoder handles one
/// strip at a time.
pub struct LzwDecoder {
    dictionary: Dictionary,
    code_width: u8,
}

impl LzwDecoder {
    pub fn new(page_size: usize) -> Self {
        LzwDecoder {
            dictionary: Dictionary::new(page_size),
            code_width: MIN_CODE_WIDTH,
        }
    }

    fn reset(&mut self) {
        self.dictionary.reset();
        self.code_width = MIN_CODE_WIDTH;
    }

    /// Decodes one strip
    ///
    /// Stops at the end-of-information code, when the output reaches
    /// `max_output`, or when the input runs out. Writing past `max_output`
    /// means the stream does not belong to this strip and is an error.
    pub fn decode(&mut self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        self.reset();
        let mut output = Vec::with_capacity(max_output.min(data.len().saturating_mul(8)));
        let mut reader = BitReader::new(data);
        let mut previous: Option<usize> = None;

        while output.len() < max_output {
            let code = match reader.read_bits(self.code_width) {
                Some(code) => code,
                None => break,
            };

            if code == EOI_CODE {
                break;
            }
            if code == CLEAR_CODE {
                self.reset();
                previous = None;
                continue;
            }

            let code = code as usize;
            let entry_code = match previous {
                None => {
                    if code >= self.dictionary.len() {
                        return Err(FormatError::CorruptLzwStream(format!(
                            "code {} with no string after a clear", code
                        )));
                    }
                    code
                }
                Some(prev) if code < self.dictionary.len() => {
                    let first = self.first_byte(code)?;
                    self.add(prev, first);
                    code
                }
                Some(prev) if code == self.dictionary.len() => {
                    // The code being defined right now: previous string plus its own first byte
                    let first = self.first_byte(prev)?;
                    self.add(prev, first).ok_or_else(|| {
                        FormatError::CorruptLzwStream(format!("code {} beyond a full table", code))
                    })?
                }
                Some(_) => {
                    return Err(FormatError::CorruptLzwStream(format!(
                        "code {} ahead of next free code {}", code, self.dictionary.len()
                    )));
                }
            };

            let entry = self.dictionary.get(entry_code).unwrap_or_default();
            if entry.is_empty() {
                return Err(FormatError::CorruptLzwStream(format!("reserved code {} used as data", entry_code)));
            }
            if output.len() + entry.len() > max_output {
                return Err(FormatError::CorruptLzwStream(format!(
                    "decoded data exceeds {} bytes", max_output
                )));
            }
            output.extend_from_slice(entry);
            previous = Some(code);
        }

        trace!("LZW decoded {} -> {} bytes, table at {} entries", data.len(), output.len(), self.dictionary.len());
        Ok(output)
    }

    fn first_byte(&self, code: usize) -> TiffResult<u8> {
        self.dictionary
            .get(code)
            .and_then(|entry| entry.first().copied())
            .ok_or_else(|| FormatError::CorruptLzwStream(format!("code {} has no string", code)))
    }

    fn add(&mut self, prefix: usize, byte: u8) -> Option<usize> {
        let code = self.dictionary.add_extended(prefix, byte)?;
        self.code_width = code_width_for(self.dictionary.len());
        Some(code)
    }
}

/// Handler for LZW compressed strips (compression code 5)
pub struct LzwHandler {
    page_size: usize,
}

impl LzwHandler {
    pub fn new(page_size: usize) -> Self {
        LzwHandler { page_size }
    }
}

impl Default for LzwHandler {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], max_output: usize) -> TiffResult<Vec<u8>> {
        // A fresh decoder per strip keeps concurrent plane decodes isolated
        LzwDecoder::new(self.page_size).decode(data, max_output)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u16 {
        compression::LZW
    }
}

/// Reads variable-length codes, most significant bit first
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    buffer: u32,
    bits: u8,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            buffer: 0,
            bits: 0,
        }
    }

    fn read_bits(&mut self, count: u8) -> Option<u16> {
        while self.bits < count {
            let byte = *self.data.get(self.position)?;
            self.position += 1;
            self.buffer = (self.buffer << 8) | byte as u32;
            self.bits += 8;
        }

        self.bits -= count;
        let code = (self.buffer >> self.bits) & ((1u32 << count) - 1);
        self.buffer &= (1u32 << self.bits) - 1;
        Some(code as u16)
    }
}
