//! Self describing prefix written into the first pixels of an image.
//!
//! Layout, big endian, 13 bytes packed into the first 12 pixels:
//!
//! | offset | size | field                          |
//! |--------|------|--------------------------------|
//! | 0      | 1    | format version, always `1`     |
//! | 1      | 4    | payload length in bytes, `i32` |
//! | 5      | 4    | sample rate in Hz              |
//! | 9      | 2    | channel count                  |
//! | 11     | 2    | bits per sample                |

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use super::bit_packer::{self, UNITS_PER_PIXEL};
use super::capacity::max_payload_bytes;
use crate::error::ConcealError;
use crate::media::{AudioFormat, Pixel};
use crate::result::Result;

pub const HEADER_VERSION: u8 = 1;
pub const HEADER_BYTES: usize = 13;
pub const HEADER_PIXELS: usize = 12;
pub const HEADER_UNITS: usize = HEADER_PIXELS * UNITS_PER_PIXEL;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Header {
    /// payload length in bytes, which is one byte per sample
    pub payload_len: usize,
    pub format: AudioFormat,
}

impl Header {
    pub fn new(payload_len: usize, format: AudioFormat) -> Self {
        Self {
            payload_len,
            format,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let len = i32::try_from(self.payload_len).map_err(|_| {
            ConcealError::InvalidWaveform(format!(
                "{} bytes exceed the maximum payload length",
                self.payload_len
            ))
        })?;

        let mut buf = Vec::with_capacity(HEADER_BYTES);
        buf.write_u8(HEADER_VERSION)?;
        buf.write_i32::<BigEndian>(len)?;
        buf.write_u32::<BigEndian>(self.format.sample_rate)?;
        buf.write_u16::<BigEndian>(self.format.channels)?;
        buf.write_u16::<BigEndian>(self.format.bits_per_sample)?;

        Ok(buf)
    }

    /// parses and validates header bytes read from an image of `pixel_count` pixels
    pub fn from_bytes(mut bytes: &[u8], pixel_count: usize) -> Result<Self> {
        let version = bytes.read_u8()?;
        if version != HEADER_VERSION {
            return Err(malformed(format!("unknown format version {version}")));
        }
        let len = bytes.read_i32::<BigEndian>()?;
        let format = AudioFormat::new(
            bytes.read_u32::<BigEndian>()?,
            bytes.read_u16::<BigEndian>()?,
            bytes.read_u16::<BigEndian>()?,
        );

        if len < 0 {
            return Err(malformed(format!("negative payload length {len}")));
        }
        let payload_len = len as usize;
        let max = max_payload_bytes(pixel_count);
        if payload_len > max {
            return Err(malformed(format!(
                "payload length {payload_len} exceeds the image capacity of {max} bytes"
            )));
        }
        format
            .validate()
            .map_err(|e| malformed(format!("invalid audio format: {e}")))?;
        if payload_len % format.channels as usize != 0 {
            return Err(malformed(format!(
                "payload length {payload_len} does not fit {} channels",
                format.channels
            )));
        }

        Ok(Self::new(payload_len, format))
    }
}

fn malformed(reason: String) -> ConcealError {
    ConcealError::MalformedHeader(reason)
}

/// Serializes payload length and audio format into the fixed header block
pub fn encode_header(payload_len: usize, format: AudioFormat) -> Result<Vec<u8>> {
    Header::new(payload_len, format).to_bytes()
}

/// Reads the header out of the first pixels of a sequence
pub fn decode_header(pixels: &[Pixel]) -> Result<Header> {
    if pixels.len() < HEADER_PIXELS {
        return Err(malformed(format!(
            "{} pixels are too few to carry a header",
            pixels.len()
        )));
    }
    let bytes = bit_packer::unpack(pixels, 0, HEADER_BYTES)?;
    let header = Header::from_bytes(&bytes, pixels.len())?;
    debug!("decoded header {header:?}");

    Ok(header)
}

/// Writes the header into the first pixels, padding units are zeroed
pub fn write_header(pixels: &mut [Pixel], header: &Header) -> Result<usize> {
    let bytes = header.to_bytes()?;
    let written = bit_packer::pack(pixels, 0, &bytes);
    for unit in written..HEADER_UNITS {
        bit_packer::write_unit(pixels, unit, 0);
    }

    Ok(HEADER_UNITS)
}
