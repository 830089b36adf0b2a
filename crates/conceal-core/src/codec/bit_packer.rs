//! 3 bits per color channel, the unit of embedding.
//!
//! Payload bytes are read as one continuous big endian bit stream and cut into
//! groups of 3 bits. Group `g` lands in unit `g`, where unit `u` is channel `u % 3`
//! of pixel `u / 3`. A trailing group with less than 3 bits is padded with zeros
//! on the right.

use std::cmp::min;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::media::{Pixel, CHANNELS};
use crate::result::Result;

pub const BITS_PER_UNIT: usize = 3;
pub const UNIT_MASK: u8 = 0b0000_0111;
pub const UNITS_PER_PIXEL: usize = CHANNELS;

/// number of units needed to carry `bytes` payload bytes
pub fn units_for(bytes: usize) -> usize {
    (bytes * 8 + BITS_PER_UNIT - 1) / BITS_PER_UNIT
}

/// number of whole bytes `units` can carry
pub fn bytes_for(units: usize) -> usize {
    units * BITS_PER_UNIT / 8
}

/// Replaces the 3 low bits of one channel
pub fn write_bits(mut pixel: Pixel, channel: usize, bits: u8) -> Pixel {
    let c = pixel.channel_mut(channel);
    *c = (*c & !UNIT_MASK) | (bits & UNIT_MASK);
    pixel
}

/// Reads the 3 low bits of one channel
pub fn read_bits(pixel: Pixel, channel: usize) -> u8 {
    pixel.channel(channel) & UNIT_MASK
}

pub fn write_unit(pixels: &mut [Pixel], unit: usize, bits: u8) {
    let idx = unit / UNITS_PER_PIXEL;
    pixels[idx] = write_bits(pixels[idx], unit % UNITS_PER_PIXEL, bits);
}

pub fn read_unit(pixels: &[Pixel], unit: usize) -> u8 {
    read_bits(pixels[unit / UNITS_PER_PIXEL], unit % UNITS_PER_PIXEL)
}

/// Iterates the 3 bit groups of a byte slice, most significant bits first
pub struct BitGroups<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    remaining_bits: usize,
}

impl<'a> BitGroups<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: BitReader::endian(bytes, BigEndian),
            remaining_bits: bytes.len() * 8,
        }
    }
}

impl Iterator for BitGroups<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_bits == 0 {
            return None;
        }
        let n = min(BITS_PER_UNIT, self.remaining_bits);
        let bits: u8 = self.reader.read(n as u32).ok()?;
        self.remaining_bits -= n;

        Some(bits << (BITS_PER_UNIT - n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.remaining_bits + BITS_PER_UNIT - 1) / BITS_PER_UNIT;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitGroups<'_> {}

/// Joins 3 bit groups back into exactly `len` bytes, padding bits are dropped.
pub fn join_groups<I>(groups: I, len: usize) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = u8>,
{
    let mut bytes = Vec::with_capacity(len);
    {
        let mut writer = BitWriter::endian(&mut bytes, BigEndian);
        let mut remaining_bits = len * 8;
        for group in groups {
            if remaining_bits == 0 {
                break;
            }
            let n = min(BITS_PER_UNIT, remaining_bits);
            writer.write(n as u32, (group & UNIT_MASK) >> (BITS_PER_UNIT - n))?;
            remaining_bits -= n;
        }
    }
    bytes.resize(len, 0);

    Ok(bytes)
}

/// Packs `bytes` into the units starting at `first_unit`, returns the number of units written
pub fn pack(pixels: &mut [Pixel], first_unit: usize, bytes: &[u8]) -> usize {
    let mut written = 0;
    for (unit, group) in (first_unit..).zip(BitGroups::new(bytes)) {
        write_unit(pixels, unit, group);
        written += 1;
    }
    written
}

/// Reads `len` bytes out of the units starting at `first_unit`
pub fn unpack(pixels: &[Pixel], first_unit: usize, len: usize) -> Result<Vec<u8>> {
    let units = first_unit..first_unit + units_for(len);
    join_groups(units.map(|u| read_unit(pixels, u)), len)
}
