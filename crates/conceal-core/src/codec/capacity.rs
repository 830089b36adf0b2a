use super::bit_packer::{bytes_for, units_for, UNITS_PER_PIXEL};
use super::header::HEADER_UNITS;
use crate::error::ConcealError;
use crate::result::Result;

/// Outcome of a failed capacity check
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CapacityOverflow {
    /// first unit that would be written out of bounds
    pub unit_index: usize,
    pub required: usize,
    pub available: usize,
}

impl From<CapacityOverflow> for ConcealError {
    fn from(value: CapacityOverflow) -> Self {
        ConcealError::CapacityOverflow {
            unit_index: value.unit_index,
            required: value.required,
            available: value.available,
        }
    }
}

/// number of 3 bit units an image of `pixel_count` pixels offers
pub fn available_units(pixel_count: usize) -> usize {
    pixel_count * UNITS_PER_PIXEL
}

/// units needed for the header plus a payload of `payload_len` bytes
pub fn required_units(header_units: usize, payload_len: usize) -> usize {
    header_units + units_for(payload_len)
}

/// largest payload in bytes that fits next to the header
pub fn max_payload_bytes(pixel_count: usize) -> usize {
    bytes_for(available_units(pixel_count).saturating_sub(HEADER_UNITS))
}

/// Checks that header and payload fit, before anything is written.
pub fn check_capacity(
    pixel_count: usize,
    header_units: usize,
    payload_len: usize,
) -> std::result::Result<(), CapacityOverflow> {
    let available = available_units(pixel_count);
    let required = required_units(header_units, payload_len);
    if required > available {
        // units 0..available are fine, the first one beyond is the culprit
        return Err(CapacityOverflow {
            unit_index: available,
            required,
            available,
        });
    }

    Ok(())
}

/// [`check_capacity`] for the fixed header, as a crate error
pub fn ensure_capacity(pixel_count: usize, payload_len: usize) -> Result<()> {
    Ok(check_capacity(pixel_count, HEADER_UNITS, payload_len)?)
}
