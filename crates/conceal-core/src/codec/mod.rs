pub mod bit_packer;
pub mod capacity;
pub mod header;
pub mod quantizer;

pub use bit_packer::{read_bits, units_for, write_bits, BitGroups};
pub use capacity::{check_capacity, max_payload_bytes, CapacityOverflow};
pub use header::{decode_header, encode_header, Header, HEADER_PIXELS, HEADER_UNITS};
pub use quantizer::{dequantize, quantize, SampleRange};
