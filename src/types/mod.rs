pub mod address;
pub mod payload;

pub use address::Address;
pub use payload::{Payload, PayloadContent};

/// Encode a float as the 8-byte little-endian IEEE-754 double used in downstream
/// smart-contract call data.
pub fn encode_float(value: f64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Inverse of [`encode_float`], used by tests and by log-replay tooling.
pub fn decode_float(bytes: [u8; 8]) -> f64 {
    f64::from_le_bytes(bytes)
}
