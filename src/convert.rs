//! Binary-literal to floating-point conversion (§6). Auxiliary: not used
//! by the DES core, present at the module boundary for downstream
//! tooling that embeds raw bit patterns (e.g. trace generators).
//!
//! The original implementation reinterprets a `std::bitset` via
//! `memcpy`; the Rust equivalent parses the literal as an unsigned
//! integer of the matching width and reinterprets its bits with
//! `from_bits`, which is exact and endianness-independent.

use crate::error::SimError;

pub fn bin32_to_float32(bits: &str) -> Result<f32, SimError> {
    if bits.len() != 32 {
        return Err(SimError::ConvertLength {
            expected: 32,
            got: bits.len(),
        });
    }
    let value = u32::from_str_radix(bits, 2).map_err(|_| SimError::ConvertLength {
        expected: 32,
        got: bits.len(),
    })?;
    Ok(f32::from_bits(value))
}

pub fn bin64_to_float64(bits: &str) -> Result<f64, SimError> {
    if bits.len() != 64 {
        return Err(SimError::ConvertLength {
            expected: 64,
            got: bits.len(),
        });
    }
    let value = u64::from_str_radix(bits, 2).map_err(|_| SimError::ConvertLength {
        expected: 64,
        got: bits.len(),
    })?;
    Ok(f64::from_bits(value))
}
