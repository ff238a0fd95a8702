//! Temperature conversion
//!
//! `TOUT` is an unsigned 8-bit code at 0.8 °C/LSB with zero at -75 °C, covering
//! -75 °C to 129 °C.

/// Temperature sensitivity in °C/LSB
pub const TEMP_SENSITIVITY_C: f32 = 0.8;

/// Temperature reported for a raw code of zero
pub const TEMP_OFFSET_C: f32 = -75.0;

/// Convert a raw `TOUT` code to degrees Celsius
#[must_use]
pub fn temperature_to_celsius(raw: u8) -> f32 {
    f32::from(raw) * TEMP_SENSITIVITY_C + TEMP_OFFSET_C
}
