//! Sensor data types and conversions for the MMC56x3
//!
//! This module holds the pure parts of a reading:
//! - Magnetometer (3-axis, 20-bit packed words, µT)
//! - Temperature (8-bit code, °C)
//!
//! Bus access and measurement sequencing live on `Mmc56x3Driver`.

pub mod magnetometer;
pub mod temperature;

// Re-export main types
pub use magnetometer::{MAG_BLOCK_LEN, MagDataRaw, MagDataUT};
pub use temperature::temperature_to_celsius;
