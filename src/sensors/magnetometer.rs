//! Magnetometer data types and decoding
//!
//! The MMC56x3 reports each axis as a 20-bit unsigned word split over three registers:
//! `XOUT0` holds bits 19:12, `XOUT1` bits 11:4, and the upper nibble of `XOUT2` bits 3:0.
//! The 9-byte output block is laid out as
//!
//! ```text
//! 0x00 Xout0  0x01 Xout1  0x02 Yout0  0x03 Yout1  0x04 Zout0  0x05 Zout1
//! 0x06 Xout2  0x07 Yout2  0x08 Zout2
//! ```
//!
//! Zero field is reported at mid-scale (`1 << 19`), not at binary zero.

/// Length of the magnetic output block starting at `Xout0`
pub const MAG_BLOCK_LEN: usize = 9;

/// Code reported for zero field
pub const MAG_ZERO_FIELD_OFFSET: i32 = 1 << 19;

/// Sensitivity in µT/LSB (0.0625 mG/LSB)
pub const MAG_SENSITIVITY_UT: f32 = 0.006_25;

/// Magnetometer data in raw counts, centered at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataRaw {
    /// X-axis magnetic field (counts)
    pub x: i32,
    /// Y-axis magnetic field (counts)
    pub y: i32,
    /// Z-axis magnetic field (counts)
    pub z: i32,
}

impl MagDataRaw {
    /// Decode the 9-byte output block
    ///
    /// Reassembles each 20-bit word and removes the mid-scale offset.
    #[must_use]
    pub fn from_block(block: &[u8; MAG_BLOCK_LEN]) -> Self {
        Self {
            x: unpack_axis(block, 0) - MAG_ZERO_FIELD_OFFSET,
            y: unpack_axis(block, 1) - MAG_ZERO_FIELD_OFFSET,
            z: unpack_axis(block, 2) - MAG_ZERO_FIELD_OFFSET,
        }
    }

    /// Convert to microteslas
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // 20-bit values are exact in f32
    pub fn to_microtesla(self) -> MagDataUT {
        MagDataUT {
            x: self.x as f32 * MAG_SENSITIVITY_UT,
            y: self.y as f32 * MAG_SENSITIVITY_UT,
            z: self.z as f32 * MAG_SENSITIVITY_UT,
        }
    }
}

/// Unsigned 20-bit word for axis `axis` (0 = X, 1 = Y, 2 = Z)
fn unpack_axis(block: &[u8; MAG_BLOCK_LEN], axis: usize) -> i32 {
    let high = i32::from(block[2 * axis]);
    let mid = i32::from(block[2 * axis + 1]);
    let low = i32::from(block[6 + axis] >> 4);
    (high << 12) | (mid << 4) | low
}

/// Magnetometer data in microteslas (µT)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataUT {
    /// X-axis magnetic field in µT
    pub x: f32,
    /// Y-axis magnetic field in µT
    pub y: f32,
    /// Z-axis magnetic field in µT
    pub z: f32,
}

impl MagDataUT {
    /// The reading as an ordered `(x, y, z)` triple
    #[must_use]
    pub const fn to_tuple(self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    /// Calculate the magnitude of the magnetic field vector
    ///
    /// Returns the magnitude in µT.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

impl From<MagDataUT> for (f32, f32, f32) {
    fn from(data: MagDataUT) -> Self {
        data.to_tuple()
    }
}
