#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod interface;
pub mod registers;
pub mod sensors;

// Re-export main types
pub use config::{Bandwidth, DataRate, OperationMode, PollConfig};
pub use device::Mmc56x3Driver;
pub use interface::I2cInterface;
pub use sensors::{MagDataRaw, MagDataUT};

/// Default I2C address of the MMC5603/MMC5613 (0x30)
///
/// The address is fixed in silicon for the standard part. Use [`I2cInterface::new()`]
/// if a board places the chip behind an address translator.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x30;

/// Expected value of the `PRODUCT_ID` register
pub const PRODUCT_ID_VALUE: u8 = 0x10;

/// First register of the 9-byte magnetic output block (`Xout0`)
pub const OUT_X_L: u8 = 0x00;

/// Which measurement a poll loop was waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    /// Temperature conversion (`meas_t_done`)
    Temperature,
    /// Magnetic field conversion (`meas_m_done`)
    Magnetic,
}

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// `PRODUCT_ID` did not match (contains the actual value read)
    DeviceNotFound(u8),
    /// The measurement-done flag never set within the configured poll budget
    MeasurementTimeout(Measurement),
    /// Invalid configuration parameter or combination
    InvalidConfig,
    /// Temperature cannot be measured while continuous mode is running
    ContinuousModeActive,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
