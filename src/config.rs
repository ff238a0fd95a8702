//! Measurement configuration
//!
//! The MMC56x3 has two ways to take measurements:
//! - **Single-shot**: the host triggers each conversion and polls the status flag
//! - **Continuous**: the chip converts at the programmed output data rate (ODR)
//!
//! The bandwidth setting trades noise for conversion time and caps the ODR that
//! continuous mode can sustain:
//!
//! | Bandwidth | Conversion time | Max ODR |
//! |-----------|-----------------|---------|
//! | `Ms6_6`   | 6.6 ms          | 75 Hz   |
//! | `Ms3_5`   | 3.5 ms          | 150 Hz  |
//! | `Ms2_0`   | 2.0 ms          | 255 Hz  |
//! | `Ms1_2`   | 1.2 ms          | 255 Hz, 1000 Hz in high-power mode |
//!
//! # Example
//!
//! ```ignore
//! # use mmc56x3::{Mmc56x3Driver, DataRate, OperationMode};
//! # let mut mag: Mmc56x3Driver<_, _> = todo!();
//! mag.set_data_rate(DataRate::Hz(100))?; // raises bandwidth to 3.5 ms
//! mag.set_operation_mode(OperationMode::Continuous)?;
//! let field = mag.magnetic()?;
//! # Ok::<(), mmc56x3::Error<()>>(())
//! ```

/// Default number of status reads before a measurement is declared lost
pub const DEFAULT_MAX_POLLS: u32 = 20;

/// Default wait between status reads in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5;

/// Time the chip needs after a software reset
pub const RESET_DELAY_MS: u32 = 20;

/// Time each SET or RESET coil pulse needs to settle
pub const SET_RESET_DELAY_MS: u32 = 1;

/// Bound on the measurement-done poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Maximum number of status reads per measurement (0 is treated as 1)
    pub max_polls: u32,
    /// Delay between two status reads in milliseconds
    pub interval_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_polls: DEFAULT_MAX_POLLS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollConfig {
    /// Number of status reads the driver will actually issue
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_polls == 0 { 1 } else { self.max_polls }
    }

    /// Worst-case time spent waiting before a timeout, in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u32 {
        self.attempts().saturating_sub(1).saturating_mul(self.interval_ms)
    }
}

/// Measurement bandwidth (`CTRL_REG1` BW bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 6.6 ms conversion, lowest noise
    #[default]
    Ms6_6 = 0b00,
    /// 3.5 ms conversion
    Ms3_5 = 0b01,
    /// 2.0 ms conversion
    Ms2_0 = 0b10,
    /// 1.2 ms conversion, highest noise
    Ms1_2 = 0b11,
}

impl Bandwidth {
    /// Register value for the BW field
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Nominal conversion time in microseconds
    #[must_use]
    pub const fn measurement_time_us(self) -> u32 {
        match self {
            Self::Ms6_6 => 6_600,
            Self::Ms3_5 => 3_500,
            Self::Ms2_0 => 2_000,
            Self::Ms1_2 => 1_200,
        }
    }

    /// Whether continuous mode can run at `rate` with this bandwidth
    #[must_use]
    pub const fn supports(self, rate: DataRate) -> bool {
        match rate {
            DataRate::Hz1000 => matches!(self, Self::Ms1_2),
            DataRate::Hz(hz) => {
                let max = match self {
                    Self::Ms6_6 => 75,
                    Self::Ms3_5 => 150,
                    Self::Ms2_0 | Self::Ms1_2 => 255,
                };
                hz <= max
            }
        }
    }

    /// Slowest (lowest-noise) bandwidth able to sustain `rate`
    #[must_use]
    pub const fn slowest_for(rate: DataRate) -> Self {
        if Self::Ms6_6.supports(rate) {
            Self::Ms6_6
        } else if Self::Ms3_5.supports(rate) {
            Self::Ms3_5
        } else if Self::Ms2_0.supports(rate) {
            Self::Ms2_0
        } else {
            Self::Ms1_2
        }
    }
}

/// Continuous-mode output data rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 0..=255 Hz written straight to the ODR register (0 disables continuous mode)
    Hz(u8),
    /// 1000 Hz, needs high-power mode and the fastest bandwidth
    Hz1000,
}

impl Default for DataRate {
    fn default() -> Self {
        Self::Hz(0)
    }
}

impl DataRate {
    /// Validate a rate in Hz
    ///
    /// Returns `None` for anything other than 0..=255 or 1000.
    #[must_use]
    pub const fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            1000 => Some(Self::Hz1000),
            0..=255 => Some(Self::Hz(hz as u8)),
            _ => None,
        }
    }

    /// Rate in Hz
    #[must_use]
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz(hz) => hz as u16,
            Self::Hz1000 => 1000,
        }
    }

    /// Value for the ODR register
    #[must_use]
    pub const fn odr_value(self) -> u8 {
        match self {
            Self::Hz(hz) => hz,
            Self::Hz1000 => u8::MAX,
        }
    }

    /// Whether the `hpower` bit must be set
    #[must_use]
    pub const fn high_power(self) -> bool {
        matches!(self, Self::Hz1000)
    }

    /// Whether continuous mode can run at this rate
    #[must_use]
    pub const fn is_running(self) -> bool {
        self.hz() != 0
    }
}

/// How measurements are started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationMode {
    /// Each reading triggers one conversion and polls for completion
    #[default]
    SingleShot,
    /// The chip converts at the programmed data rate
    Continuous,
}
