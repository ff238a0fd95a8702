//! High-level driver API for the MMC56x3
//!
//! This module provides the measurement protocol on top of the register map: identity
//! check, software reset, single-shot temperature and magnetic conversions with bounded
//! status polling, and the continuous-mode configuration.
//!
//! Each conversion follows the same cycle:
//!
//! ```text
//! Idle -> MeasurementRequested -> (poll STATUS)* -> Done -> Idle
//!                                       \-> TimedOut after PollConfig::max_polls reads
//! ```

use crate::config::{
    Bandwidth, DataRate, OperationMode, PollConfig, RESET_DELAY_MS, SET_RESET_DELAY_MS,
};
use crate::registers::Mmc56x3 as RegisterDevice;
use crate::sensors::{MAG_BLOCK_LEN, MagDataRaw, MagDataUT, temperature_to_celsius};
use crate::{Error, Measurement, OUT_X_L, PRODUCT_ID_VALUE};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Size of the magnetic output block in bits
const MAG_BLOCK_BITS: u32 = 72;

/// Main driver for the MMC5603/MMC5613
///
/// Owns the bus interface, a delay provider used for every wait, and the 9-byte
/// measurement buffer. The control registers are write-only, so the driver caches the
/// configuration it last wrote.
pub struct Mmc56x3Driver<I, D> {
    device: RegisterDevice<I>,
    delay: D,
    buffer: [u8; MAG_BLOCK_LEN],
    poll: PollConfig,
    // Cached control register state
    bandwidth: Bandwidth,
    data_rate: DataRate,
    mode: OperationMode,
}

impl<I, D> Mmc56x3Driver<I, D> {
    /// Replace the poll bound used while waiting for conversions
    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Current poll bound
    pub const fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Change the poll bound
    pub fn set_poll_config(&mut self, poll: PollConfig) {
        self.poll = poll;
    }

    /// Bandwidth last written to the device
    pub const fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Data rate last written to the device
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// Current operation mode
    pub const fn operation_mode(&self) -> OperationMode {
        self.mode
    }

    /// Consume the driver and return the underlying interface and delay
    pub fn release(self) -> (I, D) {
        (self.device.interface, self.delay)
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    ///
    /// Writes made through this handle bypass the configuration cache.
    pub const fn device_mut(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }

    fn restore_defaults(&mut self) {
        self.bandwidth = Bandwidth::default();
        self.data_rate = DataRate::default();
        self.mode = OperationMode::default();
    }

    fn unconfigured(device: RegisterDevice<I>, delay: D) -> Self {
        Self {
            device,
            delay,
            buffer: [0; MAG_BLOCK_LEN],
            poll: PollConfig::default(),
            bandwidth: Bandwidth::default(),
            data_rate: DataRate::default(),
            mode: OperationMode::default(),
        }
    }

    /// Bandwidth to use for `rate`, keeping the current one when it is fast enough
    fn bandwidth_for(&self, rate: DataRate) -> Bandwidth {
        if self.bandwidth.supports(rate) {
            self.bandwidth
        } else {
            Bandwidth::slowest_for(rate)
        }
    }
}

#[cfg(not(feature = "async"))]
impl<I, D> Mmc56x3Driver<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: embedded_hal::delay::DelayNs,
{
    /// Create a new MMC56x3 driver instance
    ///
    /// Verifies the `PRODUCT_ID` register, then performs a software reset. The returned
    /// driver is ready for single-shot measurements.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PRODUCT_ID` register contains an unexpected value
    ///
    /// # Example
    ///
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut mag = Mmc56x3Driver::new(interface, Delay)?;
    /// let (x, y, z) = mag.magnetic()?.to_tuple();
    /// ```
    pub fn new(interface: I, delay: D) -> Result<Self, Error<I::Error>> {
        let mut driver = Self::unconfigured(RegisterDevice::new(interface), delay);

        let product_id = driver.product_id()?;
        if product_id != PRODUCT_ID_VALUE {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "MMC56x3 not found: PRODUCT_ID=0x{:02X}, expected 0x{:02X}",
                product_id,
                PRODUCT_ID_VALUE
            );
            return Err(Error::DeviceNotFound(product_id));
        }

        driver.reset()?;
        Ok(driver)
    }

    /// Read the `PRODUCT_ID` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn product_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.product_id().read()?.product_id())
    }

    /// Software reset
    ///
    /// Sets `SW_RESET` in `CTRL_REG1` and blocks for 20ms while the chip reloads its
    /// OTP trim. All control registers return to their power-on values, and so does the
    /// cached configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset(&mut self) -> Result<(), Error<I::Error>> {
        self.device.control_1().write(|w| {
            w.set_sw_reset(true);
        })?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.restore_defaults();

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 reset complete");

        Ok(())
    }

    /// Read temperature in degrees Celsius
    ///
    /// Triggers a single temperature conversion and waits for it to complete.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - Continuous mode is active ([`Error::ContinuousModeActive`])
    /// - The conversion does not finish within the poll bound ([`Error::MeasurementTimeout`])
    pub fn temperature(&mut self) -> Result<f32, Error<I::Error>> {
        self.read_temperature_raw().map(temperature_to_celsius)
    }

    /// Read the raw temperature code
    ///
    /// Temperature in °C = raw * 0.8 - 75.
    ///
    /// # Errors
    ///
    /// Same as [`temperature()`](Self::temperature).
    pub fn read_temperature_raw(&mut self) -> Result<u8, Error<I::Error>> {
        if self.mode == OperationMode::Continuous {
            return Err(Error::ContinuousModeActive);
        }

        self.device.control_0().write(|w| {
            w.set_take_meas_t(true);
        })?;
        self.wait_for(Measurement::Temperature)?;

        Ok(self.device.out_temp().read()?.tout())
    }

    /// Read the magnetic field in microteslas
    ///
    /// In single-shot mode this triggers a conversion (with automatic SET/RESET) and
    /// waits for it. In continuous mode it reads the latest conversion directly.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails or the conversion does
    /// not finish within the poll bound.
    pub fn magnetic(&mut self) -> Result<MagDataUT, Error<I::Error>> {
        self.read_magnetic_raw().map(MagDataRaw::to_microtesla)
    }

    /// Read the magnetic field in signed raw counts (0.00625 µT/LSB)
    ///
    /// # Errors
    ///
    /// Same as [`magnetic()`](Self::magnetic).
    pub fn read_magnetic_raw(&mut self) -> Result<MagDataRaw, Error<I::Error>> {
        if self.mode == OperationMode::SingleShot {
            self.device.control_0().write(|w| {
                w.set_take_meas_m(true);
                w.set_auto_sr_en(true);
            })?;
            self.wait_for(Measurement::Magnetic)?;
        }

        // One write-then-read: address byte out, Xout0..Zout2 back
        self.device
            .interface
            .read_register(OUT_X_L, MAG_BLOCK_BITS, &mut self.buffer)?;

        Ok(MagDataRaw::from_block(&self.buffer))
    }

    /// Pulse the SET and then the RESET coil current
    ///
    /// Restores the sensing element after exposure to a strong field. Each pulse is
    /// followed by a 1ms settle.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_reset_pulse(&mut self) -> Result<(), Error<I::Error>> {
        self.device.control_0().write(|w| {
            w.set_do_set(true);
        })?;
        self.delay.delay_ms(SET_RESET_DELAY_MS);

        self.device.control_0().write(|w| {
            w.set_do_reset(true);
        })?;
        self.delay.delay_ms(SET_RESET_DELAY_MS);

        Ok(())
    }

    /// Set the measurement bandwidth
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the current data rate needs a faster
    /// bandwidth, or an error if communication with the device fails.
    pub fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Error<I::Error>> {
        if !bandwidth.supports(self.data_rate) {
            return Err(Error::InvalidConfig);
        }
        self.write_bandwidth(bandwidth)
    }

    /// Set the continuous-mode output data rate
    ///
    /// Raises the bandwidth first if the current one cannot sustain `rate`. A rate of
    /// 1000 Hz also switches on high-power mode. While continuous mode is running the
    /// measurement period is recomputed so the new rate takes effect immediately.
    ///
    /// The cached rate follows the ODR register as soon as it is written, even if a
    /// later control write fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when stopping the rate (0 Hz) while continuous
    /// mode is active, or an error if communication with the device fails.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        if self.mode == OperationMode::Continuous && !rate.is_running() {
            return Err(Error::InvalidConfig);
        }

        let bandwidth = self.bandwidth_for(rate);
        if bandwidth != self.bandwidth {
            self.write_bandwidth(bandwidth)?;
        }

        self.device.odr().write(|w| {
            w.set_odr(rate.odr_value());
        })?;
        self.data_rate = rate;

        // The measurement period is only recomputed from ODR on a cmm_freq_en write
        if self.mode == OperationMode::Continuous {
            self.device.control_0().write(|w| {
                w.set_cmm_freq_en(true);
            })?;
        }
        self.write_control_2(rate, self.mode)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 data rate: {} Hz", rate.hz());

        Ok(())
    }

    /// Switch between single-shot and continuous measurement
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when entering continuous mode with a data rate
    /// of 0 Hz, or an error if communication with the device fails.
    pub fn set_operation_mode(&mut self, mode: OperationMode) -> Result<(), Error<I::Error>> {
        if mode == OperationMode::Continuous {
            if !self.data_rate.is_running() {
                return Err(Error::InvalidConfig);
            }
            self.device.control_0().write(|w| {
                w.set_cmm_freq_en(true);
            })?;
        }

        self.write_control_2(self.data_rate, mode)?;
        self.mode = mode;

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 operation mode: {}", mode);

        Ok(())
    }

    /// Poll the status register until the done flag for `measurement` is set
    fn wait_for(&mut self, measurement: Measurement) -> Result<(), Error<I::Error>> {
        let attempts = self.poll.attempts();
        for poll in 1..=attempts {
            let status = self.device.status().read()?;
            let done = match measurement {
                Measurement::Temperature => status.meas_t_done(),
                Measurement::Magnetic => status.meas_m_done(),
            };
            if done {
                return Ok(());
            }
            if poll < attempts {
                self.delay.delay_ms(self.poll.interval_ms);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "MMC56x3 {} measurement timed out after {} polls",
            measurement,
            attempts
        );

        Err(Error::MeasurementTimeout(measurement))
    }

    fn write_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Error<I::Error>> {
        self.device.control_1().write(|w| {
            w.set_bandwidth(bandwidth.bits());
        })?;
        self.bandwidth = bandwidth;
        Ok(())
    }

    fn write_control_2(
        &mut self,
        rate: DataRate,
        mode: OperationMode,
    ) -> Result<(), Error<I::Error>> {
        self.device.control_2().write(|w| {
            w.set_hpower(rate.high_power());
            w.set_cmm_en(mode == OperationMode::Continuous);
        })?;
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I, D> Mmc56x3Driver<I, D>
where
    I: AsyncRegisterInterface<AddressType = u8>,
    D: embedded_hal_async::delay::DelayNs,
{
    /// Create a new MMC56x3 driver instance
    ///
    /// Verifies the `PRODUCT_ID` register, then performs a software reset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PRODUCT_ID` register contains an unexpected value
    pub async fn new(interface: I, delay: D) -> Result<Self, Error<I::Error>> {
        let mut driver = Self::unconfigured(RegisterDevice::new(interface), delay);

        let product_id = driver.product_id().await?;
        if product_id != PRODUCT_ID_VALUE {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "MMC56x3 not found: PRODUCT_ID=0x{:02X}, expected 0x{:02X}",
                product_id,
                PRODUCT_ID_VALUE
            );
            return Err(Error::DeviceNotFound(product_id));
        }

        driver.reset().await?;
        Ok(driver)
    }

    /// Read the `PRODUCT_ID` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn product_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.product_id().read_async().await?.product_id())
    }

    /// Software reset, see the blocking variant
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset(&mut self) -> Result<(), Error<I::Error>> {
        self.device
            .control_1()
            .write_async(|w| {
                w.set_sw_reset(true);
            })
            .await?;
        self.delay.delay_ms(RESET_DELAY_MS).await;
        self.restore_defaults();

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 reset complete");

        Ok(())
    }

    /// Read temperature in degrees Celsius
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails, continuous mode is active, or the
    /// conversion does not finish within the poll bound.
    pub async fn temperature(&mut self) -> Result<f32, Error<I::Error>> {
        self.read_temperature_raw()
            .await
            .map(temperature_to_celsius)
    }

    /// Read the raw temperature code
    ///
    /// # Errors
    ///
    /// Same as [`temperature()`](Self::temperature).
    pub async fn read_temperature_raw(&mut self) -> Result<u8, Error<I::Error>> {
        if self.mode == OperationMode::Continuous {
            return Err(Error::ContinuousModeActive);
        }

        self.device
            .control_0()
            .write_async(|w| {
                w.set_take_meas_t(true);
            })
            .await?;
        self.wait_for(Measurement::Temperature).await?;

        Ok(self.device.out_temp().read_async().await?.tout())
    }

    /// Read the magnetic field in microteslas
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the conversion does not finish within
    /// the poll bound.
    pub async fn magnetic(&mut self) -> Result<MagDataUT, Error<I::Error>> {
        self.read_magnetic_raw()
            .await
            .map(MagDataRaw::to_microtesla)
    }

    /// Read the magnetic field in signed raw counts
    ///
    /// # Errors
    ///
    /// Same as [`magnetic()`](Self::magnetic).
    pub async fn read_magnetic_raw(&mut self) -> Result<MagDataRaw, Error<I::Error>> {
        if self.mode == OperationMode::SingleShot {
            self.device
                .control_0()
                .write_async(|w| {
                    w.set_take_meas_m(true);
                    w.set_auto_sr_en(true);
                })
                .await?;
            self.wait_for(Measurement::Magnetic).await?;
        }

        self.device
            .interface
            .read_register(OUT_X_L, MAG_BLOCK_BITS, &mut self.buffer)
            .await?;

        Ok(MagDataRaw::from_block(&self.buffer))
    }

    /// Pulse the SET and then the RESET coil current
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_reset_pulse(&mut self) -> Result<(), Error<I::Error>> {
        self.device
            .control_0()
            .write_async(|w| {
                w.set_do_set(true);
            })
            .await?;
        self.delay.delay_ms(SET_RESET_DELAY_MS).await;

        self.device
            .control_0()
            .write_async(|w| {
                w.set_do_reset(true);
            })
            .await?;
        self.delay.delay_ms(SET_RESET_DELAY_MS).await;

        Ok(())
    }

    /// Set the measurement bandwidth
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the current data rate needs a faster
    /// bandwidth, or an error if communication with the device fails.
    pub async fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Error<I::Error>> {
        if !bandwidth.supports(self.data_rate) {
            return Err(Error::InvalidConfig);
        }
        self.write_bandwidth(bandwidth).await
    }

    /// Set the continuous-mode output data rate
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when stopping the rate while continuous mode is
    /// active, or an error if communication with the device fails.
    pub async fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        if self.mode == OperationMode::Continuous && !rate.is_running() {
            return Err(Error::InvalidConfig);
        }

        let bandwidth = self.bandwidth_for(rate);
        if bandwidth != self.bandwidth {
            self.write_bandwidth(bandwidth).await?;
        }

        self.device
            .odr()
            .write_async(|w| {
                w.set_odr(rate.odr_value());
            })
            .await?;
        self.data_rate = rate;

        if self.mode == OperationMode::Continuous {
            self.device
                .control_0()
                .write_async(|w| {
                    w.set_cmm_freq_en(true);
                })
                .await?;
        }
        self.write_control_2(rate, self.mode).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 data rate: {} Hz", rate.hz());

        Ok(())
    }

    /// Switch between single-shot and continuous measurement
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when entering continuous mode with a data rate
    /// of 0 Hz, or an error if communication with the device fails.
    pub async fn set_operation_mode(&mut self, mode: OperationMode) -> Result<(), Error<I::Error>> {
        if mode == OperationMode::Continuous {
            if !self.data_rate.is_running() {
                return Err(Error::InvalidConfig);
            }
            self.device
                .control_0()
                .write_async(|w| {
                    w.set_cmm_freq_en(true);
                })
                .await?;
        }

        self.write_control_2(self.data_rate, mode).await?;
        self.mode = mode;

        #[cfg(feature = "defmt")]
        defmt::debug!("MMC56x3 operation mode: {}", mode);

        Ok(())
    }

    async fn wait_for(&mut self, measurement: Measurement) -> Result<(), Error<I::Error>> {
        let attempts = self.poll.attempts();
        for poll in 1..=attempts {
            let status = self.device.status().read_async().await?;
            let done = match measurement {
                Measurement::Temperature => status.meas_t_done(),
                Measurement::Magnetic => status.meas_m_done(),
            };
            if done {
                return Ok(());
            }
            if poll < attempts {
                self.delay.delay_ms(self.poll.interval_ms).await;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "MMC56x3 {} measurement timed out after {} polls",
            measurement,
            attempts
        );

        Err(Error::MeasurementTimeout(measurement))
    }

    async fn write_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Error<I::Error>> {
        self.device
            .control_1()
            .write_async(|w| {
                w.set_bandwidth(bandwidth.bits());
            })
            .await?;
        self.bandwidth = bandwidth;
        Ok(())
    }

    async fn write_control_2(
        &mut self,
        rate: DataRate,
        mode: OperationMode,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .control_2()
            .write_async(|w| {
                w.set_hpower(rate.high_power());
                w.set_cmm_en(mode == OperationMode::Continuous);
            })
            .await?;
        Ok(())
    }
}
