//! Bus interface for the MMC56x3
//!
//! Adapts an `embedded-hal` I2C bus to the `device-driver` register traits. The MMC5603
//! and MMC5613 only speak I2C, so there is no SPI variant.
//!
//! Every register access is one bus transaction addressed to the chip:
//! - reads are `write_read([register], data)`, a one-byte write portion followed by the read
//! - writes are `write([register, data..])`

use crate::DEFAULT_I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Address byte plus the single data byte of every register write
const MAX_WRITE_LEN: usize = 2;

/// I2C interface for the MMC56x3
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x30)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut mag = Mmc56x3Driver::new(interface, delay)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address this interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Prefix `write_data` with the register address
fn framed(address: u8, write_data: &[u8]) -> ([u8; MAX_WRITE_LEN], usize) {
    let mut buffer = [0u8; MAX_WRITE_LEN];
    buffer[0] = address;
    debug_assert!(write_data.len() < MAX_WRITE_LEN, "register writes are one byte");
    let len = write_data.len().min(MAX_WRITE_LEN - 1);
    buffer[1..=len].copy_from_slice(&write_data[..len]);
    (buffer, len + 1)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address, write_data);
        self.i2c.write(self.address, &buffer[..len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let (buffer, len) = framed(address, write_data);
        self.i2c.write(self.address, &buffer[..len]).await
    }
}
