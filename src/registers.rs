//! Register definitions for the MMC56x3
//!
//! The MMC5603/MMC5613 exposes a flat 8-bit register space. Measurement output lives at
//! `0x00..=0x09`, status and control at `0x18..=0x1D`, and the product ID at `0x39`.
//!
//! ## Write-only control registers
//! `CTRL_REG0`, `CTRL_REG1` and `CTRL_REG2` read back as zero on the chip, so the driver
//! never uses `modify()` on them. Every write is built from the cached configuration in
//! [`Mmc56x3Driver`](crate::Mmc56x3Driver).
//!
//! The 9-byte magnetic output block (`Xout0..Zout2`) is read in a single transaction through
//! the interface, see [`OUT_X_L`](crate::OUT_X_L).

device_driver::create_device!(
    device_name: Mmc56x3,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        /// TOUT - Temperature Output (0x09)
        /// Temperature in °C = TOUT * 0.8 - 75
        register OutTemp {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Raw temperature code
            tout: uint = 0..8,
        },

        /// STATUS1 - Device Status (0x18)
        register Status {
            const ADDRESS = 0x18;
            const SIZE_BITS = 8;

            reserved_3_0: uint = 0..4,
            /// OTP memory was read successfully
            otp_read_done: bool = 4,
            /// Self-test signal saturated
            sat_sensor: bool = 5,
            /// Magnetic measurement finished, data ready in Xout0..Zout2
            meas_m_done: bool = 6,
            /// Temperature measurement finished, data ready in TOUT
            meas_t_done: bool = 7,
        },

        /// ODR - Output Data Rate (0x1A)
        /// 1..=255 Hz in continuous mode, 1000 Hz when `hpower` is also set
        register Odr {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Output data rate in Hz
            odr: uint = 0..8,
        },

        /// Internal Control 0 (0x1B), write only
        register Control0 {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            /// Take a single magnetic measurement (self-clearing)
            take_meas_m: bool = 0,
            /// Take a single temperature measurement (self-clearing)
            take_meas_t: bool = 1,
            reserved_2: uint = 2..3,
            /// Pulse a SET current through the sensor coils (self-clearing)
            do_set: bool = 3,
            /// Pulse a RESET current through the sensor coils (self-clearing)
            do_reset: bool = 4,
            /// Automatic SET/RESET before each measurement
            auto_sr_en: bool = 5,
            /// Automatic self-test
            auto_st_en: bool = 6,
            /// Compute the measurement period from ODR; required before `cmm_en`
            cmm_freq_en: bool = 7,
        },

        /// Internal Control 1 (0x1C), write only
        register Control1 {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            /// Measurement bandwidth (00=6.6ms, 01=3.5ms, 10=2.0ms, 11=1.2ms)
            bandwidth: uint = 0..2,
            /// Disable the X channel
            x_inhibit: bool = 2,
            /// Disable the Y and Z channels
            yz_inhibit: uint = 3..5,
            /// Self-test current, positive direction
            st_enp: bool = 5,
            /// Self-test current, negative direction
            st_enm: bool = 6,
            /// Software reset, takes 20ms to complete
            sw_reset: bool = 7,
        },

        /// Internal Control 2 (0x1D), write only
        register Control2 {
            const ADDRESS = 0x1D;
            const SIZE_BITS = 8;

            /// Number of measurements between periodic SET operations
            prd_set: uint = 0..3,
            /// Enable periodic SET
            en_prd_set: bool = 3,
            /// Enter continuous measurement mode
            cmm_en: bool = 4,
            reserved_6_5: uint = 5..7,
            /// High power mode, allows ODR up to 1000 Hz
            hpower: bool = 7,
        },

        /// Product ID (0x39)
        /// Expected value: 0x10
        register ProductId {
            const ADDRESS = 0x39;
            const SIZE_BITS = 8;

            /// Product identifier
            product_id: uint = 0..8,
        }
    }
);
