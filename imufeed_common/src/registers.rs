//! MPU-6050 register map and tuning constants.
//!
//! Addresses follow the InvenSense MPU-6000/MPU-6050 register map revision
//! 4.2. Everything the device needs is written once at startup; after that
//! only the two readout blocks are touched.

use static_assertions::const_assert_eq;

/// 7-bit I2C address with AD0 low.
pub const MPU6050_ADDR: u8 = 0x68;

/// Sample rate divider. Output rate is the gyro rate divided by (1 + this).
pub const SMPLRT_DIV: u8 = 0x19;
/// Frame sync and digital low-pass filter. Left at its reset value.
pub const CONFIG: u8 = 0x1A;
/// Gyroscope self-test and full-scale range.
pub const GYRO_CONFIG: u8 = 0x1B;
/// Accelerometer self-test and full-scale range.
pub const ACCEL_CONFIG: u8 = 0x1C;
/// First of the six accelerometer readout registers (X axis, high byte).
pub const ACCEL_XOUT_H: u8 = 0x3B;
/// First of the six gyroscope readout registers (X axis, high byte).
pub const GYRO_XOUT_H: u8 = 0x43;
/// Sleep, clock select and temperature-sensor disable.
pub const PWR_MGMT_1: u8 = 0x6B;
/// Identity register.
pub const WHO_AM_I: u8 = 0x75;

/// WHO_AM_I readback on a functioning MPU-6050.
pub const WHO_AM_I_VAL: u8 = 0x68;

/// PWR_MGMT_1 bit: disable the temperature sensor.
pub const PWR_MGMT_1_TEMP_DIS: u8 = 0x08;
/// PWR_MGMT_1 clock select: PLL referenced to the Z-axis gyro.
pub const PWR_MGMT_1_CLKSEL_PLL_Z: u8 = 0x03;

/// Gyro output rate with the low-pass filter at its reset value.
pub const GYRO_OUTPUT_RATE_HZ: u32 = 8_000;
/// Divider programmed into SMPLRT_DIV: 8 kHz / (1 + 79) = 100 Hz.
pub const SAMPLE_RATE_DIV: u8 = 79;
/// Device sample rate resulting from [`SAMPLE_RATE_DIV`].
pub const SAMPLE_RATE_HZ: u32 = 100;

const_assert_eq!(
    GYRO_OUTPUT_RATE_HZ / (SAMPLE_RATE_DIV as u32 + 1),
    SAMPLE_RATE_HZ
);

/// Accelerometer full-scale range.
///
/// Each variant knows both its ACCEL_CONFIG bits and its LSB weight, so the
/// programmed range and the conversion factor cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
pub enum AccelRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    /// AFS_SEL field value for ACCEL_CONFIG.
    pub const fn bits(self) -> u8 {
        match self {
            AccelRange::G2 => 0x00,
            AccelRange::G4 => 0x08,
            AccelRange::G8 => 0x10,
            AccelRange::G16 => 0x18,
        }
    }

    /// g per LSB at this range.
    pub const fn scale(self) -> f32 {
        match self {
            AccelRange::G2 => 1.0 / 16384.0,
            AccelRange::G4 => 1.0 / 8192.0,
            AccelRange::G8 => 1.0 / 4096.0,
            AccelRange::G16 => 1.0 / 2048.0,
        }
    }
}

/// Gyroscope full-scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
pub enum GyroRange {
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// FS_SEL field value for GYRO_CONFIG.
    pub const fn bits(self) -> u8 {
        match self {
            GyroRange::Dps250 => 0x00,
            GyroRange::Dps500 => 0x08,
            GyroRange::Dps1000 => 0x10,
            GyroRange::Dps2000 => 0x18,
        }
    }

    /// Degrees per second per LSB at this range.
    pub const fn scale(self) -> f32 {
        match self {
            GyroRange::Dps250 => 1.0 / 131.0,
            GyroRange::Dps500 => 1.0 / 65.5,
            GyroRange::Dps1000 => 1.0 / 32.8,
            GyroRange::Dps2000 => 1.0 / 16.4,
        }
    }
}
