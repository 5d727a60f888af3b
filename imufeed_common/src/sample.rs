//! Raw-to-physical conversion for MPU-6050 readout blocks.
//!
//! A readout block is six bytes, three big-endian signed 16-bit values in
//! X, Y, Z order. Conversion is a pure multiply by the LSB weight of the
//! programmed full-scale range.

use core::fmt;

/// Bytes in one accelerometer or gyroscope readout block.
pub const RAW_BLOCK_LEN: usize = 6;

/// Pair a high and low readout byte into a signed 16-bit value.
pub const fn combine(hi: u8, lo: u8) -> i16 {
    i16::from_be_bytes([hi, lo])
}

/// Scale one readout block to three per-axis physical values.
pub fn convert(raw: &[u8; RAW_BLOCK_LEN], scale: f32) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (i, axis) in out.iter_mut().enumerate() {
        *axis = combine(raw[2 * i], raw[2 * i + 1]) as f32 * scale;
    }
    out
}

/// One converted accel + gyro reading.
///
/// Acceleration is in g, angular rate in degrees per second. Nothing is
/// carried between samples; each one is complete on its own.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    pub accel: [f32; 3],
    pub gyro: [f32; 3],
}

impl fmt::Display for ImuSample {
    /// `ax ay az gx gy gz`, space separated, three decimal places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3}",
            self.accel[0],
            self.accel[1],
            self.accel[2],
            self.gyro[0],
            self.gyro[1],
            self.gyro[2]
        )
    }
}
