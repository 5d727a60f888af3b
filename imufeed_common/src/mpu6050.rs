//! Blocking register-level driver for the MPU-6050.
//!
//! The device is configured once at startup and then polled. Each poll is
//! a burst read: the starting register address is written with a repeated
//! start (no stop condition), then the device auto-increments its internal
//! register pointer across a six-byte read.

use embedded_hal::i2c::I2c;

use crate::registers as reg;
use crate::registers::{AccelRange, GyroRange};
use crate::sample::{convert, ImuSample, RAW_BLOCK_LEN};

/// Driver errors, generic over the bus error type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
pub enum Error<E> {
    /// A startup transaction failed. The device cannot be trusted to be
    /// in a known configuration; fatal.
    Config(E),
    /// A burst read failed. Recoverable: drop the sample, retry next tick.
    Read(E),
    /// WHO_AM_I readback was not an MPU-6050. Carries the value read.
    UnknownDevice(u8),
}

/// Full-scale ranges and sampling divider written at startup.
///
/// The conversion factors are taken from the ranges here, so the
/// programmed range and the LSB weight cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
pub struct Config {
    pub accel_range: AccelRange,
    pub gyro_range: GyroRange,
    pub sample_rate_div: u8,
}

impl Default for Config {
    /// ±2 g, ±500 °/s, 100 Hz device sample rate.
    fn default() -> Self {
        Self {
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps500,
            sample_rate_div: reg::SAMPLE_RATE_DIV,
        }
    }
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    config: Config,
    accel_scale: f32,
    gyro_scale: f32,
}

impl<I2C, E> Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self {
            i2c,
            accel_scale: config.accel_range.scale(),
            gyro_scale: config.gyro_range.scale(),
            config,
        }
    }

    /// Probe the identity register, then wake the device and program the
    /// full-scale ranges and the sample rate divider.
    ///
    /// The wake-up write has to come first: the other configuration
    /// registers ignore writes while the device is asleep.
    pub fn configure(&mut self) -> Result<(), Error<E>> {
        let id = self.who_am_i()?;
        if id != reg::WHO_AM_I_VAL {
            return Err(Error::UnknownDevice(id));
        }
        self.write_register(
            reg::PWR_MGMT_1,
            reg::PWR_MGMT_1_TEMP_DIS | reg::PWR_MGMT_1_CLKSEL_PLL_Z,
        )?;
        self.write_register(reg::ACCEL_CONFIG, self.config.accel_range.bits())?;
        self.write_register(reg::GYRO_CONFIG, self.config.gyro_range.bits())?;
        self.write_register(reg::SMPLRT_DIV, self.config.sample_rate_div)?;
        Ok(())
    }

    /// WHO_AM_I readback, 0x68 on a functioning part.
    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(reg::MPU6050_ADDR, &[reg::WHO_AM_I], &mut id)
            .map_err(Error::Config)?;
        Ok(id[0])
    }

    /// Acceleration in g.
    pub fn accel(&mut self) -> Result<[f32; 3], Error<E>> {
        let raw = self.read_block(reg::ACCEL_XOUT_H)?;
        Ok(convert(&raw, self.accel_scale))
    }

    /// Angular rate in degrees per second.
    pub fn gyro(&mut self) -> Result<[f32; 3], Error<E>> {
        let raw = self.read_block(reg::GYRO_XOUT_H)?;
        Ok(convert(&raw, self.gyro_scale))
    }

    /// One accel + gyro reading.
    pub fn sample(&mut self) -> Result<ImuSample, Error<E>> {
        Ok(ImuSample {
            accel: self.accel()?,
            gyro: self.gyro()?,
        })
    }

    /// Burst read of one six-byte readout block starting at `start`.
    fn read_block(&mut self, start: u8) -> Result<[u8; RAW_BLOCK_LEN], Error<E>> {
        let mut buf = [0u8; RAW_BLOCK_LEN];
        self.i2c
            .write_read(reg::MPU6050_ADDR, &[start], &mut buf)
            .map_err(Error::Read)?;
        Ok(buf)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(reg::MPU6050_ADDR, &[register, value])
            .map_err(Error::Config)
    }

    /// Consume the driver and hand the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{self, ErrorType, Operation, SevenBitAddress};

    #[derive(Debug, Clone, PartialEq)]
    enum Xfer {
        Write { addr: u8, bytes: Vec<u8> },
        WriteRead { addr: u8, reg: u8, len: usize },
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl i2c::Error for MockError {
        fn kind(&self) -> i2c::ErrorKind {
            i2c::ErrorKind::Other
        }
    }

    /// Scripted bus: records every transaction, serves canned register
    /// contents, and can fail one transaction by index.
    struct MockBus {
        xfers: Vec<Xfer>,
        whoami: u8,
        accel: [u8; 6],
        gyro: [u8; 6],
        fail_at: Option<usize>,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                xfers: Vec::new(),
                whoami: reg::WHO_AM_I_VAL,
                accel: [0; 6],
                gyro: [0; 6],
                fail_at: None,
            }
        }

        fn failed(&self) -> bool {
            self.fail_at == Some(self.xfers.len() - 1)
        }
    }

    impl ErrorType for MockBus {
        type Error = MockError;
    }

    impl I2c<SevenBitAddress> for MockBus {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), MockError> {
            match operations {
                [Operation::Write(bytes)] => {
                    self.xfers.push(Xfer::Write {
                        addr: address,
                        bytes: bytes.to_vec(),
                    });
                    if self.failed() {
                        return Err(MockError);
                    }
                    Ok(())
                }
                [Operation::Write(bytes), Operation::Read(buf)] => {
                    let register = bytes[0];
                    self.xfers.push(Xfer::WriteRead {
                        addr: address,
                        reg: register,
                        len: buf.len(),
                    });
                    if self.failed() {
                        return Err(MockError);
                    }
                    let src: &[u8] = match register {
                        reg::WHO_AM_I => core::slice::from_ref(&self.whoami),
                        reg::ACCEL_XOUT_H => &self.accel,
                        reg::GYRO_XOUT_H => &self.gyro,
                        other => panic!("read from unexpected register {other:#04x}"),
                    };
                    buf.copy_from_slice(&src[..buf.len()]);
                    Ok(())
                }
                _ => panic!("unexpected transaction shape"),
            }
        }
    }

    fn driver(bus: MockBus) -> Mpu6050<MockBus> {
        Mpu6050::new(bus, Config::default())
    }

    #[test]
    fn configure_writes_in_documented_order() {
        let mut imu = driver(MockBus::new());
        imu.configure().unwrap();

        let bus = imu.release();
        assert_eq!(
            bus.xfers,
            vec![
                Xfer::WriteRead {
                    addr: reg::MPU6050_ADDR,
                    reg: reg::WHO_AM_I,
                    len: 1
                },
                Xfer::Write {
                    addr: reg::MPU6050_ADDR,
                    bytes: vec![reg::PWR_MGMT_1, 0x0B]
                },
                Xfer::Write {
                    addr: reg::MPU6050_ADDR,
                    bytes: vec![reg::ACCEL_CONFIG, 0x00]
                },
                Xfer::Write {
                    addr: reg::MPU6050_ADDR,
                    bytes: vec![reg::GYRO_CONFIG, 0x08]
                },
                Xfer::Write {
                    addr: reg::MPU6050_ADDR,
                    bytes: vec![reg::SMPLRT_DIV, 79]
                },
            ]
        );
    }

    #[test]
    fn configure_aborts_on_wrong_identity() {
        let mut bus = MockBus::new();
        bus.whoami = 0x70;
        let mut imu = driver(bus);

        assert_eq!(imu.configure(), Err(Error::UnknownDevice(0x70)));

        // No configuration write may reach an unidentified device.
        let bus = imu.release();
        assert!(bus
            .xfers
            .iter()
            .all(|x| matches!(x, Xfer::WriteRead { .. })));
    }

    #[test]
    fn configure_surfaces_write_failure() {
        let mut bus = MockBus::new();
        bus.fail_at = Some(1); // probe passes, wake-up write NACKs
        let mut imu = driver(bus);

        assert_eq!(imu.configure(), Err(Error::Config(MockError)));
        assert_eq!(imu.release().xfers.len(), 2);
    }

    #[test]
    fn burst_reads_use_distinct_block_addresses() {
        let mut imu = driver(MockBus::new());
        imu.accel().unwrap();
        imu.gyro().unwrap();

        let bus = imu.release();
        assert_eq!(
            bus.xfers,
            vec![
                Xfer::WriteRead {
                    addr: reg::MPU6050_ADDR,
                    reg: reg::ACCEL_XOUT_H,
                    len: 6
                },
                Xfer::WriteRead {
                    addr: reg::MPU6050_ADDR,
                    reg: reg::GYRO_XOUT_H,
                    len: 6
                },
            ]
        );
    }

    #[test]
    fn accel_values_scaled_by_configured_range() {
        let mut bus = MockBus::new();
        bus.accel = [0x40, 0x00, 0x00, 0x00, 0xC0, 0x00];
        let mut imu = driver(bus);

        // Default range is ±2 g, 16384 LSB per g.
        assert_eq!(imu.accel().unwrap(), [1.0, 0.0, -1.0]);
    }

    #[test]
    fn gyro_values_scaled_by_configured_range() {
        let mut bus = MockBus::new();
        bus.gyro = [0x00, 0x41, 0x00, 0x00, 0xFF, 0xBF];
        let mut imu = driver(bus);

        // Default range is ±500 °/s, 65.5 LSB per °/s.
        let rate = imu.gyro().unwrap();
        assert!((rate[0] - 65.0 / 65.5).abs() < 1e-6);
        assert_eq!(rate[1], 0.0);
        assert!((rate[2] + 65.0 / 65.5).abs() < 1e-6);
    }

    #[test]
    fn read_failure_does_not_poison_later_samples() {
        let mut bus = MockBus::new();
        bus.accel = [0x40, 0x00, 0x00, 0x00, 0xC0, 0x00];
        bus.fail_at = Some(0);
        let mut imu = driver(bus);

        assert_eq!(imu.sample(), Err(Error::Read(MockError)));

        let good = imu.sample().unwrap();
        assert_eq!(good.accel, [1.0, 0.0, -1.0]);
        assert_eq!(good.gyro, [0.0, 0.0, 0.0]);
    }
}
