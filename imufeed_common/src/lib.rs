#![cfg_attr(feature = "no_std", no_std)]

pub mod mpu6050;
pub mod registers;
pub mod sample;

pub use mpu6050::{Config, Error, Mpu6050};
pub use sample::ImuSample;
