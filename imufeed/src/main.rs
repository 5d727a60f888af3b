#![no_std]
#![no_main]

/// configuration
use defmt_rtt as _;
use panic_probe as _;

/// system
use rtic_monotonics::systick::prelude::*;
systick_monotonic!(Mono, 1000);

/// hal
use core::fmt::Write;
use stm32f4xx_hal::prelude::*;
use stm32f4xx_hal::{gpio, i2c, pac, serial};

use imufeed_common::mpu6050::{Config, Mpu6050};

/// type
type ImuBus = i2c::I2c<pac::I2C1>;
type Console = serial::Tx<pac::USART2>;
type StatusLed = gpio::Pin<'C', 13, gpio::Output>;

/// Polling period. Matches the 100 Hz sample rate programmed into the
/// device's rate divider.
const POLL_PERIOD_MS: u32 = 10;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [USART6])]
mod app {
    use super::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        imu: Mpu6050<ImuBus>,
        console: Console,
        _led: StatusLed,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp = cx.device;
        let rcc = dp.RCC.constrain();
        let hse = 16.MHz();
        let sysclk = 64.MHz();
        let clocks = rcc.cfgr.use_hse(hse).sysclk(sysclk).freeze();

        Mono::start(cx.core.SYST, sysclk.to_Hz());

        let gpioa = dp.GPIOA.split();
        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();

        // Status LED, on while the stream is alive.
        let mut led: StatusLed = gpioc.pc13.into_push_pull_output();
        led.set_high();

        // IMU bus: I2C1 on PB8/PB9, open drain with the internal pull-ups
        // enabled on both lines.
        let scl = gpiob.pb8.into_alternate_open_drain().internal_pull_up(true);
        let sda = gpiob.pb9.into_alternate_open_drain().internal_pull_up(true);
        let i2c_dev = dp
            .I2C1
            .i2c((scl, sda), i2c::Mode::standard(100.kHz()), &clocks);
        // IMU bus

        // Sample console on USART2 TX
        let tx_pin = gpioa.pa2.into_alternate();
        let console = dp
            .USART2
            .tx(
                tx_pin,
                serial::Config::default().baudrate(115_200.bps()),
                &clocks,
            )
            .unwrap();
        // Sample console

        let mut imu = Mpu6050::new(i2c_dev, Config::default());
        if let Err(e) = imu.configure() {
            defmt::error!("imu configuration failed: {}", defmt::Debug2Format(&e));
            halt(&mut led);
        }
        defmt::info!("imu configured, polling at {} Hz", 1000 / POLL_PERIOD_MS);

        match poll::spawn() {
            Ok(_) => (),
            Err(_) => {
                defmt::error!("could not spawn poll task");
                halt(&mut led);
            }
        }

        (Shared {}, Local { imu, console, _led: led })
    }

    /// Fixed-period read/report loop. Each tick reads one accel + gyro
    /// sample pair and writes it as a single text line. A failed read
    /// drops that tick's line only; nothing carries over between ticks.
    #[task(local = [imu, console])]
    async fn poll(cx: poll::Context) {
        loop {
            let now = Mono::now();
            match cx.local.imu.sample() {
                Ok(sample) => {
                    writeln!(cx.local.console, "{}", sample).ok();
                }
                Err(e) => defmt::warn!("imu read failed: {}", defmt::Debug2Format(&e)),
            }
            Mono::delay_until(now + POLL_PERIOD_MS.millis()).await;
        }
    }
}

/// Fatal-error stop: status LED off, then sleep until reset.
fn halt(led: &mut StatusLed) -> ! {
    led.set_low();
    loop {
        cortex_m::asm::wfi();
    }
}
