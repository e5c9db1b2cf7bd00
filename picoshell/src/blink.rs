//! The blinker, as run on core 1

use rp2040_hal as hal;

use hal::gpio::bank0::Gpio25;
use hal::gpio::{FunctionSioOutput, Pin, PullDown};
use hal::Timer;

use picoshell_core::blinker::Blinker;
#[cfg(not(feature = "frequency-sweep"))]
use picoshell_core::{pwm::BLINK_PWM_CONFIG, sweep::DutySweep};
#[cfg(feature = "frequency-sweep")]
use picoshell_core::{pwm::SWEEP_PWM_CONFIG, sweep::FrequencySweep};
use picoshell_core::{pwm::PwmConfig, sweep::Sweep};

use crate::board::BLINKER_TASK;
use crate::pwm::SlicePwm;
use crate::serial::Console;

/// On-board LED
pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;

#[cfg(not(feature = "frequency-sweep"))]
fn demo() -> (PwmConfig, Sweep) {
    (BLINK_PWM_CONFIG, Sweep::Duty(DutySweep::new()))
}

#[cfg(feature = "frequency-sweep")]
fn demo() -> (PwmConfig, Sweep) {
    (SWEEP_PWM_CONFIG, Sweep::Frequency(FrequencySweep::new()))
}

/// Blink the LED and step the PWM output forever
pub fn run(pwm: SlicePwm, led: LedPin, timer: Timer) -> ! {
    let (config, sweep) = demo();
    let mut blinker = Blinker::new(pwm, led, timer, Console, config, sweep).with_task(&BLINKER_TASK);

    match blinker.start() {
        Ok(()) => defmt::info!("blinker running, pwm period {}", blinker.config().period),
        Err(e) => defmt::error!("blinker start: {}", defmt::Display2Format(&e)),
    }
    loop {
        if let Err(e) = blinker.cycle() {
            defmt::error!("blinker: {}", defmt::Display2Format(&e));
        }
    }
}
