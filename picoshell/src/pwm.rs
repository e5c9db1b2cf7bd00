//! [`PwmDriver`] on PWM slice 1, channel A (GPIO 18)

use fugit::HertzU32;
use rp2040_hal as hal;

use embedded_hal::pwm::SetDutyCycle;
use hal::gpio::bank0::Gpio18;
use hal::gpio::{AnyPin, FunctionPwm, Pin, PullDown};
use hal::pwm::{FreeRunning, Pwm1, Slice};

use picoshell_core::pwm::{OutputMode, PwmConfig, PwmDriver, PwmError, SliceSettings};

/// PWM slice 1 in free-running mode
pub type Slice1 = Slice<Pwm1, FreeRunning>;

/// GPIO 18 routed to slice 1, channel A
pub type PwmPin = Pin<Gpio18, FunctionPwm, PullDown>;

/// Channel 0 of a [`PwmConfig`] drives channel A of slice 1. Channel B has no pin.
pub struct SlicePwm {
    slice: Slice1,
    pin: PwmPin,
    sys_clock: HertzU32,
    running: Option<(SliceSettings, u32)>,
}

impl SlicePwm {
    /// Take the slice and route channel A to `pin`. The slice stays off until
    /// [`PwmDriver::start`].
    pub fn new<P>(mut slice: Slice1, pin: P, sys_clock: HertzU32) -> Self
    where
        P: AnyPin<Id = Gpio18, Pull = PullDown>,
    {
        slice.disable();
        slice.channel_a.set_enabled(false);
        let pin = slice.channel_a.output_to(pin);
        Self {
            slice,
            pin,
            sys_clock,
            running: None,
        }
    }

    /// Register values in use, if the slice is running
    pub fn settings(&self) -> Option<SliceSettings> {
        self.running.map(|(settings, _)| settings)
    }

    /// Hand back the slice and the pin
    pub fn free(mut self) -> (Slice1, PwmPin) {
        self.stop();
        (self.slice, self.pin)
    }
}

impl PwmDriver for SlicePwm {
    type Error = PwmError;

    fn start(&mut self, config: &PwmConfig) -> Result<(), PwmError> {
        if config.channels[1].mode != OutputMode::Disabled {
            return Err(PwmError::NoSuchChannel);
        }
        let settings = SliceSettings::for_config(self.sys_clock, config)?;

        self.slice.disable();
        self.slice.channel_a.set_enabled(false);
        self.slice.set_div_int(settings.div_int);
        self.slice.set_div_frac(settings.div_frac);
        self.slice.set_top(settings.top);
        if settings.phase_correct {
            self.slice.set_ph_correct();
        } else {
            self.slice.clr_ph_correct();
        }
        if config.channels[0].mode == OutputMode::ActiveLow {
            self.slice.channel_a.set_inverted();
        } else {
            self.slice.channel_a.clr_inverted();
        }
        self.slice.set_counter(0);
        self.slice.enable();

        self.running = Some((settings, config.period));
        defmt::debug!(
            "pwm1: div {}+{}/16 top {} phase correct {}",
            settings.div_int,
            settings.div_frac,
            settings.top,
            settings.phase_correct
        );
        Ok(())
    }

    fn stop(&mut self) {
        self.slice.channel_a.set_enabled(false);
        self.slice.disable();
        self.running = None;
    }

    fn enable_channel(&mut self, channel: usize, width: u32) -> Result<(), PwmError> {
        if channel != 0 {
            return Err(PwmError::NoSuchChannel);
        }
        let (settings, _) = self.running.ok_or(PwmError::NotRunning)?;
        // Infallible
        let _ = self
            .slice
            .channel_a
            .set_duty_cycle(settings.compare_level(width));
        self.slice.channel_a.set_enabled(true);
        Ok(())
    }

    fn disable_channel(&mut self, channel: usize) {
        if channel == 0 {
            self.slice.channel_a.set_enabled(false);
        }
    }

    fn period(&self) -> u32 {
        self.running.map_or(0, |(_, period)| period)
    }
}
