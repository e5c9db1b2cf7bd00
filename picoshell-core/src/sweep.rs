//! Duty cycle and frequency sweeps driven by the blinker

use fugit::HertzU32;

use crate::pwm::DutyCycle;

/// Duty cycle the sweep starts at, in hundredths of a percent
pub const DUTY_SWEEP_START: u16 = 5_500;
/// Amount added to the duty cycle on every step
pub const DUTY_SWEEP_STEP: u16 = 1_000;
/// Duty cycle the sweep wraps back to once it reaches 100%
pub const DUTY_SWEEP_WRAP: u16 = 500;

/// Lowest frequency of the frequency sweep, in Hz
pub const FREQUENCY_SWEEP_START_HZ: u32 = 21_500;
/// Highest frequency of the frequency sweep, in Hz
pub const FREQUENCY_SWEEP_END_HZ: u32 = 24_500;
/// Frequency increment, in Hz
pub const FREQUENCY_SWEEP_STEP_HZ: u32 = 250;

/// Walks the duty cycle up in 10% steps: 55%, 65%, ... 95%, then 5%, 15%, ... forever
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutySweep {
    duty: u16,
}

impl DutySweep {
    /// New sweep at the 55% starting point
    pub const fn new() -> Self {
        Self {
            duty: DUTY_SWEEP_START,
        }
    }

    /// Current duty cycle
    pub fn duty(&self) -> DutyCycle {
        DutyCycle::from_hundredths(self.duty).unwrap_or(DutyCycle::FULL)
    }

    /// Move to the next step and return it
    pub fn advance(&mut self) -> DutyCycle {
        self.duty += DUTY_SWEEP_STEP;
        if self.duty >= DutyCycle::SCALE {
            self.duty = DUTY_SWEEP_WRAP;
        }
        self.duty()
    }
}

impl Default for DutySweep {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks the output frequency from 21.5 kHz to 24.5 kHz in 250 Hz steps, at 50% duty
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencySweep {
    hz: u32,
}

impl FrequencySweep {
    /// New sweep at the bottom of the band
    pub const fn new() -> Self {
        Self {
            hz: FREQUENCY_SWEEP_START_HZ,
        }
    }

    /// Current target frequency
    pub fn frequency(&self) -> HertzU32 {
        HertzU32::from_raw(self.hz)
    }

    /// Duty cycle used for every step of the sweep
    pub fn duty(&self) -> DutyCycle {
        DutyCycle::HALF
    }

    /// Move to the next step and return it
    pub fn advance(&mut self) -> HertzU32 {
        self.hz += FREQUENCY_SWEEP_STEP_HZ;
        if self.hz > FREQUENCY_SWEEP_END_HZ {
            self.hz = FREQUENCY_SWEEP_START_HZ;
        }
        self.frequency()
    }
}

impl Default for FrequencySweep {
    fn default() -> Self {
        Self::new()
    }
}

/// What the blinker changes every cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sweep {
    /// Change the duty cycle at a fixed frequency
    Duty(DutySweep),
    /// Change the frequency at a fixed duty cycle
    Frequency(FrequencySweep),
}

impl Sweep {
    /// Duty cycle the channel should currently run at
    pub fn duty(&self) -> DutyCycle {
        match self {
            Sweep::Duty(sweep) => sweep.duty(),
            Sweep::Frequency(sweep) => sweep.duty(),
        }
    }
}
