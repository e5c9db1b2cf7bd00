//! Pulse Width Modulation (PWM) configuration
//!
//! A [`PwmConfig`] describes a PWM output the way the demo thinks about it: a counter clock
//! and the number of counter ticks in one period, so that `frequency / period` is the output
//! frequency. Duty cycles are expressed in hundredths of a percent ([`DutyCycle`]), where
//! `10_000` means 100%.
//!
//! The RP2040 PWM slices only have a 16-bit counter and an 8.4 fixed point clock divider, so a
//! config has to be folded into register values before it can be applied. [`SliceSettings`]
//! does that folding:
//!
//! ```
//! use fugit::HertzU32;
//! use picoshell_core::pwm::{SliceSettings, BLINK_PWM_CONFIG};
//!
//! let settings = SliceSettings::for_config(HertzU32::MHz(125), &BLINK_PWM_CONFIG).unwrap();
//! assert_eq!(settings.div_int, 208);
//! assert!(settings.phase_correct);
//! assert_eq!(settings.top, 59_999);
//! ```

use core::fmt;

use fugit::HertzU32;

use crate::sweep::FREQUENCY_SWEEP_START_HZ;

/// Number of channels on one PWM slice
pub const CHANNELS: usize = 2;

/// Longest free-running period. TOP stays below `u16::MAX` so that a compare level of
/// `TOP + 1` (100 % duty) fits the CC register.
const MAX_FREE_RUNNING_PERIOD: u32 = (1 << 16) - 1;

/// Longest phase-correct period, with the same headroom for full duty
const MAX_PHASE_CORRECT_PERIOD: u32 = 2 * MAX_FREE_RUNNING_PERIOD;

/// How a channel drives its pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Channel is not used
    Disabled,
    /// Pin is high for the active part of the period
    ActiveHigh,
    /// Pin is low for the active part of the period
    ActiveLow,
}

/// Per-channel configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Output polarity of the channel
    pub mode: OutputMode,
}

impl ChannelConfig {
    /// A channel that is not driven
    pub const DISABLED: Self = Self {
        mode: OutputMode::Disabled,
    };

    /// A channel that drives its pin high while active
    pub const ACTIVE_HIGH: Self = Self {
        mode: OutputMode::ActiveHigh,
    };

    /// A channel that drives its pin low while active
    pub const ACTIVE_LOW: Self = Self {
        mode: OutputMode::ActiveLow,
    };
}

/// Configuration of a PWM output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    /// Counter clock
    pub frequency: HertzU32,
    /// Counter ticks in one PWM period. `frequency / period` is the output frequency
    pub period: u32,
    /// Channel configuration, indexed by channel number
    pub channels: [ChannelConfig; CHANNELS],
}

/// Blinks the LED on the PWM pin 5 times per second.
///
/// 600 kHz counter clock and a 120 000 tick period give a 0.2 s waveform.
pub const BLINK_PWM_CONFIG: PwmConfig = PwmConfig {
    frequency: HertzU32::from_raw(600_000),
    period: 120_000,
    channels: [ChannelConfig::ACTIVE_HIGH, ChannelConfig::DISABLED],
};

const SWEEP_CLOCK_HZ: u32 = 9_600_000;

/// Counter clock for the frequency sweep demo
pub const SWEEP_CLOCK: HertzU32 = HertzU32::from_raw(SWEEP_CLOCK_HZ);

/// Starting point for the frequency sweep demo. The period is set for the bottom of the sweep.
pub const SWEEP_PWM_CONFIG: PwmConfig = PwmConfig {
    frequency: SWEEP_CLOCK,
    period: SWEEP_CLOCK_HZ / FREQUENCY_SWEEP_START_HZ,
    channels: [ChannelConfig::ACTIVE_HIGH, ChannelConfig::DISABLED],
};

impl PwmConfig {
    /// Pulse width, in counter ticks, for the given duty cycle
    pub fn percentage_to_width(&self, duty: DutyCycle) -> u32 {
        (u64::from(self.period) * u64::from(duty.hundredths()) / u64::from(DutyCycle::SCALE)) as u32
    }

    /// Copy of this config with the period chosen so the output runs at `target`
    pub fn with_output_frequency(&self, target: HertzU32) -> Result<Self, PwmError> {
        if target.to_Hz() == 0 {
            return Err(PwmError::ZeroFrequency);
        }
        let period = self.frequency.to_Hz() / target.to_Hz();
        if period == 0 {
            return Err(PwmError::ZeroPeriod);
        }
        Ok(Self { period, ..*self })
    }

    /// Frequency of the generated waveform
    pub fn output_frequency(&self) -> HertzU32 {
        match self.period {
            0 => HertzU32::from_raw(0),
            period => HertzU32::from_raw(self.frequency.to_Hz() / period),
        }
    }
}

/// Duty cycle in hundredths of a percent
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCycle(u16);

impl DutyCycle {
    /// Value that represents 100%
    pub const SCALE: u16 = 10_000;
    /// 0%
    pub const ZERO: Self = Self(0);
    /// 50%
    pub const HALF: Self = Self(Self::SCALE / 2);
    /// 100%
    pub const FULL: Self = Self(Self::SCALE);

    /// Duty cycle of `value / 100` percent, or `None` above 100%
    pub const fn from_hundredths(value: u16) -> Option<Self> {
        if value > Self::SCALE {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Raw value in hundredths of a percent
    pub const fn hundredths(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Error type for PWM operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Counter clock or target frequency is zero
    ZeroFrequency,
    /// Period is zero ticks long
    ZeroPeriod,
    /// The counter clock can't be derived from the system clock with the 8.4 divider
    DividerOutOfRange,
    /// The period doesn't fit in the slice counter, even in phase-correct mode
    PeriodOutOfRange,
    /// A channel number past the end of the slice, or one without an output pin
    NoSuchChannel,
    /// The driver hasn't been started
    NotRunning,
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PwmError::ZeroFrequency => "frequency is zero",
            PwmError::ZeroPeriod => "period is zero",
            PwmError::DividerOutOfRange => "clock divider out of range",
            PwmError::PeriodOutOfRange => "period out of range",
            PwmError::NoSuchChannel => "no such channel",
            PwmError::NotRunning => "pwm not running",
        };
        f.write_str(msg)
    }
}

/// Register values that realise a [`PwmConfig`] on one RP2040 PWM slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliceSettings {
    /// Integer part of the clock divider
    pub div_int: u8,
    /// Fractional part of the clock divider, in sixteenths
    pub div_frac: u8,
    /// Value of the TOP register
    pub top: u16,
    /// Whether the counter runs up and down
    pub phase_correct: bool,
}

impl SliceSettings {
    /// Fold `config` into register values for a slice clocked from `sys_clock`.
    ///
    /// Periods longer than the 16-bit counter are run in phase-correct mode, which doubles the
    /// length of the waveform for a given TOP.
    pub fn for_config(sys_clock: HertzU32, config: &PwmConfig) -> Result<Self, PwmError> {
        let counter_hz = u64::from(config.frequency.to_Hz());
        if counter_hz == 0 {
            return Err(PwmError::ZeroFrequency);
        }
        if config.period == 0 {
            return Err(PwmError::ZeroPeriod);
        }

        // 8.4 fixed point, rounded to nearest
        let div = (u64::from(sys_clock.to_Hz()) * 16 + counter_hz / 2) / counter_hz;
        if !(0x10..=0xFFF).contains(&div) {
            return Err(PwmError::DividerOutOfRange);
        }

        let (top, phase_correct) = if config.period <= MAX_FREE_RUNNING_PERIOD {
            (config.period - 1, false)
        } else if config.period <= MAX_PHASE_CORRECT_PERIOD {
            (config.period / 2 - 1, true)
        } else {
            return Err(PwmError::PeriodOutOfRange);
        };

        Ok(Self {
            div_int: (div >> 4) as u8,
            div_frac: (div & 0xF) as u8,
            top: top as u16,
            phase_correct,
        })
    }

    /// Compare register value for a pulse `width` given in config ticks
    pub fn compare_level(&self, width: u32) -> u16 {
        let level = if self.phase_correct { width / 2 } else { width };
        level.min(u32::from(u16::MAX)) as u16
    }
}

/// The start/stop/enable surface of a PWM peripheral driver
pub trait PwmDriver {
    /// Error returned when the driver rejects a configuration or channel
    type Error: fmt::Debug;

    /// Apply `config` and start the counter
    fn start(&mut self, config: &PwmConfig) -> Result<(), Self::Error>;

    /// Stop the counter
    fn stop(&mut self);

    /// Start driving `channel` with a pulse of `width` ticks per period
    fn enable_channel(&mut self, channel: usize, width: u32) -> Result<(), Self::Error>;

    /// Stop driving `channel`
    fn disable_channel(&mut self, channel: usize);

    /// Period of the running config, in ticks
    fn period(&self) -> u32;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    const SYS_CLOCK: HertzU32 = HertzU32::from_raw(125_000_000);

    #[test]
    fn blink_config_runs_at_five_hertz() {
        assert_eq!(BLINK_PWM_CONFIG.output_frequency(), HertzU32::Hz(5));
    }

    #[test]
    fn percentage_to_width_scales_period() {
        let width = |hundredths| {
            BLINK_PWM_CONFIG.percentage_to_width(DutyCycle::from_hundredths(hundredths).unwrap())
        };
        assert_eq!(width(0), 0);
        assert_eq!(width(5_500), 66_000);
        assert_eq!(width(500), 6_000);
        assert_eq!(width(10_000), 120_000);
    }

    #[test]
    fn percentage_to_width_does_not_overflow_long_periods() {
        let config = PwmConfig {
            period: u32::MAX,
            ..BLINK_PWM_CONFIG
        };
        assert_eq!(config.percentage_to_width(DutyCycle::FULL), u32::MAX);
        assert_eq!(config.percentage_to_width(DutyCycle::HALF), u32::MAX / 2);
    }

    #[test]
    fn duty_cycle_above_full_is_rejected() {
        assert_eq!(DutyCycle::from_hundredths(10_001), None);
        assert_eq!(DutyCycle::from_hundredths(10_000), Some(DutyCycle::FULL));
    }

    #[test]
    fn duty_cycle_display() {
        assert_eq!(DutyCycle::from_hundredths(5_505).unwrap().to_string(), "55.05%");
        assert_eq!(DutyCycle::ZERO.to_string(), "0.00%");
    }

    #[test]
    fn output_frequency_picks_period() {
        let config = SWEEP_PWM_CONFIG
            .with_output_frequency(HertzU32::Hz(24_500))
            .unwrap();
        assert_eq!(config.period, 391);
        assert_eq!(config.output_frequency(), HertzU32::Hz(24_552));
        assert_eq!(SWEEP_PWM_CONFIG.period, 446);
    }

    #[test]
    fn output_frequency_rejects_zero_and_too_fast() {
        assert_eq!(
            BLINK_PWM_CONFIG.with_output_frequency(HertzU32::Hz(0)),
            Err(PwmError::ZeroFrequency)
        );
        assert_eq!(
            BLINK_PWM_CONFIG.with_output_frequency(HertzU32::MHz(1)),
            Err(PwmError::ZeroPeriod)
        );
    }

    #[test]
    fn blink_config_folds_into_phase_correct() {
        let settings = SliceSettings::for_config(SYS_CLOCK, &BLINK_PWM_CONFIG).unwrap();
        assert_eq!(
            settings,
            SliceSettings {
                div_int: 208,
                div_frac: 5,
                top: 59_999,
                phase_correct: true,
            }
        );
        assert_eq!(settings.compare_level(66_000), 33_000);
    }

    #[test]
    fn sweep_config_runs_free() {
        let settings = SliceSettings::for_config(SYS_CLOCK, &SWEEP_PWM_CONFIG).unwrap();
        assert_eq!(
            settings,
            SliceSettings {
                div_int: 13,
                div_frac: 0,
                top: 445,
                phase_correct: false,
            }
        );
        assert_eq!(settings.compare_level(223), 223);
    }

    #[test]
    fn longest_free_running_period_reaches_full_duty() {
        let config = PwmConfig {
            frequency: SYS_CLOCK,
            period: u32::from(u16::MAX),
            ..BLINK_PWM_CONFIG
        };
        let settings = SliceSettings::for_config(SYS_CLOCK, &config).unwrap();
        assert_eq!(settings.top, u16::MAX - 1);
        assert!(!settings.phase_correct);
        let full = config.percentage_to_width(DutyCycle::FULL);
        assert!(u32::from(settings.compare_level(full)) > u32::from(settings.top));
    }

    #[test]
    fn full_counter_period_goes_phase_correct() {
        let config = PwmConfig {
            frequency: SYS_CLOCK,
            period: 1 << 16,
            ..BLINK_PWM_CONFIG
        };
        let settings = SliceSettings::for_config(SYS_CLOCK, &config).unwrap();
        assert_eq!(settings.top, (1 << 15) - 1);
        assert!(settings.phase_correct);
        let full = config.percentage_to_width(DutyCycle::FULL);
        assert!(u32::from(settings.compare_level(full)) > u32::from(settings.top));
    }

    #[test]
    fn longest_phase_correct_period_reaches_full_duty() {
        let config = PwmConfig {
            frequency: SYS_CLOCK,
            period: 2 * u32::from(u16::MAX),
            ..BLINK_PWM_CONFIG
        };
        let settings = SliceSettings::for_config(SYS_CLOCK, &config).unwrap();
        assert_eq!(settings.top, u16::MAX - 1);
        assert!(settings.phase_correct);
        let full = config.percentage_to_width(DutyCycle::FULL);
        assert_eq!(settings.compare_level(full), u16::MAX);
    }

    #[test]
    fn out_of_range_configs_are_rejected() {
        let too_long = PwmConfig {
            period: 2 * u32::from(u16::MAX) + 1,
            ..BLINK_PWM_CONFIG
        };
        assert_eq!(
            SliceSettings::for_config(SYS_CLOCK, &too_long),
            Err(PwmError::PeriodOutOfRange)
        );

        let too_slow = PwmConfig {
            frequency: HertzU32::kHz(100),
            ..BLINK_PWM_CONFIG
        };
        assert_eq!(
            SliceSettings::for_config(SYS_CLOCK, &too_slow),
            Err(PwmError::DividerOutOfRange)
        );

        let too_fast = PwmConfig {
            frequency: HertzU32::MHz(250),
            ..BLINK_PWM_CONFIG
        };
        assert_eq!(
            SliceSettings::for_config(SYS_CLOCK, &too_fast),
            Err(PwmError::DividerOutOfRange)
        );

        let zero = PwmConfig {
            period: 0,
            ..BLINK_PWM_CONFIG
        };
        assert_eq!(
            SliceSettings::for_config(SYS_CLOCK, &zero),
            Err(PwmError::ZeroPeriod)
        );
    }
}
