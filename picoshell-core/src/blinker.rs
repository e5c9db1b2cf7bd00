//! The blinker task
//!
//! Blinks an LED once every two seconds and, on every blink, moves a PWM output one step along
//! a [`Sweep`]. In duty mode the LED on the PWM pin blinks 5 times per second and gets brighter
//! every two seconds until it wraps around; in frequency mode the PWM output walks a frequency
//! band and every step is reported on the serial console.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::pwm::{PwmConfig, PwmDriver, PwmError};
use crate::sweep::Sweep;
use crate::tasks::{Task, TaskState};

/// How long the LED is held low at the start of each cycle, in milliseconds
pub const LED_LOW_MS: u32 = 200;
/// How long the LED is held high for the rest of the cycle, in milliseconds
pub const LED_HIGH_MS: u32 = 1_800;
/// The PWM channel the blinker drives
pub const PWM_CHANNEL: usize = 0;

/// Error type for the blinker
#[derive(Debug, PartialEq, Eq)]
pub enum BlinkerError<P, L> {
    /// The PWM driver failed
    Pwm(P),
    /// Setting the LED pin failed
    Led(L),
    /// The next sweep step can't be expressed as a PWM config
    Config(PwmError),
    /// Writing a report line failed
    Report,
}

impl<P: fmt::Debug, L: fmt::Debug> fmt::Display for BlinkerError<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlinkerError::Pwm(e) => write!(f, "pwm driver: {:?}", e),
            BlinkerError::Led(e) => write!(f, "led pin: {:?}", e),
            BlinkerError::Config(e) => write!(f, "pwm config: {}", e),
            BlinkerError::Report => f.write_str("report output failed"),
        }
    }
}

/// Blinker state: the hardware it drives and where it is in its sweep
pub struct Blinker<'t, P, L, D, R> {
    pwm: P,
    led: L,
    delay: D,
    report: R,
    config: PwmConfig,
    sweep: Sweep,
    task: Option<&'t Task>,
}

impl<'t, P, L, D, R> Blinker<'t, P, L, D, R>
where
    P: PwmDriver,
    L: OutputPin,
    D: DelayNs,
    R: Write,
{
    /// Create a blinker. Nothing is touched until [`Blinker::start`].
    pub fn new(pwm: P, led: L, delay: D, report: R, config: PwmConfig, sweep: Sweep) -> Self {
        Self {
            pwm,
            led,
            delay,
            report,
            config,
            sweep,
            task: None,
        }
    }

    /// Record sleeps and wake-ups against `task`
    pub fn with_task(mut self, task: &'t Task) -> Self {
        self.task = Some(task);
        self
    }

    /// The PWM config currently applied
    pub fn config(&self) -> &PwmConfig {
        &self.config
    }

    /// Where the sweep is
    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    /// Start the PWM driver and enable the channel at the sweep's starting point
    pub fn start(&mut self) -> Result<(), BlinkerError<P::Error, L::Error>> {
        if let Sweep::Frequency(sweep) = &self.sweep {
            self.config = self
                .config
                .with_output_frequency(sweep.frequency())
                .map_err(BlinkerError::Config)?;
        }
        if let Some(task) = self.task {
            task.set_state(TaskState::Running);
        }
        self.pwm.start(&self.config).map_err(BlinkerError::Pwm)?;
        self.enable_channel()
    }

    /// One blink: LED low, LED high, then the next sweep step. In frequency mode the output is
    /// running again before a failed report is returned.
    pub fn cycle(&mut self) -> Result<(), BlinkerError<P::Error, L::Error>> {
        self.led.set_low().map_err(BlinkerError::Led)?;
        self.sleep(LED_LOW_MS);
        self.led.set_high().map_err(BlinkerError::Led)?;
        self.sleep(LED_HIGH_MS);

        match &mut self.sweep {
            Sweep::Duty(sweep) => {
                self.pwm.disable_channel(PWM_CHANNEL);
                sweep.advance();
            }
            Sweep::Frequency(sweep) => {
                self.pwm.disable_channel(PWM_CHANNEL);
                self.pwm.stop();

                let target = sweep.advance();
                self.config = self
                    .config
                    .with_output_frequency(target)
                    .map_err(BlinkerError::Config)?;

                let reported = write!(
                    self.report,
                    "pwm_config->period   == {}\r\npwm target frequency == {}\r\npwm result frequency == {}\r\n",
                    self.config.period,
                    target.to_Hz(),
                    self.config.output_frequency().to_Hz(),
                );

                self.pwm.start(&self.config).map_err(BlinkerError::Pwm)?;
                self.enable_channel()?;
                return reported.map_err(|_| BlinkerError::Report);
            }
        }
        self.enable_channel()
    }

    /// Disable the channel and stop the PWM driver
    pub fn stop(&mut self) {
        self.pwm.disable_channel(PWM_CHANNEL);
        self.pwm.stop();
        if let Some(task) = self.task {
            task.set_state(TaskState::Ready);
        }
    }

    /// Give back the hardware
    pub fn free(self) -> (P, L, D, R) {
        (self.pwm, self.led, self.delay, self.report)
    }

    fn enable_channel(&mut self) -> Result<(), BlinkerError<P::Error, L::Error>> {
        let width = self.config.percentage_to_width(self.sweep.duty());
        self.pwm
            .enable_channel(PWM_CHANNEL, width)
            .map_err(BlinkerError::Pwm)
    }

    fn sleep(&mut self, ms: u32) {
        if let Some(task) = self.task {
            task.set_state(TaskState::Sleeping);
        }
        self.delay.delay_ms(ms);
        if let Some(task) = self.task {
            task.wake();
        }
    }
}
