//! Self-test runner behind the `test` command
//!
//! A test case is a function that gets the board context and reports failure with a short
//! reason. The runner prints a line per case and a final verdict.

use core::fmt;

use crate::pwm::SWEEP_PWM_CONFIG;
use crate::sweep::{DutySweep, FrequencySweep, FREQUENCY_SWEEP_END_HZ, FREQUENCY_SWEEP_START_HZ};

/// Signature of a self-test case
pub type TestFn<C> = fn(&mut C) -> Result<(), &'static str>;

/// A named self-test case
pub struct TestCase<C> {
    /// Printed next to the case number
    pub name: &'static str,
    /// The check itself
    pub run: TestFn<C>,
}

impl<C> TestCase<C> {
    /// Case `run` called `name`
    pub const fn new(name: &'static str, run: TestFn<C>) -> Self {
        Self { name, run }
    }
}

/// Run every case in order. Returns whether all of them passed.
pub fn run<C>(
    ctx: &mut C,
    out: &mut dyn fmt::Write,
    cases: &[TestCase<C>],
) -> Result<bool, fmt::Error> {
    let mut passed = true;
    for (number, case) in cases.iter().enumerate() {
        write!(out, "--- Test Case {} ({})\r\n", number + 1, case.name)?;
        match (case.run)(ctx) {
            Ok(()) => out.write_str("--- Result: SUCCESS\r\n")?,
            Err(reason) => {
                passed = false;
                write!(out, "--- Result: FAILURE ({})\r\n", reason)?;
            }
        }
    }
    write!(
        out,
        "\r\nFinal result: {}\r\n",
        if passed { "SUCCESS" } else { "FAILURE" }
    )?;
    Ok(passed)
}

/// The duty sweep visits 55% to 95%, wraps to 5% and comes back around
pub fn duty_sweep_sequence<C>(_: &mut C) -> Result<(), &'static str> {
    const EXPECTED: [u16; 10] = [
        6_500, 7_500, 8_500, 9_500, 500, 1_500, 2_500, 3_500, 4_500, 5_500,
    ];

    let mut sweep = DutySweep::new();
    for expected in EXPECTED {
        if sweep.advance().hundredths() != expected {
            return Err("unexpected duty step");
        }
    }
    Ok(())
}

/// Every step of the frequency sweep has a usable period within 1% of its target
pub fn frequency_sweep_periods<C>(_: &mut C) -> Result<(), &'static str> {
    let mut sweep = FrequencySweep::new();
    loop {
        let target = sweep.frequency();
        let config = SWEEP_PWM_CONFIG
            .with_output_frequency(target)
            .map_err(|_| "no period for target frequency")?;
        let result = config.output_frequency().to_Hz();
        if result.abs_diff(target.to_Hz()) * 100 > target.to_Hz() {
            return Err("result frequency off target");
        }
        if target.to_Hz() == FREQUENCY_SWEEP_END_HZ {
            break;
        }
        if sweep.advance().to_Hz() == FREQUENCY_SWEEP_START_HZ {
            return Err("sweep wrapped before reaching the end");
        }
    }
    Ok(())
}
