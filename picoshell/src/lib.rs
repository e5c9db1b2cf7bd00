//! Raspberry Pi Pico side of picoshell
//!
//! Binds the pieces in [`picoshell_core`] to the RP2040: UART0 for the shell, PWM slice 1
//! for the blinker, the watchdog for `reboot` and core 1 for the blinker task.

#![deny(missing_docs)]
#![no_std]

#[cfg(feature = "extended-shell")]
extern crate alloc;

pub mod blink;
pub mod board;
pub mod commands;
pub mod config;
#[cfg(feature = "extended-shell")]
pub mod heap;
pub mod pwm;
pub mod serial;
