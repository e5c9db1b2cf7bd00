//! Board-independent parts of the picoshell firmware
//!
//! Everything in here is written against [`embedded-hal`], [`embedded-io`] and a small
//! [`pwm::PwmDriver`] trait, so it runs on the host as well as on the RP2040. The `picoshell`
//! crate plugs in the real peripherals.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
//! [`embedded-io`]: https://docs.rs/embedded-io

#![deny(missing_docs)]
#![no_std]

pub mod blinker;
pub mod info;
pub mod pwm;
pub mod report;
pub mod selftest;
pub mod shell;
pub mod sweep;
pub mod tasks;
