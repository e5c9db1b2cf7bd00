//! Shell commands running against the real board context
#![no_std]
#![no_main]
#![cfg(test)]

use core::convert::Infallible;

use defmt_rtt as _; // defmt transport
use defmt_test as _;
use panic_probe as _;
use rp2040_hal as hal;

/// The linker will place this boot block at the start of our program image. We
/// need this to help the ROM bootloader get our code up and running.
#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

mod init;

/// Collects shell output; reads see end of input
struct Capture {
    buf: [u8; 512],
    len: usize,
}

impl Capture {
    const fn new() -> Self {
        Self {
            buf: [0; 512],
            len: 0,
        }
    }

    fn text(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap()
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

impl embedded_io::ErrorType for Capture {
    type Error = Infallible;
}

impl embedded_io::Read for Capture {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Infallible> {
        Ok(0)
    }
}

impl embedded_io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        let n = buf.len().min(self.buf.len() - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&buf[..n]);
        self.len += n;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

struct State {
    board: picoshell::board::Board,
    timer: hal::Timer,
    shell: picoshell_core::shell::Shell<'static, picoshell::board::Board, Capture>,
}

impl State {
    fn run(&mut self, line: &str) -> &str {
        let end = self.shell.execute(&mut self.board, line).unwrap();
        assert_eq!(end, None);
        self.output()
    }

    fn output(&self) -> &str {
        self.shell.io().text()
    }
}

#[defmt_test::tests]
mod tests {
    use crate::hal;
    use crate::hal::clocks::init_clocks_and_plls;
    use crate::hal::pac;
    use crate::init::XTAL_FREQ_HZ;
    use embedded_hal::delay::DelayNs;
    use hal::watchdog::Watchdog;

    use picoshell::board::Board;
    use picoshell::commands::shell_config;
    use picoshell_core::shell::{SessionEnd, Shell, ShellContext};

    use super::{Capture, State};

    #[init]
    fn setup() -> State {
        unsafe {
            crate::init::reset_cleanup();
        }
        let mut pac = pac::Peripherals::take().unwrap();
        let mut watchdog = Watchdog::new(pac.WATCHDOG);

        let clocks = init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        State {
            board: Board::new(timer, watchdog),
            timer,
            shell: Shell::new(shell_config(), Capture::new()),
        }
    }

    #[test]
    fn systime_counts_milliseconds(state: &mut State) {
        let before = state.board.system_time();
        state.timer.delay_ms(50);
        let elapsed = state.board.system_time() - before;
        assert!((50..=52).contains(&elapsed));
    }

    #[test]
    fn help_lists_reboot(state: &mut State) {
        let out = state.run("help");
        assert!(out.starts_with("Commands: help exit info systime "));
        assert!(out.contains("reboot "));
    }

    #[test]
    fn reboot_with_arguments_only_prints_usage(state: &mut State) {
        state.shell.io_mut().clear();
        assert_eq!(state.run("reboot now"), "Usage: reboot\r\n");
    }

    #[test]
    fn info_names_the_chip(state: &mut State) {
        state.shell.io_mut().clear();
        let out = state.run("info");
        assert!(out.contains("Platform:     RP2040\r\n"));
        assert!(out.contains("Core Variant: Cortex-M0+\r\n"));
    }

    #[test]
    fn session_ends_without_input(state: &mut State) {
        state.shell.io_mut().clear();
        let end = state.shell.run(&mut state.board).unwrap();
        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(state.output().ends_with("ch> \r\nlogout"));
    }

    #[test]
    fn capture_starts_empty() {
        assert_eq!(Capture::new().text(), "");
    }
}
