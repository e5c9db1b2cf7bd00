//! Shell command table

use core::fmt;

#[cfg(feature = "extended-shell")]
use embedded_hal::delay::DelayNs;

use picoshell_core::shell::{usage, Command, ShellConfig};
#[cfg(feature = "extended-shell")]
use picoshell_core::{
    report::write_task_table,
    selftest::{self, TestCase},
};

use crate::board::Board;
#[cfg(feature = "extended-shell")]
use crate::board::{BLINKER_TASK, SHELL_TASK};
use crate::config::{SHELL_BANNER, SHELL_PROMPT};

/// Commands on top of the shell built-ins
#[cfg(not(feature = "extended-shell"))]
pub static COMMANDS: [Command<Board>; 1] = [Command::new("reboot", cmd_reboot)];

/// Commands on top of the shell built-ins
#[cfg(feature = "extended-shell")]
pub static COMMANDS: [Command<Board>; 4] = [
    Command::new("mem", cmd_mem),
    Command::new("threads", cmd_threads),
    Command::new("test", cmd_test),
    Command::new("reboot", cmd_reboot),
];

/// Shell configuration for the firmware
pub fn shell_config() -> ShellConfig<'static, Board> {
    ShellConfig::new(SHELL_BANNER, SHELL_PROMPT, &COMMANDS)
}

fn cmd_reboot(board: &mut Board, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "reboot");
    }
    board.reboot();
    Ok(())
}

#[cfg(feature = "extended-shell")]
fn cmd_mem(board: &mut Board, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "mem");
    }
    board.memory_status().write_to(out)
}

#[cfg(feature = "extended-shell")]
fn cmd_threads(_: &mut Board, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "threads");
    }
    write_task_table(out, &[&SHELL_TASK, &BLINKER_TASK])
}

#[cfg(feature = "extended-shell")]
static SELF_TESTS: [TestCase<Board>; 4] = [
    TestCase::new("heap allocation", check_heap),
    TestCase::new("timer monotonicity", check_timer),
    TestCase::new("duty sweep", selftest::duty_sweep_sequence),
    TestCase::new("frequency sweep periods", selftest::frequency_sweep_periods),
];

#[cfg(feature = "extended-shell")]
fn cmd_test(board: &mut Board, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "test");
    }
    let passed = selftest::run(board, out, &SELF_TESTS)?;
    defmt::info!("self test passed: {}", passed);
    Ok(())
}

#[cfg(feature = "extended-shell")]
fn check_heap(_: &mut Board) -> Result<(), &'static str> {
    use alloc::vec::Vec;

    let before = crate::heap::used();
    let values: Vec<u32> = (0..64).collect();
    if crate::heap::used() <= before {
        return Err("allocation not accounted for");
    }
    if values.iter().sum::<u32>() != 2016 {
        return Err("heap contents corrupted");
    }
    drop(values);
    if crate::heap::used() != before {
        return Err("memory not returned");
    }
    Ok(())
}

#[cfg(feature = "extended-shell")]
fn check_timer(board: &mut Board) -> Result<(), &'static str> {
    let mut timer = board.timer();
    let start = timer.get_counter();
    timer.delay_ms(10);
    let end = timer.get_counter();
    if end <= start {
        return Err("counter went backwards");
    }
    let elapsed = (end - start).to_micros();
    if elapsed < 10_000 {
        return Err("delay returned early");
    }
    if elapsed > 20_000 {
        return Err("delay overran");
    }
    Ok(())
}
