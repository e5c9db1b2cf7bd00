//! What the shell commands get to work with

use core::mem::size_of;

use fugit::ExtU32;
use rp2040_hal as hal;

use hal::{Timer, Watchdog};

use picoshell_core::info::SystemInfo;
#[cfg(feature = "extended-shell")]
use picoshell_core::report::MemoryStatus;
use picoshell_core::shell::ShellContext;
use picoshell_core::tasks::Task;

use crate::config::{CORE1_STACK_WORDS, SHELL_STACK_BYTES};

/// The shell, on core 0
pub static SHELL_TASK: Task = Task::new("shell", 0, SHELL_STACK_BYTES);

/// The blinker, on core 1
pub static BLINKER_TASK: Task = Task::new("blinker", 1, CORE1_STACK_WORDS * size_of::<usize>());

/// Printed by `info`
pub static SYSTEM_INFO: SystemInfo = SystemInfo {
    firmware: concat!("picoshell ", env!("CARGO_PKG_VERSION")),
    compiler: env!("PICOSHELL_RUSTC_VERSION"),
    architecture: "ARMv6-M",
    core_variant: "Cortex-M0+",
    platform: "RP2040",
    board: "Raspberry Pi Pico",
    build: env!("PICOSHELL_PROFILE"),
};

/// Shell context for the firmware
pub struct Board {
    timer: Timer,
    watchdog: Watchdog,
}

impl Board {
    /// `timer` must already be running; `watchdog` must not be
    pub fn new(timer: Timer, watchdog: Watchdog) -> Self {
        Self { timer, watchdog }
    }

    /// Copy of the system timer
    pub fn timer(&self) -> Timer {
        self.timer
    }

    /// Start the watchdog with the shortest period there is. The chip resets on its next
    /// tick and nothing feeds it.
    pub fn reboot(&mut self) {
        defmt::warn!("watchdog reset requested");
        self.watchdog.start(1.micros());
    }

    /// Free RAM between the end of static data and the stack pointer, and heap usage
    #[cfg(feature = "extended-shell")]
    pub fn memory_status(&self) -> MemoryStatus {
        extern "C" {
            static __sheap: u32;
        }
        // taking the address of an extern static needs `unsafe` before Rust 1.82
        #[allow(unused_unsafe)]
        let static_end = unsafe { core::ptr::addr_of!(__sheap) } as usize;
        let stack_pointer = cortex_m::register::msp::read() as usize;
        MemoryStatus {
            core_free: stack_pointer.saturating_sub(static_end),
            heap_used: crate::heap::used(),
            heap_free: crate::heap::free(),
        }
    }
}

impl ShellContext for Board {
    fn system_time(&self) -> u64 {
        self.timer.get_counter().ticks() / 1_000
    }

    fn system_info(&self) -> &SystemInfo {
        &SYSTEM_INFO
    }
}
