//! Board constants

use fugit::HertzU32;

/// External high-speed crystal on the Raspberry Pi Pico board is 12 MHz. Adjust
/// if your board has a different frequency
pub const XTAL_FREQ_HZ: u32 = 12_000_000u32;

/// UART0 runs 8N1 at this rate
pub const UART_BAUD: HertzU32 = HertzU32::from_raw(115_200);

/// Size of the blinker stack on core 1, in 32-bit words
pub const CORE1_STACK_WORDS: usize = 4096;

/// Stack budget of the shell on core 0, in bytes.
///
/// Core 0 grows its stack down from the top of RAM, so this is only what the task table
/// shows. `mem` reports what is really left.
pub const SHELL_STACK_BYTES: usize = 16 * 1024;

/// Heap handed to the allocator when the extended shell is built in
#[cfg(feature = "extended-shell")]
pub const HEAP_SIZE: usize = 8 * 1024;

/// Printed when a shell session starts
pub const SHELL_BANNER: &str = "picoshell";

/// Printed before every command line
pub const SHELL_PROMPT: &str = "ch> ";
