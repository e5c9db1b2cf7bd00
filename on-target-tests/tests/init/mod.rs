use rp2040_hal as hal;

use hal::pac;

/// External high-speed crystal on the Raspberry Pi Pico board is 12 MHz
pub const XTAL_FREQ_HZ: u32 = picoshell::config::XTAL_FREQ_HZ;

/// When test cases are run from a debugger, there may not be a complete
/// system reset between test cases. Put core 1 back into reset and release
/// the spinlocks so every suite starts from the same state.
///
/// This must only be called immediately after booting core 0, ie. at the start
/// of the `#[init]` function.
pub unsafe fn reset_cleanup() {
    unsafe {
        (*pac::PSM::PTR)
            .frce_off()
            .modify(|_, w| w.proc1().set_bit());
        while !(*pac::PSM::PTR).frce_off().read().proc1().bit_is_set() {
            cortex_m::asm::nop();
        }
        (*pac::PSM::PTR)
            .frce_off()
            .modify(|_, w| w.proc1().clear_bit());
        hal::sio::spinlock_reset();
    }
}
