//! # picoshell
//!
//! Serial shell on UART0 (GPIO 0 TX, GPIO 1 RX, 115200 8N1) and a PWM blinker on GPIO 18.
//!
//! Core 0 boots the board, starts the blinker on core 1 and then runs shell sessions forever.
//! Type `help` at the prompt for the command list; `reboot` resets the chip through the
//! watchdog.

#![no_std]
#![no_main]

use core::fmt::Write;

use defmt_rtt as _;
use panic_probe as _;

// Alias for our HAL crate
use rp2040_hal as hal;

use hal::clocks::Clock;
use hal::multicore::{Multicore, Stack};
use hal::pac;
use hal::uart::{DataBits, StopBits, UartConfig, UartPeripheral};

use picoshell::board::{Board, SHELL_TASK};
use picoshell::config::{CORE1_STACK_WORDS, UART_BAUD, XTAL_FREQ_HZ};
use picoshell::pwm::SlicePwm;
use picoshell::serial::{self, Console, SerialPort, UartPins};
use picoshell::{blink, commands};
use picoshell_core::shell::Shell;
use picoshell_core::tasks::TaskState;

/// The linker will place this boot block at the start of our program image. We
/// need this to help the ROM bootloader get our code up and running.
#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// Stack for the blinker on core 1
static mut CORE1_STACK: Stack<CORE1_STACK_WORDS> = Stack::new();

#[hal::entry]
fn main() -> ! {
    #[cfg(feature = "extended-shell")]
    unsafe {
        picoshell::heap::init();
    }

    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    let clocks = hal::clocks::init_clocks_and_plls(
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

    let mut sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let uart_pins: UartPins = (pins.gpio0.into_function(), pins.gpio1.into_function());
    let uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(UART_BAUD, DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();
    let reader = serial::install(uart);
    let _ = Console.write_str("Main (UART0 started)\r\n");
    defmt::info!("uart0 up at {} baud", UART_BAUD.to_Hz());

    let pwm_slices = hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
    let pwm = SlicePwm::new(pwm_slices.pwm1, pins.gpio18, clocks.system_clock.freq());

    let led = pins.gpio25.into_push_pull_output();

    let mut mc = Multicore::new(&mut pac.PSM, &mut pac.PPB, &mut sio.fifo);
    let cores = mc.cores();
    let core1 = &mut cores[1];
    let stack = unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK.mem) };
    if let Err(e) = core1.spawn(stack, move || blink::run(pwm, led, timer)) {
        defmt::error!("core 1 did not start: {}", defmt::Debug2Format(&e));
    }

    let mut board = Board::new(timer, watchdog);
    let port = SerialPort::new(reader).with_task(&SHELL_TASK);
    let mut shell = Shell::new(commands::shell_config(), port);
    SHELL_TASK.set_state(TaskState::Running);

    loop {
        match shell.run(&mut board) {
            Ok(end) => defmt::info!("shell session ended: {}", end),
            Err(e) => defmt::error!("shell session failed: {}", defmt::Display2Format(&e)),
        }
    }
}

// End of file
