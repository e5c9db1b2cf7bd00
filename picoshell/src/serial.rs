//! UART0 console
//!
//! The receive half belongs to the shell on core 0. The transmit half lives in a
//! [`critical_section::Mutex`] so that the shell and the blinker on core 1 can both print;
//! every write holds the lock until the bytes are in the FIFO, so lines from the two cores
//! don't interleave mid-write.

use core::cell::RefCell;
use core::convert::Infallible;
use core::fmt;

use critical_section::Mutex;
use embedded_io::{ErrorType, Read, Write};
use rp2040_hal as hal;

use hal::gpio::bank0::{Gpio0, Gpio1};
use hal::gpio::{FunctionUart, Pin, PullDown};
use hal::pac;
use hal::uart::{Enabled, Reader, UartPeripheral, Writer};

use picoshell_core::tasks::{Task, TaskState};

/// UART0 TX on GPIO 0 and RX on GPIO 1
pub type UartPins = (
    Pin<Gpio0, FunctionUart, PullDown>,
    Pin<Gpio1, FunctionUart, PullDown>,
);

/// UART0 once it's been enabled
pub type Uart0 = UartPeripheral<Enabled, pac::UART0, UartPins>;

/// Receive half of UART0
pub type Uart0Reader = Reader<pac::UART0, UartPins>;

/// Transmit half of UART0
pub type Uart0Writer = Writer<pac::UART0, UartPins>;

static WRITER: Mutex<RefCell<Option<Uart0Writer>>> = Mutex::new(RefCell::new(None));

/// Split `uart` and make its transmit half available to [`Console`]. Returns the receive half.
pub fn install(uart: Uart0) -> Uart0Reader {
    let (reader, writer) = uart.split();
    critical_section::with(|cs| {
        WRITER.borrow_ref_mut(cs).replace(writer);
    });
    reader
}

fn write_bytes(bytes: &[u8]) -> bool {
    critical_section::with(|cs| match WRITER.borrow_ref_mut(cs).as_mut() {
        Some(writer) => {
            writer.write_full_blocking(bytes);
            true
        }
        None => false,
    })
}

/// Formatted output to UART0, usable from either core
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if write_bytes(s.as_bytes()) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

/// Byte stream the shell runs on: reads from UART0, writes through [`Console`]
pub struct SerialPort {
    reader: Uart0Reader,
    task: Option<&'static Task>,
}

impl SerialPort {
    /// Wrap the receive half of UART0
    pub fn new(reader: Uart0Reader) -> Self {
        Self { reader, task: None }
    }

    /// Mark `task` as waiting while a read blocks
    pub fn with_task(mut self, task: &'static Task) -> Self {
        self.task = Some(task);
        self
    }
}

impl ErrorType for SerialPort {
    type Error = Infallible;
}

impl Read for SerialPort {
    /// Blocks until one byte arrives. Line errors (overrun, break, parity, framing) are logged
    /// and the byte is dropped.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(task) = self.task {
            task.set_state(TaskState::Waiting);
        }
        loop {
            match self.reader.read_full_blocking(&mut buf[..1]) {
                Ok(()) => break,
                Err(e) => defmt::warn!("uart0 receive error: {}", defmt::Debug2Format(&e)),
            }
        }
        if let Some(task) = self.task {
            task.wake();
        }
        Ok(1)
    }
}

impl Write for SerialPort {
    /// Bytes written before the transmit half is installed are dropped
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
