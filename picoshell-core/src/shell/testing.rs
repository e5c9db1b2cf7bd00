//! Scripted serial terminal for the shell tests

extern crate std;

use core::convert::Infallible;
use std::string::String;
use std::vec::Vec;

use embedded_io::{ErrorKind, ErrorType, Read, Write};

/// Plays back a fixed input and records everything written
pub struct Terminal {
    input: Vec<u8>,
    position: usize,
    output: Vec<u8>,
}

impl Terminal {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            position: 0,
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8(self.output.clone()).unwrap()
    }

    pub fn remaining(&self) -> &[u8] {
        &self.input[self.position..]
    }
}

impl ErrorType for Terminal {
    type Error = Infallible;
}

impl Read for Terminal {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.position += n;
        Ok(n)
    }
}

impl Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// A line that fails reads, or fails writes once `budget` bytes have gone through
pub struct BrokenLine {
    fail_reads: bool,
    budget: usize,
}

impl BrokenLine {
    /// Reads fail straight away; writes always succeed
    pub fn deaf() -> Self {
        Self {
            fail_reads: true,
            budget: usize::MAX,
        }
    }

    /// Writes fail after `budget` bytes; reads see end of input
    pub fn mute_after(budget: usize) -> Self {
        Self {
            fail_reads: false,
            budget,
        }
    }
}

impl ErrorType for BrokenLine {
    type Error = ErrorKind;
}

impl Read for BrokenLine {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ErrorKind> {
        if self.fail_reads {
            Err(ErrorKind::Other)
        } else {
            Ok(0)
        }
    }
}

impl Write for BrokenLine {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        if self.budget == 0 {
            return Err(ErrorKind::BrokenPipe);
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}
