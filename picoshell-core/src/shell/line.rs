//! Line editor
//!
//! Reads one line from a serial stream with echo, handling backspace and Ctrl-D.

use embedded_io::{Read, Write};
use heapless::String;

const CTRL_D: u8 = 0x04;
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// How a call to [`read_line`] ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStatus {
    /// A carriage return completed the line
    Complete,
    /// The stream ended, or the user pressed Ctrl-D
    EndOfInput,
}

/// Read a line into `line`, echoing what is typed.
///
/// Backspace (and DEL) erase the last character. Other control characters and non-ASCII bytes
/// are dropped, as is anything typed once the line holds `N - 1` characters.
pub fn read_line<IO, const N: usize>(
    io: &mut IO,
    line: &mut String<N>,
) -> Result<LineStatus, IO::Error>
where
    IO: Read + Write,
{
    line.clear();
    loop {
        let mut byte = [0u8; 1];
        if io.read(&mut byte)? == 0 {
            return Ok(LineStatus::EndOfInput);
        }

        match byte[0] {
            CTRL_D => {
                io.write_all(b"^D")?;
                return Ok(LineStatus::EndOfInput);
            }
            BACKSPACE | DELETE => {
                if line.pop().is_some() {
                    io.write_all(&[BACKSPACE, b' ', BACKSPACE])?;
                }
            }
            b'\r' => {
                io.write_all(b"\r\n")?;
                return Ok(LineStatus::Complete);
            }
            c if !(0x20..0x7F).contains(&c) => {}
            c => {
                if line.len() + 1 < N && line.push(char::from(c)).is_ok() {
                    io.write_all(&[c])?;
                }
            }
        }
    }
}
