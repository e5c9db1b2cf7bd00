//! Serial command shell
//!
//! A [`Shell`] runs sessions over any [`embedded_io`] stream. A session prints a banner, then
//! reads command lines until the user types `exit` or ends the input with Ctrl-D.
//!
//! Commands are plain functions collected in a table. Besides the table, every shell knows
//! `help`, `exit`, `info` and `systime`. Names are matched without regard to case.
//!
//! ```
//! use core::fmt;
//! use picoshell_core::info::SystemInfo;
//! use picoshell_core::shell::{usage, Command, ShellConfig, ShellContext};
//!
//! struct Board {
//!     uptime_ms: u64,
//! }
//!
//! const INFO: SystemInfo = SystemInfo {
//!     firmware: "doc",
//!     compiler: "rustc",
//!     architecture: "ARMv6-M",
//!     core_variant: "Cortex-M0+",
//!     platform: "RP2040",
//!     board: "Raspberry Pi Pico",
//!     build: "debug",
//! };
//!
//! impl ShellContext for Board {
//!     fn system_time(&self) -> u64 {
//!         self.uptime_ms
//!     }
//!
//!     fn system_info(&self) -> &SystemInfo {
//!         &INFO
//!     }
//! }
//!
//! fn cmd_hello(_: &mut Board, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
//!     if !args.is_empty() {
//!         return usage(out, "hello");
//!     }
//!     out.write_str("hello\r\n")
//! }
//!
//! static COMMANDS: [Command<Board>; 1] = [Command::new("hello", cmd_hello)];
//!
//! let config = ShellConfig::new("Demo Shell", "> ", &COMMANDS);
//! # let _ = config;
//! ```

use core::fmt::{self, Write as _};

use embedded_io::{Read, Write};
use heapless::{String, Vec};

use crate::info::SystemInfo;

mod line;
#[cfg(test)]
mod testing;

pub use line::{read_line, LineStatus};

/// Longest line the shell accepts, including room for a terminator
pub const MAX_LINE_LENGTH: usize = 64;

/// Most arguments a command can be given
pub const MAX_ARGUMENTS: usize = 4;

/// Signature of a command handler.
///
/// Handlers get the board context, the console and the arguments after the command name.
pub type CommandFn<C> = fn(&mut C, &mut dyn fmt::Write, &[&str]) -> fmt::Result;

/// An entry in a command table
pub struct Command<C> {
    /// Name the command is invoked by
    pub name: &'static str,
    /// Function run for the command
    pub handler: CommandFn<C>,
}

impl<C> Command<C> {
    /// Table entry for `handler` under `name`
    pub const fn new(name: &'static str, handler: CommandFn<C>) -> Self {
        Self { name, handler }
    }
}

impl<C> Clone for Command<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Command<C> {}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

/// Whatever the shell needs from the board to run its built-in commands
pub trait ShellContext {
    /// Milliseconds since boot
    fn system_time(&self) -> u64;

    /// Static description of the firmware and hardware
    fn system_info(&self) -> &SystemInfo;
}

/// Shell configuration
pub struct ShellConfig<'a, C> {
    /// Printed when a session starts
    pub banner: &'a str,
    /// Printed before every line
    pub prompt: &'a str,
    /// User command table
    pub commands: &'a [Command<C>],
}

impl<'a, C> ShellConfig<'a, C> {
    /// Create a config
    pub const fn new(banner: &'a str, prompt: &'a str, commands: &'a [Command<C>]) -> Self {
        Self {
            banner,
            prompt,
            commands,
        }
    }
}

impl<C> Clone for ShellConfig<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ShellConfig<'_, C> {}

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEnd {
    /// The user typed `exit`
    Exit,
    /// The input stream ended or the user pressed Ctrl-D
    EndOfInput,
}

/// Error type for shell sessions
#[derive(Debug, PartialEq, Eq)]
pub enum ShellError<E> {
    /// Reading or writing the stream failed
    Io(E),
    /// A command handler returned a formatting error without a stream error behind it
    Format,
}

impl<E: fmt::Debug> fmt::Display for ShellError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Io(e) => write!(f, "stream error: {:?}", e),
            ShellError::Format => f.write_str("formatting error"),
        }
    }
}

impl<E> From<E> for ShellError<E> {
    fn from(e: E) -> Self {
        ShellError::Io(e)
    }
}

/// Print `Usage: <name>`. Handlers call this when given arguments they don't take.
pub fn usage(out: &mut dyn fmt::Write, name: &str) -> fmt::Result {
    write!(out, "Usage: {}\r\n", name)
}

/// Adapts an [`embedded_io::Write`] stream to [`core::fmt::Write`], keeping the stream error
struct Console<'a, W: Write> {
    io: &'a mut W,
    error: Option<W::Error>,
}

impl<'a, W: Write> Console<'a, W> {
    fn new(io: &'a mut W) -> Self {
        Self { io, error: None }
    }

    fn finish(self, result: fmt::Result) -> Result<(), ShellError<W::Error>> {
        match (result, self.error) {
            (Ok(()), _) => Ok(()),
            (Err(_), Some(e)) => Err(ShellError::Io(e)),
            (Err(_), None) => Err(ShellError::Format),
        }
    }
}

impl<W: Write> fmt::Write for Console<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.io.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

fn cmd_info<C: ShellContext>(ctx: &mut C, out: &mut dyn fmt::Write, args: &[&str]) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "info");
    }
    ctx.system_info().write_to(out)
}

fn cmd_systime<C: ShellContext>(
    ctx: &mut C,
    out: &mut dyn fmt::Write,
    args: &[&str],
) -> fmt::Result {
    if !args.is_empty() {
        return usage(out, "systime");
    }
    write!(out, "{}\r\n", ctx.system_time())
}

/// A shell bound to a stream
pub struct Shell<'a, C, IO> {
    config: ShellConfig<'a, C>,
    io: IO,
}

impl<'a, C, IO> Shell<'a, C, IO>
where
    C: ShellContext,
    IO: Read + Write,
{
    /// Create a shell on `io`
    pub fn new(config: ShellConfig<'a, C>, io: IO) -> Self {
        Self { config, io }
    }

    /// Give back the stream
    pub fn free(self) -> IO {
        self.io
    }

    /// The stream the shell runs on
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Mutable access to the stream, between sessions
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Run one session to completion
    pub fn run(&mut self, ctx: &mut C) -> Result<SessionEnd, ShellError<IO::Error>> {
        let config = self.config;
        let mut line: String<MAX_LINE_LENGTH> = String::new();

        self.print(format_args!("\r\n{}\r\n", config.banner))?;
        loop {
            self.print(format_args!("{}", config.prompt))?;
            if read_line(&mut self.io, &mut line)? == LineStatus::EndOfInput {
                self.print(format_args!("\r\nlogout"))?;
                return Ok(SessionEnd::EndOfInput);
            }
            if let Some(end) = self.execute(ctx, &line)? {
                return Ok(end);
            }
        }
    }

    /// Run a single command line, as if it had been typed
    pub fn execute(
        &mut self,
        ctx: &mut C,
        line: &str,
    ) -> Result<Option<SessionEnd>, ShellError<IO::Error>> {
        let mut tokens = line.split(|c: char| c == ' ' || c == '\t').filter(|t| !t.is_empty());
        let Some(name) = tokens.next() else {
            return Ok(None);
        };

        let mut args: Vec<&str, MAX_ARGUMENTS> = Vec::new();
        for token in tokens {
            if args.push(token).is_err() {
                self.print(format_args!("too many arguments\r\n"))?;
                return Ok(None);
            }
        }

        let builtins = [
            Command::new("info", cmd_info::<C>),
            Command::new("systime", cmd_systime::<C>),
        ];
        let commands = self.config.commands;

        let mut console = Console::new(&mut self.io);
        let result = if name.eq_ignore_ascii_case("exit") {
            if args.is_empty() {
                return Ok(Some(SessionEnd::Exit));
            }
            usage(&mut console, "exit")
        } else if name.eq_ignore_ascii_case("help") {
            if args.is_empty() {
                list_commands(&mut console, &builtins, commands)
            } else {
                usage(&mut console, "help")
            }
        } else if let Some(command) = builtins
            .iter()
            .chain(commands.iter())
            .find(|command| command.name.eq_ignore_ascii_case(name))
        {
            (command.handler)(ctx, &mut console, &args)
        } else {
            write!(console, "{} ?\r\n", name)
        };
        console.finish(result)?;
        Ok(None)
    }

    fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), ShellError<IO::Error>> {
        let mut console = Console::new(&mut self.io);
        let result = console.write_fmt(args);
        console.finish(result)
    }
}

fn list_commands<C>(
    out: &mut dyn fmt::Write,
    builtins: &[Command<C>],
    commands: &[Command<C>],
) -> fmt::Result {
    out.write_str("Commands: help exit ")?;
    for command in builtins.iter().chain(commands) {
        write!(out, "{} ", command.name)?;
    }
    out.write_str("\r\n")
}
