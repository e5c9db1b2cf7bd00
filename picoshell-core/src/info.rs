//! Static description of the firmware, printed by the `info` command

use core::fmt;

/// What the firmware is and what it runs on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemInfo {
    /// Firmware name and version
    pub firmware: &'static str,
    /// Compiler that built the image
    pub compiler: &'static str,
    /// Instruction set architecture
    pub architecture: &'static str,
    /// CPU core
    pub core_variant: &'static str,
    /// Microcontroller
    pub platform: &'static str,
    /// Board the image is built for
    pub board: &'static str,
    /// Build profile
    pub build: &'static str,
}

impl SystemInfo {
    /// Write one `Label: value` line per field
    pub fn write_to(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let fields = [
            ("Firmware:", self.firmware),
            ("Compiler:", self.compiler),
            ("Architecture:", self.architecture),
            ("Core Variant:", self.core_variant),
            ("Platform:", self.platform),
            ("Board:", self.board),
            ("Build:", self.build),
        ];
        for (label, value) in fields {
            write!(out, "{:<14}{}\r\n", label, value)?;
        }
        Ok(())
    }
}
