//! Output of the `mem` and `threads` commands
//!
//! The board collects the numbers; formatting lives here so it can be checked off-target.

use core::fmt;

use crate::tasks::Task;

/// Memory figures shown by `mem`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryStatus {
    /// RAM between the end of static data and the stack pointer
    pub core_free: usize,
    /// Bytes handed out by the heap
    pub heap_used: usize,
    /// Bytes the heap can still hand out
    pub heap_free: usize,
}

impl MemoryStatus {
    /// Write the `mem` report
    pub fn write_to(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "core free memory : {} bytes\r\n", self.core_free)?;
        write!(out, "heap used total  : {} bytes\r\n", self.heap_used)?;
        write!(out, "heap free total  : {} bytes\r\n", self.heap_free)
    }
}

/// Write the `threads` table
pub fn write_task_table(out: &mut dyn fmt::Write, tasks: &[&Task]) -> fmt::Result {
    write!(
        out,
        "{:>4} {:>8} {:<9} {:>8} {}\r\n",
        "core", "stack", "state", "wakeups", "name"
    )?;
    for task in tasks {
        write!(
            out,
            "{:>4} {:>8} {:<9} {:>8} {}\r\n",
            task.core(),
            task.stack_bytes(),
            task.state(),
            task.wakeups(),
            task.name()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::tasks::TaskState;
    use std::string::String;

    #[test]
    fn memory_report() {
        let status = MemoryStatus {
            core_free: 201_412,
            heap_used: 96,
            heap_free: 8_096,
        };
        let mut out = String::new();
        status.write_to(&mut out).unwrap();
        assert_eq!(
            out,
            "core free memory : 201412 bytes\r\n\
             heap used total  : 96 bytes\r\n\
             heap free total  : 8096 bytes\r\n"
        );
    }

    #[test]
    fn task_table() {
        let shell = Task::new("shell", 0, 8_192);
        let blinker = Task::new("blinker", 1, 16_384);
        shell.set_state(TaskState::Running);
        blinker.set_state(TaskState::Sleeping);
        for _ in 0..7 {
            blinker.wake();
        }
        blinker.set_state(TaskState::Sleeping);

        let mut out = String::new();
        write_task_table(&mut out, &[&shell, &blinker]).unwrap();
        assert_eq!(
            out,
            "core    stack state      wakeups name\r\n\
             \x20  0     8192 CURRENT          0 shell\r\n\
             \x20  1    16384 SLEEPING         7 blinker\r\n"
        );
    }
}
