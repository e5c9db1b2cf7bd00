//! Registry of the long-running tasks, for the `threads` command
//!
//! Each core runs exactly one task, so there is nothing to schedule: a [`Task`] only records
//! what the task is doing so the shell can show it. Updates use plain atomic loads and stores,
//! which Cortex-M0+ supports even without compare-and-swap.

use core::fmt;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// What a task is currently doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskState {
    /// Created but not yet running
    Ready = 0,
    /// Executing
    Running = 1,
    /// Blocked on a delay
    Sleeping = 2,
    /// Blocked on input
    Waiting = 3,
}

impl TaskState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => TaskState::Running,
            2 => TaskState::Sleeping,
            3 => TaskState::Waiting,
            _ => TaskState::Ready,
        }
    }

    /// Upper-case name, as shown by `threads`
    pub fn name(self) -> &'static str {
        match self {
            TaskState::Ready => "READY",
            TaskState::Running => "CURRENT",
            TaskState::Sleeping => "SLEEPING",
            TaskState::Waiting => "WTQUEUE",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A long-running task pinned to one core
pub struct Task {
    name: &'static str,
    core: u8,
    stack_bytes: usize,
    state: AtomicU8,
    wakeups: AtomicU32,
}

impl Task {
    /// Describe a task. Usable in `static` initialisers.
    pub const fn new(name: &'static str, core: u8, stack_bytes: usize) -> Self {
        Self {
            name,
            core,
            stack_bytes,
            state: AtomicU8::new(TaskState::Ready as u8),
            wakeups: AtomicU32::new(0),
        }
    }

    /// Task name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Core the task runs on
    pub fn core(&self) -> u8 {
        self.core
    }

    /// Size of the task's stack, in bytes
    pub fn stack_bytes(&self) -> usize {
        self.stack_bytes
    }

    /// Last recorded state
    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Record a state change
    pub fn set_state(&self, state: TaskState) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    /// Number of times the task has come back from a blocking call
    pub fn wakeups(&self) -> u32 {
        self.wakeups.load(Ordering::Relaxed)
    }

    /// Record that the task came back from a blocking call and is running again.
    ///
    /// Only the owning task may call this; the increment is not atomic as a whole.
    pub fn wake(&self) {
        let count = self.wakeups.load(Ordering::Relaxed);
        self.wakeups.store(count.wrapping_add(1), Ordering::Relaxed);
        self.set_state(TaskState::Running);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("core", &self.core)
            .field("stack_bytes", &self.stack_bytes)
            .field("state", &self.state())
            .field("wakeups", &self.wakeups())
            .finish()
    }
}
