use std::fmt;
use std::sync::{Condvar, Mutex};

use crate::lock::{lock_or_recover, wait_or_recover};

/// Work the dispatcher performs against the tuner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    /// Tune the chip to the staged frequency.
    CommitTune,
    /// Apply the current audio on/off state.
    CommitAudio,
}

impl fmt::Display for PendingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommitTune => write!(f, "tune"),
            Self::CommitAudio => write!(f, "audio"),
        }
    }
}

/// Single-slot handoff between producer threads and one consumer.
///
/// Posting while a value is still unconsumed replaces it (last write wins).
/// The consumer blocks in [`Mailbox::take`] until the slot is filled.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
    filled: Condvar,
    name: &'static str,
}

pub type CommandMailbox = Mailbox<PendingCommand>;

impl<T> Mailbox<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            slot: Mutex::new(None),
            filled: Condvar::new(),
            name,
        }
    }

    /// Fill the slot and wake the consumer. Returns any value it replaced.
    pub fn post(&self, value: T) -> Option<T> {
        let replaced = lock_or_recover(&self.slot, self.name).replace(value);
        self.filled.notify_one();
        replaced
    }

    /// Block until the slot is filled, then empty it.
    pub fn take(&self) -> T {
        let mut guard = lock_or_recover(&self.slot, self.name);
        loop {
            if let Some(value) = guard.take() {
                return value;
            }
            guard = wait_or_recover(&self.filled, guard, self.name);
        }
    }

    /// Empty the slot without blocking.
    pub fn try_take(&self) -> Option<T> {
        lock_or_recover(&self.slot, self.name).take()
    }

    pub fn is_pending(&self) -> bool {
        lock_or_recover(&self.slot, self.name).is_some()
    }
}
