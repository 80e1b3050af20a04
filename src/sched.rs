use std::fmt;
use std::io;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::error::{RadioError, Result};

/// A `SCHED_FIFO` priority in 1..=99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RealtimePriority(i32);

impl RealtimePriority {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 99;

    pub fn new(priority: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&priority) {
            Ok(Self(priority))
        } else {
            Err(RadioError::InvalidConfig(format!(
                "real-time priority {priority} outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Switch the calling thread to `SCHED_FIFO` at this priority.
    #[cfg(unix)]
    pub fn apply(self) -> io::Result<()> {
        use thread_priority::{
            RealtimeThreadSchedulePolicy, ThreadPriority, ThreadPriorityValue,
            ThreadSchedulePolicy, set_thread_priority_and_policy, thread_native_id,
        };

        let value = u8::try_from(self.0)
            .ok()
            .and_then(|p| ThreadPriorityValue::try_from(p).ok())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("priority {} unsupported", self.0))
            })?;
        set_thread_priority_and_policy(
            thread_native_id(),
            ThreadPriority::Crossplatform(value),
            ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo),
        )
        .map_err(|e| io::Error::other(format!("{e:?}")))
    }

    #[cfg(not(unix))]
    pub fn apply(self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "real-time scheduling not supported on this platform",
        ))
    }
}

impl fmt::Display for RealtimePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SCHED_FIFO/{}", self.0)
    }
}

/// Spawn a named thread that raises itself to `priority` before running `body`.
///
/// Lacking the privilege for real-time scheduling is not fatal: the thread
/// logs a warning and runs under the default policy.
pub fn spawn<F>(name: &str, priority: RealtimePriority, body: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let thread_name = name.to_string();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            match priority.apply() {
                Ok(()) => debug!("{thread_name} thread running at {priority}"),
                Err(e) => warn!("{thread_name} thread could not set {priority}: {e}"),
            }
            body();
        })
        .map_err(|source| RadioError::Spawn {
            name: name.to_string(),
            source,
        })
}
