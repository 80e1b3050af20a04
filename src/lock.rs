use std::sync::{Condvar, Mutex, MutexGuard};

use log::warn;

/// Lock `lock`, recovering the guard if a previous holder panicked.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("mutex poisoned in {context}; recovering");
            poisoned.into_inner()
        }
    }
}

/// Wait on `cond`, recovering from poisoning like [`lock_or_recover`].
pub(crate) fn wait_or_recover<'a, T>(
    cond: &Condvar,
    guard: MutexGuard<'a, T>,
    context: &str,
) -> MutexGuard<'a, T> {
    match cond.wait(guard) {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("mutex poisoned while waiting in {context}; recovering");
            poisoned.into_inner()
        }
    }
}
