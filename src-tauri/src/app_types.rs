use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, TryLockError,
    },
};

use crate::{
    error::ShellResult,
    lifecycle::{ApplicationShell, ShellEvent, WindowPlatform},
};

/// Managed state wrapping the shell with a pending-event queue.
///
/// Platform callbacks may fire while an event is being handled on the same
/// thread (window creation reports the new window synchronously). Those events
/// are queued and drained by the current lock holder instead of re-locking.
pub(crate) struct ShellState<P> {
    shell: Mutex<ApplicationShell<P>>,
    pending: Mutex<VecDeque<(u64, ShellEvent)>>,
    next_ticket: AtomicU64,
    log: fn(&str),
}

impl<P: WindowPlatform> ShellState<P> {
    pub(crate) fn new(shell: ApplicationShell<P>, log: fn(&str)) -> Self {
        Self {
            shell: Mutex::new(shell),
            pending: Mutex::new(VecDeque::new()),
            next_ticket: AtomicU64::new(0),
            log,
        }
    }

    fn pending_queue(&self) -> MutexGuard<'_, VecDeque<(u64, ShellEvent)>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn pop_pending(&self) -> Option<(u64, ShellEvent)> {
        self.pending_queue().pop_front()
    }

    /// Returns the outcome of `event` when this call handles it. Failures of
    /// events queued by other callers are logged by whoever drains them, and a
    /// call that only queues its event returns `Ok`.
    pub(crate) fn dispatch(&self, event: ShellEvent) -> ShellResult<()> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.pending_queue().push_back((ticket, event));

        let mut own_result = Ok(());
        loop {
            let mut shell = match self.shell.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::WouldBlock) => break,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            };

            while let Some((queued_ticket, event)) = self.pop_pending() {
                let result = shell.dispatch(event.clone());
                if queued_ticket == ticket {
                    own_result = result;
                } else if let Err(error) = result {
                    (self.log)(&format!("shell event {event:?} failed: {error}"));
                }
            }
            drop(shell);

            if self.pending_queue().is_empty() {
                break;
            }
        }

        own_result
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.shell
            .lock()
            .map(|shell| shell.is_quitting())
            .unwrap_or(true)
    }

    #[cfg(test)]
    pub(crate) fn with_shell<T>(&self, f: impl FnOnce(&ApplicationShell<P>) -> T) -> T {
        let shell = self
            .shell
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&shell)
    }
}
