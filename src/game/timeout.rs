//! Per-digit input timeout
//!
//! Each guess digit gets a fresh [`InputTimeout`]. A helper thread waits on a
//! condvar for the configured time and marks the token expired unless the
//! input loop cancels it first. The input loop always cancels and joins the
//! helper before the next digit starts, so two timers are never live at once
//! and a late expiry can never leak into the following digit.

use log::debug;
use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeoutState {
    Pending,
    Expired,
    Cancelled,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<TimeoutState>,
    wake: Condvar,
}

impl Shared {
    fn state(&self) -> TimeoutState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Running timeout for one digit of input
#[derive(Debug)]
pub struct InputTimeout {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl InputTimeout {
    /// Spawn the timer thread
    pub fn start(after: Duration) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(TimeoutState::Pending),
            wake: Condvar::new(),
        });

        let timer = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("input-timeout".into())
            .spawn(move || {
                let guard = timer.state.lock().unwrap_or_else(PoisonError::into_inner);
                let (mut state, _) = timer
                    .wake
                    .wait_timeout_while(guard, after, |s| *s == TimeoutState::Pending)
                    .unwrap_or_else(PoisonError::into_inner);
                if *state == TimeoutState::Pending {
                    *state = TimeoutState::Expired;
                    debug!("Input timed out after {:?}", after);
                }
            })?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// True once the timer has fired
    pub fn expired(&self) -> bool {
        self.shared.state() == TimeoutState::Expired
    }

    /// Cancel the timer (if still pending) and join its thread
    ///
    /// Returns whether the timer had already expired.
    pub fn finish(mut self) -> bool {
        self.cancel_and_join()
    }

    fn cancel_and_join(&mut self) -> bool {
        let expired = {
            let mut state = self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == TimeoutState::Pending {
                *state = TimeoutState::Cancelled;
            }
            *state == TimeoutState::Expired
        };
        self.shared.wake.notify_all();

        if let Some(handle) = self.handle.take() {
            // The timer body cannot panic past the poisoning recovery
            let _ = handle.join();
        }
        expired
    }
}

impl Drop for InputTimeout {
    fn drop(&mut self) {
        self.cancel_and_join();
    }
}
