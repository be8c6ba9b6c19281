//! Blocking delays
//!
//! Every settle time in the crate (button polling, blink periods, LCD timing)
//! goes through [`Delay`], so tests can record the delays instead of sleeping.

use std::thread;
use std::time::Duration;

/// Blocks the calling thread for at least the requested time
pub trait Delay: Send + Sync {
    fn delay(&self, duration: Duration);

    fn delay_ms(&self, ms: u64) {
        self.delay(Duration::from_millis(ms));
    }

    fn delay_us(&self, us: u64) {
        self.delay(Duration::from_micros(us));
    }
}

/// `thread::sleep` backed delay for real hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
