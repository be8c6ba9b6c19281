//! Debounced button wait
//!
//! The rig has no interrupt or edge-notification path available to a
//! userspace process, so presses are detected by sampling the level
//! register at a fixed interval.

use crate::hal::{Delay, Pin, RegisterBlock};

use super::{Rig, BUTTON};

impl<R: RegisterBlock, D: Delay> Rig<R, D> {
    /// Block until the rig's button is pressed and released
    pub fn wait_for_button_press(&self) {
        self.wait_for_press(BUTTON);
    }

    /// Block until `pin` goes high, then low, then settle.
    ///
    /// All three phases are needed: returning on the rising edge alone lets
    /// a single held press count again on the next call.
    pub fn wait_for_press(&self, pin: Pin) {
        let poll = self.timing().poll_interval();

        while !self.read_pin(pin) {
            self.pause(poll);
        }

        self.wait_for_release(pin);
    }

    /// Block until `pin` reads low, then hold the debounce settle time
    pub fn wait_for_release(&self, pin: Pin) {
        let poll = self.timing().poll_interval();

        while self.read_pin(pin) {
            self.pause(poll);
        }

        self.pause(self.timing().debounce());
    }
}
