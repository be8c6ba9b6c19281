//! Digital I/O façade over the pin driver
//!
//! [`Rig`] is the context object for the whole peripheral rig: it owns the
//! GPIO driver (and with it the register mapping), the delay source and the
//! timing configuration, and is passed by reference to everything that
//! touches hardware.
//!
//! Dropping the rig drives both LEDs low before the register block itself is
//! released, on every exit path.

pub mod blink;
pub mod button;
pub mod pins;

use log::debug;
use std::time::Duration;

use crate::config::TimingConfig;
use crate::hal::{Delay, Gpio, Pin, PinMode, RegisterBlock};

pub use pins::{LcdPins, BUTTON, GREEN_LED, RED_LED};

/// LEDs, button and timing over one GPIO register block
pub struct Rig<R: RegisterBlock, D: Delay> {
    gpio: Gpio<R>,
    delay: D,
    timing: TimingConfig,
}

impl<R: RegisterBlock, D: Delay> Rig<R, D> {
    /// Take ownership of the register block and configure LED and button pins
    pub fn new(regs: R, delay: D, timing: TimingConfig) -> Self {
        let rig = Self {
            gpio: Gpio::new(regs),
            delay,
            timing,
        };

        rig.set_pin_mode(GREEN_LED, PinMode::Output);
        rig.set_pin_mode(RED_LED, PinMode::Output);
        rig.set_pin_mode(BUTTON, PinMode::Input);

        rig
    }

    /// Pin driver
    pub fn gpio(&self) -> &Gpio<R> {
        &self.gpio
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Block the calling thread
    pub fn pause(&self, duration: Duration) {
        self.delay.delay(duration);
    }

    pub fn set_pin_mode(&self, pin: Pin, mode: PinMode) {
        self.gpio.set_mode(pin, mode);
    }

    pub fn write_pin(&self, pin: Pin, high: bool) {
        self.gpio.write(pin, high);
    }

    pub fn read_pin(&self, pin: Pin) -> bool {
        self.gpio.read(pin)
    }

    /// Level of the rig's push-button (high = pressed)
    pub fn read_button(&self) -> bool {
        self.read_pin(BUTTON)
    }

    /// Drive both LEDs to their safe low state
    pub fn leds_off(&self) {
        self.write_pin(GREEN_LED, false);
        self.write_pin(RED_LED, false);
    }

    /// Shut the rig down: LEDs low, then release the register block
    pub fn close(self) {
        // Drop does the work; this names the release point in callers.
        drop(self);
    }
}

impl<R: RegisterBlock, D: Delay> Drop for Rig<R, D> {
    fn drop(&mut self) {
        self.leds_off();
        debug!("Rig shut down, LEDs off");
        // `gpio` (and the register mapping it owns) drops after this
    }
}
