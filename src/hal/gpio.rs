//! BCM283x GPIO pin driver
//!
//! Function-select, set/clear and level-read over any [`RegisterBlock`].
//!
//! SET and CLR are write-1-to-set/clear registers: a store touches only the
//! bits written as 1, so concurrent `write` calls on *different* pins never
//! need a lock. Function select is a read-modify-write; concurrent
//! `set_mode` calls on pins sharing an FSEL word, or a `set_mode` racing a
//! `write` on the same pin, must be serialized by the caller.

use log::debug;
use std::fmt;

use super::regs::{self, func, word, RegisterBlock, PIN_COUNT};

/// A validated GPIO line number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Validate a line number, `None` if the controller has no such pin
    pub const fn new(number: u8) -> Option<Self> {
        if number < PIN_COUNT {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Pin known at compile time; out-of-range numbers fail const evaluation
    pub const fn fixed(number: u8) -> Self {
        assert!(number < PIN_COUNT, "GPIO line out of range");
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// GPIO driver over a register block
pub struct Gpio<R: RegisterBlock> {
    regs: R,
}

impl<R: RegisterBlock> Gpio<R> {
    /// Create a new GPIO driver instance
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Underlying register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Give back the register block
    pub fn into_registers(self) -> R {
        self.regs
    }

    /// Configure a pin's function.
    ///
    /// The field is always stored as input (`000`) first and only then
    /// raised to output (`001`), so the pin never holds an alternate
    /// function code in between.
    pub fn set_mode(&self, pin: Pin, mode: PinMode) {
        let (fsel, shift) = regs::fsel_location(pin.number());

        let cleared = self.regs.read(fsel) & !(func::MASK << shift);
        self.regs.write(fsel, cleared);

        if mode == PinMode::Output {
            let current = self.regs.read(fsel);
            self.regs.write(fsel, current | (func::OUTPUT << shift));
        }

        debug!("{} configured as {:?}", pin, mode);
    }

    /// Current 3-bit function code of a pin
    pub fn function(&self, pin: Pin) -> u32 {
        let (fsel, shift) = regs::fsel_location(pin.number());
        (self.regs.read(fsel) >> shift) & func::MASK
    }

    /// Drive a pin high or low
    pub fn write(&self, pin: Pin, high: bool) {
        let bank0 = if high { word::GPSET0 } else { word::GPCLR0 };
        let (reg, mask) = regs::bank_location(bank0, pin.number());
        self.regs.write(reg, mask);
    }

    /// Set a pin high
    #[inline]
    pub fn set_high(&self, pin: Pin) {
        self.write(pin, true);
    }

    /// Set a pin low
    #[inline]
    pub fn set_low(&self, pin: Pin) {
        self.write(pin, false);
    }

    /// Read a pin's level
    pub fn read(&self, pin: Pin) -> bool {
        let (reg, mask) = regs::bank_location(word::GPLEV0, pin.number());
        self.regs.read(reg) & mask != 0
    }
}
