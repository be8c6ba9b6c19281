//! Simulated GPIO register block for tests
//!
//! Behaves like the real controller where the driver can observe it: SET and
//! CLR stores update the level register, FSEL words hold whatever is stored.
//! Button input is scripted by queueing level samples. Every access and every
//! delay lands on one shared [`Trace`] so tests can check ordering.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::delay::Delay;
use super::gpio::Pin;
use super::regs::{word, RegisterBlock, BLOCK_WORDS};

/// One observable event on the simulated bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read { word: usize, value: u32 },
    Write { word: usize, value: u32 },
    Delay(Duration),
}

/// Shared, ordered log of bus accesses and delays
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<Access>>>);

impl Trace {
    fn push(&self, access: Access) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(access);
    }

    pub fn snapshot(&self) -> Vec<Access> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

pub struct SimRegisters {
    words: Mutex<Vec<u32>>,
    /// Scripted GPLEV0 samples; the last one sticks
    levels: Mutex<VecDeque<u32>>,
    trace: Trace,
}

impl SimRegisters {
    pub fn new() -> Self {
        Self::with_trace(Trace::default())
    }

    pub fn with_trace(trace: Trace) -> Self {
        Self {
            words: Mutex::new(vec![0; BLOCK_WORDS]),
            levels: Mutex::new(VecDeque::new()),
            trace,
        }
    }

    pub fn trace(&self) -> Trace {
        self.trace.clone()
    }

    /// Set a word without logging it
    pub fn preset(&self, word: usize, value: u32) {
        self.words.lock().unwrap_or_else(PoisonError::into_inner)[word] = value;
    }

    /// Read a word without logging it
    pub fn peek(&self, word: usize) -> u32 {
        self.words.lock().unwrap_or_else(PoisonError::into_inner)[word]
    }

    /// Queue GPLEV0 samples returned by successive reads
    pub fn script_levels<I: IntoIterator<Item = u32>>(&self, samples: I) {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(samples);
    }

    /// Queue button samples: `true` is the pin pressed (high)
    pub fn script_pin(&self, pin: Pin, samples: &[bool]) {
        let bit = 1u32 << pin.number();
        self.script_levels(samples.iter().map(|&high| if high { bit } else { 0 }));
    }

    fn scripted_level(&self) -> Option<u32> {
        let mut levels = self.levels.lock().unwrap_or_else(PoisonError::into_inner);
        if levels.len() > 1 {
            levels.pop_front()
        } else {
            levels.front().copied()
        }
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock for SimRegisters {
    fn read(&self, word: usize) -> u32 {
        let scripted = if word == word::GPLEV0 {
            self.scripted_level()
        } else {
            None
        };
        let value = scripted.unwrap_or_else(|| self.peek(word));
        self.trace.push(Access::Read { word, value });
        value
    }

    fn write(&self, word: usize, value: u32) {
        {
            let mut words = self.words.lock().unwrap_or_else(PoisonError::into_inner);
            match word {
                w if (word::GPSET0..word::GPSET0 + 2).contains(&w) => {
                    words[word::GPLEV0 + (w - word::GPSET0)] |= value;
                }
                w if (word::GPCLR0..word::GPCLR0 + 2).contains(&w) => {
                    words[word::GPLEV0 + (w - word::GPCLR0)] &= !value;
                }
                w => words[w] = value,
            }
            // Logged under the register lock so the trace order is the
            // order the stores took effect.
            self.trace.push(Access::Write { word, value });
        }
    }
}

/// Delay that records instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct SimDelay {
    trace: Trace,
}

impl SimDelay {
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

impl Delay for SimDelay {
    fn delay(&self, duration: Duration) {
        self.trace.push(Access::Delay(duration));
    }
}

/// Pin-level view of a trace: SET/CLR stores split into per-pin edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    Level { pin: u8, high: bool },
    Delay(Duration),
}

pub fn pin_events(accesses: &[Access]) -> Vec<PinEvent> {
    let mut events = Vec::new();
    for access in accesses {
        match *access {
            Access::Write { word: w, value } if w == word::GPSET0 || w == word::GPCLR0 => {
                let high = w == word::GPSET0;
                for bit in 0..32u8 {
                    if value & (1 << bit) != 0 {
                        events.push(PinEvent::Level { pin: bit, high });
                    }
                }
            }
            Access::Delay(d) => events.push(PinEvent::Delay(d)),
            _ => {}
        }
    }
    events
}
