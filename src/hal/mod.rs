//! Hardware Abstraction Layer for the BCM283x / BCM2711 GPIO block
//!
//! Provides:
//! - register layout and the [`RegisterBlock`] access seam
//! - the `/dev/mem` register mapping
//! - the GPIO pin driver
//! - blocking delays

pub mod delay;
pub mod gpio;
#[cfg(unix)]
pub mod mmap;
pub mod regs;
#[cfg(test)]
pub mod sim;

pub use delay::{Delay, StdDelay};
pub use gpio::{Gpio, Pin, PinMode};
#[cfg(unix)]
pub use mmap::MappedRegisterBlock;
pub use regs::RegisterBlock;
