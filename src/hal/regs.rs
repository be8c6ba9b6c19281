//! BCM283x / BCM2711 GPIO register layout
//!
//! All word-offset arithmetic for the GPIO block lives here. Callers name a
//! register and a pin; this module turns that into a word index and a bit
//! position inside the mapped window.
//!
//! | Word | Register | Access                              |
//! |------|----------|-------------------------------------|
//! | 0-5  | GPFSELn  | read-modify-write, 10 pins per word |
//! | 7-8  | GPSETn   | write-1-to-set                      |
//! | 10-11| GPCLRn   | write-1-to-clear                    |
//! | 13-14| GPLEVn   | read-only                           |

/// Size of the mapped register window
pub const BLOCK_SIZE: usize = 4 * 1024;

/// Number of 32-bit words in the window
pub const BLOCK_WORDS: usize = BLOCK_SIZE / 4;

/// Offset of the GPIO block from the SoC peripheral base
pub const GPIO_OFFSET: u64 = 0x20_0000;

/// Number of GPIO lines on the controller
pub const PIN_COUNT: u8 = 54;

/// Register word offsets from the mapped base
pub mod word {
    /// Function Select 0 (pins 0-9), FSEL1..FSEL5 follow
    pub const GPFSEL0: usize = 0;
    /// Pin Output Set 0 (pins 0-31), bank 1 at +1
    pub const GPSET0: usize = 7;
    /// Pin Output Clear 0 (pins 0-31), bank 1 at +1
    pub const GPCLR0: usize = 10;
    /// Pin Level 0 (pins 0-31), bank 1 at +1
    pub const GPLEV0: usize = 13;
}

/// Function select codes
pub mod func {
    pub const INPUT: u32 = 0b000;
    pub const OUTPUT: u32 = 0b001;
    /// Width mask of one pin's function field
    pub const MASK: u32 = 0b111;
}

const PINS_PER_FSEL: u8 = 10;
const FSEL_BITS: u32 = 3;
const PINS_PER_BANK: u8 = 32;

/// Function-select word and field shift for a pin
pub const fn fsel_location(pin: u8) -> (usize, u32) {
    (
        word::GPFSEL0 + (pin / PINS_PER_FSEL) as usize,
        (pin % PINS_PER_FSEL) as u32 * FSEL_BITS,
    )
}

/// Word and bit mask of a pin inside a banked SET/CLR/LEV register
pub const fn bank_location(bank0: usize, pin: u8) -> (usize, u32) {
    (
        bank0 + (pin / PINS_PER_BANK) as usize,
        1 << (pin % PINS_PER_BANK),
    )
}

/// A 32-bit register file the pin driver can load from and store to.
///
/// Implemented by the real `/dev/mem` mapping and by the simulated block used
/// in tests. Accesses take `&self`; SET/CLR stores to different pins never
/// race on this controller.
pub trait RegisterBlock: Send + Sync {
    /// Load one word
    fn read(&self, word: usize) -> u32;

    /// Store one word
    fn write(&self, word: usize, value: u32);
}
