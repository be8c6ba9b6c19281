//! Rig wiring
//!
//! | GPIO | Function           | Direction |
//! |------|--------------------|-----------|
//! | 26   | Green LED (data)   | Output    |
//! | 5    | Red LED (control)  | Output    |
//! | 19   | Push-button        | Input     |
//! | 25   | LCD RS             | Output    |
//! | 24   | LCD EN             | Output    |
//! | 23   | LCD D4             | Output    |
//! | 10   | LCD D5             | Output    |
//! | 27   | LCD D6             | Output    |
//! | 22   | LCD D7             | Output    |

use crate::hal::Pin;

pub const GREEN_LED: Pin = Pin::fixed(26);
pub const RED_LED: Pin = Pin::fixed(5);
pub const BUTTON: Pin = Pin::fixed(19);

pub const LCD_RS: Pin = Pin::fixed(25);
pub const LCD_EN: Pin = Pin::fixed(24);
pub const LCD_D4: Pin = Pin::fixed(23);
pub const LCD_D5: Pin = Pin::fixed(10);
pub const LCD_D6: Pin = Pin::fixed(27);
pub const LCD_D7: Pin = Pin::fixed(22);

/// Control and data lines of a 4-bit HD44780 bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdPins {
    pub rs: Pin,
    pub en: Pin,
    /// D4..D7, least significant nibble bit first
    pub data: [Pin; 4],
}

impl LcdPins {
    /// The rig's LCD wiring
    pub const RIG: LcdPins = LcdPins {
        rs: LCD_RS,
        en: LCD_EN,
        data: [LCD_D4, LCD_D5, LCD_D6, LCD_D7],
    };

    pub fn all(&self) -> [Pin; 6] {
        [self.rs, self.en, self.data[0], self.data[1], self.data[2], self.data[3]]
    }
}

impl Default for LcdPins {
    fn default() -> Self {
        Self::RIG
    }
}
