//! Character display driver
//!
//! The rig carries a 16x2 HD44780-compatible LCD wired for 4-bit transfers.

pub mod hd44780;

pub use hd44780::{cursor_command, Lcd, LcdState, RegisterSelect};
