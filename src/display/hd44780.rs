//! HD44780 LCD controller on a 4-bit parallel bus
//!
//! Write-only driver: the R/W line is tied low on the rig, so the controller
//! is never polled for its busy flag. Every transfer is followed by the
//! datasheet's worst-case execution time instead. Cutting those waits short
//! garbles everything written afterwards.
//!
//! Bus protocol:
//! - nibble: drive D4..D7, raise EN for >=1 µs, drop EN for >=1 µs
//! - byte: set RS (0 = command, 1 = data), high nibble, low nibble,
//!   then >=100 µs (>=2 ms after clear/home)

use log::{debug, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::hal::{Delay, PinMode, RegisterBlock};
use crate::error::InitError;
use crate::io::{LcdPins, Rig, BUTTON, GREEN_LED, RED_LED};

/// HD44780 commands
#[allow(dead_code)]
mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    // ENTRY_MODE_SET flags
    pub const ENTRY_INCREMENT: u8 = 0x02;
    pub const ENTRY_SHIFT: u8 = 0x01;

    // DISPLAY_CONTROL flags
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    // FUNCTION_SET flags
    pub const EIGHT_BIT: u8 = 0x10;
    pub const TWO_LINES: u8 = 0x08;
    pub const FONT_5X10: u8 = 0x04;

    /// Wake-up nibble forcing 8-bit mode from any prior state
    pub const WAKE_NIBBLE: u8 = 0x3;
    /// Nibble committing the bus to 4-bit width
    pub const FOUR_BIT_NIBBLE: u8 = 0x2;
}

/// Datasheet minimums (with the rig's margins)
mod timing {
    use std::time::Duration;

    pub const POWER_ON: Duration = Duration::from_millis(50);
    pub const WAKE_FIRST: Duration = Duration::from_millis(5);
    pub const WAKE_NEXT: Duration = Duration::from_micros(100);
    pub const ENABLE_PULSE: Duration = Duration::from_micros(1);
    pub const EXECUTE: Duration = Duration::from_micros(100);
    pub const CLEAR: Duration = Duration::from_millis(2);
}

/// Visible lines
pub const ROWS: u8 = 2;
/// DDRAM columns per line (16 of them visible on the rig's module)
pub const COLUMNS: u8 = 40;
/// DDRAM address of each line's first column
pub const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Function set sent after 4-bit negotiation: 4-bit bus, 2 lines, 5x8 font
pub const FUNCTION_SET_4BIT_2LINE: u8 = cmd::FUNCTION_SET | cmd::TWO_LINES;
/// Display on, cursor off, blink off
pub const DISPLAY_ON_CURSOR_OFF: u8 = cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON;
/// Increment address, no display shift
pub const ENTRY_INCREMENT_NO_SHIFT: u8 = cmd::ENTRY_MODE_SET | cmd::ENTRY_INCREMENT;

/// RS line meaning for one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterSelect {
    Command,
    Data,
}

/// Controller state as implied by the commands sent so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdState {
    Uninitialized,
    FourBitModeNegotiating,
    Ready,
}

/// HD44780 character display on the rig
///
/// All public operations hold the bus lock for their entire duration, so
/// callers on different threads never interleave nibbles.
pub struct Lcd<'r, R: RegisterBlock, D: Delay> {
    rig: &'r Rig<R, D>,
    pins: LcdPins,
    bus: Mutex<LcdState>,
}

impl<'r, R: RegisterBlock, D: Delay> Lcd<'r, R, D> {
    /// Create a new driver; nothing is sent until [`Lcd::init`]
    ///
    /// Fails if two LCD lines share a pin or an LCD line collides with the
    /// rig's LEDs or button.
    pub fn new(rig: &'r Rig<R, D>, pins: LcdPins) -> Result<Self, InitError> {
        let mut claimed = vec![GREEN_LED, RED_LED, BUTTON];
        for pin in pins.all() {
            if claimed.contains(&pin) {
                return Err(InitError::LcdWiring { pin });
            }
            claimed.push(pin);
        }

        Ok(Self {
            rig,
            pins,
            bus: Mutex::new(LcdState::Uninitialized),
        })
    }

    pub fn state(&self) -> LcdState {
        *self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cold-start the controller into 4-bit, 2-line mode and clear it.
    ///
    /// Three 0x3 nibbles force 8-bit mode whatever state the controller woke
    /// in (including half-way through a 4-bit byte), then 0x2 switches to
    /// 4-bit. Only after that are two-nibble bytes understood.
    pub fn init(&self) {
        let mut bus = self.begin();

        for pin in self.pins.all() {
            self.rig.set_pin_mode(pin, PinMode::Output);
        }

        *bus.state = LcdState::FourBitModeNegotiating;
        debug!("LCD: negotiating 4-bit mode");

        bus.wait(timing::POWER_ON);
        bus.select(RegisterSelect::Command);
        bus.nibble(cmd::WAKE_NIBBLE);
        bus.wait(timing::WAKE_FIRST);
        bus.nibble(cmd::WAKE_NIBBLE);
        bus.wait(timing::WAKE_NEXT);
        bus.nibble(cmd::WAKE_NIBBLE);
        bus.wait(timing::WAKE_NEXT);
        bus.nibble(cmd::FOUR_BIT_NIBBLE);
        bus.wait(timing::WAKE_NEXT);

        bus.byte(FUNCTION_SET_4BIT_2LINE, RegisterSelect::Command);
        bus.byte(DISPLAY_ON_CURSOR_OFF, RegisterSelect::Command);
        bus.byte(ENTRY_INCREMENT_NO_SHIFT, RegisterSelect::Command);
        bus.clear();

        *bus.state = LcdState::Ready;
        debug!("LCD: ready");
    }

    /// Send one raw byte
    pub fn write_byte(&self, byte: u8, rs: RegisterSelect) {
        if let Some(mut bus) = self.begin_ready("write_byte") {
            bus.byte(byte, rs);
        }
    }

    /// Send one command byte
    pub fn command(&self, byte: u8) {
        self.write_byte(byte, RegisterSelect::Command);
    }

    /// Clear the display and home the cursor
    pub fn clear(&self) {
        if let Some(mut bus) = self.begin_ready("clear") {
            bus.clear();
        }
    }

    /// Write characters at the cursor
    pub fn write_string(&self, text: &str) {
        if let Some(mut bus) = self.begin_ready("write_string") {
            bus.text(text);
        }
    }

    /// Move the cursor to `row`, `col`
    pub fn set_cursor(&self, row: u8, col: u8) {
        if let Some(mut bus) = self.begin_ready("set_cursor") {
            bus.cursor(row, col);
        }
    }

    /// Write `text` from the start of `line`
    pub fn write_line(&self, text: &str, line: u8) {
        if let Some(mut bus) = self.begin_ready("write_line") {
            bus.cursor(line, 0);
            bus.text(text);
        }
    }

    /// Replace the whole screen in one locked sequence
    pub fn write_lines(&self, top: &str, bottom: &str) {
        if let Some(mut bus) = self.begin_ready("write_lines") {
            bus.clear();
            bus.cursor(0, 0);
            bus.text(top);
            bus.cursor(1, 0);
            bus.text(bottom);
        }
    }

    fn begin(&self) -> Bus<'_, 'r, R, D> {
        Bus {
            lcd: self,
            state: self.bus.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn begin_ready(&self, op: &str) -> Option<Bus<'_, 'r, R, D>> {
        let bus = self.begin();
        if *bus.state != LcdState::Ready {
            warn!("LCD {} ignored: controller is {:?}", op, *bus.state);
            return None;
        }
        Some(bus)
    }
}

/// Exclusive hold on the LCD bus for one logical operation
struct Bus<'l, 'r, R: RegisterBlock, D: Delay> {
    lcd: &'l Lcd<'r, R, D>,
    state: MutexGuard<'l, LcdState>,
}

impl<R: RegisterBlock, D: Delay> Bus<'_, '_, R, D> {
    fn wait(&self, duration: Duration) {
        self.lcd.rig.pause(duration);
    }

    fn select(&self, rs: RegisterSelect) {
        self.lcd.rig.write_pin(self.lcd.pins.rs, rs == RegisterSelect::Data);
    }

    fn nibble(&self, nibble: u8) {
        let pins = &self.lcd.pins;
        for (bit, pin) in pins.data.iter().enumerate() {
            self.lcd.rig.write_pin(*pin, (nibble >> bit) & 0x01 != 0);
        }

        self.lcd.rig.write_pin(pins.en, true);
        self.wait(timing::ENABLE_PULSE);
        self.lcd.rig.write_pin(pins.en, false);
        self.wait(timing::ENABLE_PULSE);
    }

    fn byte(&mut self, byte: u8, rs: RegisterSelect) {
        self.select(rs);
        self.nibble(byte >> 4);
        self.nibble(byte & 0x0F);
        self.wait(timing::EXECUTE);
    }

    fn clear(&mut self) {
        self.byte(cmd::CLEAR_DISPLAY, RegisterSelect::Command);
        self.wait(timing::CLEAR);
    }

    fn cursor(&mut self, row: u8, col: u8) {
        let (row, col) = clamp_position(row, col);
        self.byte(cursor_command(row, col), RegisterSelect::Command);
    }

    fn text(&mut self, text: &str) {
        for c in text.chars() {
            self.byte(char_code(c), RegisterSelect::Data);
        }
    }
}

fn clamp_position(row: u8, col: u8) -> (u8, u8) {
    let clamped = (row.min(ROWS - 1), col.min(COLUMNS - 1));
    if clamped != (row, col) {
        warn!(
            "LCD cursor ({}, {}) out of range, using ({}, {})",
            row, col, clamped.0, clamped.1
        );
    }
    clamped
}

/// DDRAM address command for an in-range position
pub fn cursor_command(row: u8, col: u8) -> u8 {
    cmd::SET_DDRAM_ADDR | (ROW_OFFSETS[row as usize] + col)
}

/// Character ROM code; the A00 ROM matches ASCII in the printable range
fn char_code(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        c as u8
    } else {
        b'?'
    }
}
