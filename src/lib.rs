//! MasterMind on a Raspberry Pi GPIO rig
//!
//! Drives two LEDs, a push-button and a 16x2 HD44780 LCD straight from the
//! SoC's GPIO register block, mapped into the process through `/dev/mem`,
//! and runs a MasterMind game on top.
//!
//! # Architecture
//!
//! ```text
//!         Game session
//!              │
//!      ┌───────┴────────┐
//!      ▼                ▼
//! ┌──────────┐   ┌─────────────┐
//! │   Rig    │◄──│ LCD (4-bit) │
//! │ LEDs/btn │   │  HD44780    │
//! └────┬─────┘   └─────────────┘
//!      ▼
//! ┌──────────────┐
//! │ GPIO driver  │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │ /dev/mem map │
//! └──────────────┘
//! ```
//!
//! Everything above the register block is generic over
//! [`hal::RegisterBlock`] and [`hal::Delay`], so the whole stack runs against
//! a simulated block in tests.

pub mod boards;
pub mod config;
pub mod display;
pub mod error;
pub mod game;
pub mod hal;
pub mod io;

pub use config::Config;
pub use error::{ConfigError, InitError};
