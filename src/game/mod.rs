//! MasterMind on the rig
//!
//! The secret is a short sequence of colors (digits `1..=colors`). Each
//! round the player enters a guess one digit at a time by pressing the
//! button that many times, and gets back the number of exact and
//! approximate matches.

pub mod code;
pub mod scoring;
pub mod secret;
pub mod session;
pub mod timeout;

pub use code::Code;
pub use scoring::{score, Score};
pub use secret::{generate_secret, Xorshift32};
pub use session::{report_unit_test, Outcome, Session, SessionOptions};
pub use timeout::InputTimeout;
