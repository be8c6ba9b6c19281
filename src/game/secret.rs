//! Secret generation

use chrono::Utc;
use log::debug;

use super::code::Code;

/// Small xorshift PRNG; more than enough to pick a 3-color secret
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    pub fn new(seed: u32) -> Self {
        // Zero is a fixed point of the generator
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock
    pub fn from_clock() -> Self {
        let now = Utc::now();
        let seed = (now.timestamp() as u32) ^ now.timestamp_subsec_nanos().rotate_left(16);
        debug!("PRNG seed {:#010x}", seed);
        Self::new(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-ish color in `1..=colors`
    pub fn next_color(&mut self, colors: u8) -> u8 {
        (self.next_u32() % u32::from(colors.max(1))) as u8 + 1
    }
}

/// Build the secret for a new game
///
/// With a predefined secret, each given digit outside `1..=colors` becomes
/// 1 and positions it does not cover are drawn at random.
pub fn generate_secret(
    rng: &mut Xorshift32,
    length: usize,
    colors: u8,
    predefined: Option<&str>,
) -> Code {
    match predefined {
        Some(text) => Code::parse_with(text, length, colors, |_| rng.next_color(colors)),
        None => Code::new((0..length).map(|_| rng.next_color(colors)).collect()),
    }
}
