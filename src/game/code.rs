//! Color sequences
//!
//! Secrets and guesses are both a [`Code`]: a fixed-length sequence of
//! color values in `1..=colors`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(Vec<u8>);

impl Code {
    pub fn new(digits: Vec<u8>) -> Self {
        Self(digits)
    }

    /// Parse `length` digits from `text`, never failing
    ///
    /// A character that is not a digit in `1..=colors` becomes 1, as does
    /// every position past the end of `text`.
    pub fn parse_lenient(text: &str, length: usize, colors: u8) -> Self {
        Self::parse_with(text, length, colors, |_| 1)
    }

    /// Like [`Code::parse_lenient`], with `fill(position)` supplying the
    /// positions past the end of `text`
    pub fn parse_with<F>(text: &str, length: usize, colors: u8, mut fill: F) -> Self
    where
        F: FnMut(usize) -> u8,
    {
        let mut chars = text.chars();
        let digits = (0..length)
            .map(|i| match chars.next() {
                Some(c) => match c.to_digit(10) {
                    Some(d) if (1..=u32::from(colors)).contains(&d) => d as u8,
                    _ => 1,
                },
                None => fill(i),
            })
            .collect();
        Self(digits)
    }

    pub fn digits(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}
