//! Guess scoring
//!
//! `exact` counts positions where guess and secret agree. `approx` counts
//! the remaining color matches: for every color, the smaller of its number
//! of occurrences in secret and guess, summed, minus the exact matches.

use std::fmt;

/// Result of comparing a guess against the secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    /// Right color in the right position
    pub exact: usize,
    /// Right color in the wrong position
    pub approx: usize,
}

impl Score {
    /// True when every one of `length` positions matched exactly
    pub fn is_solved(&self, length: usize) -> bool {
        self.exact == length
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E:{} A:{}", self.exact, self.approx)
    }
}

/// Score `guess` against `secret`
///
/// Positions beyond the shorter of the two sequences are ignored.
pub fn score(secret: &[u8], guess: &[u8]) -> Score {
    let mut secret_counts = [0usize; 256];
    let mut guess_counts = [0usize; 256];
    let mut exact = 0;

    for (&s, &g) in secret.iter().zip(guess) {
        if s == g {
            exact += 1;
        }
        secret_counts[s as usize] += 1;
        guess_counts[g as usize] += 1;
    }

    let common: usize = secret_counts
        .iter()
        .zip(&guess_counts)
        .map(|(&s, &g)| s.min(g))
        .sum();

    Score {
        exact,
        approx: common - exact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_swapped_pair() {
        assert_eq!(score(&[1, 2, 3], &[1, 3, 2]), Score { exact: 1, approx: 2 });
    }

    #[test]
    fn test_known_cases() {
        let cases: &[(&[u8], &[u8], usize, usize)] = &[
            (&[1, 2, 3], &[1, 2, 3], 3, 0),
            (&[1, 1, 1], &[2, 2, 2], 0, 0),
            (&[1, 1, 2], &[2, 1, 1], 1, 2),
            (&[3, 3, 1], &[3, 1, 1], 2, 0),
            (&[1, 2, 2], &[2, 3, 3], 0, 1),
        ];

        for &(secret, guess, exact, approx) in cases {
            assert_eq!(
                score(secret, guess),
                Score { exact, approx },
                "{:?} vs {:?}",
                secret,
                guess
            );
        }
    }

    #[test]
    fn test_repeated_guess_color_counts_once_per_secret_occurrence() {
        // Secret has a single 2, so three 2s in the guess can only match once
        assert_eq!(score(&[2, 1, 1], &[3, 2, 2]), Score { exact: 0, approx: 1 });
    }

    #[test]
    fn test_solved() {
        assert!(score(&[2, 3, 1], &[2, 3, 1]).is_solved(3));
        assert!(!score(&[2, 3, 1], &[2, 1, 3]).is_solved(3));
    }

    fn code(len: usize) -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(1u8..=9, len)
    }

    proptest! {
        #[test]
        fn prop_matches_never_exceed_length((secret, guess) in (1usize..8).prop_flat_map(|n| (code(n), code(n)))) {
            let s = score(&secret, &guess);
            prop_assert!(s.exact + s.approx <= secret.len());
        }

        #[test]
        fn prop_self_score_is_all_exact(secret in (1usize..8).prop_flat_map(code)) {
            prop_assert_eq!(score(&secret, &secret), Score { exact: secret.len(), approx: 0 });
        }

        #[test]
        fn prop_symmetric((secret, guess) in (1usize..8).prop_flat_map(|n| (code(n), code(n)))) {
            prop_assert_eq!(score(&secret, &guess), score(&guess, &secret));
        }

        #[test]
        fn prop_reversed_guess_keeps_total_matches(secret in (1usize..8).prop_flat_map(code)) {
            let reversed: Vec<u8> = secret.iter().rev().copied().collect();
            let s = score(&secret, &reversed);
            prop_assert_eq!(s.exact + s.approx, secret.len());
        }
    }
}
