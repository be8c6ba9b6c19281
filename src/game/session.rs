//! MasterMind game session
//!
//! Drives one full game over the rig: welcome screen, surname greeting,
//! guess entry by button presses, scoring feedback on LEDs and LCD, and the
//! win/lose screens. Also hosts the single-shot scoring check used by the
//! `--unit-test` command line mode.
//!
//! LED conventions:
//! - red x1 acknowledges a press, green x`count` echoes the running count
//! - red x2 ends guess entry, red x3 starts the next round
//! - answer: green x`exact`, red x1 separator, green x`approx`

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info};
use std::time::Duration;

use super::code::Code;
use super::scoring::{score, Score};
use super::secret::{generate_secret, Xorshift32};
use super::timeout::InputTimeout;
use crate::config::GameConfig;
use crate::display::Lcd;
use crate::hal::{Delay, RegisterBlock};
use crate::io::{Rig, BUTTON, GREEN_LED, RED_LED};

/// Visible characters per LCD line
const DISPLAY_WIDTH: usize = 16;
/// Letters of the surname used for the greeting blink
const GREETING_LETTERS: usize = 5;

const LETTER_PAUSE: Duration = Duration::from_millis(500);
const GREETING_HOLD: Duration = Duration::from_secs(2);
const REVEAL_HOLD: Duration = Duration::from_secs(2);
const PROCESSING_HOLD: Duration = Duration::from_millis(500);
const ANSWER_HOLD: Duration = Duration::from_secs(2);
const RESULT_HOLD: Duration = Duration::from_secs(5);

/// Command line switches that shape a session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Echo secret, guesses and results on stdout
    pub verbose: bool,
    /// Show the secret on the LCD before the first round
    pub debug: bool,
    /// Fixed secret instead of a random one
    pub secret: Option<String>,
}

/// How a game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Won { attempts: u32 },
    Lost { secret: Code },
}

pub struct Session<'a, R: RegisterBlock, D: Delay> {
    rig: &'a Rig<R, D>,
    lcd: &'a Lcd<'a, R, D>,
    rules: GameConfig,
    options: SessionOptions,
    rng: Xorshift32,
}

impl<'a, R: RegisterBlock, D: Delay> Session<'a, R, D> {
    pub fn new(
        rig: &'a Rig<R, D>,
        lcd: &'a Lcd<'a, R, D>,
        rules: GameConfig,
        options: SessionOptions,
    ) -> Self {
        Self {
            rig,
            lcd,
            rules,
            options,
            rng: Xorshift32::from_clock(),
        }
    }

    /// Replace the clock-seeded generator
    pub fn with_rng(mut self, rng: Xorshift32) -> Self {
        self.rng = rng;
        self
    }

    /// Play one game to completion
    pub fn run(&mut self) -> Result<Outcome> {
        self.lcd.write_lines("MasterMind Game", "Press to start");
        self.rig.wait_for_button_press();

        self.greet();

        let secret = generate_secret(
            &mut self.rng,
            self.rules.code_length,
            self.rules.colors,
            self.options.secret.as_deref(),
        );
        debug!("Secret generated ({} positions)", secret.len());
        if self.options.verbose {
            println!("Secret code: {}", secret);
        }
        if self.options.debug {
            self.lcd
                .write_lines(&format!("Secret: {}", secret), "Game starting...");
            self.rig.pause(REVEAL_HOLD);
        }

        for attempt in 1..=self.rules.max_attempts {
            info!("Round {}/{}", attempt, self.rules.max_attempts);
            self.lcd.write_lines(
                &format!("Attempt {}/{}", attempt, self.rules.max_attempts),
                "Enter your guess",
            );

            let guess = self.read_guess()?;
            self.show_guess(&guess);

            let result = score(secret.digits(), guess.digits());
            self.show_answer(result);

            if result.is_solved(secret.len()) {
                self.show_success(attempt);
                return Ok(Outcome::Won { attempts: attempt });
            }
            self.rig.blink(RED_LED, 3);
        }

        self.show_game_over(&secret);
        Ok(Outcome::Lost { secret })
    }

    /// Score two sequences and show the result, without playing a game
    pub fn run_unit_test(&self, secret: &str, guess: &str) -> Score {
        let result = report_unit_test(&self.rules, secret, guess);

        self.lcd
            .write_lines(&format!("Test: {} vs {}", secret, guess), &result.to_string());
        self.blink_score(result);
        self.rig.pause(RESULT_HOLD);

        result
    }

    /// Blink the first letters of the surname: vowels green, the rest red
    fn greet(&self) {
        self.lcd.write_lines("Welcome to", "MasterMind!");

        for c in self.rules.surname.chars().take(GREETING_LETTERS) {
            let led = if is_vowel(c) { GREEN_LED } else { RED_LED };
            self.rig.blink(led, 1);
            self.rig.pause(LETTER_PAUSE);
        }

        self.rig.pause(GREETING_HOLD);
    }

    fn read_guess(&self) -> Result<Code> {
        let length = self.rules.code_length;
        let mut digits = Vec::with_capacity(length);

        for position in 1..=length {
            digits.push(self.read_digit(position)?);

            if position < length {
                self.rig.wait_for_button_press();
            }
        }

        self.rig.blink(RED_LED, 2);

        let guess = Code::new(digits);
        if self.options.verbose {
            println!("User guess: {}", guess);
        }
        Ok(guess)
    }

    /// Count presses until `colors` is reached or the digit times out
    fn read_digit(&self, position: usize) -> Result<u8> {
        let colors = u32::from(self.rules.colors);
        let poll = self.rig.timing().poll_interval();

        self.lcd
            .write_lines(&format!("Enter digit {}:", position), "Press button");

        let timeout = InputTimeout::start(self.rig.timing().input_timeout())
            .context("Failed to start input timeout thread")?;

        let mut count = 0u32;
        while count < colors && !timeout.expired() {
            if self.rig.read_button() {
                count += 1;
                self.rig.blink(RED_LED, 1);
                self.rig.blink(GREEN_LED, count);
                self.rig.wait_for_release(BUTTON);
                self.lcd
                    .write_line(&pad(&format!("Count: {}", count)), 1);
            }
            self.rig.pause(poll);
        }

        if timeout.finish() {
            debug!("Digit {} timed out after {} presses", position, count);
        }

        let value = count.clamp(1, colors) as u8;
        self.lcd.write_lines(
            &format!("Digit {}: {}", position, value),
            "Press for next",
        );
        Ok(value)
    }

    fn show_guess(&self, guess: &Code) {
        self.lcd
            .write_lines(&format!("Guess: {}", guess), "Processing...");
        self.rig.pause(PROCESSING_HOLD);
    }

    fn show_answer(&self, result: Score) {
        self.blink_score(result);

        self.lcd.write_lines(
            &format!("Exact: {}", result.exact),
            &format!("Approx: {}", result.approx),
        );
        if self.options.verbose {
            println!(
                "Results: Exact matches = {}, Approximate matches = {}",
                result.exact, result.approx
            );
        }

        self.rig.pause(ANSWER_HOLD);
    }

    fn show_success(&self, attempts: u32) {
        self.rig.write_pin(RED_LED, true);
        self.rig.blink(GREEN_LED, 3);
        self.rig.write_pin(RED_LED, false);

        self.lcd
            .write_lines("SUCCESS!", &format!("Attempts: {}", attempts));
        info!("Game won in {} attempts", attempts);
        if self.options.verbose {
            println!("Game won in {} attempts!", attempts);
        }

        self.rig.pause(RESULT_HOLD);
    }

    fn show_game_over(&self, secret: &Code) {
        self.lcd
            .write_lines("GAME OVER", &format!("Secret: {}", secret));
        self.rig.blink(RED_LED, 5);

        info!("Game lost");
        if self.options.verbose {
            println!("Game over! Secret was: {}", secret);
        }

        self.rig.pause(RESULT_HOLD);
    }

    fn blink_score(&self, result: Score) {
        self.rig.blink(GREEN_LED, result.exact as u32);
        self.rig.blink(RED_LED, 1);
        self.rig.blink(GREEN_LED, result.approx as u32);
    }
}

/// Parse two sequences leniently, score them and print the result
pub fn report_unit_test(rules: &GameConfig, secret: &str, guess: &str) -> Score {
    let s = Code::parse_lenient(secret, rules.code_length, rules.colors);
    let g = Code::parse_lenient(guess, rules.code_length, rules.colors);
    let result = score(s.digits(), g.digits());

    println!("{}", "Unit Test Results:".cyan().bold());
    println!("  Secret: {}", s);
    println!("  Guess:  {}", g);
    println!(
        "  Exact matches: {}, Approximate matches: {}",
        result.exact.to_string().green(),
        result.approx.to_string().yellow()
    );

    result
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pad to the display width so shorter text overwrites a longer line
fn pad(text: &str) -> String {
    format!("{:<width$}", text, width = DISPLAY_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::hal::regs::word;
    use crate::hal::sim::{pin_events, PinEvent, SimDelay, SimRegisters};
    use crate::io::testing::{sim_rig, sim_rig_with, SimRig};
    use crate::io::LcdPins;

    fn rules(code_length: usize, max_attempts: u32) -> GameConfig {
        GameConfig {
            code_length,
            colors: 3,
            max_attempts,
            surname: "Smith".to_string(),
        }
    }

    fn ready_lcd(rig: &SimRig) -> Lcd<'_, SimRegisters, SimDelay> {
        let lcd = Lcd::new(rig, LcdPins::RIG).unwrap();
        lcd.init();
        lcd
    }

    fn fixed(secret: &str) -> SessionOptions {
        SessionOptions {
            secret: Some(secret.to_string()),
            ..SessionOptions::default()
        }
    }

    /// Button samples for `presses` presses of one digit
    fn presses(n: usize) -> Vec<bool> {
        [true, false].repeat(n)
    }

    /// Rising edges on `pin`
    fn blinks(events: &[PinEvent], pin: u8) -> usize {
        events
            .iter()
            .filter(|e| **e == PinEvent::Level { pin, high: true })
            .count()
    }

    #[test]
    fn test_first_guess_wins() {
        let (rig, _) = sim_rig();
        let lcd = ready_lcd(&rig);

        let mut script = presses(1); // start
        script.extend(presses(3)); // digit 1
        script.extend(presses(1)); // next
        script.extend(presses(3)); // digit 2
        script.extend(presses(1)); // next
        script.extend(presses(3)); // digit 3
        rig.gpio().registers().script_pin(BUTTON, &script);

        let outcome = Session::new(&rig, &lcd, rules(3, 10), fixed("333"))
            .run()
            .unwrap();

        assert_eq!(outcome, Outcome::Won { attempts: 1 });
        let levels = rig.gpio().registers().peek(word::GPLEV0);
        assert_eq!(levels & (1 << RED_LED.number()), 0);
        assert_eq!(levels & (1 << GREEN_LED.number()), 0);
    }

    #[test]
    fn test_timeout_defaults_digit_to_one_and_game_is_lost() {
        let timing = TimingConfig {
            input_timeout_ms: 0,
            ..TimingConfig::default()
        };
        let (rig, trace) = sim_rig_with(timing);
        let lcd = ready_lcd(&rig);

        // Pressed once to start, then never again
        rig.gpio().registers().script_pin(BUTTON, &[true, false]);

        let outcome = Session::new(&rig, &lcd, rules(1, 1), fixed("3"))
            .run()
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Lost {
                secret: Code::new(vec![3])
            }
        );

        // Red: greeting (S m t h), end of entry, separator, next round,
        // game over. Green: greeting (i) only, nothing was pressed.
        let events = pin_events(&trace.snapshot());
        assert_eq!(blinks(&events, GREEN_LED.number()), 1);
        assert_eq!(blinks(&events, RED_LED.number()), 4 + 2 + 1 + 3 + 5);
    }

    #[test]
    fn test_wrong_guess_signals_next_round() {
        let (rig, trace) = sim_rig();
        let lcd = ready_lcd(&rig);

        // Two rounds of a single digit, both guessing 3 against secret 1
        let mut script = presses(1);
        script.extend(presses(3));
        script.extend(presses(3));
        rig.gpio().registers().script_pin(BUTTON, &script);

        let outcome = Session::new(&rig, &lcd, rules(1, 2), fixed("1"))
            .run()
            .unwrap();
        assert!(matches!(outcome, Outcome::Lost { .. }));

        // Per round: 3 press acks, end-of-entry pair, separator, next round
        let events = pin_events(&trace.snapshot());
        let per_round = 3 + 2 + 1 + 3;
        assert_eq!(blinks(&events, RED_LED.number()), 4 + 2 * per_round + 5);
    }

    #[test]
    fn test_unit_test_mode() {
        let (rig, trace) = sim_rig();
        let lcd = ready_lcd(&rig);
        trace.clear();

        let session = Session::new(&rig, &lcd, rules(3, 10), SessionOptions::default());
        assert_eq!(
            session.run_unit_test("123", "132"),
            Score { exact: 1, approx: 2 }
        );
        // Lenient parsing: 9 and the missing digit both become 1
        assert_eq!(
            session.run_unit_test("19", "11"),
            Score { exact: 3, approx: 0 }
        );

        let events = pin_events(&trace.snapshot());
        assert!(events.contains(&PinEvent::Delay(RESULT_HOLD)));
    }

    #[test]
    fn test_report_without_hardware() {
        let result = report_unit_test(&rules(3, 10), "312", "321");
        assert_eq!(result, Score { exact: 1, approx: 2 });
    }

    #[test]
    fn test_vowels() {
        assert!(is_vowel('A'));
        assert!(is_vowel('u'));
        assert!(!is_vowel('S'));
        assert!(!is_vowel('y'));
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("Count: 1").len(), DISPLAY_WIDTH);
        assert_eq!(pad("Count: 1").trim_end(), "Count: 1");
    }
}
