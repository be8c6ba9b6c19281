//! Runtime configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file at all) gives the stock rig timings and game rules.
//!
//! ```toml
//! board = "rpi4"
//! device = "/dev/mem"
//!
//! [timing]
//! poll_interval_ms = 10
//! debounce_ms = 50
//!
//! [game]
//! code_length = 3
//! colors = 3
//! surname = "Smith"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::boards::{self, BoardProfile};
use crate::error::ConfigError;
use crate::hal::regs::GPIO_OFFSET;

/// Longest secret the 16-column LCD can show as "Secret: a b c ..."
const MAX_CODE_LENGTH: usize = 4;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Board profile name (see `boards`)
    pub board: String,
    /// Memory device to map GPIO registers from
    pub device: PathBuf,
    pub timing: TimingConfig,
    pub game: GameConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board: boards::DEFAULT_BOARD.to_string(),
            device: PathBuf::from("/dev/mem"),
            timing: TimingConfig::default(),
            game: GameConfig::default(),
        }
    }
}

/// Rig timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Button sampling interval
    pub poll_interval_ms: u64,
    /// Hold-off after a button release
    pub debounce_ms: u64,
    /// LED on time per blink
    pub blink_on_ms: u64,
    /// LED off time per blink
    pub blink_off_ms: u64,
    /// Time allowed for entering one guess digit
    pub input_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            debounce_ms: 50,
            blink_on_ms: 200,
            blink_off_ms: 200,
            input_timeout_ms: 10_000,
        }
    }
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blink_on(&self) -> Duration {
        Duration::from_millis(self.blink_on_ms)
    }

    pub fn blink_off(&self) -> Duration {
        Duration::from_millis(self.blink_off_ms)
    }

    pub fn input_timeout(&self) -> Duration {
        Duration::from_millis(self.input_timeout_ms)
    }
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of positions in the secret
    pub code_length: usize,
    /// Number of colors; values run 1..=colors
    pub colors: u8,
    /// Guesses allowed before the game is lost
    pub max_attempts: u32,
    /// Name whose letters drive the greeting blink pattern
    pub surname: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            code_length: 3,
            colors: 3,
            max_attempts: 10,
            surname: "Smith".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration content and validate it
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the rest of the crate relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board_profile()?;

        let game = &self.game;
        if game.code_length == 0 || game.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "code_length must be 1..={}, got {}",
                MAX_CODE_LENGTH, game.code_length
            )));
        }
        if !(1..=9).contains(&game.colors) {
            return Err(ConfigError::Invalid(format!(
                "colors must be 1..=9, got {}",
                game.colors
            )));
        }
        if game.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".to_string()));
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Resolve the configured board profile
    pub fn board_profile(&self) -> Result<&'static BoardProfile, ConfigError> {
        boards::get_profile(&self.board).ok_or_else(|| ConfigError::UnknownBoard(self.board.clone()))
    }

    /// File offset to map for the GPIO window on the configured device.
    ///
    /// `/dev/gpiomem` exposes only the GPIO block, starting at offset 0;
    /// `/dev/mem` needs the physical address from the board profile.
    pub fn map_offset(&self) -> Result<u64, ConfigError> {
        if self.uses_gpiomem() {
            return Ok(0);
        }
        Ok(self.board_profile()?.peripheral_base + GPIO_OFFSET)
    }

    fn uses_gpiomem(&self) -> bool {
        self.device
            .file_name()
            .map(|name| name.to_string_lossy().starts_with("gpiomem"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.timing.input_timeout(), Duration::from_secs(10));
        assert_eq!(config.game.code_length, 3);
    }

    #[test]
    fn test_parse_partial_config() {
        let content = r#"
board = "rpi4"

[timing]
debounce_ms = 80

[game]
surname = "Gautam"
"#;
        let config = Config::parse(content).unwrap();

        assert_eq!(config.board, "rpi4");
        assert_eq!(config.timing.debounce_ms, 80);
        assert_eq!(config.timing.blink_on_ms, 200);
        assert_eq!(config.game.surname, "Gautam");
        assert_eq!(config.map_offset().unwrap(), 0xFE20_0000);
    }

    #[test]
    fn test_gpiomem_maps_at_zero() {
        let config = Config {
            device: PathBuf::from("/dev/gpiomem"),
            ..Config::default()
        };
        assert_eq!(config.map_offset().unwrap(), 0);
        assert_eq!(Config::default().map_offset().unwrap(), 0x3F20_0000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::parse("board = \"vax\""),
            Err(ConfigError::UnknownBoard(b)) if b == "vax"
        ));
        assert!(matches!(
            Config::parse("[game]\ncolors = 12"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse("[game]\ncode_length = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(Config::parse("bogus = 1"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nmax_attempts = 5").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.game.max_attempts, 5);

        let missing = file.path().with_extension("missing");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Read { .. })));
    }
}
