//! MasterMind on a Raspberry Pi GPIO rig
//!
//! # Usage
//!
//! ```bash
//! # Play (needs root for /dev/mem)
//! sudo master-mind
//!
//! # Verbose output, secret shown on the LCD, fixed secret
//! sudo master-mind -v -d -s 312
//!
//! # Score two sequences on the rig
//! sudo master-mind -u 123 132
//!
//! # Score two sequences without touching hardware
//! master-mind --headless -u 123 132
//!
//! # Raspberry Pi 4 through /dev/gpiomem
//! master-mind --board rpi4 --device /dev/gpiomem
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::path::PathBuf;

use rpi_mastermind::boards::{get_profile, profile_names};
use rpi_mastermind::game::{report_unit_test, SessionOptions};
use rpi_mastermind::Config;

/// MasterMind on a Raspberry Pi GPIO rig
#[derive(Parser)]
#[command(name = "master-mind")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "MasterMind game over memory-mapped GPIO: LEDs, button and HD44780 LCD")]
struct Cli {
    /// Print secret, guesses and results to stdout
    #[arg(short, long)]
    verbose: bool,

    /// Show the secret on the LCD before the first round
    #[arg(short, long)]
    debug: bool,

    /// Use a fixed secret (e.g. 312)
    #[arg(short, long, value_name = "SEQ")]
    secret: Option<String>,

    /// Score SEQ1 (secret) against SEQ2 (guess) and exit
    #[arg(short, long, num_args = 2, value_names = ["SEQ1", "SEQ2"])]
    unit_test: Option<Vec<String>>,

    /// Board profile (overrides the config file)
    #[arg(short, long)]
    board: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Memory device to map GPIO registers from (overrides the config file)
    #[arg(long)]
    device: Option<PathBuf>,

    /// With --unit-test: print the score only, without opening the rig
    #[arg(long)]
    headless: bool,

    /// List supported board profiles and exit
    #[arg(long)]
    list_boards: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_boards {
        list_boards();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let unit_test = cli.unit_test.as_deref().and_then(|seqs| match seqs {
        [secret, guess] => Some((secret.as_str(), guess.as_str())),
        _ => None,
    });

    if cli.headless {
        let (secret, guess) =
            unit_test.context("--headless only applies to --unit-test <SEQ1> <SEQ2>")?;
        report_unit_test(&config.game, secret, guess);
        return Ok(());
    }

    let options = SessionOptions {
        verbose: cli.verbose,
        debug: cli.debug,
        secret: cli.secret.clone(),
    };

    play(&config, options, unit_test)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(board) = &cli.board {
        config.board = board.clone();
    }
    if let Some(device) = &cli.device {
        config.device = device.clone();
    }

    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

#[cfg(unix)]
fn play(config: &Config, options: SessionOptions, unit_test: Option<(&str, &str)>) -> Result<()> {
    use rpi_mastermind::display::Lcd;
    use rpi_mastermind::game::{Outcome, Session};
    use rpi_mastermind::hal::{MappedRegisterBlock, StdDelay};
    use rpi_mastermind::io::{LcdPins, Rig};

    let profile = config.board_profile()?;
    let offset = config.map_offset()?;

    let block = MappedRegisterBlock::open(&config.device, offset)
        .context("GPIO initialization failed (are you root?)")?;
    println!(
        "{} GPIO mapped from {} ({}, {})",
        "[OK]".green().bold(),
        config.device.display(),
        profile.name,
        profile.soc
    );

    // From here on, every exit path drops the rig: LEDs low, then unmap
    let rig = Rig::new(block, StdDelay, config.timing.clone());

    {
        let lcd = Lcd::new(&rig, LcdPins::RIG).context("LCD initialization failed")?;
        lcd.init();
        println!("{} LCD ready", "[OK]".green().bold());

        let mut session = Session::new(&rig, &lcd, config.game.clone(), options);

        match unit_test {
            Some((secret, guess)) => {
                session.run_unit_test(secret, guess);
            }
            None => {
                println!("{} Press the button to start", "[*]".cyan());
                match session.run()? {
                    Outcome::Won { attempts } => {
                        info!("Solved in {} attempts", attempts);
                        println!("{} Solved in {} attempts", "[OK]".green().bold(), attempts);
                    }
                    Outcome::Lost { secret } => {
                        println!("{} Out of attempts, secret was {}", "[*]".yellow(), secret);
                    }
                }
            }
        }
    }

    rig.close();
    debug!("GPIO released");
    Ok(())
}

#[cfg(not(unix))]
fn play(_config: &Config, _options: SessionOptions, _unit_test: Option<(&str, &str)>) -> Result<()> {
    anyhow::bail!("Mapping GPIO registers requires a Unix host; use --headless with --unit-test")
}

fn list_boards() {
    println!("{}", "=".repeat(60));
    println!("{}", "Supported Board Profiles".cyan().bold());
    println!("{}", "=".repeat(60));

    for name in profile_names() {
        if let Some(profile) = get_profile(name) {
            println!("\n  {}: {}", name.white().bold(), profile.name);
            println!("    SoC: {}", profile.soc);
            println!("    Peripheral base: {:#010x}", profile.peripheral_base);
            println!("    GPIO base: {:#010x}", profile.gpio_base());
        }
    }

    println!("\n{}", "=".repeat(60));
}
