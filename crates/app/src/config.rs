//! Configuration for the osi-sim terminal walkthrough.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including a randomized scenario that is reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! The seed is printed with the configuration so runs are reproducible.

use clap::{Parser, ValueEnum};
use osi_sim_core::scenario::{self, Scenario, SCENARIOS};
use osi_sim_core::{Error, Result, TickInterval};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// osi-sim: follow a student's email through the seven OSI layers
#[derive(Parser, Debug)]
#[command(name = "osi-sim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Scenario id (default: picked from the catalog using the seed)
    #[arg(long)]
    pub scenario: Option<String>,

    /// Message traced by `start` (default: the scenario's example message)
    #[arg(long)]
    pub message: Option<String>,

    /// Playback speed: fast, normal, slow or a millisecond count
    #[arg(long, value_parser = parse_speed)]
    pub speed: Option<TickInterval>,

    /// Start with auto mode enabled
    #[arg(long)]
    pub auto: bool,

    /// Send the email and play it through to delivery without prompting
    #[arg(long)]
    pub autoplay: bool,

    /// Random seed for determinism
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the session summary on exit
    #[arg(long)]
    pub no_stats: bool,

    /// How the exit summary is printed
    #[arg(long, value_enum, default_value_t = StatsFormat::Summary)]
    pub stats_format: StatsFormat,

    /// Don't colour layer names
    #[arg(long)]
    pub no_color: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Exit summary layout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsFormat {
    /// Human-readable summary
    Summary,
    /// key=value lines, one counter per line
    Text,
}

fn parse_speed(s: &str) -> std::result::Result<TickInterval, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

/// Complete configuration for a walkthrough session.
#[derive(Debug, Clone)]
pub struct Config {
    // === Walkthrough ===
    /// Selected scenario
    pub scenario: &'static Scenario,

    /// Seed message for `start`
    pub message: String,

    // === Playback ===
    /// Auto-advance period
    pub speed: TickInterval,

    /// Whether auto mode starts enabled
    pub auto_mode: bool,

    /// Run to delivery without reading input
    pub autoplay: bool,

    /// Seed used for randomized defaults
    pub seed: u64,

    // === Output ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the session summary
    pub print_stats: bool,

    /// Layout of the session summary
    pub stats_format: StatsFormat,

    /// Whether to colour output with ANSI codes
    pub color: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// If no scenario is given, one is picked with a seeded RNG. Without
    /// `--seed` the seed comes from the clock.
    ///
    /// # Errors
    /// `Error::UnknownScenario` if `--scenario` names no catalog entry.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let seed = cli.seed.unwrap_or_else(clock_seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let scenario = match cli.scenario.as_deref() {
            Some(id) => scenario::lookup(id)?,
            None => &SCENARIOS[rng.gen_range(0..SCENARIOS.len())],
        };

        Ok(Config {
            scenario,
            message: cli
                .message
                .unwrap_or_else(|| scenario.example_message.to_string()),
            speed: cli.speed.unwrap_or_default(),
            auto_mode: cli.auto || cli.autoplay,
            autoplay: cli.autoplay,
            seed,
            print_config: cli.print_config,
            print_stats: !cli.no_stats,
            stats_format: cli.stats_format,
            color: !cli.no_color,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!("Scenario: {} ({})", self.scenario.id, self.scenario.name);
        println!("Message: {:?}", self.message);
        println!();
        println!("=== Playback ===");
        println!("Speed: {}", self.speed);
        println!("Auto mode: {}", if self.auto_mode { "on" } else { "off" });
        println!("Autoplay: {}", if self.autoplay { "on" } else { "off" });
        println!();
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("osi-sim").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_explicit_scenario_and_message() {
        let config = Config::from_cli(cli(&["--scenario", "email", "--message", "hi"])).unwrap();

        assert_eq!(config.scenario.id, "email");
        assert_eq!(config.message, "hi");
    }

    #[test]
    fn test_message_defaults_to_example() {
        let config = Config::from_cli(cli(&["--scenario", "download"])).unwrap();
        assert_eq!(config.message, "GET /file.pdf HTTP/1.1");
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let result = Config::from_cli(cli(&["--scenario", "video"]));
        assert!(matches!(result, Err(Error::UnknownScenario(_))));
    }

    #[test]
    fn test_seeded_scenario_is_deterministic() {
        let a = Config::from_cli(cli(&["--seed", "42"])).unwrap();
        let b = Config::from_cli(cli(&["--seed", "42"])).unwrap();

        assert_eq!(a.scenario.id, b.scenario.id);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_speed_parsing() {
        assert_eq!(
            Config::from_cli(cli(&["--speed", "slow"])).unwrap().speed.as_millis(),
            3000
        );
        assert_eq!(
            Config::from_cli(cli(&["--speed", "750"])).unwrap().speed.as_millis(),
            750
        );
        assert_eq!(Config::from_cli(cli(&[])).unwrap().speed.as_millis(), 2000);
        assert!(Cli::try_parse_from(["osi-sim", "--speed", "0"]).is_err());
    }

    #[test]
    fn test_autoplay_implies_auto_mode() {
        let config = Config::from_cli(cli(&["--autoplay"])).unwrap();
        assert!(config.auto_mode);
        assert!(config.autoplay);
    }

    #[test]
    fn test_output_flags() {
        let config = Config::from_cli(cli(&["--no-stats", "--no-color"])).unwrap();
        assert!(!config.print_stats);
        assert!(!config.color);
        assert_eq!(config.stats_format, StatsFormat::Summary);

        let config = Config::from_cli(cli(&["--stats-format", "text"])).unwrap();
        assert!(config.print_stats);
        assert_eq!(config.stats_format, StatsFormat::Text);
        assert!(Cli::try_parse_from(["osi-sim", "--stats-format", "json"]).is_err());
    }
}
