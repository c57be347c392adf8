//! The event loop driving one walkthrough session.
//!
//! # Threads
//!
//! ```text
//! stdin reader thread --(line)--> bounded channel --> session loop --> controller
//!                                                        ^
//!                              recv_timeout until the next timer deadline
//! ```
//!
//! The session loop is the only writer to the controller. User commands and
//! timer ticks are handled one at a time, never interleaved.

use crate::command::{Command, Outcome};
use crate::config::Config;
use crate::render::{InfoView, ScreenView};
use osi_sim_core::stats::SessionStats;
use osi_sim_core::{NarrativeScreen, Result, SimulationController};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// Input lines buffered between the reader thread and the loop
const INPUT_CHANNEL_CAPACITY: usize = 16;

/// Build a controller from the configuration.
pub fn new_controller(config: &Config) -> SimulationController {
    let mut ctrl = SimulationController::new();
    ctrl.set_scenario(config.scenario.id);
    ctrl.set_message(config.message.clone());
    ctrl.set_speed(config.speed);
    if config.auto_mode {
        ctrl.toggle_auto_mode();
    }
    ctrl
}

/// Run the interactive prompt until `quit` or end of input.
pub fn run_interactive(config: &Config) -> Result<SessionStats> {
    let mut ctrl = new_controller(config);
    let input = spawn_stdin_reader();
    let epoch = Instant::now();

    draw(&ctrl, config)?;

    loop {
        let line = match ctrl.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_sub(epoch.elapsed());
                match input.recv_timeout(wait) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match input.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        // Ticks that fell due while waiting fire before the command
        let cursor = ctrl.cursor();
        let screen = ctrl.narrative_screen();
        ctrl.set_time(epoch.elapsed());
        let ticked = ctrl.cursor() != cursor || ctrl.narrative_screen() != screen;

        let Some(line) = line else {
            if ticked {
                draw(&ctrl, config)?;
            }
            continue;
        };

        match line?.parse::<Command>().and_then(|cmd| cmd.apply(&mut ctrl)) {
            Ok(Outcome::Redraw) => draw(&ctrl, config)?,
            Ok(Outcome::Show(view)) => {
                print!("{}", InfoView { view, color: config.color });
                prompt()?;
            }
            Ok(Outcome::Quit) => break,
            Err(e) => {
                println!("{e}");
                prompt()?;
            }
        }
    }

    Ok(ctrl.finish())
}

/// Send the email and let the timer carry it to delivery.
pub fn run_autoplay(config: &Config) -> Result<SessionStats> {
    let mut ctrl = new_controller(config);
    if !ctrl.is_auto_mode() {
        ctrl.toggle_auto_mode();
    }
    ctrl.compose_and_send();
    ctrl.toggle_play();

    let epoch = Instant::now();
    print!("{}", ScreenView { ctrl: &ctrl, color: config.color });

    while let Some(deadline) = ctrl.next_deadline() {
        thread::sleep(deadline.saturating_sub(epoch.elapsed()));
        ctrl.set_time(epoch.elapsed());
        print!("{}", ScreenView { ctrl: &ctrl, color: config.color });
    }

    if ctrl.narrative_screen() != NarrativeScreen::Delivered {
        warn!(screen = %ctrl.narrative_screen(), "Autoplay stopped before delivery");
    }
    io::stdout().flush()?;
    Ok(ctrl.finish())
}

fn spawn_stdin_reader() -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::sync_channel(INPUT_CHANNEL_CAPACITY);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("Input closed");
    });
    rx
}

fn draw(ctrl: &SimulationController, config: &Config) -> Result<()> {
    print!("\n{}", ScreenView { ctrl, color: config.color });
    prompt()
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;
    use osi_sim_core::timer::Speed;

    fn config(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(std::iter::once("osi-sim").chain(args.iter().copied()))
            .expect("valid arguments");
        Config::from_cli(cli).expect("valid config")
    }

    #[test]
    fn test_new_controller_applies_config() {
        let config = config(&["--scenario", "email", "--speed", "fast", "--auto"]);
        let ctrl = new_controller(&config);

        assert_eq!(ctrl.scenario_id(), "email");
        assert_eq!(ctrl.message(), "Hi! The report is attached.");
        assert_eq!(ctrl.tick_interval(), Speed::Fast.interval());
        assert!(ctrl.is_auto_mode());
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Composing);
    }

    #[test]
    fn test_autoplay_reaches_delivery() {
        let config = config(&["--autoplay", "--speed", "1", "--no-color"]);
        let stats = run_autoplay(&config).expect("autoplay");

        assert_eq!(stats.emails_sent, 1);
        assert_eq!(stats.deliveries, 1);
        assert_eq!(stats.timer_ticks, 13);
    }
}
