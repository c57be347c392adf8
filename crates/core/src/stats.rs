//! Session statistics.
//!
//! Counts what happened during one walkthrough session:
//! - Simulations started and emails sent
//! - Cursor movement (manual and timer-driven)
//! - Narrative transitions (deliveries, returns to compose)
//!
//! # Design
//!
//! Counters live inside the controller and are bumped by each transition.
//! The struct is plain data; the front end reads it at exit.

use std::time::{Duration, Instant};

/// Counters for one controller lifetime.
#[derive(Debug, Clone)]
pub struct SessionStats {
    // === Timing ===
    /// When the session started
    pub start_time: Instant,

    /// When the session ended (set on completion)
    pub end_time: Option<Instant>,

    // === Simulations ===
    /// Step sequences generated
    pub simulations_started: u64,

    /// Emails sent from the composing screen
    pub emails_sent: u64,

    // === Navigation ===
    /// Successful forward moves, manual or timer-driven
    pub steps_advanced: u64,

    /// Successful backward moves
    pub steps_retreated: u64,

    /// Forward moves made by the playback timer
    pub timer_ticks: u64,

    /// Cursor resets
    pub resets: u64,

    // === Narrative ===
    /// Walkthroughs that reached the delivered screen
    pub deliveries: u64,

    /// Returns to the composing screen
    pub returns_to_compose: u64,
}

impl SessionStats {
    /// Create new stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            simulations_started: 0,
            emails_sent: 0,
            steps_advanced: 0,
            steps_retreated: 0,
            timer_ticks: 0,
            resets: 0,
            deliveries: 0,
            returns_to_compose: 0,
        }
    }

    /// Mark the session as finished.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Share of forward moves made by the timer rather than the user.
    pub fn autoplay_share(&self) -> f64 {
        if self.steps_advanced == 0 {
            0.0
        } else {
            self.timer_ticks as f64 / self.steps_advanced as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Session Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Simulations started: {}", self.simulations_started);
        println!("Emails sent: {}", self.emails_sent);
        println!("Deliveries: {}", self.deliveries);
        println!("Returns to compose: {}", self.returns_to_compose);
        println!();
        println!(
            "Steps advanced: {} ({:.0}% by autoplay)",
            self.steps_advanced,
            self.autoplay_share() * 100.0
        );
        println!("Steps retreated: {}", self.steps_retreated);
        println!("Resets: {}", self.resets);
        println!();
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             simulations_started={}\n\
             emails_sent={}\n\
             steps_advanced={}\n\
             steps_retreated={}\n\
             timer_ticks={}\n\
             resets={}\n\
             deliveries={}\n\
             returns_to_compose={}\n",
            self.duration().as_millis(),
            self.simulations_started,
            self.emails_sent,
            self.steps_advanced,
            self.steps_retreated,
            self.timer_ticks,
            self.resets,
            self.deliveries,
            self.returns_to_compose,
        )
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
