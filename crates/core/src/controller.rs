//! The simulation controller: the walkthrough's state machine.
//!
//! # Screens
//!
//! ```text
//!   Composing --compose_and_send--> Simulating --advance at last step--> Delivered
//!       ^                               |                                    |
//!       +-------- return_to_compose ----+------- return_to_compose ----------+
//! ```
//!
//! There is no path from `Delivered` back into `Simulating`.
//!
//! # Cursor
//!
//! The step sequence and its cursor live together in a private [`Playhead`],
//! which is the only code that moves the cursor. Outside an empty sequence the
//! cursor is always a valid index.
//!
//! # Playback
//!
//! Auto-advance is driven by a single owned [`PlaybackTimer`]. Every transition
//! that can change whether the timer should run (or its period) goes through
//! `rearm`, which drops the old handle before arming a new one. Time is fed in
//! by the caller through [`SimulationController::set_time`].

use crate::email::Email;
use crate::generator;
use crate::layer::Layer;
use crate::scenario::{self, Scenario, DEFAULT_SCENARIO_ID};
use crate::stats::SessionStats;
use crate::step::SimulationStep;
use crate::timer::{PlaybackTimer, TickInterval};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Which outer screen of the story is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrativeScreen {
    /// The student is writing the email
    Composing,
    /// The email is travelling through the layers
    Simulating,
    /// The teacher has received the email
    Delivered,
}

impl fmt::Display for NarrativeScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NarrativeScreen::Composing => "composing",
            NarrativeScreen::Simulating => "simulating",
            NarrativeScreen::Delivered => "delivered",
        })
    }
}

/// A step sequence with a cursor that can't leave it.
#[derive(Debug, Clone, Default)]
struct Playhead {
    steps: Vec<SimulationStep>,
    cursor: usize,
}

impl Playhead {
    fn new(steps: Vec<SimulationStep>) -> Self {
        Self { steps, cursor: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    /// Move forward one step. Returns false at the last step or when empty.
    fn advance(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move back one step. Returns false at the first step.
    fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn current(&self) -> Option<&SimulationStep> {
        self.steps.get(self.cursor)
    }
}

/// Owns all mutable walkthrough state.
///
/// Construct one per session and hand it to whatever renders it; drop it when
/// the session ends.
#[derive(Debug)]
pub struct SimulationController {
    playhead: Playhead,
    message: String,
    scenario_id: String,
    is_playing: bool,
    is_auto_mode: bool,
    tick_interval: TickInterval,
    screen: NarrativeScreen,
    email: Email,

    // Playback
    timer: Option<PlaybackTimer>,
    now: Duration,

    stats: SessionStats,
}

impl SimulationController {
    /// Create a controller on the composing screen with the assignment email.
    pub fn new() -> Self {
        Self::with_email(Email::assignment())
    }

    /// Create a controller that sends `email` from the composing screen.
    pub fn with_email(email: Email) -> Self {
        Self {
            playhead: Playhead::default(),
            message: String::new(),
            scenario_id: DEFAULT_SCENARIO_ID.to_string(),
            is_playing: false,
            is_auto_mode: false,
            tick_interval: TickInterval::default(),
            screen: NarrativeScreen::Composing,
            email,
            timer: None,
            now: Duration::ZERO,
            stats: SessionStats::new(),
        }
    }

    // === Read side ===

    pub fn cursor(&self) -> usize {
        self.playhead.cursor
    }

    pub fn steps(&self) -> &[SimulationStep] {
        &self.playhead.steps
    }

    /// The step under the cursor, if a sequence has been generated.
    pub fn current_step(&self) -> Option<&SimulationStep> {
        self.playhead.current()
    }

    /// Catalog entry for the current step's layer.
    pub fn current_layer(&self) -> Option<&'static Layer> {
        self.current_step().map(SimulationStep::layer)
    }

    pub fn narrative_screen(&self) -> NarrativeScreen {
        self.screen
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_auto_mode(&self) -> bool {
        self.is_auto_mode
    }

    pub fn tick_interval(&self) -> TickInterval {
        self.tick_interval
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Selected scenario, if the id is in the catalog.
    pub fn scenario(&self) -> Option<&'static Scenario> {
        scenario::find(&self.scenario_id)
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Whether there is a step to show: simulating with a non-empty sequence.
    pub fn is_renderable(&self) -> bool {
        self.screen == NarrativeScreen::Simulating && self.current_step().is_some()
    }

    /// Controller clock, as last set through `set_time`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// When the playback timer next fires, if it is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.as_ref().map(PlaybackTimer::deadline)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// End the session, returning its statistics.
    pub fn finish(mut self) -> SessionStats {
        self.timer = None;
        self.stats.complete();
        self.stats
    }

    // === Write side ===

    /// Replace the pending seed message. An existing sequence is unaffected.
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = text.into();
        trace!(text = %self.message, "Message set");
    }

    /// Replace the pending scenario. Unknown ids are accepted.
    pub fn set_scenario(&mut self, id: impl Into<String>) {
        self.scenario_id = id.into();
        if self.scenario().is_none() {
            debug!(scenario = %self.scenario_id, "Scenario not in catalog");
        }
    }

    /// Regenerate the sequence from the pending message and scenario.
    ///
    /// Only honoured while simulating. The composing screen reaches the
    /// simulation through `compose_and_send`, and nothing leads from the
    /// delivered screen back into it.
    pub fn start_simulation(&mut self) {
        if self.screen != NarrativeScreen::Simulating {
            warn!(screen = %self.screen, "Ignoring start outside simulation");
            return;
        }
        self.begin();
    }

    /// Move to the next step.
    ///
    /// At the last step this does not stop: it delivers the email, switching
    /// to the delivered screen and pausing playback.
    pub fn advance(&mut self) {
        self.step_forward();
    }

    /// Move to the previous step. No-op at the first step.
    pub fn retreat(&mut self) {
        if self.screen != NarrativeScreen::Simulating {
            debug!(screen = %self.screen, "Ignoring retreat outside simulation");
            return;
        }

        if self.playhead.retreat() {
            self.stats.steps_retreated += 1;
            debug!(cursor = self.playhead.cursor, "Retreated");
            self.rearm();
        }
    }

    /// Rewind to the first step and pause. Keeps the sequence and screen.
    pub fn reset(&mut self) {
        self.playhead.rewind();
        self.is_playing = false;
        self.stats.resets += 1;
        debug!("Reset to first step");
        self.rearm();
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
        debug!(playing = self.is_playing, "Play toggled");
        self.rearm();
    }

    pub fn toggle_auto_mode(&mut self) {
        self.is_auto_mode = !self.is_auto_mode;
        debug!(auto = self.is_auto_mode, "Auto mode toggled");
        self.rearm();
    }

    pub fn set_speed(&mut self, interval: TickInterval) {
        self.tick_interval = interval;
        debug!(interval = %interval, "Speed set");
        self.rearm();
    }

    /// Send the email: seed the message with it and start the simulation.
    ///
    /// Only honoured on the composing screen.
    pub fn compose_and_send(&mut self) {
        if self.screen != NarrativeScreen::Composing {
            debug!(screen = %self.screen, "Ignoring send outside compose");
            return;
        }

        self.message = self.email.to_message();
        self.stats.emails_sent += 1;
        info!(to = %self.email.to, subject = %self.email.subject, "Email sent");
        self.begin();
    }

    /// Drop the sequence and go back to the composing screen.
    ///
    /// Leaving the delivered screen also clears the seed message, so the story
    /// restarts from scratch.
    pub fn return_to_compose(&mut self) {
        let from_delivered = self.screen == NarrativeScreen::Delivered;

        self.playhead = Playhead::default();
        self.is_playing = false;
        self.screen = NarrativeScreen::Composing;
        if from_delivered {
            self.message.clear();
        }
        self.stats.returns_to_compose += 1;

        info!(from_delivered, "Returned to compose");
        self.rearm();
    }

    /// Advance the controller clock to `now`, firing every due timer tick.
    ///
    /// Each tick advances one step and re-arms from its own deadline, so a
    /// large jump fires the same ticks as many small ones. The clock never
    /// moves backwards.
    pub fn set_time(&mut self, now: Duration) {
        while let Some(deadline) = self.due_deadline(now) {
            self.now = deadline;
            if self.step_forward() {
                self.stats.timer_ticks += 1;
            }
        }
        self.now = self.now.max(now);
    }

    // === Internals ===

    /// Generate a sequence, rewind, pause and show the simulation screen.
    fn begin(&mut self) {
        let steps = generator::generate(&self.message, &self.scenario_id);
        self.playhead = Playhead::new(steps);
        self.is_playing = false;
        self.screen = NarrativeScreen::Simulating;
        self.stats.simulations_started += 1;

        info!(
            scenario = %self.scenario_id,
            steps = self.playhead.steps.len(),
            "Simulation started"
        );
        self.rearm();
    }

    fn due_deadline(&self, now: Duration) -> Option<Duration> {
        self.timer
            .as_ref()
            .filter(|timer| timer.is_due(now))
            .map(PlaybackTimer::deadline)
    }

    /// Shared by `advance` and timer ticks. Returns true if the cursor moved.
    fn step_forward(&mut self) -> bool {
        if self.screen != NarrativeScreen::Simulating {
            debug!(screen = %self.screen, "Ignoring advance outside simulation");
            return false;
        }

        let moved = self.playhead.advance();
        if moved {
            self.stats.steps_advanced += 1;
            debug!(cursor = self.playhead.cursor, "Advanced");
        } else if !self.playhead.steps.is_empty() {
            self.screen = NarrativeScreen::Delivered;
            self.is_playing = false;
            self.stats.deliveries += 1;
            info!("Email delivered");
        }

        self.rearm();
        moved
    }

    /// Cancel any armed timer, then arm a new one if playback should run.
    fn rearm(&mut self) {
        if self.timer.take().is_some() {
            trace!("Playback timer cancelled");
        }

        let should_run = self.is_playing
            && self.is_auto_mode
            && self.screen == NarrativeScreen::Simulating
            && !self.playhead.steps.is_empty();

        if should_run {
            let timer = PlaybackTimer::arm(self.now, self.tick_interval);
            trace!(
                period_ms = timer.period().as_millis() as u64,
                deadline_ms = timer.deadline().as_millis() as u64,
                "Playback timer armed"
            );
            self.timer = Some(timer);
        }
    }
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Direction;
    use crate::timer::Speed;
    use tracing_test::traced_test;

    /// Send the email, then restart the walkthrough on `message`.
    fn started(message: &str) -> SimulationController {
        let mut ctrl = SimulationController::new();
        ctrl.compose_and_send();
        ctrl.set_message(message);
        ctrl.start_simulation();
        ctrl
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_state() {
        let ctrl = SimulationController::new();

        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Composing);
        assert!(ctrl.steps().is_empty());
        assert_eq!(ctrl.cursor(), 0);
        assert_eq!(ctrl.scenario_id(), "download");
        assert!(!ctrl.is_playing());
        assert!(!ctrl.is_auto_mode());
        assert_eq!(ctrl.tick_interval(), Speed::Normal.interval());
        assert!(ctrl.current_step().is_none());
        assert!(!ctrl.is_renderable());
    }

    #[test]
    fn test_start_ignored_while_composing() {
        let mut ctrl = SimulationController::new();
        ctrl.set_message("skip the email");
        ctrl.start_simulation();

        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Composing);
        assert!(ctrl.steps().is_empty());
        assert_eq!(ctrl.stats().simulations_started, 0);
    }

    #[test]
    fn test_start_simulation() {
        let mut ctrl = SimulationController::new();
        ctrl.compose_and_send();
        ctrl.advance();
        ctrl.toggle_play();
        ctrl.set_message("hello");
        ctrl.start_simulation();

        assert_eq!(ctrl.steps().len(), 14);
        assert_eq!(ctrl.steps()[0].data_unit.service_data_unit, "hello");
        assert_eq!(ctrl.stats().simulations_started, 2);
        assert_eq!(ctrl.cursor(), 0);
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Simulating);
        assert!(ctrl.is_renderable());
        assert_eq!(ctrl.current_layer().unwrap().name, "Application");
    }

    #[test]
    fn test_set_message_does_not_touch_sequence() {
        let mut ctrl = started("first");
        ctrl.set_message("second");

        assert_eq!(ctrl.message(), "second");
        assert_eq!(ctrl.steps()[0].data_unit.service_data_unit, "first");
    }

    #[test]
    fn test_restart_replaces_sequence() {
        let mut ctrl = started("first");
        ctrl.advance();
        ctrl.advance();
        ctrl.set_message("second");
        ctrl.start_simulation();

        assert_eq!(ctrl.cursor(), 0);
        assert_eq!(ctrl.steps()[0].data_unit.service_data_unit, "second");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut ctrl = started("bounds");

        ctrl.retreat();
        assert_eq!(ctrl.cursor(), 0);

        for _ in 0..13 {
            ctrl.advance();
        }
        assert_eq!(ctrl.cursor(), 13);

        for _ in 0..20 {
            ctrl.retreat();
        }
        assert_eq!(ctrl.cursor(), 0);
    }

    #[test]
    fn test_advance_past_end_delivers() {
        let mut ctrl = started("deliver me");
        ctrl.toggle_play();
        assert!(ctrl.is_playing());

        for _ in 0..13 {
            ctrl.advance();
        }
        assert_eq!(ctrl.cursor(), 13);
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Simulating);

        ctrl.advance();
        assert_eq!(ctrl.cursor(), 13);
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Delivered);
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.stats().deliveries, 1);
    }

    #[test]
    fn test_navigation_ignored_after_delivery() {
        let mut ctrl = started("m");
        for _ in 0..14 {
            ctrl.advance();
        }
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Delivered);

        ctrl.retreat();
        ctrl.advance();
        assert_eq!(ctrl.cursor(), 13);
        assert_eq!(ctrl.stats().deliveries, 1);
    }

    #[test]
    fn test_no_path_from_delivered_to_simulating() {
        let mut ctrl = started("m");
        for _ in 0..14 {
            ctrl.advance();
        }

        ctrl.start_simulation();
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Delivered);

        ctrl.compose_and_send();
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Delivered);
    }

    #[test]
    fn test_reset_keeps_sequence() {
        let mut ctrl = started("reset");
        ctrl.advance();
        ctrl.advance();
        ctrl.toggle_play();

        ctrl.reset();
        assert_eq!(ctrl.cursor(), 0);
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.steps().len(), 14);
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Simulating);
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut ctrl = SimulationController::new();

        ctrl.toggle_auto_mode();
        assert!(ctrl.is_auto_mode());
        assert!(!ctrl.is_playing());

        ctrl.toggle_play();
        ctrl.toggle_auto_mode();
        assert!(ctrl.is_playing());
        assert!(!ctrl.is_auto_mode());
    }

    #[test]
    fn test_compose_and_send() {
        let mut ctrl = SimulationController::new();
        ctrl.compose_and_send();

        let expected = Email::assignment().to_message();
        assert_eq!(ctrl.message(), expected);
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Simulating);
        assert_eq!(ctrl.steps().len(), 14);
        assert_eq!(ctrl.steps()[0].data_unit.service_data_unit, expected);
        assert_eq!(ctrl.stats().emails_sent, 1);
        assert_eq!(ctrl.stats().simulations_started, 1);
    }

    #[test]
    fn test_send_ignored_while_simulating() {
        let mut ctrl = started("custom");
        ctrl.compose_and_send();

        assert_eq!(ctrl.message(), "custom");
        assert_eq!(ctrl.stats().emails_sent, 1);
    }

    #[test]
    fn test_return_from_simulating_keeps_message() {
        let mut ctrl = started("keep me");
        ctrl.advance();
        ctrl.return_to_compose();

        assert!(ctrl.steps().is_empty());
        assert_eq!(ctrl.cursor(), 0);
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Composing);
        assert_eq!(ctrl.message(), "keep me");
    }

    #[test]
    fn test_return_from_delivered_clears_message() {
        let mut ctrl = SimulationController::new();
        ctrl.compose_and_send();
        for _ in 0..14 {
            ctrl.advance();
        }

        ctrl.return_to_compose();
        assert!(ctrl.steps().is_empty());
        assert_eq!(ctrl.cursor(), 0);
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Composing);
        assert_eq!(ctrl.message(), "");

        // The story can run again
        ctrl.compose_and_send();
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Simulating);
    }

    #[test]
    fn test_timer_needs_play_and_auto() {
        let mut ctrl = started("timer");
        assert!(ctrl.next_deadline().is_none());

        ctrl.toggle_play();
        assert!(ctrl.next_deadline().is_none());

        ctrl.toggle_auto_mode();
        assert_eq!(ctrl.next_deadline(), Some(ms(2000)));

        ctrl.toggle_play();
        assert!(ctrl.next_deadline().is_none());
    }

    #[test]
    fn test_timer_not_armed_outside_simulation() {
        let mut ctrl = SimulationController::new();
        ctrl.toggle_play();
        ctrl.toggle_auto_mode();
        assert!(ctrl.next_deadline().is_none());
    }

    #[test]
    fn test_timer_ticks_advance() {
        let mut ctrl = started("tick");
        ctrl.set_speed(Speed::Fast.interval());
        ctrl.toggle_auto_mode();
        ctrl.toggle_play();

        ctrl.set_time(ms(999));
        assert_eq!(ctrl.cursor(), 0);

        ctrl.set_time(ms(1000));
        assert_eq!(ctrl.cursor(), 1);
        assert_eq!(ctrl.next_deadline(), Some(ms(2000)));

        // A jump fires every tick in between
        ctrl.set_time(ms(4500));
        assert_eq!(ctrl.cursor(), 4);
        assert_eq!(ctrl.next_deadline(), Some(ms(5000)));
        assert_eq!(ctrl.stats().timer_ticks, 4);
    }

    #[test]
    fn test_manual_step_restarts_period() {
        let mut ctrl = started("restart");
        ctrl.toggle_auto_mode();
        ctrl.toggle_play();
        ctrl.set_time(ms(1500));

        ctrl.advance();
        assert_eq!(ctrl.next_deadline(), Some(ms(3500)));
    }

    #[test]
    fn test_speed_change_rearms() {
        let mut ctrl = started("speed");
        ctrl.toggle_auto_mode();
        ctrl.toggle_play();
        ctrl.set_time(ms(500));

        ctrl.set_speed(Speed::Slow.interval());
        assert_eq!(ctrl.next_deadline(), Some(ms(3500)));
    }

    #[test]
    fn test_autoplay_runs_to_delivery_and_stops() {
        let mut ctrl = SimulationController::new();
        ctrl.compose_and_send();
        ctrl.toggle_auto_mode();
        ctrl.toggle_play();

        ctrl.set_time(ms(60_000));
        assert_eq!(ctrl.narrative_screen(), NarrativeScreen::Delivered);
        assert_eq!(ctrl.cursor(), 13);
        assert!(!ctrl.is_playing());
        assert!(ctrl.next_deadline().is_none());
        assert_eq!(ctrl.stats().timer_ticks, 13);
        assert_eq!(ctrl.now(), ms(60_000));
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut ctrl = SimulationController::new();
        ctrl.set_time(ms(100));
        ctrl.set_time(ms(50));
        assert_eq!(ctrl.now(), ms(100));
    }

    #[test]
    fn test_unknown_scenario_still_generates() {
        let mut ctrl = started("m");
        ctrl.set_scenario("video-call");
        ctrl.start_simulation();

        assert!(ctrl.scenario().is_none());
        assert_eq!(ctrl.steps().len(), 14);
        assert_eq!(ctrl.steps()[13].direction, Direction::Decapsulating);
    }

    #[test]
    fn test_finish_completes_stats() {
        let mut ctrl = started("m");
        ctrl.advance();

        let stats = ctrl.finish();
        assert!(stats.end_time.is_some());
        assert_eq!(stats.steps_advanced, 1);
    }

    #[test]
    #[traced_test]
    fn test_delivery_is_logged() {
        let mut ctrl = started("log");
        for _ in 0..14 {
            ctrl.advance();
        }
        assert!(logs_contain("Email delivered"));
    }

    #[test]
    #[traced_test]
    fn test_armed_timer_logs_period() {
        let mut ctrl = started("log");
        ctrl.set_speed(Speed::Slow.interval());
        ctrl.toggle_auto_mode();
        ctrl.toggle_play();
        assert!(logs_contain("Playback timer armed"));
        assert!(logs_contain("period_ms=3000"));
    }

    #[test]
    #[traced_test]
    fn test_ignored_start_is_logged() {
        let mut ctrl = started("log");
        for _ in 0..14 {
            ctrl.advance();
        }
        ctrl.start_simulation();
        assert!(logs_contain("Ignoring start outside simulation"));
    }
}
