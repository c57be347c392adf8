//! Line commands typed at the prompt.
//!
//! Each line maps to one controller operation or one informational view.
//! An empty line steps forward, so holding Enter walks the story.

use osi_sim_core::scenario;
use osi_sim_core::{Error, Result, SimulationController, TickInterval};
use std::str::FromStr;

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send,
    Start,
    Next,
    Prev,
    Reset,
    Play,
    Auto,
    Speed(TickInterval),
    Message(String),
    Scenario(String),
    Back,
    Layers,
    Scenarios,
    Help,
    Quit,
}

/// What the session loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed; redraw the screen
    Redraw,
    /// Print the named informational view
    Show(View),
    Quit,
}

/// Read-only views that don't touch the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Layers,
    Scenarios,
    Help,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" | "n" | "next" => Command::Next,
            "p" | "prev" => Command::Prev,
            "send" => Command::Send,
            "start" => Command::Start,
            "reset" => Command::Reset,
            "play" | "pause" => Command::Play,
            "auto" => Command::Auto,
            "speed" => Command::Speed(rest.parse()?),
            "message" | "msg" => Command::Message(rest.to_string()),
            "scenario" => Command::Scenario(rest.to_string()),
            "back" => Command::Back,
            "layers" => Command::Layers,
            "scenarios" => Command::Scenarios,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(Error::UnknownCommand(line.to_string())),
        };
        Ok(command)
    }
}

impl Command {
    /// Apply this command to the controller.
    ///
    /// # Errors
    /// `Error::UnknownScenario` for a `scenario` id that isn't in the catalog.
    /// The controller itself would accept it; the prompt is stricter so typos
    /// get reported.
    pub fn apply(self, ctrl: &mut SimulationController) -> Result<Outcome> {
        match self {
            Command::Send => ctrl.compose_and_send(),
            Command::Start => ctrl.start_simulation(),
            Command::Next => ctrl.advance(),
            Command::Prev => ctrl.retreat(),
            Command::Reset => ctrl.reset(),
            Command::Play => ctrl.toggle_play(),
            Command::Auto => ctrl.toggle_auto_mode(),
            Command::Speed(interval) => ctrl.set_speed(interval),
            Command::Message(text) => ctrl.set_message(text),
            Command::Scenario(id) => {
                let scenario = scenario::lookup(&id)?;
                ctrl.set_scenario(scenario.id);
            }
            Command::Back => ctrl.return_to_compose(),
            Command::Layers => return Ok(Outcome::Show(View::Layers)),
            Command::Scenarios => return Ok(Outcome::Show(View::Scenarios)),
            Command::Help => return Ok(Outcome::Show(View::Help)),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Redraw)
    }
}
