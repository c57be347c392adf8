//! Text rendering of the controller's current state.
//!
//! Views hold no state of their own: each one borrows the controller (or a
//! catalog) and formats whatever it currently exposes.

use crate::command::View;
use osi_sim_core::email::Email;
use osi_sim_core::timer::Speed;
use osi_sim_core::{
    Direction, Layer, NarrativeScreen, SimulationController, SimulationStep, LAYERS, SCENARIOS,
};
use std::fmt;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// The screen matching the controller's narrative state.
pub struct ScreenView<'a> {
    pub ctrl: &'a SimulationController,
    pub color: bool,
}

impl fmt::Display for ScreenView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ctrl.narrative_screen() {
            NarrativeScreen::Composing => self.fmt_compose(f),
            NarrativeScreen::Simulating => self.fmt_simulation(f),
            NarrativeScreen::Delivered => self.fmt_delivered(f),
        }
    }
}

impl ScreenView<'_> {
    fn fmt_compose(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let email = self.ctrl.email();
        writeln!(f, "{RULE}")?;
        writeln!(f, "Story: sending an email")?;
        writeln!(f, "{} is sending an assignment to {}.", email.from, email.to)?;
        writeln!(f, "{RULE}")?;
        fmt_email(f, email)?;
        writeln!(f)?;
        writeln!(f, "Type `send` to watch this email travel through the network.")
    }

    fn fmt_simulation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(step), Some(layer)) = (self.ctrl.current_step(), self.ctrl.current_layer())
        else {
            return writeln!(f, "Nothing to show yet.");
        };

        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "Step {}/{}  {}  [{}{}]",
            self.ctrl.cursor() + 1,
            self.ctrl.steps().len(),
            match step.direction {
                Direction::Encapsulating => "Encapsulation (7 -> 1)",
                Direction::Decapsulating => "Decapsulation (1 -> 7)",
            },
            playback_label(self.ctrl),
            if self.ctrl.is_auto_mode() { ", auto" } else { "" },
        )?;
        writeln!(f, "{RULE}")?;

        for entry in LAYERS.iter() {
            let marker = if entry.id == step.layer_id { ">" } else { " " };
            writeln!(
                f,
                "{marker} Layer {} - {}",
                entry.id,
                paint(entry, entry.name, self.color)
            )?;
        }
        writeln!(f)?;
        fmt_step(f, step, layer, self.color)
    }

    fn fmt_delivered(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let email = self.ctrl.email();
        writeln!(f, "{RULE}")?;
        writeln!(f, "Email received by {}", email.to)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Delivered successfully!")?;
        fmt_email(f, email)?;
        writeln!(f)?;
        writeln!(f, "Type `back` to start the story again.")
    }
}

fn fmt_email(f: &mut fmt::Formatter<'_>, email: &Email) -> fmt::Result {
    writeln!(f, "From:       {}", email.from)?;
    writeln!(f, "To:         {}", email.to)?;
    writeln!(f, "Subject:    {}", email.subject)?;
    writeln!(f, "Message:    {}", email.body)?;
    writeln!(
        f,
        "Attachment: {} ({})",
        email.attachment.file_name,
        email.attachment.size_label()
    )
}

fn fmt_step(
    f: &mut fmt::Formatter<'_>,
    step: &SimulationStep,
    layer: &Layer,
    color: bool,
) -> fmt::Result {
    let unit = &step.data_unit;
    let (input_label, output_label) = match step.direction {
        Direction::Encapsulating => ("Layer input", "Layer output"),
        Direction::Decapsulating => ("Received", "Processed"),
    };

    writeln!(
        f,
        "Layer {} - {} ({})",
        layer.id,
        paint(layer, layer.name, color),
        step.direction
    )?;
    writeln!(f, "  {}", layer.description)?;
    writeln!(f)?;
    writeln!(f, "SDU-{} {input_label}:", layer.id)?;
    writeln!(f, "  {}", unit.service_data_unit)?;
    if step.direction == Direction::Encapsulating && !unit.fields.is_empty() {
        writeln!(f, "Adding:")?;
        write!(f, " ")?;
        for label in unit.field_labels() {
            write!(f, " [{label}]")?;
        }
        writeln!(f, " {}", unit.service_data_unit)?;
    }
    writeln!(f, "Process:")?;
    writeln!(f, "  {}", layer.process_text)?;
    writeln!(f, "PDU-{} {output_label}:", layer.id)?;
    writeln!(f, "  {}", unit.protocol_data_unit)?;

    if !unit.fields.is_empty() {
        writeln!(f, "Protocol fields ({}):", unit.envelope_name.unwrap_or("-"))?;
        for field in unit.fields {
            writeln!(f, "  - {field}")?;
        }
    }

    writeln!(f)?;
    writeln!(f, "{}", step.explanation)?;
    match step.direction {
        Direction::Encapsulating => match step.layer_id.below() {
            Some(next) => writeln!(f, "Direction: sender, down to Layer {next}"),
            None => writeln!(f, "Direction: sender, onto the wire"),
        },
        Direction::Decapsulating => match step.layer_id.above() {
            Some(next) => writeln!(f, "Direction: receiver, up to Layer {next}"),
            None => writeln!(f, "Direction: receiver, to the mail client"),
        },
    }
}

fn playback_label(ctrl: &SimulationController) -> String {
    let state = if ctrl.is_playing() { "playing" } else { "paused" };
    match Speed::from_interval(ctrl.tick_interval()) {
        Some(speed) => format!("{state}, {}", speed.as_str()),
        None => format!("{state}, {}", ctrl.tick_interval()),
    }
}

fn paint(layer: &Layer, text: &str, color: bool) -> String {
    if color {
        format!("\x1b[{}m{text}\x1b[0m", layer.accent.ansi_code())
    } else {
        text.to_string()
    }
}

/// An informational view requested at the prompt.
pub struct InfoView {
    pub view: View,
    pub color: bool,
}

impl fmt::Display for InfoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view {
            View::Layers => {
                for layer in LAYERS.iter() {
                    writeln!(
                        f,
                        "Layer {} - {}: {}",
                        layer.id,
                        paint(layer, layer.name, self.color),
                        layer.description
                    )?;
                }
                Ok(())
            }
            View::Scenarios => {
                for scenario in SCENARIOS.iter() {
                    writeln!(
                        f,
                        "{:<10} {} - {} (e.g. {:?})",
                        scenario.id, scenario.name, scenario.description, scenario.example_message
                    )?;
                }
                Ok(())
            }
            View::Help => f.write_str(HELP),
        }
    }
}

const HELP: &str = "\
COMMANDS:
    send                Send the email (compose screen)
    start               Restart the walkthrough on the current message
    next, n, <Enter>    Next step
    prev, p             Previous step
    reset               Back to the first step, paused
    play                Play / pause
    auto                Toggle auto mode (needed for play to advance)
    speed <S>           fast, normal, slow or milliseconds
    message <TEXT>      Message used by `start`
    scenario <ID>       Select a scenario
    back                Return to the compose screen
    layers, scenarios   Show the catalogs
    help, quit
";
