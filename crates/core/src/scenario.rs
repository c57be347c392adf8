//! Scenario catalog.
//!
//! A scenario only seeds the default message shown to the user; the envelopes
//! added at each layer are the same for every scenario.

use crate::error::{Error, Result};

/// One named scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub example_message: &'static str,
}

/// Scenario selected when nothing else has been chosen.
pub const DEFAULT_SCENARIO_ID: &str = "download";

/// All known scenarios, in menu order.
pub static SCENARIOS: [Scenario; 2] = [
    Scenario {
        id: "download",
        name: "Secure Download",
        description: "Downloading a file over HTTPS",
        example_message: "GET /file.pdf HTTP/1.1",
    },
    Scenario {
        id: "email",
        name: "Secure Email",
        description: "Sending an encrypted email",
        example_message: "Hi! The report is attached.",
    },
];

/// Look up a scenario by id.
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// Look up a scenario by id, failing on unknown ids.
pub fn lookup(id: &str) -> Result<&'static Scenario> {
    find(id).ok_or_else(|| Error::UnknownScenario(id.to_string()))
}

/// Seed message for a scenario id; unknown ids seed an empty message.
pub fn default_message(id: &str) -> &'static str {
    find(id).map_or("", |s| s.example_message)
}
