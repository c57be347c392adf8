//! osi-sim-core: Educational walkthrough of OSI encapsulation
//!
//! This library provides the core of a teaching tool that follows one message
//! (a student's email to a teacher) through the seven OSI layers:
//! - Wraps the message layer by layer from 7 down to 1 (encapsulation)
//! - Unwraps it again from 1 back up to 7 (decapsulation)
//! - Lets a front end step, play and rewind through the walkthrough
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `layer`: The seven-layer catalog
//! - `scenario`: Named scenarios and their example messages
//! - `email`: The email the story revolves around
//! - `step`: Data units and simulation steps
//! - `generator`: Pure step generation
//! - `timer`: Playback speed and the auto-advance timer
//! - `controller`: The state machine a front end drives
//! - `stats`: Observable session behavior
//!
//! # Design Principles
//!
//! - **No panics**: Transitions never fail; bad input is clamped or ignored
//! - **Deterministic**: Same message, same steps; virtual time drives playback
//! - **Single writer**: One controller owns all mutable state
//! - **Observable**: Every transition is logged through `tracing`

pub mod controller;
pub mod email;
pub mod error;
pub mod generator;
pub mod layer;
pub mod scenario;
pub mod stats;
pub mod step;
pub mod timer;

// Re-export commonly used types
pub use controller::{NarrativeScreen, SimulationController};
pub use error::{Error, Result};
pub use layer::{Layer, LayerId, LAYERS};
pub use scenario::{Scenario, SCENARIOS};
pub use step::{DataUnit, Direction, SimulationStep};
pub use timer::{Speed, TickInterval};
