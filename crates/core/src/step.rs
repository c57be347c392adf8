//! Simulation steps and the data unit shown at each one.

use crate::layer::{Layer, LayerId};
use std::fmt;

/// Which way the data is moving through the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sender side, 7 -> 1: each layer wraps the data
    Encapsulating,
    /// Receiver side, 1 -> 7: each layer unwraps the data
    Decapsulating,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Encapsulating => "encapsulating",
            Direction::Decapsulating => "decapsulating",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data artifact at one layer in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUnit {
    /// What this layer receives
    pub service_data_unit: String,

    /// What this layer hands on after processing
    pub protocol_data_unit: String,

    /// Protocol fields this layer contributes, e.g. "Dst Port: 443"
    pub fields: &'static [&'static str],

    /// Protocol or envelope name, e.g. "TCP"
    pub envelope_name: Option<&'static str>,
}

impl DataUnit {
    /// A data unit that changes nothing.
    ///
    /// Used for layer numbers that have no envelope of their own.
    pub fn passthrough(message: &str) -> Self {
        Self {
            service_data_unit: message.to_string(),
            protocol_data_unit: message.to_string(),
            fields: &[],
            envelope_name: Some("Generic"),
        }
    }

    /// The same unit seen from the receiving side: what arrives is the wrapped
    /// text, what leaves is the unwrapped text.
    pub fn reversed(&self) -> Self {
        Self {
            service_data_unit: self.protocol_data_unit.clone(),
            protocol_data_unit: self.service_data_unit.clone(),
            fields: self.fields,
            envelope_name: self.envelope_name,
        }
    }

    /// Field labels without their values ("Src Port: 5050" -> "Src Port").
    pub fn field_labels(&self) -> impl Iterator<Item = &'static str> {
        let fields: &'static [&'static str] = self.fields;
        fields
            .iter()
            .copied()
            .map(|field| field.split(':').next().unwrap_or(field).trim())
    }
}

/// One step of the walkthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationStep {
    pub layer_id: LayerId,
    pub direction: Direction,
    pub data_unit: DataUnit,
    pub explanation: String,
}

impl SimulationStep {
    /// Catalog entry for this step's layer.
    pub fn layer(&self) -> &'static Layer {
        self.layer_id.layer()
    }
}
