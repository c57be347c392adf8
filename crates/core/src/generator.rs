//! Step generation: the full encapsulation/decapsulation walkthrough.
//!
//! # Algorithm
//!
//! 1. Walk the catalog 7 -> 1. Each layer receives the previous layer's PDU
//!    (the raw message at layer 7) and wraps it in its envelope.
//! 2. Walk the catalog 1 -> 7, replaying each encapsulation unit reversed:
//!    the receiver gets the wrapped text and strips the envelope.
//! 3. Concatenate: 7 encapsulating steps, then 7 decapsulating steps.
//!
//! # Envelopes
//!
//! Every layer adds a fixed exemplar envelope and field list. Nothing here is
//! real protocol logic; the point is the shape of encapsulation, so the same
//! layer always adds the same markers regardless of scenario.
//!
//! # Chaining
//!
//! ```text
//! L7  sdu = message                    pdu = "HTTP Request: " + sdu
//! L6  sdu = pdu(L7)                    pdu = "[UTF-8][ZIP][AES-256] " + sdu
//! ...
//! L1  sdu = pdu(L2)                    pdu = "[Signal <bits>] " + sdu
//! ```

use crate::layer::{LayerId, LAYERS};
use crate::step::{DataUnit, Direction, SimulationStep};
use tracing::debug;

/// Number of leading bytes rendered as bits in the physical layer marker
const SIGNAL_PREVIEW_BYTES: usize = 4;

/// Generate the complete walkthrough for a message.
///
/// Pure and deterministic. The scenario doesn't change envelope content; it
/// is accepted so callers can hand over their whole selection.
pub fn generate(message: &str, scenario_id: &str) -> Vec<SimulationStep> {
    let mut steps = Vec::with_capacity(LAYERS.len() * 2);
    let mut units = Vec::with_capacity(LAYERS.len());

    let mut sdu = message.to_string();
    for layer in LAYERS.iter() {
        let unit = encapsulate(layer.id, &sdu);
        sdu = unit.protocol_data_unit.clone();

        steps.push(SimulationStep {
            layer_id: layer.id,
            direction: Direction::Encapsulating,
            data_unit: unit.clone(),
            explanation: format!(
                "Layer {} ({}): {}",
                layer.id, layer.name, layer.process_text
            ),
        });
        units.push(unit);
    }

    for (layer, unit) in LAYERS.iter().rev().zip(units.iter().rev()) {
        steps.push(SimulationStep {
            layer_id: layer.id,
            direction: Direction::Decapsulating,
            data_unit: unit.reversed(),
            explanation: format!(
                "Layer {} ({}): Removes the header and processes the data",
                layer.id, layer.name
            ),
        });
    }

    debug!(
        scenario = scenario_id,
        message_len = message.len(),
        steps = steps.len(),
        "Generated walkthrough"
    );

    steps
}

/// Data unit for a raw layer number.
///
/// Numbers outside 1..=7 pass the input through unchanged under a "Generic"
/// envelope.
pub fn data_unit_for(layer_id: u8, sdu: &str) -> DataUnit {
    match LayerId::try_from(layer_id) {
        Ok(id) => encapsulate(id, sdu),
        Err(_) => DataUnit::passthrough(sdu),
    }
}

/// Wrap `sdu` in the envelope of `layer`.
pub fn encapsulate(layer: LayerId, sdu: &str) -> DataUnit {
    let protocol_data_unit = match layer {
        LayerId::Application => format!("HTTP Request: {sdu}"),
        LayerId::Presentation => format!("[UTF-8][ZIP][AES-256] {sdu}"),
        LayerId::Session => format!("[Session] {sdu}"),
        LayerId::Transport => format!("[TCP] {sdu}"),
        LayerId::Network => format!("[IP] {sdu}"),
        LayerId::DataLink => format!("[Ethernet] {sdu}"),
        LayerId::Physical => {
            format!("[Signal {}...] {sdu}", bit_preview(sdu, SIGNAL_PREVIEW_BYTES))
        }
    };

    DataUnit {
        service_data_unit: sdu.to_string(),
        protocol_data_unit,
        fields: envelope_fields(layer),
        envelope_name: Some(envelope_name(layer)),
    }
}

fn envelope_name(layer: LayerId) -> &'static str {
    match layer {
        LayerId::Application => "HTTP",
        LayerId::Presentation => "SSL/TLS",
        LayerId::Session => "Session",
        LayerId::Transport => "TCP",
        LayerId::Network => "IP",
        LayerId::DataLink => "Ethernet",
        LayerId::Physical => "Physical",
    }
}

fn envelope_fields(layer: LayerId) -> &'static [&'static str] {
    match layer {
        LayerId::Application => &[
            "Host: example.com",
            "User-Agent: Browser",
            "Content-Type: text/html",
        ],
        LayerId::Presentation => &[
            "Encoding: UTF-8",
            "Compression: ZIP",
            "Encryption: AES-256",
        ],
        LayerId::Session => &["Session ID: 12345", "Keep-Alive: 300s"],
        LayerId::Transport => &["Src Port: 5050", "Dst Port: 443", "Seq: 001", "ACK: 0"],
        LayerId::Network => &["Src IP: 192.168.1.100", "Dst IP: 8.8.8.8", "TTL: 64"],
        LayerId::DataLink => &["Src MAC: AA:BB:CC:DD:EE:FF", "Dst MAC: 11:22:33:44:55:66"],
        LayerId::Physical => &["Frequency: 2.4GHz", "Signal: +/-5V", "Bits/sec: 1Gbps"],
    }
}

/// Render the first `max_bytes` bytes of `text` as space-separated bit groups.
fn bit_preview(text: &str, max_bytes: usize) -> String {
    text.bytes()
        .take(max_bytes)
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}
