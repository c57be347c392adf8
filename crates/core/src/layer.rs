//! The seven OSI layers and their display metadata.
//!
//! The catalog is static reference data: it is ordered from the application
//! layer (7) down to the physical layer (1), which is also the order in which
//! a message is encapsulated.

use crate::error::{Error, Result};
use std::fmt;

/// Identity of one OSI layer.
///
/// The discriminant is the layer number, so `LayerId::Application as u8 == 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LayerId {
    Physical = 1,
    DataLink = 2,
    Network = 3,
    Transport = 4,
    Session = 5,
    Presentation = 6,
    Application = 7,
}

impl LayerId {
    /// All layers in encapsulation order (7 down to 1).
    pub const ALL_DESCENDING: [LayerId; 7] = [
        LayerId::Application,
        LayerId::Presentation,
        LayerId::Session,
        LayerId::Transport,
        LayerId::Network,
        LayerId::DataLink,
        LayerId::Physical,
    ];

    /// The layer number, 1..=7.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The layer directly beneath this one, if any.
    pub fn below(self) -> Option<LayerId> {
        LayerId::try_from(self.number() - 1).ok()
    }

    /// The layer directly above this one, if any.
    pub fn above(self) -> Option<LayerId> {
        LayerId::try_from(self.number() + 1).ok()
    }

    /// Catalog entry for this layer.
    pub fn layer(self) -> &'static Layer {
        // Catalog is indexed in descending order: layer 7 sits at index 0.
        &LAYERS[(7 - self.number()) as usize]
    }
}

impl TryFrom<u8> for LayerId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(LayerId::Physical),
            2 => Ok(LayerId::DataLink),
            3 => Ok(LayerId::Network),
            4 => Ok(LayerId::Transport),
            5 => Ok(LayerId::Session),
            6 => Ok(LayerId::Presentation),
            7 => Ok(LayerId::Application),
            other => Err(Error::InvalidLayerId(other)),
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Display-only colour token attached to each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Purple,
    Pink,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Accent {
    /// ANSI SGR foreground code closest to the accent.
    pub fn ansi_code(self) -> u8 {
        match self {
            Accent::Purple => 35,
            Accent::Pink => 95,
            Accent::Blue => 34,
            Accent::Green => 32,
            Accent::Yellow => 33,
            Accent::Orange => 93,
            Accent::Red => 31,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub name: &'static str,
    pub description: &'static str,
    /// What this layer does to the data on the way down
    pub process_text: &'static str,
    pub accent: Accent,
}

/// The layer catalog, ordered 7 -> 1.
pub static LAYERS: [Layer; 7] = [
    Layer {
        id: LayerId::Application,
        name: "Application",
        description: "Interface between the user and network applications",
        process_text: "Builds an HTTPS request carrying the user's data",
        accent: Accent::Purple,
    },
    Layer {
        id: LayerId::Presentation,
        name: "Presentation",
        description: "Encoding, compression and encryption",
        process_text: "Encodes as UTF-8, compresses (ZIP) and encrypts (AES-256)",
        accent: Accent::Pink,
    },
    Layer {
        id: LayerId::Session,
        name: "Session",
        description: "Opens, manages and closes sessions between hosts",
        process_text: "Establishes a secure SSL/TLS session",
        accent: Accent::Blue,
    },
    Layer {
        id: LayerId::Transport,
        name: "Transport",
        description: "Flow control and segmentation",
        process_text: "Adds a TCP header with ports and control data",
        accent: Accent::Green,
    },
    Layer {
        id: LayerId::Network,
        name: "Network",
        description: "Routing between networks",
        process_text: "Adds an IP header with source and destination addresses",
        accent: Accent::Yellow,
    },
    Layer {
        id: LayerId::DataLink,
        name: "Data Link",
        description: "Access control for the physical medium",
        process_text: "Adds an Ethernet header with MAC addresses",
        accent: Accent::Orange,
    },
    Layer {
        id: LayerId::Physical,
        name: "Physical",
        description: "Transmission of raw bits",
        process_text: "Converts the frame into electrical or optical signals",
        accent: Accent::Red,
    },
];

/// Look up a layer by its raw number.
pub fn find(id: u8) -> Option<&'static Layer> {
    LayerId::try_from(id).ok().map(LayerId::layer)
}
