use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Connection-scoped identifier. A fresh one is minted for every socket and
/// never handed out again, so a reconnecting client is a new participant.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ParticipantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point on the 2D room floor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clients report sprite coordinates as arbitrary JSON numbers; round them
    /// onto the integer grid. Out-of-range values saturate.
    pub fn from_coords(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

/// Server-side presence record of one connected client.
///
/// Serialized with the field names browser clients already consume:
/// `{"playerId": .., "playerName": .., "x": .., "y": ..}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Participant {
    #[serde(rename = "playerId")]
    pub id: ParticipantId,
    #[serde(rename = "playerName")]
    pub display_name: String,
    #[serde(flatten)]
    pub position: Position,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position,
        }
    }
}
