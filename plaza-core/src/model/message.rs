//! Websocket wire format.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`. Frames
//! are decoded in two steps (envelope first, then `data` by event name) so
//! that signaling blobs can be captured as raw JSON without ever being parsed.

use crate::model::chat::ChatLine;
use crate::model::participant::{Participant, ParticipantId, Position};
use crate::model::signaling::{SignalEnvelope, SignalKind};
use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::HashMap;

/// Full room state keyed by participant id.
pub type Roster = HashMap<ParticipantId, Participant>;

const CONNECTED: &str = "connected";
const CURRENT_PLAYERS: &str = "currentPlayers";
const NEW_PLAYER: &str = "newPlayer";
const PLAYER_MOVEMENT: &str = "playerMovement";
const PLAYER_MOVED: &str = "playerMoved";
const CHAT_MESSAGE: &str = "chatMessage";
const PLAYER_DISCONNECTED: &str = "playerDisconnected";

const CLIENT_EVENTS: &[&str] = &[
    PLAYER_MOVEMENT,
    CHAT_MESSAGE,
    "webrtc-offer",
    "webrtc-answer",
    "webrtc-ice-candidate",
];

const SERVER_EVENTS: &[&str] = &[
    CONNECTED,
    CURRENT_PLAYERS,
    NEW_PLAYER,
    PLAYER_MOVED,
    CHAT_MESSAGE,
    PLAYER_DISCONNECTED,
    "webrtc-offer",
    "webrtc-answer",
    "webrtc-ice-candidate",
];

#[derive(Deserialize)]
struct Frame<'a> {
    event: String,
    #[serde(borrow)]
    data: &'a RawValue,
}

/// Messages a browser client sends to the server.
#[derive(Debug, Clone)]
pub enum ClientMessage {
    /// `playerMovement`: new position of the sender.
    Movement(Position),
    /// `chatMessage`: text for the whole room.
    Chat { text: String },
    /// `webrtc-offer` / `webrtc-answer` / `webrtc-ice-candidate`.
    Signal(SignalEnvelope),
}

#[derive(Deserialize)]
struct MovementData {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct ChatRequest {
    // older clients send `{sender, message}`; the sender is taken from the registry
    #[serde(alias = "message")]
    text: String,
}

#[derive(Serialize)]
struct ChatRequestRef<'a> {
    text: &'a str,
}

/// Outbound chat line. `message` repeats `text` for clients that still read
/// the older field.
#[derive(Serialize)]
struct ChatLineRef<'a> {
    from: ParticipantId,
    sender: &'a str,
    text: &'a str,
    message: &'a str,
}

impl ClientMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Movement(_) => PLAYER_MOVEMENT,
            Self::Chat { .. } => CHAT_MESSAGE,
            Self::Signal(envelope) => envelope.kind.event_name(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let frame: Frame<'_> = serde_json::from_str(json)?;
        let data = frame.data.get();

        match frame.event.as_str() {
            PLAYER_MOVEMENT => {
                let movement: MovementData = serde_json::from_str(data)?;
                Ok(Self::Movement(Position::from_coords(movement.x, movement.y)))
            }
            CHAT_MESSAGE => {
                let chat: ChatRequest = serde_json::from_str(data)?;
                Ok(Self::Chat { text: chat.text })
            }
            other => match SignalKind::from_event_name(other) {
                Some(kind) => {
                    let (target, payload) = parse_signal(kind, "target", data)?;
                    Ok(Self::Signal(SignalEnvelope::new(target, kind, payload)))
                }
                None => Err(serde_json::Error::unknown_variant(other, CLIENT_EVENTS)),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for ClientMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut frame = serializer.serialize_struct("Frame", 2)?;
        frame.serialize_field("event", self.event_name())?;
        match self {
            Self::Movement(position) => frame.serialize_field("data", position)?,
            Self::Chat { text } => {
                frame.serialize_field("data", &ChatRequestRef { text: text.as_str() })?
            }
            Self::Signal(envelope) => frame.serialize_field(
                "data",
                &SignalData {
                    peer_field: "target",
                    peer: envelope.target,
                    kind: envelope.kind,
                    payload: &*envelope.payload,
                },
            )?,
        }
        frame.end()
    }
}

#[derive(Serialize, Deserialize)]
struct Welcome {
    #[serde(rename = "playerId")]
    id: ParticipantId,
}

/// Events the server pushes to connected clients.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// First frame on every connection: the id the server assigned to it.
    Connected(ParticipantId),
    /// Sent once to a freshly joined client.
    CurrentPlayers(Roster),
    NewPlayer(Participant),
    PlayerMoved(Participant),
    Chat(ChatLine),
    /// Relayed negotiation step; `from` replaces the sender's `target`.
    Signal {
        kind: SignalKind,
        from: ParticipantId,
        payload: Box<RawValue>,
    },
    PlayerDisconnected(ParticipantId),
}

impl ServerEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => CONNECTED,
            Self::CurrentPlayers(_) => CURRENT_PLAYERS,
            Self::NewPlayer(_) => NEW_PLAYER,
            Self::PlayerMoved(_) => PLAYER_MOVED,
            Self::Chat(_) => CHAT_MESSAGE,
            Self::Signal { kind, .. } => kind.event_name(),
            Self::PlayerDisconnected(_) => PLAYER_DISCONNECTED,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let frame: Frame<'_> = serde_json::from_str(json)?;
        let data = frame.data.get();

        match frame.event.as_str() {
            CONNECTED => {
                let welcome: Welcome = serde_json::from_str(data)?;
                Ok(Self::Connected(welcome.id))
            }
            CURRENT_PLAYERS => Ok(Self::CurrentPlayers(serde_json::from_str(data)?)),
            NEW_PLAYER => Ok(Self::NewPlayer(serde_json::from_str(data)?)),
            PLAYER_MOVED => Ok(Self::PlayerMoved(serde_json::from_str(data)?)),
            CHAT_MESSAGE => Ok(Self::Chat(serde_json::from_str(data)?)),
            PLAYER_DISCONNECTED => Ok(Self::PlayerDisconnected(serde_json::from_str(data)?)),
            other => match SignalKind::from_event_name(other) {
                Some(kind) => {
                    let (from, payload) = parse_signal(kind, "from", data)?;
                    Ok(Self::Signal {
                        kind,
                        from,
                        payload,
                    })
                }
                None => Err(serde_json::Error::unknown_variant(other, SERVER_EVENTS)),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for ServerEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut frame = serializer.serialize_struct("Frame", 2)?;
        frame.serialize_field("event", self.event_name())?;
        match self {
            Self::Connected(id) => frame.serialize_field("data", &Welcome { id: *id })?,
            Self::CurrentPlayers(roster) => frame.serialize_field("data", roster)?,
            Self::NewPlayer(participant) | Self::PlayerMoved(participant) => {
                frame.serialize_field("data", participant)?
            }
            Self::Chat(line) => frame.serialize_field(
                "data",
                &ChatLineRef {
                    from: line.from,
                    sender: &line.sender,
                    text: &line.text,
                    message: &line.text,
                },
            )?,
            Self::Signal {
                kind,
                from,
                payload,
            } => frame.serialize_field(
                "data",
                &SignalData {
                    peer_field: "from",
                    peer: *from,
                    kind: *kind,
                    payload: &**payload,
                },
            )?,
            Self::PlayerDisconnected(id) => frame.serialize_field("data", id)?,
        }
        frame.end()
    }
}

/// `{<peer_field>: id, <payload_field>: <raw json>}` in either direction.
struct SignalData<'a> {
    peer_field: &'static str,
    peer: ParticipantId,
    kind: SignalKind,
    payload: &'a RawValue,
}

impl Serialize for SignalData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.peer_field, &self.peer)?;
        map.serialize_entry(self.kind.payload_field(), self.payload)?;
        map.end()
    }
}

fn parse_signal(
    kind: SignalKind,
    peer_field: &'static str,
    data: &str,
) -> Result<(ParticipantId, Box<RawValue>), serde_json::Error> {
    let mut fields: HashMap<String, Box<RawValue>> = serde_json::from_str(data)?;

    let peer = fields
        .remove(peer_field)
        .ok_or_else(|| serde_json::Error::missing_field(peer_field))?;
    let peer: ParticipantId = serde_json::from_str(peer.get())?;

    let payload = fields
        .remove(kind.payload_field())
        .ok_or_else(|| serde_json::Error::missing_field(kind.payload_field()))?;

    Ok((peer, payload))
}
