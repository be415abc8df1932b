use crate::model::participant::ParticipantId;
use serde_json::value::RawValue;

/// WebRTC negotiation step carried by a [`SignalEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [Self::Offer, Self::Answer, Self::IceCandidate];

    /// Websocket event name used in both directions.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Offer => "webrtc-offer",
            Self::Answer => "webrtc-answer",
            Self::IceCandidate => "webrtc-ice-candidate",
        }
    }

    /// Name of the field holding the opaque blob (`offer`, `answer` or `candidate`).
    pub fn payload_field(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "candidate",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_name() == name)
    }
}

/// Addressed signaling message. The payload is kept as raw JSON text and is
/// never parsed by the server.
#[derive(Debug, Clone)]
pub struct SignalEnvelope {
    pub target: ParticipantId,
    pub kind: SignalKind,
    pub payload: Box<RawValue>,
}

impl SignalEnvelope {
    pub fn new(target: ParticipantId, kind: SignalKind, payload: Box<RawValue>) -> Self {
        Self {
            target,
            kind,
            payload,
        }
    }
}
