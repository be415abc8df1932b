mod chat;
mod message;
mod participant;
mod signaling;

pub use chat::{ChatLine, MAX_CHAT_CHARS};
pub use message::{ClientMessage, Roster, ServerEvent};
pub use participant::{Participant, ParticipantId, Position};
pub use signaling::{SignalEnvelope, SignalKind};
