use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Upper bound on chat text, counted in characters.
pub const MAX_CHAT_CHARS: usize = 200;

/// A chat line as fanned out to the room.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub from: ParticipantId,
    pub sender: String,
    pub text: String,
}

impl ChatLine {
    /// Builds a line from raw client text. Returns `None` when nothing but
    /// whitespace was sent; longer text is cut at [`MAX_CHAT_CHARS`].
    pub fn new(from: ParticipantId, sender: impl Into<String>, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let text = match text.char_indices().nth(MAX_CHAT_CHARS) {
            Some((cut, _)) => &text[..cut],
            None => text,
        };

        Some(Self {
            from,
            sender: sender.into(),
            text: text.to_owned(),
        })
    }
}
