use crate::error::RegistryError;
use crate::transport::Outbox;
use plaza_core::{Participant, ParticipantId, Position, Roster, ServerEvent};
use tokio::sync::oneshot;

/// Requests served by the [`crate::Registry`] task, one at a time.
#[derive(Debug)]
pub enum RegistryCommand {
    /// A connection finished its upgrade and wants a presence record.
    Join {
        id: ParticipantId,
        display_name: String,
        outbox: Outbox,
        reply: oneshot::Sender<Result<Participant, RegistryError>>,
    },

    /// Point-in-time copy of every record.
    Snapshot { reply: oneshot::Sender<Roster> },

    /// Position update from the owning connection. Replies whether a record
    /// was updated.
    Move {
        id: ParticipantId,
        position: Position,
        reply: oneshot::Sender<bool>,
    },

    /// Connection closed. Replies whether a record was removed.
    Leave {
        id: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    /// Current record of one participant.
    Lookup {
        id: ParticipantId,
        reply: oneshot::Sender<Option<Participant>>,
    },

    /// Delivery handle of an active participant, used to relay to it.
    Route {
        id: ParticipantId,
        reply: oneshot::Sender<Option<Outbox>>,
    },

    /// Push an event to every active participant. Replies with the number of
    /// outboxes that accepted it.
    Broadcast {
        event: ServerEvent,
        reply: oneshot::Sender<usize>,
    },

    Count { reply: oneshot::Sender<usize> },
}
