use crate::error::DeliveryError;
use plaza_core::{ParticipantId, ServerEvent};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Bounded outbound queue of a single connection.
///
/// Delivery never waits: when the queue is full or its writer is gone the
/// event is handed back as an error and the caller moves on to the next
/// recipient.
#[derive(Debug, Clone)]
pub struct Outbox {
    owner: ParticipantId,
    tx: mpsc::Sender<ServerEvent>,
}

impl Outbox {
    pub fn channel(owner: ParticipantId, capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { owner, tx }, rx)
    }

    pub fn deliver(&self, event: ServerEvent) -> Result<(), DeliveryError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full(self.owner),
            TrySendError::Closed(_) => DeliveryError::Closed(self.owner),
        })
    }
}
