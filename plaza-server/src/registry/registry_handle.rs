use crate::error::RegistryError;
use crate::registry::registry_command::RegistryCommand;
use crate::transport::Outbox;
use plaza_core::{Participant, ParticipantId, Position, Roster, ServerEvent};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to the [`crate::Registry`] task.
///
/// Every method is a request/reply round trip through the registry queue, so
/// calls made by one task are applied in the order they were made.
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    command_tx: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    pub fn new(command_tx: mpsc::Sender<RegistryCommand>) -> Self {
        Self { command_tx }
    }

    /// Registers a connection. The new record is broadcast to everyone else
    /// and the full roster is queued on `outbox` before this returns.
    pub async fn join(
        &self,
        id: ParticipantId,
        display_name: impl Into<String>,
        outbox: Outbox,
    ) -> Result<Participant, RegistryError> {
        let display_name = display_name.into();
        self.request(|reply| RegistryCommand::Join {
            id,
            display_name,
            outbox,
            reply,
        })
        .await?
    }

    pub async fn snapshot(&self) -> Result<Roster, RegistryError> {
        self.request(|reply| RegistryCommand::Snapshot { reply }).await
    }

    /// Updates the position of `id` and tells everyone but the mover.
    /// Unknown ids are ignored and yield `Ok(false)`.
    pub async fn move_to(
        &self,
        id: ParticipantId,
        position: Position,
    ) -> Result<bool, RegistryError> {
        self.request(|reply| RegistryCommand::Move {
            id,
            position,
            reply,
        })
        .await
    }

    /// Removes `id` and announces the departure. Returns `Ok(false)` if it
    /// was already gone, in which case nothing is broadcast.
    pub async fn leave(&self, id: ParticipantId) -> Result<bool, RegistryError> {
        self.request(|reply| RegistryCommand::Leave { id, reply }).await
    }

    pub async fn participant(
        &self,
        id: ParticipantId,
    ) -> Result<Option<Participant>, RegistryError> {
        self.request(|reply| RegistryCommand::Lookup { id, reply }).await
    }

    pub async fn display_name(&self, id: ParticipantId) -> Result<Option<String>, RegistryError> {
        Ok(self.participant(id).await?.map(|p| p.display_name))
    }

    /// Delivery handle for `id` if it is currently active.
    pub async fn outbox(&self, id: ParticipantId) -> Result<Option<Outbox>, RegistryError> {
        self.request(|reply| RegistryCommand::Route { id, reply }).await
    }

    /// Pushes `event` to every active participant, sender included.
    pub async fn broadcast(&self, event: ServerEvent) -> Result<usize, RegistryError> {
        self.request(|reply| RegistryCommand::Broadcast { event, reply }).await
    }

    pub async fn len(&self) -> Result<usize, RegistryError> {
        self.request(|reply| RegistryCommand::Count { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RegistryCommand,
    ) -> Result<T, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| RegistryError::Unavailable)?;
        rx.await.map_err(|_| RegistryError::Unavailable)
    }
}
