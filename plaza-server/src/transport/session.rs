use crate::error::LifecycleError;
use plaza_core::ParticipantId;

/// Where a websocket connection is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgrade done, not yet in the registry.
    Connecting,
    /// Registered; the only state in which inbound messages are acted on.
    Active,
    /// Terminal.
    Closed,
}

/// Lifecycle of one connection: `Connecting -> Active -> Closed`.
///
/// [`Session::close`] reports whether the connection had been registered, so
/// the caller issues exactly one leave no matter how often the socket is torn
/// down.
#[derive(Debug)]
pub struct Session {
    id: ParticipantId,
    state: ConnectionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: ParticipantId::new(),
            state: ConnectionState::Connecting,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.state == ConnectionState::Active
    }

    pub fn activate(&mut self) -> Result<(), LifecycleError> {
        if self.state != ConnectionState::Connecting {
            return Err(LifecycleError {
                id: self.id,
                state: self.state,
            });
        }
        self.state = ConnectionState::Active;
        Ok(())
    }

    /// Moves to `Closed`. Returns `true` only on the first close of an active
    /// connection.
    pub fn close(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ConnectionState::Closed;
        was_active
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
