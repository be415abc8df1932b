use plaza_core::ParticipantId;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The coordinator task has stopped; nothing can be joined or looked up.
    #[error("registry is no longer running")]
    Unavailable,

    #[error("participant {0} is already registered")]
    AlreadyJoined(ParticipantId),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbox of {0} is full")]
    Full(ParticipantId),

    #[error("outbox of {0} is closed")]
    Closed(ParticipantId),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("connection {id} cannot become active from {state:?}")]
pub struct LifecycleError {
    pub id: ParticipantId,
    pub state: crate::transport::ConnectionState,
}
