//! Presence registry and signaling relay for a shared virtual room.
//!
//! A single coordinator task owns the participant table ([`Registry`]); every
//! websocket connection talks to it through a cloneable [`RegistryHandle`].
//! [`SignalingRouter`] forwards WebRTC negotiation messages between two
//! participants and fans chat out to the whole room.

mod app;
mod config;
mod error;
mod registry;
mod signaling;
mod transport;

pub use app::*;
pub use config::*;
pub use error::*;
pub use registry::*;
pub use signaling::*;
pub use transport::*;
