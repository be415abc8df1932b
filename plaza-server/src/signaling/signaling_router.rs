use crate::error::{DeliveryError, RegistryError};
use crate::registry::RegistryHandle;
use plaza_core::{ChatLine, ParticipantId, ServerEvent, SignalEnvelope, SignalKind};
use serde_json::value::RawValue;
use tracing::{debug, warn};

/// Point-to-point relay for WebRTC negotiation plus room-wide chat fan-out.
///
/// Holds no state of its own; targets are resolved through the registry at
/// the moment of relaying, so a peer that already left is simply skipped.
#[derive(Clone, Debug)]
pub struct SignalingRouter {
    registry: RegistryHandle,
}

impl SignalingRouter {
    pub fn new(registry: RegistryHandle) -> Self {
        Self { registry }
    }

    /// Forwards `envelope` to its target with `from` stamped as the sender.
    ///
    /// Returns `Ok(false)` when the target is not connected or its outbox
    /// refused the event. Nobody but the target ever sees the payload.
    pub async fn relay(
        &self,
        from: ParticipantId,
        envelope: SignalEnvelope,
    ) -> Result<bool, RegistryError> {
        let SignalEnvelope {
            target,
            kind,
            payload,
        } = envelope;

        let Some(outbox) = self.registry.outbox(target).await? else {
            debug!(
                "Dropping {} from {}: target {} is not connected",
                kind.event_name(),
                from,
                target
            );
            return Ok(false);
        };

        match outbox.deliver(ServerEvent::Signal {
            kind,
            from,
            payload,
        }) {
            Ok(()) => {
                debug!("Relayed {} from {} to {}", kind.event_name(), from, target);
                Ok(true)
            }
            Err(e @ DeliveryError::Full(_)) => {
                warn!("Dropping {} from {}: {}", kind.event_name(), from, e);
                Ok(false)
            }
            Err(e @ DeliveryError::Closed(_)) => {
                debug!("Dropping {} from {}: {}", kind.event_name(), from, e);
                Ok(false)
            }
        }
    }

    pub async fn relay_offer(
        &self,
        from: ParticipantId,
        target: ParticipantId,
        offer: Box<RawValue>,
    ) -> Result<bool, RegistryError> {
        self.relay(from, SignalEnvelope::new(target, SignalKind::Offer, offer))
            .await
    }

    pub async fn relay_answer(
        &self,
        from: ParticipantId,
        target: ParticipantId,
        answer: Box<RawValue>,
    ) -> Result<bool, RegistryError> {
        self.relay(from, SignalEnvelope::new(target, SignalKind::Answer, answer))
            .await
    }

    pub async fn relay_ice_candidate(
        &self,
        from: ParticipantId,
        target: ParticipantId,
        candidate: Box<RawValue>,
    ) -> Result<bool, RegistryError> {
        let envelope = SignalEnvelope::new(target, SignalKind::IceCandidate, candidate);
        self.relay(from, envelope).await
    }

    /// Sends a chat line from `from` to every participant, the sender
    /// included. Blank text and unknown senders are dropped; the return value
    /// is the number of outboxes that accepted the line.
    pub async fn broadcast_chat(
        &self,
        from: ParticipantId,
        text: &str,
    ) -> Result<usize, RegistryError> {
        let Some(sender) = self.registry.display_name(from).await? else {
            debug!("Ignoring chat from unknown participant {}", from);
            return Ok(0);
        };

        let Some(line) = ChatLine::new(from, sender, text) else {
            debug!("Ignoring blank chat from {}", from);
            return Ok(0);
        };

        self.registry.broadcast(ServerEvent::Chat(line)).await
    }
}
