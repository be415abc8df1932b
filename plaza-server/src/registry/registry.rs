use crate::error::{DeliveryError, RegistryError};
use crate::registry::registry_command::RegistryCommand;
use crate::registry::registry_handle::RegistryHandle;
use crate::transport::Outbox;
use plaza_core::{Participant, ParticipantId, Position, Roster, ServerEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::ops::Range;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Horizontal spawn range, so simultaneous joiners rarely overlap.
pub const SPAWN_X: Range<i32> = 50..750;
/// Vertical spawn range.
pub const SPAWN_Y: Range<i32> = 50..550;

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";
pub const MAX_DISPLAY_NAME_CHARS: usize = 32;

struct Member {
    participant: Participant,
    outbox: Outbox,
}

/// Owner of the participant table.
///
/// Runs as a single task and applies [`RegistryCommand`]s strictly in arrival
/// order, so every join, move and leave (and the broadcast it causes) is
/// observed whole by everyone else. Fan-out uses [`Outbox::deliver`], which
/// never waits on a recipient.
pub struct Registry {
    members: HashMap<ParticipantId, Member>,
    command_rx: mpsc::Receiver<RegistryCommand>,
    rng: StdRng,
}

impl Registry {
    pub fn new(command_rx: mpsc::Receiver<RegistryCommand>) -> Self {
        Self {
            members: HashMap::new(),
            command_rx,
            rng: StdRng::from_entropy(),
        }
    }

    /// Starts a registry task on the current runtime and returns its handle.
    pub fn spawn(queue: usize) -> RegistryHandle {
        let (tx, rx) = mpsc::channel(queue.max(1));
        tokio::spawn(Registry::new(rx).run());
        RegistryHandle::new(tx)
    }

    pub async fn run(mut self) {
        info!("Registry event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Registry event loop finished");
    }

    fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::Join {
                id,
                display_name,
                outbox,
                reply,
            } => {
                let _ = reply.send(self.join(id, &display_name, outbox));
            }

            RegistryCommand::Snapshot { reply } => {
                let _ = reply.send(self.roster());
            }

            RegistryCommand::Move {
                id,
                position,
                reply,
            } => {
                let _ = reply.send(self.move_to(id, position));
            }

            RegistryCommand::Leave { id, reply } => {
                let _ = reply.send(self.leave(id));
            }

            RegistryCommand::Lookup { id, reply } => {
                let participant = self.members.get(&id).map(|m| m.participant.clone());
                let _ = reply.send(participant);
            }

            RegistryCommand::Route { id, reply } => {
                let outbox = self.members.get(&id).map(|m| m.outbox.clone());
                let _ = reply.send(outbox);
            }

            RegistryCommand::Broadcast { event, reply } => {
                let _ = reply.send(self.broadcast(&event, None));
            }

            RegistryCommand::Count { reply } => {
                let _ = reply.send(self.members.len());
            }
        }
    }

    fn join(
        &mut self,
        id: ParticipantId,
        display_name: &str,
        outbox: Outbox,
    ) -> Result<Participant, RegistryError> {
        if self.members.contains_key(&id) {
            warn!("Refusing duplicate join for {}", id);
            return Err(RegistryError::AlreadyJoined(id));
        }

        let position = Position::new(self.rng.gen_range(SPAWN_X), self.rng.gen_range(SPAWN_Y));
        let participant = Participant::new(id, display_name_or_default(display_name), position);

        self.members.insert(
            id,
            Member {
                participant: participant.clone(),
                outbox: outbox.clone(),
            },
        );

        // the roster goes out first so the newcomer never sees a delta it cannot place
        if let Err(e) = outbox.deliver(ServerEvent::CurrentPlayers(self.roster())) {
            warn!("Could not hand roster to {}: {}", id, e);
        }
        self.broadcast(&ServerEvent::NewPlayer(participant.clone()), Some(id));

        info!(
            participant = %id,
            name = %participant.display_name,
            x = position.x,
            y = position.y,
            "Participant joined"
        );
        Ok(participant)
    }

    fn move_to(&mut self, id: ParticipantId, position: Position) -> bool {
        let Some(member) = self.members.get_mut(&id) else {
            debug!("Ignoring movement from unknown participant {}", id);
            return false;
        };

        member.participant.position = position;
        let moved = member.participant.clone();
        self.broadcast(&ServerEvent::PlayerMoved(moved), Some(id));
        true
    }

    fn leave(&mut self, id: ParticipantId) -> bool {
        if self.members.remove(&id).is_none() {
            return false;
        }

        self.broadcast(&ServerEvent::PlayerDisconnected(id), None);
        info!(participant = %id, remaining = self.members.len(), "Participant left");
        true
    }

    fn roster(&self) -> Roster {
        self.members
            .iter()
            .map(|(id, member)| (*id, member.participant.clone()))
            .collect()
    }

    fn broadcast(&self, event: &ServerEvent, except: Option<ParticipantId>) -> usize {
        let mut delivered = 0;

        for (id, member) in &self.members {
            if except == Some(*id) {
                continue;
            }

            match member.outbox.deliver(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e @ DeliveryError::Full(_)) => {
                    warn!("Dropping {} event: {}", event.event_name(), e)
                }
                Err(e @ DeliveryError::Closed(_)) => {
                    debug!("Dropping {} event: {}", event.event_name(), e)
                }
            }
        }

        delivered
    }
}

/// Trims the requested name, falls back to [`DEFAULT_DISPLAY_NAME`] when
/// blank and caps it at [`MAX_DISPLAY_NAME_CHARS`].
pub fn display_name_or_default(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        return DEFAULT_DISPLAY_NAME.to_owned();
    }
    name.chars().take(MAX_DISPLAY_NAME_CHARS).collect()
}
