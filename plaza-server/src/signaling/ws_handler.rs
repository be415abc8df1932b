use crate::app::AppState;
use crate::error::RegistryError;
use crate::transport::{Outbox, Session};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use plaza_core::{ClientMessage, ParticipantId, ServerEvent};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// Query string of the websocket upgrade, e.g. `/ws?name=Ada`.
#[derive(Debug, Default, Deserialize)]
pub struct JoinParams {
    pub name: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_default();

    ws.on_upgrade(move |socket| handle_socket(socket, name, state))
}

async fn handle_socket(socket: WebSocket, name: String, state: AppState) {
    let mut session = Session::new();
    let id = session.id();
    info!("New WebSocket connection: {}", id);

    let (mut sender, mut receiver) = socket.split();
    let (outbox, mut rx) = Outbox::channel(id, state.config.outbox_capacity);

    // queued ahead of the roster, which join pushes before replying
    if let Err(e) = outbox.deliver(ServerEvent::Connected(id)) {
        error!("Could not greet {}: {}", id, e);
        return;
    }
    if let Err(e) = state.registry.join(id, name, outbox).await {
        error!("Could not register {}: {}", id, e);
        let _ = sender.send(Message::Close(None)).await;
        return;
    }
    if let Err(e) = session.activate() {
        error!("{}", e);
        let _ = state.registry.leave(id).await;
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {} event: {}", event.event_name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientMessage::from_json(&text) {
                        Ok(msg) => {
                            if let Err(e) = handle_client_message(&state, id, msg).await {
                                error!("Registry died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid message from {}: {}", id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if session.close()
        && let Err(e) = state.registry.leave(id).await
    {
        error!("Could not unregister {}: {}", id, e);
    }
    info!("WebSocket disconnected: {}", id);
}

/// Applies one inbound message on behalf of `from`.
///
/// Only a stopped registry is an error; messages that cannot be acted on
/// (unknown target, blank chat) are dropped silently.
pub async fn handle_client_message(
    state: &AppState,
    from: ParticipantId,
    msg: ClientMessage,
) -> Result<(), RegistryError> {
    match msg {
        ClientMessage::Movement(position) => {
            state.registry.move_to(from, position).await?;
        }
        ClientMessage::Chat { text } => {
            let delivered = state.router.broadcast_chat(from, &text).await?;
            debug!("Chat from {} reached {} participants", from, delivered);
        }
        ClientMessage::Signal(envelope) => {
            state.router.relay(from, envelope).await?;
        }
    }
    Ok(())
}
