//! Client WebSocket lifecycle: connection setup, inbound dispatch, teardown.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    detect::ImagePayload,
    dto::ws::ClientMessage,
    services::{game_events, game_service, score_service, submission_service},
    state::{ClientConnection, SharedState},
};

/// Handle the full lifecycle for an individual client WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps broadcasts flowing even while we await
    // inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let connection_id = Uuid::new_v4();
    // Registered before any join: spectator screens receive lobby and timer
    // broadcasts without ever becoming players.
    state.clients().insert(ClientConnection {
        id: connection_id,
        tx: outbound_tx.clone(),
    });
    info!(id = %connection_id, "client connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientMessage::from_json_str(&text) {
                Ok(request) => dispatch(&state, connection_id, request).await,
                Err(err) => {
                    warn!(id = %connection_id, error = %err, "dropping bad client message");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(id = %connection_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.clients().remove(connection_id);
    if state.players().leave(connection_id).await {
        game_events::broadcast_lobby_update(&state).await;
    }
    info!(id = %connection_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Route one parsed client request.
async fn dispatch(state: &SharedState, connection_id: Uuid, request: ClientMessage) {
    match request {
        ClientMessage::PlayerJoin { name } => {
            if state
                .players()
                .join(connection_id, &name, state.config())
                .await
            {
                info!(id = %connection_id, name = %name, "player joined");
                score_service::persist_scores(state).await;
                game_events::broadcast_lobby_update(state).await;
            } else {
                debug!(id = %connection_id, "duplicate join ignored");
            }
        }
        ClientMessage::PlayerExit => {
            if state.players().leave(connection_id).await {
                info!(id = %connection_id, "player exited");
                game_events::unicast_force_disconnect(state, connection_id);
                game_events::broadcast_lobby_update(state).await;
            }
        }
        ClientMessage::RequestStart { duration } => {
            if let Err(err) = game_service::start_game(state, duration.as_ref()).await {
                debug!(id = %connection_id, error = %err, "start request ignored");
            }
        }
        ClientMessage::RequestLobbyReturn => {
            game_service::return_to_lobby(state).await;
        }
        ClientMessage::ImageSubmission { image } => {
            // Detection can be slow; run it off the read loop so this client
            // keeps ponging and other submissions are never queued behind it.
            let state = state.clone();
            tokio::spawn(async move {
                let outcome = submission_service::handle_submission(
                    &state,
                    connection_id,
                    ImagePayload::new(image),
                )
                .await;
                if let Some((success, msg)) = outcome.ack() {
                    game_events::unicast_upload_ack(&state, connection_id, success, msg);
                }
            });
        }
        ClientMessage::Unknown => {
            warn!(id = %connection_id, "ignoring unknown message type");
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
