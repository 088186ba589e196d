//! Client-facing event fan-out.
//!
//! One function per event the engine can emit; the core always goes through
//! these instead of touching sockets directly.

use uuid::Uuid;

use crate::{
    dto::{game::LobbyPlayer, ws::ServerMessage},
    state::SharedState,
};

/// Game event name for a successful capture.
pub const EVENT_CAPTURE: &str = "capture";

/// Broadcast the current leaderboard to everyone.
pub async fn broadcast_lobby_update(state: &SharedState) {
    let players = state.players().scoreboard().await;
    state.clients().broadcast(&ServerMessage::LobbyUpdate { players });
}

/// Broadcast the pre-game countdown signal.
pub fn broadcast_game_start(state: &SharedState) {
    state.clients().broadcast(&ServerMessage::GameStartSequence);
}

/// Broadcast one countdown tick.
pub fn broadcast_timer_tick(state: &SharedState, time_left: u64, total: u64) {
    state
        .clients()
        .broadcast(&ServerMessage::TimerTick { time_left, total });
}

/// Broadcast that a player captured their target this round.
pub fn broadcast_capture(state: &SharedState, player: &str) {
    state.clients().broadcast(&ServerMessage::GameEvent {
        event: EVENT_CAPTURE.into(),
        player: player.to_string(),
    });
}

/// Broadcast the final results.
pub fn broadcast_game_over(
    state: &SharedState,
    winner: String,
    score: u32,
    leaderboard: Vec<LobbyPlayer>,
) {
    state.clients().broadcast(&ServerMessage::GameOver {
        winner,
        score,
        leaderboard,
    });
}

/// Broadcast the return-to-lobby signal.
pub fn broadcast_return_to_lobby(state: &SharedState) {
    state.clients().broadcast(&ServerMessage::ReturnToLobby);
}

/// Send one player their private round kick-off. Targets are uppercased for
/// display at this boundary only.
pub fn unicast_round_start(state: &SharedState, connection_id: Uuid, round: u32, target: &str) {
    state.clients().send_to(
        connection_id,
        &ServerMessage::RoundStart {
            round,
            target: target.to_uppercase(),
        },
    );
}

/// Send one player the acknowledgment for their submission.
pub fn unicast_upload_ack(state: &SharedState, connection_id: Uuid, success: bool, msg: String) {
    state
        .clients()
        .send_to(connection_id, &ServerMessage::UploadAck { success, msg });
}

/// Order one client to drop its connection after an explicit exit.
pub fn unicast_force_disconnect(state: &SharedState, connection_id: Uuid) {
    state
        .clients()
        .send_to(connection_id, &ServerMessage::ForceDisconnect);
}
