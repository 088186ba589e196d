//! Read-only lobby snapshot endpoint.

use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::game::LobbySnapshot, services::public_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/lobby",
    responses((status = 200, description = "Current session snapshot", body = LobbySnapshot))
)]
/// Return the current phase, round progress, and leaderboard.
pub async fn lobby(State(state): State<SharedState>) -> Json<LobbySnapshot> {
    let snapshot = public_service::lobby_snapshot(&state).await;
    Json(snapshot)
}

/// Configure the public routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/lobby", get(lobby))
}
