//! Health check service.

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the current health status of the backend.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        phase: state.session_phase().await.as_str().into(),
        players: state.players().len().await,
    }
}
