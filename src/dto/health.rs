//! Health check payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Response of the `/healthcheck` endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process answers.
    pub status: String,
    /// Current session phase.
    pub phase: String,
    /// Number of registered players.
    pub players: usize,
}
