//! Lobby and leaderboard payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One leaderboard entry as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LobbyPlayer {
    /// Normalized display name.
    pub name: String,
    /// Current score.
    pub score: u32,
    /// Assigned color tag.
    pub color: String,
}

/// Read-only snapshot of the session for clients that load mid-game.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LobbySnapshot {
    /// Current session phase (`idle`, `active`, or `ended`).
    pub phase: String,
    /// Current round number (0 while idle).
    pub round: u32,
    /// Number of rounds in a full game.
    pub max_rounds: u32,
    /// Leaderboard, score descending.
    pub players: Vec<LobbyPlayer>,
}
