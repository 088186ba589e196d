//! Persisted representations of player data.

use serde::{Deserialize, Serialize};

/// Snapshot of one player's score, keyed by display name in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Display name the record is filed under.
    pub name: String,
    /// Score at the time of the save.
    pub score: u32,
    /// Rfc3339 timestamp of the save.
    pub last_seen: String,
}
