//! Best-effort score persistence.

use std::time::SystemTime;

use tracing::warn;

use crate::{dao::models::ScoreRecord, dto::format_system_time, state::SharedState};

/// Persist the current scores, keyed by display name.
///
/// Failures are logged and swallowed; persistence must never abort the game
/// or surface to a submitting player.
pub async fn persist_scores(state: &SharedState) {
    let last_seen = format_system_time(SystemTime::now());
    let records = state
        .players()
        .with_players(|players| {
            players
                .values()
                .map(|player| ScoreRecord {
                    name: player.name.clone(),
                    score: player.score,
                    last_seen: last_seen.clone(),
                })
                .collect::<Vec<_>>()
        })
        .await;

    if let Err(err) = state.score_store().save(records).await {
        warn!(error = %err, "failed to persist scores");
    }
}
