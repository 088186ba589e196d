//! Read-only session information for clients that load mid-game.

use crate::{dto::game::LobbySnapshot, state::SharedState};

/// Snapshot the session phase, round progress, and leaderboard.
pub async fn lobby_snapshot(state: &SharedState) -> LobbySnapshot {
    let (phase, round, max_rounds) = {
        let session = state.session().read().await;
        (session.phase(), session.round(), session.max_rounds())
    };

    LobbySnapshot {
        phase: phase.as_str().into(),
        round,
        max_rounds,
        players: state.players().scoreboard().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::test_state;
    use uuid::Uuid;

    #[tokio::test]
    async fn snapshot_reflects_phase_and_players() {
        let state = test_state(&[]);
        let id = Uuid::new_v4();
        state.players().join(id, "alice", state.config()).await;

        let snapshot = lobby_snapshot(&state).await;
        assert_eq!(snapshot.phase, "idle");
        assert_eq!(snapshot.round, 0);
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].name, "ALICE");

        state.session().write().await.start(25).unwrap();
        state.session().write().await.begin_round();
        let snapshot = lobby_snapshot(&state).await;
        assert_eq!(snapshot.phase, "active");
        assert_eq!(snapshot.round, 1);
    }
}
