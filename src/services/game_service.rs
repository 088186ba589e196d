//! Game lifecycle: start requests, the round loop, and lobby returns.

use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config,
    error::ServiceError,
    services::{game_events, round_timer::RoundTimer, score_service},
    state::SharedState,
};

/// Grace period between the start signal and the first round, giving clients
/// time to render a countdown.
pub const START_GRACE: Duration = Duration::from_secs(3);

/// Placeholder winner name for a game that ended with no players.
const NO_WINNER: &str = "NO ONE";

/// Handle a start request.
///
/// Clamps the requested duration, moves the session to active, resets every
/// player for the new game, and spawns the round loop. Requests arriving
/// outside the lobby fail the transition and change nothing.
pub async fn start_game(
    state: &SharedState,
    requested_duration: Option<&Value>,
) -> Result<(), ServiceError> {
    let duration_secs = config::clamp_duration(requested_duration);
    {
        let mut session = state.session().write().await;
        session.start(duration_secs)?;
    }

    info!(duration_secs, "starting game");
    state
        .players()
        .reset_for_new_game(state.config().catalog())
        .await;
    game_events::broadcast_lobby_update(state).await;
    game_events::broadcast_game_start(state);

    tokio::spawn(run_game_loop(state.clone()));
    Ok(())
}

/// Handle an explicit return-to-lobby request. Valid in any phase.
///
/// Does not interrupt a round in flight; the loop notices the phase change
/// at its next round boundary and quiesces.
pub async fn return_to_lobby(state: &SharedState) {
    state.session().write().await.reset_to_lobby();
    state.players().clear_for_lobby_return().await;

    info!("returning to lobby");
    game_events::broadcast_return_to_lobby(state);
    game_events::broadcast_lobby_update(state).await;
}

/// The round loop. Runs as one independent task per game; sole writer of
/// round numbers, decks, targets, and the per-round `has_scored` reset.
async fn run_game_loop(state: SharedState) {
    sleep(START_GRACE).await;

    while let Some((round, duration_secs)) = begin_round(&state).await {
        assign_round_targets(&state, round).await;
        RoundTimer::new(duration_secs)
            .run(|time_left, total| game_events::broadcast_timer_tick(&state, time_left, total))
            .await;
    }

    finish_game(&state).await;
}

/// Advance the session to the next round, or `None` once the game is over or
/// was reset to the lobby.
async fn begin_round(state: &SharedState) -> Option<(u32, u64)> {
    state.session().write().await.begin_round()
}

/// Deal every registered player their target for this round and notify each
/// of them privately.
async fn assign_round_targets(state: &SharedState, round: u32) {
    let catalog = state.config().catalog();
    let assignments = state
        .players()
        .with_players_mut(|players| {
            players
                .iter_mut()
                .map(|(id, player)| {
                    player.has_scored = false;
                    let target = player.deal_next(catalog);
                    player.target = Some(target.clone());
                    (*id, target)
                })
                .collect::<Vec<(Uuid, String)>>()
        })
        .await;

    debug!(round, players = assignments.len(), "round started");
    for (connection_id, target) in assignments {
        game_events::unicast_round_start(state, connection_id, round, &target);
    }
}

/// Close out a completed game: persist scores, pick the winner, broadcast the
/// final leaderboard.
async fn finish_game(state: &SharedState) {
    {
        let mut session = state.session().write().await;
        if let Err(err) = session.finish() {
            // The game was reset to the lobby mid-round; nothing to report.
            debug!(error = %err, "round loop stopped without a finished game");
            return;
        }
    }

    score_service::persist_scores(state).await;

    let leaderboard = state.players().scoreboard().await;
    let (winner, score) = leaderboard
        .first()
        .map(|entry| (entry.name.clone(), entry.score))
        .unwrap_or_else(|| (NO_WINNER.into(), 0));

    info!(%winner, score, "game over");
    game_events::broadcast_game_over(state, winner, score, leaderboard);
}
