//! Submission arbitration: validates image evidence and awards at most one
//! score per player per round.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::SCORE_AWARD,
    detect::ImagePayload,
    services::{game_events, score_service},
    state::{SessionPhase, SharedState},
};

/// How many detected labels an incorrect submission reports back.
const FEEDBACK_LABELS: usize = 2;

/// Outcome of one arbitrated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The target was in the detected set; score awarded.
    Correct {
        /// The captured target label.
        target: String,
    },
    /// The target was not detected; no state change.
    Incorrect {
        /// Up to two detected labels for player feedback.
        seen: Vec<String>,
    },
    /// The player already scored this round.
    AlreadyScored,
    /// No game is running; the submission is silently dropped.
    NotActive,
    /// The connection has no registered player; silently dropped.
    UnknownPlayer,
    /// The classifier failed; surfaced as a generic processing error.
    DetectionFailed,
}

impl SubmissionOutcome {
    /// The `upload_ack` payload for this outcome, or `None` for outcomes that
    /// are dropped without a reply.
    pub fn ack(&self) -> Option<(bool, String)> {
        match self {
            SubmissionOutcome::Correct { target } => {
                Some((true, format!("CORRECT! FOUND {}", target.to_uppercase())))
            }
            SubmissionOutcome::Incorrect { seen } => {
                let saw = if seen.is_empty() {
                    "NOTHING".into()
                } else {
                    seen.iter()
                        .map(|label| label.to_uppercase())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                Some((false, format!("WRONG. SAW: {saw}")))
            }
            SubmissionOutcome::AlreadyScored => Some((false, "ALREADY SCORED!".into())),
            SubmissionOutcome::DetectionFailed => {
                Some((false, "ERROR PROCESSING IMAGE".into()))
            }
            SubmissionOutcome::NotActive | SubmissionOutcome::UnknownPlayer => None,
        }
    }
}

/// Arbitrate one image submission.
///
/// The classifier call happens with no locks held; the final check-and-award
/// runs as a single closure under the registry write lock, so two concurrent
/// submissions for the same player can never both score in one round.
pub async fn handle_submission(
    state: &SharedState,
    connection_id: Uuid,
    image: ImagePayload,
) -> SubmissionOutcome {
    if state.session_phase().await != SessionPhase::Active {
        return SubmissionOutcome::NotActive;
    }

    // Cheap pre-checks before paying for a detector round-trip.
    let precheck = state
        .players()
        .with_players(|players| {
            players
                .get(&connection_id)
                .map(|player| player.has_scored)
        })
        .await;
    match precheck {
        None => return SubmissionOutcome::UnknownPlayer,
        Some(true) => return SubmissionOutcome::AlreadyScored,
        Some(false) => {}
    }

    let labels = match state.detector().detect(&image).await {
        Ok(labels) => labels,
        Err(err) => {
            warn!(%connection_id, error = %err, "detection failed");
            return SubmissionOutcome::DetectionFailed;
        }
    };

    let (outcome, scorer) = state
        .players()
        .with_players_mut(|players| {
            let Some(player) = players.get_mut(&connection_id) else {
                // Player left while the detector was running.
                return (SubmissionOutcome::UnknownPlayer, None);
            };
            if player.has_scored {
                return (SubmissionOutcome::AlreadyScored, None);
            }

            let matched = player
                .target
                .as_ref()
                .is_some_and(|target| labels.contains(target));
            if matched {
                player.has_scored = true;
                player.score += SCORE_AWARD;
                let target = player.target.clone().unwrap_or_default();
                (SubmissionOutcome::Correct { target }, Some(player.name.clone()))
            } else {
                let seen = labels.iter().take(FEEDBACK_LABELS).cloned().collect();
                (SubmissionOutcome::Incorrect { seen }, None)
            }
        })
        .await;

    if let Some(name) = scorer {
        debug!(player = %name, "capture");
        score_service::persist_scores(state).await;
        game_events::broadcast_capture(state, &name);
        game_events::broadcast_lobby_update(state).await;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        attach_client, failing_detector_state, test_state,
    };

    fn payload() -> ImagePayload {
        ImagePayload::new("data:image/jpeg;base64,/9j/4AAQ".into())
    }

    async fn activate_with_target(state: &crate::state::SharedState, id: Uuid, target: &str) {
        state.session().write().await.start(25).unwrap();
        state
            .players()
            .with_players_mut(|players| {
                let player = players.get_mut(&id).unwrap();
                player.target = Some(target.into());
                player.has_scored = false;
            })
            .await;
    }

    #[tokio::test]
    async fn inactive_session_drops_submission_silently() {
        let state = test_state(&["cup"]);
        let (alice, _rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;

        let outcome = handle_submission(&state, alice, payload()).await;
        assert_eq!(outcome, SubmissionOutcome::NotActive);
        assert!(outcome.ack().is_none());
    }

    #[tokio::test]
    async fn unknown_player_is_dropped_silently() {
        let state = test_state(&["cup"]);
        state.session().write().await.start(25).unwrap();

        let outcome = handle_submission(&state, Uuid::new_v4(), payload()).await;
        assert_eq!(outcome, SubmissionOutcome::UnknownPlayer);
        assert!(outcome.ack().is_none());
    }

    #[tokio::test]
    async fn correct_submission_awards_once() {
        let state = test_state(&["cup", "keyboard"]);
        let (alice, _alice_rx) = attach_client(&state);
        let (bob, _bob_rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;
        state.players().join(bob, "bob", state.config()).await;
        activate_with_target(&state, alice, "cup").await;

        let outcome = handle_submission(&state, alice, payload()).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Correct {
                target: "cup".into()
            }
        );
        assert_eq!(
            outcome.ack(),
            Some((true, "CORRECT! FOUND CUP".into()))
        );

        let second = handle_submission(&state, alice, payload()).await;
        assert_eq!(second, SubmissionOutcome::AlreadyScored);
        assert_eq!(second.ack(), Some((false, "ALREADY SCORED!".into())));

        state
            .players()
            .with_players(|players| {
                assert_eq!(players.get(&alice).unwrap().score, SCORE_AWARD);
                assert!(players.get(&alice).unwrap().has_scored);
                assert_eq!(players.get(&bob).unwrap().score, 0);
                assert!(!players.get(&bob).unwrap().has_scored);
            })
            .await;
    }

    #[tokio::test]
    async fn concurrent_correct_submissions_award_exactly_once() {
        let state = test_state(&["cup"]);
        let (alice, _rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;
        activate_with_target(&state, alice, "cup").await;

        let (first, second) = tokio::join!(
            handle_submission(&state, alice, payload()),
            handle_submission(&state, alice, payload()),
        );

        let correct = [&first, &second]
            .iter()
            .filter(|outcome| matches!(outcome, SubmissionOutcome::Correct { .. }))
            .count();
        assert_eq!(correct, 1, "exactly one submission may score");
        assert!(
            [&first, &second]
                .iter()
                .any(|outcome| matches!(outcome, SubmissionOutcome::AlreadyScored))
        );
        state
            .players()
            .with_players(|players| {
                assert_eq!(players.get(&alice).unwrap().score, SCORE_AWARD);
            })
            .await;
    }

    #[tokio::test]
    async fn incorrect_submission_reports_up_to_two_labels() {
        let state = test_state(&["fork", "spoon", "chair"]);
        let (alice, _rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;
        activate_with_target(&state, alice, "cup").await;

        let outcome = handle_submission(&state, alice, payload()).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Incorrect {
                seen: vec!["fork".into(), "spoon".into()]
            }
        );
        assert_eq!(
            outcome.ack(),
            Some((false, "WRONG. SAW: FORK, SPOON".into()))
        );
        state
            .players()
            .with_players(|players| {
                assert_eq!(players.get(&alice).unwrap().score, 0);
                assert!(!players.get(&alice).unwrap().has_scored);
            })
            .await;
    }

    #[tokio::test]
    async fn empty_detection_reports_nothing_seen() {
        let state = test_state(&[]);
        let (alice, _rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;
        activate_with_target(&state, alice, "cup").await;

        let outcome = handle_submission(&state, alice, payload()).await;
        assert_eq!(outcome, SubmissionOutcome::Incorrect { seen: Vec::new() });
        assert_eq!(outcome.ack(), Some((false, "WRONG. SAW: NOTHING".into())));
    }

    #[tokio::test]
    async fn detector_failure_is_contained() {
        let state = failing_detector_state();
        let (alice, _rx) = attach_client(&state);
        state.players().join(alice, "alice", state.config()).await;
        activate_with_target(&state, alice, "cup").await;

        let outcome = handle_submission(&state, alice, payload()).await;
        assert_eq!(outcome, SubmissionOutcome::DetectionFailed);
        assert_eq!(
            outcome.ack(),
            Some((false, "ERROR PROCESSING IMAGE".into()))
        );
        state
            .players()
            .with_players(|players| {
                assert_eq!(players.get(&alice).unwrap().score, 0);
            })
            .await;
    }
}
