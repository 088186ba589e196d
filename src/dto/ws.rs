//! WebSocket protocol messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::dto::{game::LobbyPlayer, validation::validate_image_payload};

/// Error raised while parsing or validating an inbound client message.
#[derive(Debug, Error)]
pub enum ClientMessageError {
    /// The frame was not valid JSON for any known message.
    #[error("malformed client message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The frame parsed but carried an invalid payload.
    #[error("invalid client message: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Requests accepted from client sockets.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join the lobby under the given display name.
    PlayerJoin {
        /// Raw display name; normalized server-side.
        name: String,
    },
    /// Leave the lobby explicitly.
    PlayerExit,
    /// Ask to start a game with the requested round duration.
    RequestStart {
        /// Requested duration in seconds; numbers and numeric strings are
        /// accepted, anything else falls back to the default.
        #[serde(default)]
        #[schema(value_type = Option<Object>)]
        duration: Option<serde_json::Value>,
    },
    /// Ask to end the game and return everyone to the lobby.
    RequestLobbyReturn,
    /// Submit image evidence for the current round's target.
    ImageSubmission {
        /// Base64 data URL captured by the client camera.
        image: String,
    },
    /// Anything this server version does not understand.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse a raw text frame and validate its payload.
    pub fn from_json_str(raw: &str) -> Result<Self, ClientMessageError> {
        let message: Self = serde_json::from_str(raw)?;

        if let ClientMessage::ImageSubmission { image } = &message {
            validate_image_payload(image)
                .map_err(|err| ClientMessageError::Invalid(err.to_string()))?;
        }

        Ok(message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
/// Events pushed to client sockets.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Current leaderboard, broadcast after every lobby-affecting change.
    LobbyUpdate {
        /// Leaderboard entries, score descending.
        players: Vec<LobbyPlayer>,
    },
    /// A game is about to begin; clients render their countdown.
    GameStartSequence,
    /// Unicast round kick-off carrying this player's private target.
    RoundStart {
        /// Round number, 1-based.
        round: u32,
        /// Target label, uppercased for display.
        target: String,
    },
    /// Broadcast countdown tick, once per whole second.
    TimerTick {
        /// Seconds remaining in the round.
        time_left: u64,
        /// Full round duration.
        total: u64,
    },
    /// Unicast reply to an image submission.
    UploadAck {
        /// Whether the submission scored.
        success: bool,
        /// User-facing acknowledgment message.
        msg: String,
    },
    /// Broadcast gameplay event (currently only `capture`).
    GameEvent {
        /// Event kind.
        event: String,
        /// Display name of the player involved.
        player: String,
    },
    /// Final results after the last round.
    GameOver {
        /// Winner display name, or `NO ONE` for an empty game.
        winner: String,
        /// Winner score.
        score: u32,
        /// Full final leaderboard.
        leaderboard: Vec<LobbyPlayer>,
    },
    /// Everyone goes back to the lobby.
    ReturnToLobby,
    /// Unicast order to drop the connection after an explicit exit.
    ForceDisconnect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join_request() {
        let message = ClientMessage::from_json_str(
            r#"{"type": "player_join", "name": "alice"}"#,
        )
        .unwrap();
        assert!(matches!(message, ClientMessage::PlayerJoin { name } if name == "alice"));
    }

    #[test]
    fn parses_start_request_with_string_duration() {
        let message = ClientMessage::from_json_str(
            r#"{"type": "request_start", "duration": "30"}"#,
        )
        .unwrap();
        match message {
            ClientMessage::RequestStart { duration } => {
                assert_eq!(duration, Some(serde_json::json!("30")));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn start_request_duration_is_optional() {
        let message =
            ClientMessage::from_json_str(r#"{"type": "request_start"}"#).unwrap();
        assert!(matches!(
            message,
            ClientMessage::RequestStart { duration: None }
        ));
    }

    #[test]
    fn rejects_submission_without_data_url() {
        let err = ClientMessage::from_json_str(
            r#"{"type": "image_submission", "image": "not-an-image"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClientMessageError::Invalid(_)));
    }

    #[test]
    fn unknown_message_types_are_tolerated() {
        let message =
            ClientMessage::from_json_str(r#"{"type": "voice_chat", "blob": 1}"#).unwrap();
        assert!(matches!(message, ClientMessage::Unknown));
    }

    #[test]
    fn outbound_events_use_snake_case_tags() {
        let payload = serde_json::to_value(ServerMessage::TimerTick {
            time_left: 9,
            total: 25,
        })
        .unwrap();
        assert_eq!(
            payload,
            serde_json::json!({"type": "timer_tick", "time_left": 9, "total": 25})
        );

        let payload = serde_json::to_value(ServerMessage::GameStartSequence).unwrap();
        assert_eq!(payload, serde_json::json!({"type": "game_start_sequence"}));
    }
}
