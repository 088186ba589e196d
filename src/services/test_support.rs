//! Shared fixtures for service tests: canned detector backends, a null score
//! store, and fake client connections.

use std::io;
use std::sync::Arc;

use axum::extract::ws::Message;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{models::ScoreRecord, score_store::ScoreStore, storage::StorageResult},
    detect::{DetectError, DetectResult, ImagePayload, ObjectDetector},
    dto::ws::ServerMessage,
    state::{AppState, ClientConnection, SharedState},
};

/// Detector that always reports the same labels.
struct StaticDetector {
    labels: Vec<String>,
}

impl ObjectDetector for StaticDetector {
    fn detect(&self, _image: &ImagePayload) -> BoxFuture<'static, DetectResult<Vec<String>>> {
        let labels = self.labels.clone();
        Box::pin(async move { Ok(labels) })
    }
}

/// Detector that always fails, like a timed-out inference sidecar.
struct FailingDetector;

impl ObjectDetector for FailingDetector {
    fn detect(&self, _image: &ImagePayload) -> BoxFuture<'static, DetectResult<Vec<String>>> {
        Box::pin(async move {
            Err(DetectError::unavailable(
                "sidecar unreachable".into(),
                io::Error::new(io::ErrorKind::TimedOut, "timed out"),
            ))
        })
    }
}

/// Score store that accepts everything and remembers nothing.
struct NullStore;

impl ScoreStore for NullStore {
    fn save(&self, _records: Vec<ScoreRecord>) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}

/// Build an [`AppState`] whose detector always reports `labels`.
pub(crate) fn test_state(labels: &[&str]) -> SharedState {
    AppState::new(
        AppConfig::default(),
        Arc::new(NullStore),
        Arc::new(StaticDetector {
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }),
    )
}

/// Build an [`AppState`] whose detector always fails.
pub(crate) fn failing_detector_state() -> SharedState {
    AppState::new(
        AppConfig::default(),
        Arc::new(NullStore),
        Arc::new(FailingDetector),
    )
}

/// Register a fake client socket and return its connection id plus the
/// receiving end of its writer channel.
pub(crate) fn attach_client(
    state: &SharedState,
) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();
    state.clients().insert(ClientConnection { id, tx });
    (id, rx)
}

/// Decode every frame a fake client has received so far.
pub(crate) fn drain_messages(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let Message::Text(text) = frame {
            messages.push(serde_json::from_str(text.as_str()).expect("undecodable frame"));
        }
    }
    messages
}
