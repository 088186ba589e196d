//! Shared application state: session machine, player registry, client hub,
//! and the external collaborator handles.

pub mod clients;
pub mod players;
pub mod session;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    dao::score_store::ScoreStore,
    detect::ObjectDetector,
};

pub use self::clients::{ClientConnection, ClientHub};
pub use self::players::PlayerRegistry;
pub use self::session::{GameSession, SessionPhase};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state owned by the process and shared by every task.
pub struct AppState {
    config: AppConfig,
    session: RwLock<GameSession>,
    players: PlayerRegistry,
    clients: ClientHub,
    score_store: Arc<dyn ScoreStore>,
    detector: Arc<dyn ObjectDetector>,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply
    /// into spawned tasks.
    pub fn new(
        config: AppConfig,
        score_store: Arc<dyn ScoreStore>,
        detector: Arc<dyn ObjectDetector>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            session: RwLock::new(GameSession::new()),
            players: PlayerRegistry::new(),
            clients: ClientHub::new(),
            score_store,
            detector,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The session state machine and round bookkeeping.
    pub fn session(&self) -> &RwLock<GameSession> {
        &self.session
    }

    /// Snapshot the current session phase.
    pub async fn session_phase(&self) -> SessionPhase {
        self.session.read().await.phase()
    }

    /// Registry of connected players.
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// Registry of live client sockets.
    pub fn clients(&self) -> &ClientHub {
        &self.clients
    }

    /// Best-effort score persistence backend.
    pub fn score_store(&self) -> &Arc<dyn ScoreStore> {
        &self.score_store
    }

    /// Object-detection collaborator.
    pub fn detector(&self) -> &Arc<dyn ObjectDetector> {
        &self.detector
    }
}
