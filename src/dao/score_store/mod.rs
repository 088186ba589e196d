//! Abstraction over the score persistence backend.

pub mod json_file;

use futures::future::BoxFuture;

use crate::dao::{models::ScoreRecord, storage::StorageResult};

/// Persistence hook for player scores.
///
/// Saves are best-effort: callers log failures and never let them reach the
/// game loop or a submitting player.
pub trait ScoreStore: Send + Sync {
    /// Write the given records, replacing any previous snapshot.
    fn save(&self, records: Vec<ScoreRecord>) -> BoxFuture<'static, StorageResult<()>>;
}
