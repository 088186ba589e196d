//! Score store backed by a single JSON file on disk.

use std::path::PathBuf;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dao::{
    models::ScoreRecord,
    score_store::ScoreStore,
    storage::{StorageError, StorageResult},
};

/// Default score file when `SCORE_DB_PATH` is not set.
pub const DEFAULT_PATH: &str = "user_data.json";

/// On-disk entry, filed under the player's display name.
#[derive(Debug, Serialize, Deserialize)]
struct ScoreEntry {
    score: u32,
    last_seen: String,
}

/// Writes the whole score snapshot to one JSON file per save.
///
/// Small player counts make rewrite-on-save cheaper than anything smarter.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileStore {
    fn save(&self, records: Vec<ScoreRecord>) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();

        Box::pin(async move {
            let export: IndexMap<String, ScoreEntry> = records
                .into_iter()
                .map(|record| {
                    (
                        record.name,
                        ScoreEntry {
                            score: record.score,
                            last_seen: record.last_seen,
                        },
                    )
                })
                .collect();

            let payload = serde_json::to_string_pretty(&export).map_err(|err| {
                StorageError::unavailable("failed to encode score snapshot".into(), err)
            })?;

            tokio::fs::write(&path, payload).await.map_err(|err| {
                StorageError::unavailable(
                    format!("failed to write score file `{}`", path.display()),
                    err,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            name: name.into(),
            score,
            last_seen: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn save_writes_records_keyed_by_name() {
        let path = std::env::temp_dir().join(format!("scores-{}.json", uuid::Uuid::new_v4()));
        let store = JsonFileStore::new(&path);

        store
            .save(vec![record("ALICE", 300), record("BOB", 200)])
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: IndexMap<String, ScoreEntry> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["ALICE"].score, 300);
        assert_eq!(parsed["BOB"].score, 200);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn save_surfaces_io_failures() {
        let store = JsonFileStore::new("/nonexistent-dir/scores.json");
        let err = store.save(vec![record("ALICE", 100)]).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }
}
