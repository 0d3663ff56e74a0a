//! High Score Persistence
//!
//! `ScoreStore` is the persistence contract the game loop uses. Both calls
//! return boxed futures so the loop can park them and keep ticking.
//! `MemoryScoreStore` keeps a sorted, capped table in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::{Serialize, Deserialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 10;

/// One row of the high score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Player display name
    pub name: String,
    /// Score
    pub score: u64,
    /// Seconds the life lasted
    pub elapsed_secs: f64,
    /// Artifacts collected
    pub artifacts: u32,
    /// When the score was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Persistence failures. Callers log these and carry on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScoreStoreError {
    /// Backend unreachable.
    #[error("Score store unavailable: {0}")]
    Unavailable(String),

    /// Entry rejected by the backend.
    #[error("Invalid score entry: {0}")]
    Invalid(String),
}

/// Asynchronous high score persistence.
pub trait ScoreStore: Send + Sync {
    /// Record a score.
    fn save_high_score(
        &self,
        name: String,
        score: u64,
        elapsed_secs: f64,
        artifacts: u32,
    ) -> BoxFuture<'static, Result<HighScoreEntry, ScoreStoreError>>;

    /// Fetch the table, best first.
    fn high_scores(&self) -> BoxFuture<'static, Result<Vec<HighScoreEntry>, ScoreStoreError>>;
}

/// In-memory score table.
#[derive(Debug, Clone)]
pub struct MemoryScoreStore {
    entries: Arc<RwLock<Vec<HighScoreEntry>>>,
    capacity: usize,
    offline: Arc<AtomicBool>,
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MemoryScoreStore {
    /// Create an empty table keeping at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            capacity,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate an outage: every call fails until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(offline: &AtomicBool) -> Result<(), ScoreStoreError> {
        if offline.load(Ordering::SeqCst) {
            Err(ScoreStoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save_high_score(
        &self,
        name: String,
        score: u64,
        elapsed_secs: f64,
        artifacts: u32,
    ) -> BoxFuture<'static, Result<HighScoreEntry, ScoreStoreError>> {
        let entries = self.entries.clone();
        let offline = self.offline.clone();
        let capacity = self.capacity;

        Box::pin(async move {
            Self::check_online(&offline)?;

            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ScoreStoreError::Invalid("empty name".to_string()));
            }
            if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
                return Err(ScoreStoreError::Invalid(format!("elapsed {}", elapsed_secs)));
            }

            let entry = HighScoreEntry {
                id: Uuid::new_v4(),
                name,
                score,
                elapsed_secs,
                artifacts,
                recorded_at: Utc::now(),
            };

            let mut table = entries.write().await;
            table.push(entry.clone());
            // Best score first; earlier entries win ties
            table.sort_by(|a, b| b.score.cmp(&a.score).then(a.recorded_at.cmp(&b.recorded_at)));
            table.truncate(capacity);

            Ok(entry)
        })
    }

    fn high_scores(&self) -> BoxFuture<'static, Result<Vec<HighScoreEntry>, ScoreStoreError>> {
        let entries = self.entries.clone();
        let offline = self.offline.clone();

        Box::pin(async move {
            Self::check_online(&offline)?;
            Ok(entries.read().await.clone())
        })
    }
}
