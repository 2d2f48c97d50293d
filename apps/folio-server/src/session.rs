//! Session Store
//!
//! Correlates the upload, process, result and download steps of one user
//! flow. Each session owns two independent keys:
//! - `pdf_file_<id>`: path of the uploaded PDF
//! - `generated_image_<id>`: path of the generated PNG
//!
//! Entries never expire on their own. A background sweep can be started
//! with [`SessionStore::start_cleanup_task`] when a TTL is configured.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::workspace;

/// Opaque token correlating the steps of one flow
pub type SessionId = String;

/// Mint a fresh session identifier
pub fn mint_session_id() -> SessionId {
    Uuid::new_v4().to_string()
}

/// Role-prefixed key into the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    UploadedPdf(SessionId),
    GeneratedImage(SessionId),
}

impl SessionKey {
    pub fn session_id(&self) -> &str {
        match self {
            SessionKey::UploadedPdf(id) | SessionKey::GeneratedImage(id) => id,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKey::UploadedPdf(id) => write!(f, "pdf_file_{}", id),
            SessionKey::GeneratedImage(id) => write!(f, "generated_image_{}", id),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredPath {
    path: PathBuf,
    created_at: DateTime<Utc>,
}

// ============================================================================
// Session Store
// ============================================================================

/// Process-wide session store
#[derive(Clone, Default)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<SessionKey, StoredPath>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `key`, replacing any previous value
    pub async fn put(&self, key: SessionKey, path: PathBuf) {
        tracing::debug!(key = %key, path = %path.display(), "Session entry stored");
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            StoredPath {
                path,
                created_at: Utc::now(),
            },
        );
    }

    pub async fn get(&self, key: &SessionKey) -> Option<PathBuf> {
        let entries = self.entries.read().await;
        entries.get(key).map(|stored| stored.path.clone())
    }

    pub async fn remove(&self, key: &SessionKey) -> Option<PathBuf> {
        let mut entries = self.entries.write().await;
        entries.remove(key).map(|stored| stored.path)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Drop both keys of a session and delete their files
    ///
    /// Deletion failures are logged and otherwise ignored. Returns the number
    /// of keys that were present.
    pub async fn purge(&self, session_id: &str) -> usize {
        let keys = [
            SessionKey::UploadedPdf(session_id.to_string()),
            SessionKey::GeneratedImage(session_id.to_string()),
        ];

        let mut removed = 0;
        for key in &keys {
            if let Some(path) = self.remove(key).await {
                workspace::remove_path(&path).await;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(session_id = %session_id, removed, "Session purged");
        }
        removed
    }

    /// Purge sessions whose oldest entry is older than `ttl`
    ///
    /// Returns the number of sessions cleaned up
    pub async fn cleanup_older_than(&self, ttl: Duration) -> usize {
        let cutoff = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => Utc::now() - ttl,
            Err(_) => return 0,
        };

        let mut expired: Vec<SessionId> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|(_, stored)| stored.created_at < cutoff)
                .map(|(key, _)| key.session_id().to_string())
                .collect()
        };
        expired.sort();
        expired.dedup();

        let count = expired.len();
        for id in expired {
            self.purge(&id).await;
        }

        if count > 0 {
            tracing::info!(count, "Cleaned up abandoned sessions");
        }
        count
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self, ttl: Duration, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;
                self.cleanup_older_than(ttl).await;
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
