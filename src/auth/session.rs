//! Server-side sessions.
//!
//! A session binds a GitHub token to one repository. The client only ever
//! holds an opaque handle of the form `<id>.<secret>`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::constant_time_compare;
use crate::github::{GitHubApi, RepoRef};
use crate::store::TableStore;
use crate::views::Wiring;

pub struct Session {
    id: String,
    secret: String,
    pub login: String,
    pub repo: RepoRef,
    token: String,
    pub created_at: DateTime<Utc>,
    /// Epoch milliseconds of the last request made with this session.
    last_seen: AtomicI64,
    /// Controls wired so far in this session.
    pub wiring: Mutex<Wiring>,
}

/// Public view of a session; never carries the token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub login: String,
    pub repo: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(login: String, repo: RepoRef, token: String) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            secret: Uuid::new_v4().simple().to_string(),
            login,
            repo,
            token,
            created_at: Utc::now(),
            last_seen: AtomicI64::new(Utc::now().timestamp_millis()),
            wiring: Mutex::new(Wiring::default()),
        }
    }

    /// Handle returned to the client.
    pub fn handle(&self) -> String {
        format!("{}.{}", self.id, self.secret)
    }

    pub fn store(&self, github: Arc<dyn GitHubApi>) -> TableStore {
        TableStore::new(github, self.repo.clone(), self.token.clone())
    }

    fn idle_for(&self, now_ms: i64) -> Duration {
        let idle = now_ms.saturating_sub(self.last_seen.load(Ordering::Relaxed));
        Duration::from_millis(u64::try_from(idle).unwrap_or(0))
    }

    fn touch(&self, now_ms: i64) {
        self.last_seen.fetch_max(now_ms, Ordering::Relaxed);
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            login: self.login.clone(),
            repo: self.repo.to_string(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Idle time after which a session stops resolving.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Live sessions keyed by id. A session expires once it has been idle for
/// longer than the store's ttl.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a session, dropping any that have expired.
    pub async fn insert(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        let now = Utc::now().timestamp_millis();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for(now) <= self.ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "swept expired sessions");
        }
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Look up a live session by handle, checking the secret in constant time.
    pub async fn resolve(&self, handle: &str) -> Option<Arc<Session>> {
        let (id, secret) = handle.split_once('.')?;
        let sessions = self.sessions.read().await;
        let session = sessions.get(id)?;
        if !constant_time_compare(secret, &session.secret) {
            return None;
        }
        let now = Utc::now().timestamp_millis();
        if session.idle_for(now) > self.ttl {
            tracing::debug!(login = %session.login, "session expired");
            return None;
        }
        session.touch(now);
        Some(session.clone())
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, handle: &str) -> bool {
        let Some(session) = self.resolve(handle).await else {
            return false;
        };
        self.sessions.write().await.remove(&session.id).is_some()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
