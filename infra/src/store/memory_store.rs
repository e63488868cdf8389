//! Process-local session store
//!
//! Sessions live in a `HashMap` behind a tokio `RwLock`. Nothing survives a
//! restart and nothing is shared between instances.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use tk_core::{SessionStore, SubjectKind, VerificationSession};

/// In-memory session store with an explicit `init`/`dispose` lifecycle
///
/// Every operation other than `init` fails until the store has been
/// initialized, and again after it has been disposed.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, VerificationSession>>,
    ready: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn ensure_ready(&self) -> Result<(), String> {
        if self.is_ready() {
            Ok(())
        } else {
            Err("session store is not initialized".to_string())
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), String> {
        self.ready.store(true, Ordering::SeqCst);
        info!(store = "memory", "Session store ready");
        Ok(())
    }

    async fn dispose(&self) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        let dropped = sessions.len();
        sessions.clear();
        self.ready.store(false, Ordering::SeqCst);
        info!(store = "memory", dropped = dropped, "Session store disposed");
        Ok(())
    }

    async fn insert(&self, session: VerificationSession) -> Result<(), String> {
        self.ensure_ready()?;
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(format!("session {} already exists", session.id));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<VerificationSession>, String> {
        self.ensure_ready()?;
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn update(&self, session: VerificationSession) -> Result<(), String> {
        self.ensure_ready()?;
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(existing) => {
                *existing = session;
                Ok(())
            }
            None => Err(format!("session {} does not exist", session.id)),
        }
    }

    async fn remove(&self, session_id: &str) -> Result<Option<VerificationSession>, String> {
        self.ensure_ready()?;
        Ok(self.sessions.write().await.remove(session_id))
    }

    async fn find_by_subject(
        &self,
        kind: SubjectKind,
        value: &str,
    ) -> Result<Option<VerificationSession>, String> {
        self.ensure_ready()?;
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| s.matches_subject(kind, value))
            .cloned())
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize, String> {
        self.ensure_ready()?;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(store = "memory", removed = removed, "Removed expired sessions");
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize, String> {
        self.ensure_ready()?;
        Ok(self.sessions.read().await.len())
    }
}
