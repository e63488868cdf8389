//! Trait for session storage integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_session::{SubjectKind, VerificationSession};

/// Storage for verification sessions, keyed by session id
///
/// The store is owned by whoever builds the service and is injected at
/// construction, so each service instance (and each test) gets its own.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Prepare the store for use
    async fn init(&self) -> Result<(), String>;
    /// Release the store and drop every session it holds
    async fn dispose(&self) -> Result<(), String>;
    /// Insert a new session
    async fn insert(&self, session: VerificationSession) -> Result<(), String>;
    /// Get a session by id
    async fn get(&self, session_id: &str) -> Result<Option<VerificationSession>, String>;
    /// Replace a stored session with an updated copy
    async fn update(&self, session: VerificationSession) -> Result<(), String>;
    /// Remove a session, returning it if it existed
    async fn remove(&self, session_id: &str) -> Result<Option<VerificationSession>, String>;
    /// Find the session issued for a subject, if any
    async fn find_by_subject(
        &self,
        kind: SubjectKind,
        value: &str,
    ) -> Result<Option<VerificationSession>, String>;
    /// Remove every session whose expiry is at or before `now`, returning how many were removed
    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize, String>;
    /// Number of sessions currently held
    async fn len(&self) -> Result<usize, String>;
}
