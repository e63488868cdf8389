//! Main verification service implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::verification_session::{
    AttemptOutcome, SessionView, SubjectKind, VerificationSession,
};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::services::delivery::{DeliveryChain, DeliveryRequest};

use super::clock::Clock;
use super::config::VerificationServiceConfig;
use super::traits::SessionStore;
use super::types::{IssueCodeResult, VerifyCodeResult};

/// Verification service managing one-time code sessions
///
/// Session operations run one at a time behind an internal lock. Delivery
/// happens after the lock is released, once the session is already stored.
pub struct VerificationService<S: SessionStore, C: Clock> {
    /// Session storage
    store: Arc<S>,
    /// Time source for issuance and expiry
    clock: Arc<C>,
    /// Delivery fallback chain
    delivery: Arc<DeliveryChain>,
    /// Service configuration
    config: VerificationServiceConfig,
    /// Serializes issue, verify, resend and sweep
    lock: Mutex<()>,
}

impl<S: SessionStore, C: Clock> VerificationService<S, C> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `store` - Session store implementation
    /// * `clock` - Time source
    /// * `delivery` - Delivery chain used for issued codes
    /// * `config` - Service configuration
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        delivery: Arc<DeliveryChain>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            store,
            clock,
            delivery,
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Initialize the underlying session store
    pub async fn init(&self) -> DomainResult<()> {
        self.store.init().await.map_err(store_error)?;
        tracing::info!(event = "session_store_initialized", "Session store initialized");
        Ok(())
    }

    /// Dispose of the underlying session store, dropping all sessions
    pub async fn dispose(&self) -> DomainResult<()> {
        let _guard = self.lock.lock().await;
        self.store.dispose().await.map_err(store_error)?;
        tracing::info!(event = "session_store_disposed", "Session store disposed");
        Ok(())
    }

    /// Issue a verification code for a subject
    ///
    /// This method:
    /// 1. Sweeps expired sessions
    /// 2. Rejects the request if a usable session already exists for the subject
    /// 3. Creates and stores a new session
    /// 4. Runs the delivery chain
    ///
    /// # Returns
    ///
    /// * `Ok(IssueCodeResult)` - Session id, expiry and delivery report
    /// * `Err(DomainError)` - `AlreadyPending`, or a store failure
    pub async fn issue_code(
        &self,
        subject_kind: SubjectKind,
        subject_value: &str,
    ) -> DomainResult<IssueCodeResult> {
        let session = {
            let _guard = self.lock.lock().await;
            self.issue_locked(subject_kind, subject_value).await?
        };

        Ok(self.deliver(session).await)
    }

    /// Verify a code against a session
    ///
    /// Checks run in a fixed order: unknown session, already verified,
    /// expired, attempts exhausted, then the attempt is counted and the code
    /// compared. Expired and exhausted sessions are deleted.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeResult)` - The code matched now or on an earlier call
    /// * `Err(DomainError)` - `SessionNotFound`, `Expired`, `AttemptsExhausted`,
    ///   `InvalidCode`, or a store failure
    pub async fn verify_code(&self, session_id: &str, code: &str) -> DomainResult<VerifyCodeResult> {
        let _guard = self.lock.lock().await;
        let now = self.clock.now();

        let mut session = self
            .store
            .get(session_id)
            .await
            .map_err(store_error)?
            .ok_or(VerificationError::SessionNotFound)?;

        let masked = session.subject_kind.mask(&session.subject_value);

        match session.attempt(code, now) {
            AttemptOutcome::AlreadyVerified => {
                tracing::debug!(
                    session_id = %session.id,
                    subject = %masked,
                    event = "otp_already_verified",
                    "Session was already verified"
                );
                Ok(verified_result(&session, true))
            }
            AttemptOutcome::Expired => {
                self.store.remove(session_id).await.map_err(store_error)?;
                tracing::warn!(
                    session_id = %session.id,
                    subject = %masked,
                    event = "otp_expired",
                    "Verification code expired"
                );
                Err(VerificationError::Expired.into())
            }
            AttemptOutcome::Exhausted => {
                self.store.remove(session_id).await.map_err(store_error)?;
                tracing::error!(
                    session_id = %session.id,
                    subject = %masked,
                    event = "max_attempts_exceeded",
                    "Maximum verification attempts exceeded"
                );
                Err(VerificationError::AttemptsExhausted.into())
            }
            AttemptOutcome::Matched => {
                self.store.update(session.clone()).await.map_err(store_error)?;
                tracing::info!(
                    session_id = %session.id,
                    subject = %masked,
                    attempts_used = session.attempts_used,
                    event = "otp_verified_success",
                    "Verification code successfully verified"
                );
                Ok(verified_result(&session, false))
            }
            AttemptOutcome::Mismatched { remaining_attempts } => {
                self.store.update(session.clone()).await.map_err(store_error)?;
                tracing::warn!(
                    session_id = %session.id,
                    subject = %masked,
                    remaining_attempts = remaining_attempts,
                    event = "otp_verification_failed",
                    "Verification code verification failed"
                );
                Err(VerificationError::InvalidCode { remaining_attempts }.into())
            }
        }
    }

    /// Replace a session with a fresh one for the same subject
    ///
    /// The old session is removed whatever its state, so the new issuance
    /// never trips the pending check.
    pub async fn resend_code(&self, session_id: &str) -> DomainResult<IssueCodeResult> {
        let session = {
            let _guard = self.lock.lock().await;

            let previous = self
                .store
                .remove(session_id)
                .await
                .map_err(store_error)?
                .ok_or(VerificationError::SessionNotFound)?;

            tracing::info!(
                session_id = %previous.id,
                subject = %previous.subject_kind.mask(&previous.subject_value),
                event = "otp_superseded",
                "Superseding verification session"
            );

            self.issue_locked(previous.subject_kind, &previous.subject_value)
                .await?
        };

        Ok(self.deliver(session).await)
    }

    /// Current status of a session
    pub async fn session(&self, session_id: &str) -> DomainResult<SessionView> {
        self.store
            .get(session_id)
            .await
            .map_err(store_error)?
            .map(|session| session.view())
            .ok_or_else(|| VerificationError::SessionNotFound.into())
    }

    /// Whether a session exists and has been verified
    pub async fn is_session_verified(&self, session_id: &str) -> DomainResult<bool> {
        Ok(self
            .store
            .get(session_id)
            .await
            .map_err(store_error)?
            .map(|session| session.verified)
            .unwrap_or(false))
    }

    /// Remove every expired session, returning how many were removed
    pub async fn sweep_expired(&self) -> DomainResult<usize> {
        let _guard = self.lock.lock().await;
        self.sweep_locked(self.clock.now()).await
    }

    /// Number of sessions currently stored
    pub async fn active_sessions(&self) -> DomainResult<usize> {
        self.store.len().await.map_err(store_error)
    }

    async fn sweep_locked(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let removed = self.store.remove_expired(now).await.map_err(store_error)?;
        if removed > 0 {
            tracing::debug!(removed = removed, event = "otp_sweep", "Swept expired sessions");
        }
        Ok(removed)
    }

    /// Issue a session; the caller must hold the service lock
    async fn issue_locked(
        &self,
        subject_kind: SubjectKind,
        subject_value: &str,
    ) -> DomainResult<VerificationSession> {
        let now = self.clock.now();
        let masked = subject_kind.mask(subject_value);

        self.sweep_locked(now).await?;

        if let Some(existing) = self
            .store
            .find_by_subject(subject_kind, subject_value)
            .await
            .map_err(store_error)?
        {
            if existing.is_usable_at(now) {
                tracing::warn!(
                    subject = %masked,
                    session_id = %existing.id,
                    event = "otp_already_pending",
                    "Verification code already pending for subject"
                );
                return Err(VerificationError::AlreadyPending.into());
            }

            // Verified or exhausted but not yet expired
            self.store.remove(&existing.id).await.map_err(store_error)?;
        }

        let session = VerificationSession::issue(
            subject_kind,
            subject_value,
            now,
            self.config.code_lifetime(),
            self.config.max_attempts,
        );

        self.store.insert(session.clone()).await.map_err(|e| {
            tracing::error!(
                subject = %masked,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store verification session"
            );
            store_error(e)
        })?;

        tracing::info!(
            subject = %masked,
            subject_kind = %subject_kind,
            session_id = %session.id,
            expires_at = %session.expires_at,
            event = "otp_generated",
            "Generated new verification code"
        );

        if self.config.log_codes {
            tracing::debug!(
                session_id = %session.id,
                code = %session.code,
                "Development verification code"
            );
        }

        Ok(session)
    }

    async fn deliver(&self, session: VerificationSession) -> IssueCodeResult {
        let expires_in_minutes = session.lifetime_minutes();
        let request = DeliveryRequest {
            subject_kind: session.subject_kind,
            subject_value: session.subject_value,
            code: session.code,
            expires_in_minutes,
        };

        let delivery = self.delivery.deliver(&request).await;

        IssueCodeResult {
            session_id: session.id,
            subject_kind: session.subject_kind,
            expires_at: session.expires_at,
            expires_in_minutes,
            delivery,
        }
    }
}

fn verified_result(session: &VerificationSession, already_verified: bool) -> VerifyCodeResult {
    VerifyCodeResult {
        session_id: session.id.clone(),
        subject_kind: session.subject_kind,
        verified: true,
        already_verified,
        attempts_used: session.attempts_used,
    }
}

fn store_error(e: String) -> DomainError {
    tracing::error!(error = %e, event = "session_store_error", "Session store operation failed");
    DomainError::Internal {
        message: format!("Session store error: {}", e),
    }
}
