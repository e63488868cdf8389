//! Unit tests for verification service

use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::domain::entities::verification_session::{SubjectKind, CODE_LENGTH};
use crate::errors::{DomainError, VerificationError};
use crate::services::delivery::{DeepLinkBuilder, DeliveryChain, DeliveryOutcome};
use crate::services::verification::{
    Clock, ManualClock, VerificationService, VerificationServiceConfig,
};

use super::mocks::{MockSessionStore, RecordingChannel};

const PHONE: &str = "9876543210";
const AADHAAR: &str = "123456789012";

struct Harness {
    service: Arc<VerificationService<MockSessionStore, ManualClock>>,
    store: Arc<MockSessionStore>,
    clock: Arc<ManualClock>,
    channel: Arc<RecordingChannel>,
}

fn harness_with(store_fails: bool, channel_fails: bool) -> Harness {
    let store = Arc::new(MockSessionStore::new(store_fails));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let channel = Arc::new(RecordingChannel::new(channel_fails));
    let chain = DeliveryChain::new(DeepLinkBuilder::default(), "TRINCK").with_channel(channel.clone());

    let service = VerificationService::new(
        store.clone(),
        clock.clone(),
        Arc::new(chain),
        VerificationServiceConfig::default(),
    );

    Harness {
        service: Arc::new(service),
        store,
        clock,
        channel,
    }
}

fn harness() -> Harness {
    harness_with(false, false)
}

fn verification_error(err: DomainError) -> VerificationError {
    match err {
        DomainError::Verification(e) => e,
        other => panic!("Expected verification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_code_success() {
    let h = harness();

    let result = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    assert_eq!(result.subject_kind, SubjectKind::Phone);
    assert_eq!(result.expires_in_minutes, 5);
    assert_eq!(result.expires_at, h.clock.now() + Duration::minutes(5));
    assert!(result.delivery.is_delivered());
    assert_eq!(result.delivery.channel(), Some("recording"));

    let code = h.store.code_for(&result.session_id).unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    assert_eq!(h.channel.last_code(), Some(code));
}

#[tokio::test]
async fn test_wrong_then_correct_code_verifies() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.channel.last_code().unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = h.service.verify_code(&issued.session_id, wrong).await.unwrap_err();
    assert_eq!(
        verification_error(err),
        VerificationError::InvalidCode { remaining_attempts: 2 }
    );

    let result = h.service.verify_code(&issued.session_id, &code).await.unwrap();
    assert!(result.verified);
    assert!(!result.already_verified);
    assert_eq!(result.attempts_used, 2);
    assert!(h.service.is_session_verified(&issued.session_id).await.unwrap());
}

#[tokio::test]
async fn test_second_issue_for_same_subject_is_pending() {
    let h = harness();
    h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    let err = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap_err();

    assert_eq!(verification_error(err), VerificationError::AlreadyPending);
    assert_eq!(h.channel.sent_count(), 1);
    assert_eq!(h.service.active_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn test_subjects_are_independent() {
    let h = harness();
    h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    h.service.issue_code(SubjectKind::Phone, "9123456780").await.unwrap();
    h.service
        .issue_code(SubjectKind::IdentityDocument, AADHAAR)
        .await
        .unwrap();

    assert_eq!(h.service.active_sessions().await.unwrap(), 3);
}

#[tokio::test]
async fn test_document_code_expires() {
    let h = harness();
    let issued = h
        .service
        .issue_code(SubjectKind::IdentityDocument, AADHAAR)
        .await
        .unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let err = h.service.verify_code(&issued.session_id, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);

    let err = h.service.verify_code(&issued.session_id, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::SessionNotFound);
}

#[tokio::test]
async fn test_code_accepted_just_before_expiry() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();

    h.clock.advance(Duration::minutes(5) - Duration::seconds(1));

    assert!(h.service.verify_code(&issued.session_id, &code).await.is_ok());
}

#[tokio::test]
async fn test_attempt_ceiling() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for remaining in [2, 1, 0] {
        let err = h.service.verify_code(&issued.session_id, wrong).await.unwrap_err();
        assert_eq!(
            verification_error(err),
            VerificationError::InvalidCode { remaining_attempts: remaining }
        );
    }

    let err = h.service.verify_code(&issued.session_id, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::AttemptsExhausted);

    // Exhausted sessions are deleted
    let err = h.service.verify_code(&issued.session_id, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::SessionNotFound);
}

#[tokio::test]
async fn test_correct_code_on_last_attempt_succeeds() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..2 {
        assert!(h.service.verify_code(&issued.session_id, wrong).await.is_err());
    }

    let result = h.service.verify_code(&issued.session_id, &code).await.unwrap();
    assert_eq!(result.attempts_used, 3);
}

#[tokio::test]
async fn test_verified_session_is_terminal() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();

    h.service.verify_code(&issued.session_id, &code).await.unwrap();
    let again = h.service.verify_code(&issued.session_id, &code).await.unwrap();

    assert!(again.verified);
    assert!(again.already_verified);
    assert_eq!(again.attempts_used, 1);
    assert_eq!(h.channel.sent_count(), 1);

    let stored = h.store.stored(&issued.session_id).unwrap();
    assert!(stored.verified);
    assert_eq!(stored.attempts_used, 1);
}

#[tokio::test]
async fn test_resend_supersedes_previous_session() {
    let h = harness();
    let first = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let first_code = h.store.code_for(&first.session_id).unwrap();

    let second = h.service.resend_code(&first.session_id).await.unwrap();
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(h.channel.sent_count(), 2);

    let err = h
        .service
        .verify_code(&first.session_id, &first_code)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::SessionNotFound);

    let second_code = h.channel.last_code().unwrap();
    let result = h.service.verify_code(&second.session_id, &second_code).await.unwrap();
    assert!(result.verified);
    assert_eq!(h.service.active_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn test_resend_unknown_session() {
    let h = harness();

    let err = h.service.resend_code("missing").await.unwrap_err();

    assert_eq!(verification_error(err), VerificationError::SessionNotFound);
    assert_eq!(h.channel.sent_count(), 0);
}

#[tokio::test]
async fn test_resend_after_exhaustion_starts_fresh() {
    let h = harness();
    let issued = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&issued.session_id).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };
    for _ in 0..3 {
        let _ = h.service.verify_code(&issued.session_id, wrong).await;
    }

    let resent = h.service.resend_code(&issued.session_id).await.unwrap();
    let view = h.service.session(&resent.session_id).await.unwrap();

    assert_eq!(view.attempts_used, 0);
    assert_eq!(view.remaining_attempts, 3);
}

#[tokio::test]
async fn test_issue_after_expiry_sweeps_old_session() {
    let h = harness();
    let first = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    h.clock.advance(Duration::minutes(6));
    let second = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    assert_ne!(first.session_id, second.session_id);
    assert!(h.store.stored(&first.session_id).is_none());
    assert_eq!(h.service.active_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn test_verified_session_does_not_block_new_issue() {
    let h = harness();
    let first = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    let code = h.store.code_for(&first.session_id).unwrap();
    h.service.verify_code(&first.session_id, &code).await.unwrap();

    let second = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    assert_ne!(first.session_id, second.session_id);
    assert!(h.store.stored(&first.session_id).is_none());
}

#[tokio::test]
async fn test_sweep_expired_removes_only_expired() {
    let h = harness();
    h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();
    h.clock.advance(Duration::minutes(3));
    h.service
        .issue_code(SubjectKind::IdentityDocument, AADHAAR)
        .await
        .unwrap();

    h.clock.advance(Duration::minutes(3));

    assert_eq!(h.service.sweep_expired().await.unwrap(), 1);
    assert_eq!(h.service.active_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delivery_failure_still_issues_session() {
    let h = harness_with(false, true);

    let result = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    assert_eq!(result.delivery.outcome, DeliveryOutcome::DeferredToUser);
    let link = result.delivery.fallback_link.unwrap();
    assert!(link.starts_with("https://wa.me/919876543210?text="));
    assert!(h.store.stored(&result.session_id).is_some());
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let h = harness_with(true, false);

    let err = h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap_err();

    match err {
        DomainError::Internal { message } => assert!(message.contains("Session store error")),
        other => panic!("Expected internal error, got {:?}", other),
    }
    assert_eq!(h.channel.sent_count(), 0);
}

#[tokio::test]
async fn test_session_view() {
    let h = harness();
    let issued = h
        .service
        .issue_code(SubjectKind::IdentityDocument, AADHAAR)
        .await
        .unwrap();

    let view = h.service.session(&issued.session_id).await.unwrap();
    assert_eq!(view.masked_subject, "XXXXXXXX9012");
    assert!(!view.verified);
    assert_eq!(view.expires_at, issued.expires_at);

    let err = h.service.session("missing").await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::SessionNotFound);
    assert!(!h.service.is_session_verified("missing").await.unwrap());
}

#[tokio::test]
async fn test_init_and_dispose() {
    let h = harness();
    h.service.init().await.unwrap();
    h.service.issue_code(SubjectKind::Phone, PHONE).await.unwrap();

    h.service.dispose().await.unwrap();

    assert_eq!(h.store.init_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.service.active_sessions().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_allows_one_session() {
    let h = harness();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.issue_code(SubjectKind::Phone, PHONE).await })
        })
        .collect();

    let mut issued = 0;
    let mut pending = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(DomainError::Verification(VerificationError::AlreadyPending)) => pending += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(issued, 1);
    assert_eq!(pending, 9);
    assert_eq!(h.service.active_sessions().await.unwrap(), 1);
}
