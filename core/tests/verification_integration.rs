//! Integration tests for the verification service through its public API

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use tk_core::{
        DeepLinkBuilder, DeliveryChain, DeliveryOutcome, DomainError, ManualClock, SessionStore,
        SubjectKind, VerificationError, VerificationService, VerificationServiceConfig,
        VerificationSession,
    };

    // Session store keeping sessions in a tokio RwLock
    #[derive(Default)]
    struct LocalStore {
        sessions: RwLock<HashMap<String, VerificationSession>>,
    }

    impl LocalStore {
        async fn code(&self, session_id: &str) -> String {
            self.sessions.read().await[session_id].code.clone()
        }
    }

    #[async_trait]
    impl SessionStore for LocalStore {
        async fn init(&self) -> Result<(), String> {
            Ok(())
        }

        async fn dispose(&self) -> Result<(), String> {
            self.sessions.write().await.clear();
            Ok(())
        }

        async fn insert(&self, session: VerificationSession) -> Result<(), String> {
            self.sessions.write().await.insert(session.id.clone(), session);
            Ok(())
        }

        async fn get(&self, session_id: &str) -> Result<Option<VerificationSession>, String> {
            Ok(self.sessions.read().await.get(session_id).cloned())
        }

        async fn update(&self, session: VerificationSession) -> Result<(), String> {
            self.insert(session).await
        }

        async fn remove(&self, session_id: &str) -> Result<Option<VerificationSession>, String> {
            Ok(self.sessions.write().await.remove(session_id))
        }

        async fn find_by_subject(
            &self,
            kind: SubjectKind,
            value: &str,
        ) -> Result<Option<VerificationSession>, String> {
            Ok(self
                .sessions
                .read()
                .await
                .values()
                .find(|s| s.matches_subject(kind, value))
                .cloned())
        }

        async fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize, String> {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired_at(now));
            Ok(before - sessions.len())
        }

        async fn len(&self) -> Result<usize, String> {
            Ok(self.sessions.read().await.len())
        }
    }

    fn service() -> (
        VerificationService<LocalStore, ManualClock>,
        Arc<LocalStore>,
        Arc<ManualClock>,
    ) {
        let store = Arc::new(LocalStore::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let chain = Arc::new(DeliveryChain::new(DeepLinkBuilder::default(), "TRINCK"));
        let service = VerificationService::new(
            store.clone(),
            clock.clone(),
            chain,
            VerificationServiceConfig::default(),
        );
        (service, store, clock)
    }

    #[tokio::test]
    async fn test_phone_verification_flow_without_channels() {
        let (service, store, _clock) = service();
        service.init().await.unwrap();

        let issued = service
            .issue_code(SubjectKind::Phone, "9876543210")
            .await
            .unwrap();

        // Only the deep link is available
        assert_eq!(issued.delivery.outcome, DeliveryOutcome::DeferredToUser);
        let link = issued.delivery.fallback_link.clone().unwrap();
        let code = store.code(&issued.session_id).await;
        assert!(link.contains(&code));

        let result = service.verify_code(&issued.session_id, &code).await.unwrap();
        assert!(result.verified);
        assert!(service.is_session_verified(&issued.session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_document_session_then_fresh_issue() {
        let (service, store, clock) = service();

        let issued = service
            .issue_code(SubjectKind::IdentityDocument, "123456789012")
            .await
            .unwrap();
        let code = store.code(&issued.session_id).await;

        clock.advance(Duration::minutes(5) + Duration::seconds(1));

        match service.verify_code(&issued.session_id, &code).await {
            Err(DomainError::Verification(VerificationError::Expired)) => {}
            other => panic!("Expected expired, got {:?}", other),
        }

        let fresh = service
            .issue_code(SubjectKind::IdentityDocument, "123456789012")
            .await
            .unwrap();
        assert_ne!(fresh.session_id, issued.session_id);
        assert_eq!(service.active_sessions().await.unwrap(), 1);

        service.dispose().await.unwrap();
        assert_eq!(service.active_sessions().await.unwrap(), 0);
    }
}
