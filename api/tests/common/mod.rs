//! Test harness: the real app over an in-memory store, a manual clock and
//! a recording mailer

use std::sync::Arc;

use actix_web::web;
use chrono::Utc;

use tk_api::AppState;
use tk_core::{ManualClock, VerificationService, VerificationServiceConfig};
use tk_infra::bootstrap::build_delivery_chain_with_mailer;
use tk_infra::mail::MockMailer;
use tk_infra::store::InMemorySessionStore;
use tk_shared::config::{AppConfig, DeliveryConfig, Environment, RegisteredContactConfig};

pub type TestState = AppState<InMemorySessionStore, ManualClock>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub clock: Arc<ManualClock>,
    pub mailer: MockMailer,
    pub config: AppConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_mailer(MockMailer::new()).await
    }

    pub async fn with_mailer(mailer: MockMailer) -> Self {
        let delivery = DeliveryConfig {
            registered_contacts: vec![RegisteredContactConfig {
                subject_kind: "identity_document".to_string(),
                subject_value: "123456789012".to_string(),
                email: Some("owner@example.com".to_string()),
                phone: Some("9123456780".to_string()),
            }],
            ..Default::default()
        };
        let chain = build_delivery_chain_with_mailer(&delivery, Arc::new(mailer.clone())).unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let service = VerificationService::new(
            Arc::new(InMemorySessionStore::new()),
            clock.clone(),
            Arc::new(chain),
            VerificationServiceConfig::default(),
        );
        service.init().await.unwrap();

        Self {
            state: web::Data::new(AppState::new(Arc::new(service))),
            clock,
            mailer,
            config: AppConfig::for_environment(Environment::Development),
        }
    }

    /// Code carried by the `index`-th message the mailer accepted
    pub fn sent_code(&self, index: usize) -> String {
        let body = &self.mailer.sent()[index].body;
        body.split(": ")
            .nth(1)
            .map(|rest| rest.chars().take(6).collect())
            .unwrap()
    }
}
