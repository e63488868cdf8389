//! In-memory contact directory

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use tk_core::{ContactDirectory, RegisteredContact, SubjectKind};
use tk_shared::config::RegisteredContactConfig;
use tk_shared::utils::{digits_only, indian_national_number, normalize_document_number};

use crate::InfrastructureError;

/// Canonical form of a subject value, matching what the HTTP layer issues
/// sessions for: 10 national digits for phones, bare digits for documents.
fn subject_key(kind: SubjectKind, value: &str) -> (SubjectKind, String) {
    let normalized = match kind {
        SubjectKind::Phone => indian_national_number(value).unwrap_or_else(|| digits_only(value)),
        SubjectKind::IdentityDocument => normalize_document_number(value),
    };
    (kind, normalized)
}

/// Registered phones and emails keyed by subject
#[derive(Debug, Default)]
pub struct InMemoryContactDirectory {
    contacts: RwLock<HashMap<(SubjectKind, String), RegisteredContact>>,
}

impl InMemoryContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory from configuration
    pub fn from_config(entries: &[RegisteredContactConfig]) -> Result<Self, InfrastructureError> {
        let mut contacts = HashMap::new();
        for entry in entries {
            let kind = entry
                .subject_kind
                .parse::<SubjectKind>()
                .map_err(InfrastructureError::Config)?;
            contacts.insert(
                subject_key(kind, &entry.subject_value),
                RegisteredContact {
                    phone: entry.phone.clone(),
                    email: entry.email.clone(),
                },
            );
        }

        Ok(Self {
            contacts: RwLock::new(contacts),
        })
    }

    pub async fn register(&self, kind: SubjectKind, value: impl Into<String>, contact: RegisteredContact) {
        let value: String = value.into();
        self.contacts
            .write()
            .await
            .insert(subject_key(kind, &value), contact);
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn registered_contact(
        &self,
        kind: SubjectKind,
        value: &str,
    ) -> Result<Option<RegisteredContact>, String> {
        Ok(self
            .contacts
            .read()
            .await
            .get(&subject_key(kind, value))
            .cloned())
    }
}
