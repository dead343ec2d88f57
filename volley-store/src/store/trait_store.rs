use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use volley_core::Credential;

use crate::store::secret::SecretMap;
use crate::store::types::{CallOutcome, NewRun, RunTotals};

/// Durable destination for run and per-endpoint result records.
///
/// The engine is the only writer: it creates the run in `pending`, marks it
/// running, appends one outcome per processed endpoint, and finalizes it
/// with the accumulated totals. Implementations derive the terminal status
/// from the totals (`RunTotals::status`), never from caller input.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn create_run(&self, run: NewRun) -> Result<Uuid, StoreError>;

    async fn mark_run_started(&self, run_id: Uuid) -> Result<(), StoreError>;

    async fn append_result(&self, run_id: Uuid, outcome: CallOutcome) -> Result<(), StoreError>;

    async fn finish_run(&self, run_id: Uuid, totals: RunTotals) -> Result<(), StoreError>;
}

/// Read-side collaborator for credentials.
///
/// Encryption at rest and credential CRUD live in the owning application;
/// the engine only ever asks for metadata, a decrypt-at-use payload, and a
/// usage timestamp update.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Credential>, StoreError>;

    fn is_expired(&self, credential: &Credential) -> bool {
        credential.is_expired_at(Utc::now())
    }

    /// Decrypt the secret payload. Callers must treat the returned map as
    /// ephemeral and must never log it; on failure, only
    /// [`CredentialError::kind`] may be reported.
    async fn decrypt(&self, credential: &Credential) -> Result<SecretMap, CredentialError>;

    /// Record that the credential was used. Called once per run.
    async fn mark_used(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}

/// Decrypt failures carry no message on purpose: the error kind is the only
/// thing that may ever reach a log or an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("credential decryption failed")]
    Decrypt,
    #[error("decrypted payload is not a string map")]
    Malformed,
    #[error("credential store unavailable")]
    Unavailable,
}

impl CredentialError {
    /// Stable label safe for logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialError::Decrypt => "Decrypt",
            CredentialError::Malformed => "Malformed",
            CredentialError::Unavailable => "Unavailable",
        }
    }
}
