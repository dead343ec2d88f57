use uuid::Uuid;

use volley_store::StoreError;

/// Faults that abort a run before any endpoint executes. Everything that
/// happens after that point is recorded per endpoint, never raised.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("collection {0} has no active endpoints to execute")]
    EmptyCollection(Uuid),
    #[error("credential not found: {0}")]
    CredentialNotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}
