mod secret;
mod trait_store;
mod types;

pub use secret::SecretMap;
pub use trait_store::{CredentialError, CredentialStore, ResultSink, StoreError};
pub use types::{
    CallOutcome, CallStatus, NewRun, RunRecord, RunStatus, RunSummary, RunTotals, TriggerKind,
};
