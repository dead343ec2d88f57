#![forbid(unsafe_code)]

pub mod memory;
pub mod postgres;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::postgres::{run_migrations, PostgresStore};
pub use crate::store::{
    CallOutcome, CallStatus, CredentialError, CredentialStore, NewRun, ResultSink, RunRecord,
    RunStatus, RunSummary, RunTotals, SecretMap, StoreError, TriggerKind,
};
