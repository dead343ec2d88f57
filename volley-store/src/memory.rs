//! In-memory store used by tests and single-process embeddings.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use volley_core::Credential;

use crate::store::{
    CallOutcome, CredentialError, CredentialStore, NewRun, ResultSink, RunRecord, RunTotals,
    SecretMap, StoreError,
};

#[derive(Debug, Clone)]
struct StoredCredential {
    credential: Credential,
    secret: BTreeMap<String, String>,
    /// When set, `decrypt` fails, exercising the no-auth fallback path.
    poisoned: bool,
    last_used_at: Option<DateTime<Utc>>,
}

/// Mutex-guarded maps implementing both collaborator traits.
///
/// Secrets are held in plaintext here; this store exists for tests and
/// embedders that bring their own at-rest protection.
#[derive(Default)]
pub struct MemoryStore {
    runs: Mutex<BTreeMap<Uuid, RunRecord>>,
    results: Mutex<BTreeMap<Uuid, Vec<CallOutcome>>>,
    credentials: Mutex<BTreeMap<Uuid, StoredCredential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_credential<I, K, V>(&self, credential: Credential, secret: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = credential.id;
        self.credentials.lock().expect("lock").insert(
            id,
            StoredCredential {
                credential,
                secret: secret
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
                poisoned: false,
                last_used_at: None,
            },
        );
    }

    /// Make `decrypt` fail for this credential from now on.
    pub fn poison_credential(&self, id: Uuid) {
        if let Some(c) = self.credentials.lock().expect("lock").get_mut(&id) {
            c.poisoned = true;
        }
    }

    pub fn run(&self, run_id: Uuid) -> Option<RunRecord> {
        self.runs.lock().expect("lock").get(&run_id).cloned()
    }

    pub fn results(&self, run_id: Uuid) -> Vec<CallOutcome> {
        self.results
            .lock()
            .expect("lock")
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_used(&self, credential_id: Uuid) -> Option<DateTime<Utc>> {
        self.credentials
            .lock()
            .expect("lock")
            .get(&credential_id)
            .and_then(|c| c.last_used_at)
    }
}

#[async_trait]
impl ResultSink for MemoryStore {
    async fn create_run(&self, run: NewRun) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let record = RunRecord {
            id,
            collection_id: run.collection_id,
            collection_name: run.collection_name,
            status: "pending".to_string(),
            total_endpoints: run.total_endpoints as i32,
            successful_count: 0,
            failed_count: 0,
            skipped_count: 0,
            trigger_kind: run.trigger.as_str().to_string(),
            environment: serde_json::to_value(&run.environment_overrides)
                .map_err(|e| StoreError::Other(e.to_string()))?,
            notes: run.notes,
            triggered_by: run.triggered_by,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        };
        self.runs.lock().expect("lock").insert(id, record);
        self.results.lock().expect("lock").insert(id, Vec::new());
        Ok(id)
    }

    async fn mark_run_started(&self, run_id: Uuid) -> Result<(), StoreError> {
        let mut runs = self.runs.lock().expect("lock");
        let run = runs
            .get_mut(&run_id)
            .ok_or_else(|| StoreError::Other(format!("unknown run {run_id}")))?;
        run.status = "running".to_string();
        run.started_at = Some(Utc::now());
        Ok(())
    }

    async fn append_result(&self, run_id: Uuid, outcome: CallOutcome) -> Result<(), StoreError> {
        let mut results = self.results.lock().expect("lock");
        let list = results
            .get_mut(&run_id)
            .ok_or_else(|| StoreError::Other(format!("unknown run {run_id}")))?;
        list.push(outcome);
        Ok(())
    }

    async fn finish_run(&self, run_id: Uuid, totals: RunTotals) -> Result<(), StoreError> {
        let mut runs = self.runs.lock().expect("lock");
        let run = runs
            .get_mut(&run_id)
            .ok_or_else(|| StoreError::Other(format!("unknown run {run_id}")))?;
        run.successful_count = totals.succeeded as i32;
        run.failed_count = totals.failed as i32;
        run.skipped_count = totals.skipped as i32;
        run.status = totals.status().as_str().to_string();
        run.finished_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .credentials
            .lock()
            .expect("lock")
            .get(&id)
            .map(|c| c.credential.clone()))
    }

    async fn decrypt(&self, credential: &Credential) -> Result<SecretMap, CredentialError> {
        let creds = self.credentials.lock().expect("lock");
        let stored = creds
            .get(&credential.id)
            .ok_or(CredentialError::Unavailable)?;
        if stored.poisoned {
            return Err(CredentialError::Decrypt);
        }
        Ok(SecretMap::from_pairs(
            stored.secret.iter().map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), StoreError> {
        let mut creds = self.credentials.lock().expect("lock");
        let stored = creds
            .get_mut(&id)
            .ok_or_else(|| StoreError::Other(format!("unknown credential {id}")))?;
        stored.last_used_at = Some(Utc::now());
        Ok(())
    }
}
