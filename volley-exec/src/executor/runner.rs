//! Drives one collection run end to end: credential selection, the
//! dependency-ordered endpoint loop, result persistence and the final
//! run status.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use uuid::Uuid;
use volley_core::{Collection, Credential, EndpointDefinition, ExecutionContext};
use volley_store::{
    CallOutcome, CallStatus, CredentialStore, NewRun, ResultSink, RunSummary, RunTotals,
    TriggerKind,
};

use crate::error::EngineError;
use crate::executor::auth::CredentialAdapter;
use crate::executor::call::CallExecutor;
use crate::executor::events::{Event, EventSink};
use crate::executor::http::HttpClient;
use crate::executor::types::ExecutorConfig;

pub struct RunRequest {
    pub collection: Collection,
    /// Forces a specific credential. When absent, the collection's first
    /// active credential is used, if any.
    pub credential_id: Option<Uuid>,
    pub environment_overrides: BTreeMap<String, JsonValue>,
    pub trigger: TriggerKind,
    pub notes: String,
    pub triggered_by: Option<String>,
}

pub struct Orchestrator {
    config: ExecutorConfig,
    http: Arc<dyn HttpClient>,
    sink: Arc<dyn ResultSink>,
    credentials: Arc<dyn CredentialStore>,
    events: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(
        config: ExecutorConfig,
        http: Arc<dyn HttpClient>,
        sink: Arc<dyn ResultSink>,
        credentials: Arc<dyn CredentialStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            http,
            sink,
            credentials,
            events,
        }
    }

    pub async fn run(&self, request: RunRequest) -> Result<RunSummary, EngineError> {
        let collection = &request.collection;
        let endpoints = collection.ordered_endpoints();
        if endpoints.is_empty() {
            return Err(EngineError::EmptyCollection(collection.id));
        }

        let credential = self
            .select_credential(collection, request.credential_id)
            .await?;

        let started_at = Utc::now();
        let run_id = self
            .sink
            .create_run(NewRun {
                collection_id: collection.id,
                collection_name: collection.name.clone(),
                total_endpoints: endpoints.len() as u32,
                trigger: request.trigger,
                environment_overrides: request.environment_overrides.clone(),
                notes: request.notes.clone(),
                triggered_by: request.triggered_by.clone(),
            })
            .await?;

        let mut ctx = ExecutionContext::new(collection.environment_variables.clone());
        ctx.merge_environment(request.environment_overrides.clone());

        let _ = self.sink.mark_run_started(run_id).await;
        self.events
            .emit(Event::RunStarted {
                run_id,
                collection_id: collection.id,
            })
            .await;

        let adapter = CredentialAdapter::new(self.credentials.as_ref(), self.events.as_ref());
        let executor = CallExecutor::new(
            self.http.as_ref(),
            adapter,
            self.events.as_ref(),
            &self.config,
        );

        let total = endpoints.len() as u32;
        let mut succeeded_set: BTreeSet<Uuid> = BTreeSet::new();
        let mut failed_set: BTreeSet<Uuid> = BTreeSet::new();
        let mut succeeded: u32 = 0;
        let mut failed: u32 = 0;
        let mut skipped: u32 = 0;
        let mut faulted = false;

        for endpoint in &endpoints {
            if let Some(reason) = skip_reason(endpoint, &succeeded_set, &failed_set) {
                self.events
                    .emit(Event::EndpointSkipped {
                        run_id,
                        endpoint_id: endpoint.id,
                        reason: reason.to_string(),
                    })
                    .await;
                let outcome = skipped_outcome(endpoint, reason);
                if self.sink.append_result(run_id, outcome).await.is_err() {
                    faulted = true;
                    break;
                }
                skipped += 1;
                continue;
            }

            self.events
                .emit(Event::EndpointStarted {
                    run_id,
                    endpoint_id: endpoint.id,
                    name: endpoint.name.clone(),
                })
                .await;

            let outcome = executor
                .execute_with_retry(run_id, endpoint, &mut ctx, credential.as_ref())
                .await;

            self.events
                .emit(Event::EndpointFinished {
                    run_id,
                    endpoint_id: endpoint.id,
                    status: outcome.status,
                    duration_ms: outcome.duration_ms,
                })
                .await;

            let success = outcome.status == CallStatus::Success;
            if self.sink.append_result(run_id, outcome).await.is_err() {
                faulted = true;
                break;
            }
            if success {
                succeeded_set.insert(endpoint.id);
                succeeded += 1;
            } else {
                failed_set.insert(endpoint.id);
                failed += 1;
            }
        }

        if faulted {
            // Endpoints never reached count as skipped in the final totals.
            skipped = total - succeeded - failed;
        } else if let Some(credential) = &credential {
            let _ = self.credentials.mark_used(credential.id).await;
        }

        let totals = RunTotals {
            total,
            succeeded,
            failed,
            skipped,
        };
        let status = totals.status();
        let _ = self.sink.finish_run(run_id, totals).await;
        self.events
            .emit(Event::RunFinished { run_id, status })
            .await;

        Ok(RunSummary {
            run_id,
            collection_id: collection.id,
            status,
            total,
            succeeded,
            failed,
            skipped,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn select_credential(
        &self,
        collection: &Collection,
        credential_id: Option<Uuid>,
    ) -> Result<Option<Credential>, EngineError> {
        let candidate = match credential_id {
            Some(id) => Some(
                self.credentials
                    .get(id)
                    .await?
                    .ok_or(EngineError::CredentialNotFound(id))?,
            ),
            None => collection.default_credential().cloned(),
        };
        match candidate {
            Some(credential) if self.credentials.is_expired(&credential) => {
                self.events
                    .emit(Event::CredentialExpired {
                        credential_id: credential.id,
                    })
                    .await;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

/// Why an endpoint is skipped instead of executed, if its dependency did
/// not succeed. A dependency that sorts after its dependent can never
/// have executed yet and is always reported as not executed.
fn skip_reason(
    endpoint: &EndpointDefinition,
    succeeded: &BTreeSet<Uuid>,
    failed: &BTreeSet<Uuid>,
) -> Option<&'static str> {
    let dep = endpoint.depends_on?;
    if succeeded.contains(&dep) {
        None
    } else if failed.contains(&dep) {
        Some("Skipped: dependency failed")
    } else {
        Some("Skipped: dependency not executed")
    }
}

fn skipped_outcome(endpoint: &EndpointDefinition, reason: &str) -> CallOutcome {
    CallOutcome {
        endpoint_id: endpoint.id,
        endpoint_name: endpoint.name.clone(),
        endpoint_method: endpoint.method,
        status: CallStatus::Skipped,
        request_url: endpoint.url.clone(),
        request_headers: Default::default(),
        request_body: None,
        response_status: None,
        response_headers: Default::default(),
        response_body: String::new(),
        response_size_bytes: 0,
        duration_ms: 0,
        error_kind: None,
        error_message: Some(reason.to_string()),
        assertions_passed: true,
        assertions: Vec::new(),
        extracted_variables: Default::default(),
        retry_attempt: 0,
        finished_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::HttpMethod;

    fn endpoint(depends_on: Option<Uuid>) -> EndpointDefinition {
        EndpointDefinition {
            id: Uuid::new_v4(),
            name: "e".to_string(),
            method: HttpMethod::Get,
            url: "https://example.test".to_string(),
            headers: Default::default(),
            query_params: Default::default(),
            body_kind: Default::default(),
            body: None,
            timeout_seconds: None,
            retry_count: 0,
            retry_delay_seconds: 1,
            expected_status: None,
            expected_response_contains: Vec::new(),
            extract: Default::default(),
            depends_on,
            sort_order: 0,
            is_active: true,
        }
    }

    #[test]
    fn no_dependency_never_skips() {
        let e = endpoint(None);
        assert_eq!(skip_reason(&e, &BTreeSet::new(), &BTreeSet::new()), None);
    }

    #[test]
    fn failed_dependency_skips_with_failed_reason() {
        let dep = Uuid::new_v4();
        let e = endpoint(Some(dep));
        let failed = BTreeSet::from([dep]);
        assert_eq!(
            skip_reason(&e, &BTreeSet::new(), &failed),
            Some("Skipped: dependency failed")
        );
    }

    #[test]
    fn unseen_dependency_skips_as_not_executed() {
        let e = endpoint(Some(Uuid::new_v4()));
        assert_eq!(
            skip_reason(&e, &BTreeSet::new(), &BTreeSet::new()),
            Some("Skipped: dependency not executed")
        );
    }
}
