//! Executes a single endpoint definition, including its retry loop, and
//! assembles the stored outcome record.

use std::time::Instant;

use chrono::Utc;
use serde_json::Value as JsonValue;
use uuid::Uuid;
use volley_core::{extract_path, validate_response, Credential, EndpointDefinition, ExecutionContext};
use volley_store::{CallOutcome, CallStatus};

use crate::executor::auth::CredentialAdapter;
use crate::executor::events::{Event, EventSink};
use crate::executor::http::{HttpClient, HttpError, RequestParts};
use crate::executor::request::{build_body, build_headers, build_url, BuildError};
use crate::executor::sanitize::{mask_headers, truncate_body};
use crate::executor::types::ExecutorConfig;

pub struct CallExecutor<'a> {
    http: &'a dyn HttpClient,
    credentials: CredentialAdapter<'a>,
    events: &'a dyn EventSink,
    config: &'a ExecutorConfig,
}

impl<'a> CallExecutor<'a> {
    pub fn new(
        http: &'a dyn HttpClient,
        credentials: CredentialAdapter<'a>,
        events: &'a dyn EventSink,
        config: &'a ExecutorConfig,
    ) -> Self {
        Self {
            http,
            credentials,
            events,
            config,
        }
    }

    /// Run the endpoint, retrying timeouts and transport errors up to
    /// `retry_count` additional attempts. Assertion failures are final
    /// and never retried.
    pub async fn execute_with_retry(
        &self,
        run_id: Uuid,
        endpoint: &EndpointDefinition,
        ctx: &mut ExecutionContext,
        credential: Option<&Credential>,
    ) -> CallOutcome {
        let mut attempt: u32 = 0;
        loop {
            let outcome = self
                .execute_once(run_id, endpoint, ctx, credential, attempt)
                .await;
            let retryable = matches!(outcome.status, CallStatus::Timeout | CallStatus::Error);
            if !retryable || attempt >= endpoint.retry_count {
                return outcome;
            }
            attempt += 1;
            let delay_ms = endpoint.retry_delay_seconds * 1000;
            self.events
                .emit(Event::RetryScheduled {
                    run_id,
                    endpoint_id: endpoint.id,
                    attempt,
                    delay_ms,
                })
                .await;
            tokio::time::sleep(std::time::Duration::from_secs(endpoint.retry_delay_seconds))
                .await;
        }
    }

    async fn execute_once(
        &self,
        _run_id: Uuid,
        endpoint: &EndpointDefinition,
        ctx: &mut ExecutionContext,
        credential: Option<&Credential>,
        attempt: u32,
    ) -> CallOutcome {
        let auth_headers = self.credentials.build_headers(credential).await;
        let auth_params = self.credentials.build_query_params(credential).await;

        let mut outcome = blank_outcome(endpoint, attempt);

        let url = match build_url(endpoint, ctx, &auth_params) {
            Ok(url) => url,
            Err(e) => return build_failure(outcome, e),
        };
        let headers = build_headers(endpoint, ctx, auth_headers);
        let body = match build_body(endpoint, ctx) {
            Ok(body) => body,
            Err(e) => return build_failure(outcome, e),
        };

        outcome.request_url = url.to_string();
        outcome.request_headers = mask_headers(&headers);

        let timeout = endpoint
            .timeout_seconds
            .map(std::time::Duration::from_secs)
            .unwrap_or(self.config.default_timeout);

        let request = RequestParts {
            method: endpoint.method,
            url,
            headers,
            body,
        };

        let started = Instant::now();
        match self.http.send(request, timeout).await {
            Ok(response) => {
                outcome.duration_ms = started.elapsed().as_millis() as u64;
                outcome.response_status = Some(response.status);
                outcome.response_headers = response.headers.clone();
                outcome.response_size_bytes = response.body.len() as u64;

                let body_json = match std::str::from_utf8(&response.body) {
                    Ok(text) => {
                        outcome.response_body =
                            truncate_body(text, self.config.max_stored_response_bytes);
                        serde_json::from_str::<JsonValue>(text).ok()
                    }
                    Err(_) => {
                        outcome.response_body = "[Unable to decode response]".to_string();
                        None
                    }
                };

                for (name, path) in &endpoint.extract {
                    if let Some(value) = extract_path(body_json.as_ref(), path) {
                        outcome
                            .extracted_variables
                            .insert(name.clone(), value.clone());
                        ctx.set(name.clone(), value.clone());
                    }
                }

                let (passed, assertions) =
                    validate_response(endpoint, response.status, body_json.as_ref());
                outcome.assertions_passed = passed;
                outcome.assertions = assertions;
                outcome.status = if response.status >= 400 || !passed {
                    CallStatus::Failed
                } else {
                    CallStatus::Success
                };
            }
            Err(HttpError::Timeout) => {
                outcome.duration_ms = started.elapsed().as_millis() as u64;
                outcome.status = CallStatus::Timeout;
                outcome.error_kind = Some("Timeout".to_string());
                outcome.error_message =
                    Some(format!("Request timed out after {}s", timeout.as_secs()));
            }
            Err(e) => {
                outcome.duration_ms = started.elapsed().as_millis() as u64;
                outcome.status = CallStatus::Error;
                outcome.error_kind = Some(e.kind().to_string());
                outcome.error_message = Some(e.to_string());
            }
        }
        outcome.finished_at = Utc::now();
        outcome
    }
}

fn blank_outcome(endpoint: &EndpointDefinition, attempt: u32) -> CallOutcome {
    CallOutcome {
        endpoint_id: endpoint.id,
        endpoint_name: endpoint.name.clone(),
        endpoint_method: endpoint.method,
        status: CallStatus::Error,
        request_url: endpoint.url.clone(),
        request_headers: Default::default(),
        request_body: endpoint.body.clone(),
        response_status: None,
        response_headers: Default::default(),
        response_body: String::new(),
        response_size_bytes: 0,
        duration_ms: 0,
        error_kind: None,
        error_message: None,
        // No assertion has failed until one actually runs.
        assertions_passed: true,
        assertions: Vec::new(),
        extracted_variables: Default::default(),
        retry_attempt: attempt,
        finished_at: Utc::now(),
    }
}

fn build_failure(mut outcome: CallOutcome, error: BuildError) -> CallOutcome {
    outcome.status = CallStatus::Error;
    outcome.error_kind = Some(error.kind().to_string());
    outcome.error_message = Some(error.to_string());
    outcome.finished_at = Utc::now();
    outcome
}
