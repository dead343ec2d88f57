use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use volley_store::{CallStatus, RunStatus};

/// Engine lifecycle notifications.
///
/// Events carry identifiers and stable kind labels only; no header values,
/// no bodies, and never decrypted secret material.
#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        collection_id: Uuid,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
    EndpointStarted {
        run_id: Uuid,
        endpoint_id: Uuid,
        name: String,
    },
    EndpointFinished {
        run_id: Uuid,
        endpoint_id: Uuid,
        status: CallStatus,
        duration_ms: u64,
    },
    EndpointSkipped {
        run_id: Uuid,
        endpoint_id: Uuid,
        reason: String,
    },
    RetryScheduled {
        run_id: Uuid,
        endpoint_id: Uuid,
        attempt: u32,
        delay_ms: u64,
    },
    CredentialExpired {
        credential_id: Uuid,
    },
    /// `kind` is the error-kind label only; the underlying message may
    /// reference ciphertext and is dropped on purpose.
    CredentialDecryptFailed {
        credential_id: Uuid,
        kind: &'static str,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// JSON-lines sink for interactive use and log scraping.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let (event_type, payload) = match event {
            Event::RunStarted { run_id, collection_id } => (
                "run.started",
                json!({ "run_id": run_id, "collection_id": collection_id }),
            ),
            Event::RunFinished { run_id, status } => (
                "run.finished",
                json!({ "run_id": run_id, "status": status.as_str() }),
            ),
            Event::EndpointStarted { run_id, endpoint_id, name } => (
                "endpoint.started",
                json!({ "run_id": run_id, "endpoint_id": endpoint_id, "name": name }),
            ),
            Event::EndpointFinished { run_id, endpoint_id, status, duration_ms } => (
                "endpoint.finished",
                json!({
                    "run_id": run_id,
                    "endpoint_id": endpoint_id,
                    "status": status.as_str(),
                    "duration_ms": duration_ms,
                }),
            ),
            Event::EndpointSkipped { run_id, endpoint_id, reason } => (
                "endpoint.skipped",
                json!({ "run_id": run_id, "endpoint_id": endpoint_id, "reason": reason }),
            ),
            Event::RetryScheduled { run_id, endpoint_id, attempt, delay_ms } => (
                "endpoint.retry_scheduled",
                json!({
                    "run_id": run_id,
                    "endpoint_id": endpoint_id,
                    "attempt": attempt,
                    "delay_ms": delay_ms,
                }),
            ),
            Event::CredentialExpired { credential_id } => (
                "credential.expired",
                json!({ "credential_id": credential_id }),
            ),
            Event::CredentialDecryptFailed { credential_id, kind } => (
                "credential.decrypt_failed",
                json!({ "credential_id": credential_id, "kind": kind }),
            ),
        };
        let line = json!({ "type": event_type, "payload": payload });
        println!("{}", serde_json::to_string(&line).unwrap_or_default());
    }
}
