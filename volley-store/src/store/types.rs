use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use volley_core::validate::Assertion;
use volley_core::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Manual,
    Scheduled,
    Webhook,
    Ci,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Manual => "manual",
            TriggerKind::Scheduled => "scheduled",
            TriggerKind::Webhook => "webhook",
            TriggerKind::Ci => "ci",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    PartialFailure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::PartialFailure => "partial_failure",
        }
    }

    /// Terminal status is always derived from the counters, never assigned
    /// directly: `completed` with zero failures, `failed` with zero
    /// successes, `partial_failure` otherwise.
    pub fn from_counts(total: u32, succeeded: u32, failed: u32) -> Self {
        debug_assert!(succeeded + failed <= total);
        if failed == 0 {
            RunStatus::Completed
        } else if succeeded == 0 {
            RunStatus::Failed
        } else {
            RunStatus::PartialFailure
        }
    }
}

/// Terminal classification of one endpoint's final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Success,
    Failed,
    Error,
    Timeout,
    Skipped,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Success => "success",
            CallStatus::Failed => "failed",
            CallStatus::Error => "error",
            CallStatus::Timeout => "timeout",
            CallStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRun {
    pub collection_id: Uuid,
    pub collection_name: String,
    pub total_endpoints: u32,
    pub trigger: TriggerKind,
    /// Caller-supplied environment overrides, kept for debugging.
    pub environment_overrides: BTreeMap<String, JsonValue>,
    pub notes: String,
    pub triggered_by: Option<String>,
}

/// Per-endpoint result record as handed to the sink.
///
/// The endpoint name and method are snapshotted so the record survives
/// endpoint deletion. Request headers arrive already masked; the response
/// body arrives already truncated, with the original size alongside.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallOutcome {
    pub endpoint_id: Uuid,
    pub endpoint_name: String,
    pub endpoint_method: HttpMethod,
    pub status: CallStatus,
    pub request_url: String,
    pub request_headers: BTreeMap<String, String>,
    /// The body as originally configured, not the resolved payload.
    pub request_body: Option<JsonValue>,
    pub response_status: Option<u16>,
    pub response_headers: BTreeMap<String, String>,
    pub response_body: String,
    pub response_size_bytes: u64,
    pub duration_ms: u64,
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
    pub assertions_passed: bool,
    pub assertions: Vec<Assertion>,
    pub extracted_variables: BTreeMap<String, JsonValue>,
    pub retry_attempt: u32,
    pub finished_at: DateTime<Utc>,
}

/// Final counters for a run; the sink derives the terminal status from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl RunTotals {
    pub fn status(&self) -> RunStatus {
        RunStatus::from_counts(self.total, self.succeeded, self.failed)
    }
}

/// What the orchestrator returns to its caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub collection_id: Uuid,
    pub status: RunStatus,
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct RunRecord {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub collection_name: String,
    pub status: String,
    pub total_endpoints: i32,
    pub successful_count: i32,
    pub failed_count: i32,
    pub skipped_count: i32,
    pub trigger_kind: String,
    pub environment: JsonValue,
    pub notes: String,
    pub triggered_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation_matches_counter_rules() {
        assert_eq!(RunStatus::from_counts(5, 5, 0), RunStatus::Completed);
        assert_eq!(RunStatus::from_counts(5, 0, 5), RunStatus::Failed);
        assert_eq!(RunStatus::from_counts(5, 3, 2), RunStatus::PartialFailure);
    }

    #[test]
    fn all_skipped_counts_as_completed() {
        // Zero failures wins even when nothing succeeded.
        assert_eq!(RunStatus::from_counts(3, 0, 0), RunStatus::Completed);
    }

    #[test]
    fn totals_delegate_to_from_counts() {
        let t = RunTotals { total: 4, succeeded: 1, failed: 1, skipped: 2 };
        assert_eq!(t.status(), RunStatus::PartialFailure);
    }

    #[test]
    fn statuses_use_snake_case_tags() {
        assert_eq!(RunStatus::PartialFailure.as_str(), "partial_failure");
        assert_eq!(
            serde_json::to_string(&RunStatus::PartialFailure).unwrap(),
            r#""partial_failure""#
        );
        assert_eq!(serde_json::to_string(&CallStatus::Timeout).unwrap(), r#""timeout""#);
    }
}
