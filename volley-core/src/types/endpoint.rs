use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use uuid::Uuid;

/// One configured HTTP call: method, URL template, headers, body, and the
/// validation/extraction rules applied to its response.
///
/// Definitions are immutable from the engine's point of view. `{{name}}`
/// placeholders in the URL, headers, query params, and body are resolved
/// against the run's [`crate::ExecutionContext`] at execution time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EndpointDefinition {
    pub id: Uuid,

    pub name: String,

    pub method: HttpMethod,

    /// URL template, may contain `{{variable}}` placeholders and an
    /// inline query string.
    pub url: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub query_params: BTreeMap<String, String>,

    #[serde(default)]
    pub body_kind: BodyKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,

    /// Per-call timeout; the engine default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Number of retries after the initial attempt.
    #[serde(default)]
    pub retry_count: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,

    #[serde(default)]
    pub expected_response_contains: Vec<ContainsCheck>,

    /// Variable name -> JSON path into the response body.
    #[serde(default)]
    pub extract: BTreeMap<String, String>,

    /// Endpoint (same collection) that must have succeeded before this one
    /// runs. Cycles are the authoring layer's problem, not the engine's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Uuid>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_retry_delay() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// How the request body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BodyKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "form-data")]
    FormData,
    #[serde(rename = "x-www-form-urlencoded")]
    UrlEncoded,
    #[serde(rename = "raw")]
    Raw,
}

/// One declared response expectation.
///
/// A bare string asserts the key exists; a map asserts each `path: value`
/// pair matches, evaluated in authored order. Both shapes come straight
/// from the authored definition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ContainsCheck {
    Key(String),
    Pairs(serde_json::Map<String, JsonValue>),
}
