//! Response validation against declared expectations.

use serde_json::Value as JsonValue;

use crate::path::extract_path;
use crate::types::{ContainsCheck, EndpointDefinition};

/// One itemized expectation check. Serialized with the wire tags the result
/// store expects (`status_code`, `response_contains`, `key_exists`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    StatusCode {
        expected: u16,
        actual: u16,
        passed: bool,
    },
    ResponseContains {
        path: String,
        expected: JsonValue,
        actual: Option<JsonValue>,
        passed: bool,
    },
    KeyExists {
        path: String,
        passed: bool,
    },
}

impl Assertion {
    pub fn passed(&self) -> bool {
        match self {
            Assertion::StatusCode { passed, .. }
            | Assertion::ResponseContains { passed, .. }
            | Assertion::KeyExists { passed, .. } => *passed,
        }
    }
}

/// Check status and content expectations, producing an overall verdict plus
/// itemized assertions in declaration order. No expectations means a pass.
pub fn validate_response(
    endpoint: &EndpointDefinition,
    status: u16,
    body: Option<&JsonValue>,
) -> (bool, Vec<Assertion>) {
    let mut assertions = Vec::new();

    if let Some(expected) = endpoint.expected_status {
        assertions.push(Assertion::StatusCode {
            expected,
            actual: status,
            passed: status == expected,
        });
    }

    for check in &endpoint.expected_response_contains {
        match check {
            ContainsCheck::Pairs(pairs) => {
                for (path, expected) in pairs {
                    let actual = extract_path(body, path).cloned();
                    let passed = actual.as_ref() == Some(expected);
                    assertions.push(Assertion::ResponseContains {
                        path: path.clone(),
                        expected: expected.clone(),
                        actual,
                        passed,
                    });
                }
            }
            ContainsCheck::Key(path) => {
                assertions.push(Assertion::KeyExists {
                    path: path.clone(),
                    passed: extract_path(body, path).is_some(),
                });
            }
        }
    }

    let all_passed = assertions.iter().all(Assertion::passed);
    (all_passed, assertions)
}
