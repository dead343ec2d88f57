use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::types::{Credential, EndpointDefinition};

/// An ordered set of endpoint definitions run together in one invocation.
///
/// Collections are authored and versioned elsewhere; the engine only reads
/// them. `environment_variables` seeds the run's [`crate::ExecutionContext`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Collection {
    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    pub environment_variables: BTreeMap<String, JsonValue>,

    #[serde(default)]
    pub endpoints: Vec<EndpointDefinition>,

    /// Collection-level credentials. When a run is triggered without an
    /// explicit credential, the first active entry is used.
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

impl Collection {
    /// Active endpoints in execution order: ascending `sort_order`, ties
    /// broken by position in the collection (creation order).
    pub fn ordered_endpoints(&self) -> Vec<&EndpointDefinition> {
        let mut out: Vec<&EndpointDefinition> =
            self.endpoints.iter().filter(|e| e.is_active).collect();
        out.sort_by_key(|e| e.sort_order);
        out
    }

    /// First active collection-level credential, if any.
    pub fn default_credential(&self) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BodyKind, HttpMethod};

    fn endpoint(name: &str, sort_order: i32, is_active: bool) -> EndpointDefinition {
        EndpointDefinition {
            id: Uuid::new_v4(),
            name: name.to_string(),
            method: HttpMethod::Get,
            url: "https://example.com".to_string(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body_kind: BodyKind::None,
            body: None,
            timeout_seconds: None,
            retry_count: 0,
            retry_delay_seconds: 1,
            expected_status: None,
            expected_response_contains: Vec::new(),
            extract: BTreeMap::new(),
            depends_on: None,
            sort_order,
            is_active,
        }
    }

    fn collection(endpoints: Vec<EndpointDefinition>) -> Collection {
        Collection {
            id: Uuid::new_v4(),
            name: "c".to_string(),
            environment_variables: BTreeMap::new(),
            endpoints,
            credentials: Vec::new(),
        }
    }

    #[test]
    fn ordered_endpoints_sorts_by_sort_order() {
        let c = collection(vec![
            endpoint("b", 2, true),
            endpoint("a", 1, true),
            endpoint("c", 3, true),
        ]);
        let names: Vec<&str> = c.ordered_endpoints().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn ordered_endpoints_preserves_creation_order_on_ties() {
        let c = collection(vec![
            endpoint("first", 1, true),
            endpoint("second", 1, true),
        ]);
        let names: Vec<&str> = c.ordered_endpoints().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn ordered_endpoints_skips_inactive() {
        let c = collection(vec![endpoint("on", 1, true), endpoint("off", 0, false)]);
        let names: Vec<&str> = c.ordered_endpoints().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["on"]);
    }
}
