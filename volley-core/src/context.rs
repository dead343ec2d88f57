use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// Per-run layered variable scope.
///
/// Lookup order is extracted variables first, then the environment layer.
/// One context lives for exactly one orchestrator run and is passed
/// explicitly into every component, so concurrent runs of different
/// collections never share state.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    environment: BTreeMap<String, JsonValue>,
    extracted: BTreeMap<String, JsonValue>,
}

impl ExecutionContext {
    pub fn new(environment: BTreeMap<String, JsonValue>) -> Self {
        Self {
            environment,
            extracted: BTreeMap::new(),
        }
    }

    /// Overlay additional environment variables; later entries win.
    pub fn merge_environment(&mut self, overrides: BTreeMap<String, JsonValue>) {
        self.environment.extend(overrides);
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.extracted.get(name).or_else(|| self.environment.get(name))
    }

    /// Record a variable extracted from a response. Last writer wins.
    pub fn set(&mut self, name: impl Into<String>, value: JsonValue) {
        self.extracted.insert(name.into(), value);
    }

    /// Snapshot of everything extracted so far, for embedding in results.
    pub fn extracted(&self) -> &BTreeMap<String, JsonValue> {
        &self.extracted
    }
}
