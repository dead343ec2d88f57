//! `{{variable}}` placeholder substitution.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use crate::context::ExecutionContext;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Replace every `{{name}}` placeholder in `text` with the context value.
///
/// Unknown names (and names bound to JSON null) leave the placeholder
/// untouched, so unresolved templates survive round-tripping instead of
/// silently losing information.
pub fn resolve_text(text: &str, ctx: &ExecutionContext) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match ctx.get(name) {
                Some(JsonValue::Null) | None => caps[0].to_string(),
                Some(v) => value_to_string(v),
            }
        })
        .into_owned()
}

/// Structural variant of [`resolve_text`]: recurses through objects and
/// arrays substituting string leaves only. Non-string leaves pass through.
pub fn resolve_value(value: &JsonValue, ctx: &ExecutionContext) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(resolve_text(s, ctx)),
        JsonValue::Array(items) => {
            JsonValue::Array(items.iter().map(|v| resolve_value(v, ctx)).collect())
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn value_to_string(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        // Null is handled as "missing" by the caller.
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_with(pairs: &[(&str, JsonValue)]) -> ExecutionContext {
        let mut ctx = ExecutionContext::default();
        for (k, v) in pairs {
            ctx.set(k.to_string(), v.clone());
        }
        ctx
    }

    #[test]
    fn replaces_known_placeholders() {
        let ctx = ctx_with(&[("x", json!("Bob"))]);
        assert_eq!(resolve_text("Hi {{x}}", &ctx), "Hi Bob");
    }

    #[test]
    fn keeps_unknown_placeholders_verbatim() {
        let ctx = ExecutionContext::default();
        assert_eq!(resolve_text("Hi {{y}}", &ctx), "Hi {{y}}");
    }

    #[test]
    fn null_counts_as_missing() {
        let ctx = ctx_with(&[("gone", JsonValue::Null)]);
        assert_eq!(resolve_text("{{gone}}", &ctx), "{{gone}}");
    }

    #[test]
    fn stringifies_numbers_and_bools() {
        let ctx = ctx_with(&[("n", json!(42)), ("b", json!(true))]);
        assert_eq!(resolve_text("{{n}}/{{b}}", &ctx), "42/true");
    }

    #[test]
    fn replaces_every_occurrence() {
        let ctx = ctx_with(&[("id", json!("7"))]);
        assert_eq!(resolve_text("/items/{{id}}/copies/{{id}}", &ctx), "/items/7/copies/7");
    }

    #[test]
    fn environment_layer_is_visible() {
        let mut env = std::collections::BTreeMap::new();
        env.insert("base".to_string(), json!("https://api.test"));
        let ctx = ExecutionContext::new(env);
        assert_eq!(resolve_text("{{base}}/v1", &ctx), "https://api.test/v1");
    }

    #[test]
    fn resolve_value_substitutes_string_leaves_only() {
        let ctx = ctx_with(&[("user", json!("ada"))]);
        let body = json!({
            "name": "{{user}}",
            "count": 3,
            "tags": ["{{user}}", 1, {"nested": "{{user}}"}],
        });
        let resolved = resolve_value(&body, &ctx);
        assert_eq!(
            resolved,
            json!({
                "name": "ada",
                "count": 3,
                "tags": ["ada", 1, {"nested": "ada"}],
            })
        );
    }
}
