use std::collections::BTreeMap;

use serde_json::json;
use uuid::Uuid;
use volley_core::{BodyKind, EndpointDefinition, ExecutionContext, HttpMethod};
use volley_exec::executor::{build_body, build_headers, build_url, RequestBody};

fn endpoint(url: &str) -> EndpointDefinition {
    EndpointDefinition {
        id: Uuid::new_v4(),
        name: "e".to_string(),
        method: HttpMethod::Get,
        url: url.to_string(),
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
        sort_order: 0,
        is_active: true,
    }
}

fn ctx_with(pairs: &[(&str, serde_json::Value)]) -> ExecutionContext {
    let env = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    ExecutionContext::new(env)
}

#[test]
fn url_placeholders_resolve_from_context() {
    let e = endpoint("https://{{host}}/users/{{user_id}}");
    let ctx = ctx_with(&[("host", json!("api.example.com")), ("user_id", json!(42))]);
    let url = build_url(&e, &ctx, &BTreeMap::new()).unwrap();
    assert_eq!(url.as_str(), "https://api.example.com/users/42");
}

#[test]
fn unresolved_placeholder_stays_verbatim_and_may_break_parsing() {
    // An unknown variable is left in place; whether the URL still parses
    // is up to where the placeholder sits.
    let e = endpoint("https://api.example.com/{{missing}}/x");
    let ctx = ExecutionContext::default();
    let url = build_url(&e, &ctx, &BTreeMap::new()).unwrap();
    assert!(url.path().contains("missing"));
}

#[test]
fn query_params_merge_with_auth_winning() {
    let mut e = endpoint("https://api.example.com/list?page=1&limit=5");
    e.query_params.insert("limit".to_string(), "10".to_string());
    e.query_params.insert("q".to_string(), "{{term}}".to_string());
    let ctx = ctx_with(&[("term", json!("rust"))]);
    let mut auth = BTreeMap::new();
    auth.insert("api_key".to_string(), "k123".to_string());
    auth.insert("limit".to_string(), "99".to_string());

    let url = build_url(&e, &ctx, &auth).unwrap();
    let pairs: BTreeMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs["page"], "1");
    assert_eq!(pairs["limit"], "99");
    assert_eq!(pairs["q"], "rust");
    assert_eq!(pairs["api_key"], "k123");
}

#[test]
fn invalid_url_is_an_error() {
    let e = endpoint("not a url");
    let err = build_url(&e, &ExecutionContext::default(), &BTreeMap::new()).unwrap_err();
    assert_eq!(err.kind(), "InvalidUrl");
}

#[test]
fn json_body_gets_default_content_type() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::Json;
    let headers = build_headers(&e, &ExecutionContext::default(), BTreeMap::new());
    assert_eq!(headers["Content-Type"], "application/json");
}

#[test]
fn existing_content_type_is_kept_case_insensitively() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::Json;
    e.headers
        .insert("content-type".to_string(), "application/vnd.custom".to_string());
    let headers = build_headers(&e, &ExecutionContext::default(), BTreeMap::new());
    assert_eq!(headers["content-type"], "application/vnd.custom");
    assert!(!headers.contains_key("Content-Type"));
}

#[test]
fn auth_headers_overwrite_endpoint_headers() {
    let mut e = endpoint("https://api.example.com");
    e.headers
        .insert("Authorization".to_string(), "stale".to_string());
    let mut auth = BTreeMap::new();
    auth.insert("Authorization".to_string(), "Bearer fresh".to_string());
    let headers = build_headers(&e, &ExecutionContext::default(), auth);
    assert_eq!(headers["Authorization"], "Bearer fresh");
}

#[test]
fn header_values_resolve_placeholders() {
    let mut e = endpoint("https://api.example.com");
    e.headers
        .insert("X-Tenant".to_string(), "{{tenant}}".to_string());
    let ctx = ctx_with(&[("tenant", json!("acme"))]);
    let headers = build_headers(&e, &ctx, BTreeMap::new());
    assert_eq!(headers["X-Tenant"], "acme");
}

#[test]
fn json_body_resolves_nested_placeholders() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::Json;
    e.body = Some(json!({"user": {"name": "{{name}}"}, "tags": ["{{tag}}"]}));
    let ctx = ctx_with(&[("name", json!("amy")), ("tag", json!("new"))]);
    let body = build_body(&e, &ctx).unwrap();
    let RequestBody::Bytes(bytes) = body else {
        panic!("expected bytes body");
    };
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, json!({"user": {"name": "amy"}, "tags": ["new"]}));
}

#[test]
fn urlencoded_body_escapes_keys_and_values() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::UrlEncoded;
    e.body = Some(json!({"a b": "c&d", "n": 3}));
    let body = build_body(&e, &ExecutionContext::default()).unwrap();
    let RequestBody::Bytes(bytes) = body else {
        panic!("expected bytes body");
    };
    assert_eq!(String::from_utf8(bytes).unwrap(), "a%20b=c%26d&n=3");
}

#[test]
fn form_data_requires_an_object() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::FormData;
    e.body = Some(json!(["not", "an", "object"]));
    let err = build_body(&e, &ExecutionContext::default()).unwrap_err();
    assert_eq!(err.kind(), "RequestBuildError");
}

#[test]
fn form_data_stringifies_fields() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::FormData;
    e.body = Some(json!({"name": "{{n}}", "count": 2}));
    let ctx = ctx_with(&[("n", json!("file.txt"))]);
    let body = build_body(&e, &ctx).unwrap();
    let RequestBody::Form(fields) = body else {
        panic!("expected form body");
    };
    assert_eq!(fields["name"], "file.txt");
    assert_eq!(fields["count"], "2");
}

#[test]
fn raw_body_sends_string_text_as_is() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::Raw;
    e.body = Some(json!("id={{id}}"));
    let ctx = ctx_with(&[("id", json!(7))]);
    let body = build_body(&e, &ctx).unwrap();
    assert_eq!(body, RequestBody::Bytes(b"id=7".to_vec()));
}

#[test]
fn no_body_means_empty_regardless_of_kind() {
    let mut e = endpoint("https://api.example.com");
    e.body_kind = BodyKind::Json;
    e.body = None;
    assert_eq!(
        build_body(&e, &ExecutionContext::default()).unwrap(),
        RequestBody::Empty
    );
}
