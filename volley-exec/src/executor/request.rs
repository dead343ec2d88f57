//! Assembles the concrete URL, headers and body for one endpoint call,
//! resolving `{{variable}}` placeholders against the run context.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;
use volley_core::{resolve_text, resolve_value, BodyKind, EndpointDefinition, ExecutionContext};

use crate::executor::http::RequestBody;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid URL after variable resolution: {0}")]
    InvalidUrl(String),
    #[error("body kind requires {0}")]
    UnsupportedBody(&'static str),
    #[error("failed to serialize request body: {0}")]
    Serialize(String),
}

impl BuildError {
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::InvalidUrl(_) => "InvalidUrl",
            BuildError::UnsupportedBody(_) | BuildError::Serialize(_) => "RequestBuildError",
        }
    }
}

/// Resolve the endpoint URL, then merge its query parameters with any
/// auth-injected ones. Later sources win on key collisions: URL-embedded
/// pairs, then endpoint parameters, then auth parameters.
pub fn build_url(
    endpoint: &EndpointDefinition,
    ctx: &ExecutionContext,
    auth_params: &BTreeMap<String, String>,
) -> Result<Url, BuildError> {
    let resolved = resolve_text(&endpoint.url, ctx);
    let mut url = Url::parse(&resolved).map_err(|e| BuildError::InvalidUrl(e.to_string()))?;

    let mut merged: BTreeMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    for (k, v) in &endpoint.query_params {
        merged.insert(resolve_text(k, ctx), resolve_text(v, ctx));
    }
    for (k, v) in auth_params {
        merged.insert(k.clone(), v.clone());
    }

    url.set_query(None);
    if !merged.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &merged {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// Resolve header values, fill a default Content-Type for body kinds that
/// imply one, then overlay auth headers last so they always win.
pub fn build_headers(
    endpoint: &EndpointDefinition,
    ctx: &ExecutionContext,
    auth_headers: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = endpoint
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_text(v, ctx)))
        .collect();

    let default_content_type = match endpoint.body_kind {
        BodyKind::Json => Some("application/json"),
        BodyKind::UrlEncoded => Some("application/x-www-form-urlencoded"),
        _ => None,
    };
    if let Some(content_type) = default_content_type {
        let present = headers.keys().any(|k| k.eq_ignore_ascii_case("content-type"));
        if !present {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }
    }

    headers.extend(auth_headers);
    headers
}

pub fn build_body(
    endpoint: &EndpointDefinition,
    ctx: &ExecutionContext,
) -> Result<RequestBody, BuildError> {
    let Some(body) = &endpoint.body else {
        return Ok(RequestBody::Empty);
    };
    match endpoint.body_kind {
        BodyKind::None => Ok(RequestBody::Empty),
        BodyKind::Json => {
            let resolved = resolve_value(body, ctx);
            let bytes =
                serde_json::to_vec(&resolved).map_err(|e| BuildError::Serialize(e.to_string()))?;
            Ok(RequestBody::Bytes(bytes))
        }
        BodyKind::FormData => {
            let resolved = resolve_value(body, ctx);
            let JsonValue::Object(fields) = resolved else {
                return Err(BuildError::UnsupportedBody("an object body for form-data"));
            };
            let form = fields
                .into_iter()
                .map(|(k, v)| (k, field_to_string(&v)))
                .collect();
            Ok(RequestBody::Form(form))
        }
        BodyKind::UrlEncoded => {
            let resolved = resolve_value(body, ctx);
            let JsonValue::Object(fields) = resolved else {
                return Err(BuildError::UnsupportedBody(
                    "an object body for x-www-form-urlencoded",
                ));
            };
            let encoded: Vec<String> = fields
                .into_iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        urlencoding::encode(&k),
                        urlencoding::encode(&field_to_string(&v))
                    )
                })
                .collect();
            Ok(RequestBody::Bytes(encoded.join("&").into_bytes()))
        }
        BodyKind::Raw => {
            let resolved = resolve_value(body, ctx);
            let text = match resolved {
                JsonValue::String(s) => s,
                other => other.to_string(),
            };
            Ok(RequestBody::Bytes(text.into_bytes()))
        }
    }
}

fn field_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
