use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use volley_core::HttpMethod;

#[derive(Debug, Clone)]
pub struct RequestParts {
    pub method: HttpMethod,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Bytes(Vec<u8>),
    /// Fields sent as multipart/form-data; the transport sets the boundary
    /// and Content-Type itself.
    Form(BTreeMap<String, String>),
}

#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("{kind}: {message}")]
    Other { kind: String, message: String },
}

impl HttpError {
    /// Stable label recorded as the outcome's `error_kind`.
    pub fn kind(&self) -> &str {
        match self {
            HttpError::Timeout => "Timeout",
            HttpError::Connect(_) => "ConnectionError",
            HttpError::Other { kind, .. } => kind,
        }
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: RequestParts, timeout: Duration) -> Result<ResponseParts, HttpError>;
}

/// Shared reqwest client, reused across calls and runs. Holds nothing
/// per-run beyond default headers.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        let mut default_headers = reqwest::header::HeaderMap::new();
        default_headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        // Client creation should never fail in practice; failing loudly at
        // startup beats a broken client surfacing mid-run.
        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .user_agent(concat!("volley/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
            });
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: RequestParts, timeout: Duration) -> Result<ResponseParts, HttpError> {
        let mut rb = self
            .client
            .request(to_reqwest_method(req.method), req.url)
            .timeout(timeout);

        for (k, v) in &req.headers {
            rb = rb.header(k.as_str(), v.as_str());
        }

        match req.body {
            RequestBody::Empty => {}
            RequestBody::Bytes(bytes) => {
                rb = rb.body(bytes);
            }
            RequestBody::Form(fields) => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                rb = rb.multipart(form);
            }
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let body = resp.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(ResponseParts { status, headers, body })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() {
        return HttpError::Connect(e.to_string());
    }
    let kind = if e.is_request() {
        "RequestError"
    } else if e.is_body() {
        "BodyError"
    } else if e.is_decode() {
        "DecodeError"
    } else {
        "HttpError"
    };
    HttpError::Other { kind: kind.to_string(), message: e.to_string() }
}
