mod auth;
mod call;
pub mod events;
pub mod http;
mod request;
mod runner;
pub mod sanitize;
mod types;

pub use auth::CredentialAdapter;
pub use call::CallExecutor;
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use http::{HttpClient, HttpError, ReqwestHttpClient, RequestBody, RequestParts, ResponseParts};
pub use request::{build_body, build_headers, build_url, BuildError};
pub use runner::{Orchestrator, RunRequest};
pub use types::ExecutorConfig;
