#![forbid(unsafe_code)]

//! Data model and pure algorithms for Volley API-collection runs.
//!
//! Everything here is I/O-free: the HTTP machinery and persistence live in
//! `volley-exec` and `volley-store`.

pub mod context;
pub mod path;
pub mod types;
pub mod validate;
pub mod vars;

pub use crate::context::ExecutionContext;
pub use crate::path::extract_path;
pub use crate::types::{
    AuthKind, BodyKind, Collection, ContainsCheck, Credential, EndpointDefinition, HttpMethod,
};
pub use crate::validate::{validate_response, Assertion};
pub use crate::vars::{resolve_text, resolve_value};
