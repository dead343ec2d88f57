#![forbid(unsafe_code)]

//! Execution engine for Volley API collections.
//!
//! The orchestrator runs a collection's endpoints sequentially in sort
//! order, resolving `{{variables}}`, injecting credentials at the last
//! moment, validating responses, and handing structured results to a
//! [`volley_store::ResultSink`].

pub mod error;
pub mod executor;

pub use crate::error::EngineError;
pub use crate::executor::{Orchestrator, RunRequest};
