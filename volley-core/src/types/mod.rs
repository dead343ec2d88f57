mod collection;
mod credential;
mod endpoint;

pub use collection::Collection;
pub use credential::{AuthKind, Credential};
pub use endpoint::{BodyKind, ContainsCheck, EndpointDefinition, HttpMethod};
