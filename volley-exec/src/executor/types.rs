use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Applied when an endpoint declares no timeout of its own.
    pub default_timeout: Duration,
    /// Cap on the response body copy kept in result records. The original
    /// byte size is recorded separately either way.
    pub max_stored_response_bytes: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            max_stored_response_bytes: 10 * 1024,
        }
    }
}
