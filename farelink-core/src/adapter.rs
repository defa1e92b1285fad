use crate::flight::Flight;
use crate::provider::ProviderKind;
use crate::search::SearchRequest;
use async_trait::async_trait;

/// Capability contract every provider adapter implements. Raw schema
/// details never escape the adapter boundary.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Fetch and normalize this provider's flights for the given request,
    /// bounded by the adapter's own deadline.
    async fn fetch(&self, request: &SearchRequest) -> Result<Vec<Flight>, ProviderError>;
}

/// Provider-level failures. All variants are absorbed into the failure
/// counter by the orchestrator; none abort a search.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} fetch timed out after {deadline_ms}ms")]
    Timeout {
        provider: &'static str,
        deadline_ms: u64,
    },

    #[error("{provider} fetch failed: {message}")]
    Fetch {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} payload could not be parsed: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },
}
