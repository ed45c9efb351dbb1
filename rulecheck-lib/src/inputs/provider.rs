use super::CollectedValue;

/// Failure reported by a provider's transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("access to {0} is forbidden")]
    Forbidden(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Fetch strategy for one kind of input.
pub trait InputProvider {
    /// Input-specific coordinates this provider understands.
    type Locator;

    fn fetch(&self, locator: &Self::Locator) -> impl Future<Output = Result<CollectedValue, FetchError>>;
}
