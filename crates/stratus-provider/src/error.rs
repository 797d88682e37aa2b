//! Provider error types.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by a concrete storage provider.
///
/// These are never swallowed by the placement core: masking a failed
/// create/delete/list/resolve risks silent placement corruption.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A provider call did not complete within its deadline.
    #[error("provider call exceeded {0:?} deadline")]
    Timeout(Duration),

    /// Any underlying provider API failure.
    #[error("provider API error: {0}")]
    Api(String),

    #[error("resource group not found: {0}")]
    GroupNotFound(String),

    #[error("storage account not found: {0}")]
    AccountNotFound(String),
}
