//! The [`StorageProvider`] trait and the call-timeout wrapper.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::types::{AccountHandle, AccountSpec, Group, ListScope};

/// Every provider operation the placement core depends on.
///
/// Implementations hold their own credentials and session state; the core
/// receives a provider by injection and never resolves credentials ad hoc.
/// All methods are synchronous from the core's point of view — one call,
/// one awaited result, no background work.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Idempotent get-or-create for a resource group. A no-op if the
    /// group already exists at that location.
    async fn ensure_group(&self, name: &str, location: &str) -> ProviderResult<Group>;

    /// Whether `name` is available and valid as a new account name.
    async fn check_name_available(&self, name: &str) -> ProviderResult<bool>;

    /// Create a storage account named `name` in `group` per `spec`.
    async fn create_account(
        &self,
        name: &str,
        group: &str,
        spec: &AccountSpec,
    ) -> ProviderResult<AccountHandle>;

    /// Delete the account `name` in `group`.
    async fn delete_account(&self, name: &str, group: &str) -> ProviderResult<()>;

    /// List accounts matching `scope`.
    async fn list_accounts(&self, scope: &ListScope) -> ProviderResult<Vec<AccountHandle>>;

    /// Primary endpoint hostname for an account, or `None` when the
    /// account has no reachable endpoint (e.g. still provisioning).
    async fn resolve_endpoint_host(
        &self,
        account: &AccountHandle,
    ) -> ProviderResult<Option<String>>;

    /// Physical cluster identifier behind an endpoint hostname.
    async fn resolve_cluster_from_host(&self, host: &str) -> ProviderResult<String>;
}

/// Run a provider call under a deadline.
///
/// An elapsed timer surfaces as [`ProviderError::Timeout`] instead of
/// blocking the whole fleet run on one hung network call.
pub async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = ProviderResult<T>>,
) -> ProviderResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_completed_calls() {
        let result = with_timeout(Duration::from_secs(1), async { Ok(42_u32) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn with_timeout_passes_through_errors() {
        let result = with_timeout(Duration::from_secs(1), async {
            Err::<u32, _>(ProviderError::Api("boom".to_string()))
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Api(_))));
    }

    #[tokio::test]
    async fn with_timeout_maps_elapsed_deadline() {
        let result = with_timeout(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(42_u32)
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Timeout(_))));
    }
}
