//! Account → cluster resolution.
//!
//! Maps storage accounts to the physical cluster serving their primary
//! endpoint, for one named account or every account in a group or
//! subscription, and detects accounts sharing a cluster.

use std::collections::HashMap;

use tracing::debug;

use stratus_provider::{ListScope, StorageProvider, with_timeout};

use crate::config::{EndpointPolicy, PlacementConfig};
use crate::error::{PlacementError, PlacementResult};
use crate::exclusion::normalize;

/// One account's resolved cluster.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClusterAssignment {
    pub account_name: String,
    /// Normalized physical cluster identifier.
    pub cluster_id: String,
}

/// What to resolve: every account, one group's accounts, or one named
/// account.
///
/// Narrowing to a single account requires its containing group; group and
/// subscription scopes need nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveScope {
    pub group: Option<String>,
    pub account: Option<String>,
}

impl ResolveScope {
    /// Every account in the subscription.
    pub fn all() -> Self {
        Self::default()
    }

    /// Every account in one resource group.
    pub fn group(name: &str) -> Self {
        Self {
            group: Some(name.to_string()),
            account: None,
        }
    }

    /// One named account in one resource group.
    pub fn account(group: &str, name: &str) -> Self {
        Self {
            group: Some(group.to_string()),
            account: Some(name.to_string()),
        }
    }

    fn to_list_scope(&self) -> PlacementResult<ListScope> {
        match (&self.group, &self.account) {
            (None, Some(account)) => Err(PlacementError::InvalidScope {
                account: account.clone(),
            }),
            (None, None) => Ok(ListScope::All),
            (Some(group), None) => Ok(ListScope::Group(group.clone())),
            (Some(group), Some(account)) => Ok(ListScope::GroupAccount {
                group: group.clone(),
                account: account.clone(),
            }),
        }
    }

    fn describe(&self) -> String {
        match (&self.group, &self.account) {
            (None, _) => "subscription".to_string(),
            (Some(group), None) => format!("group '{group}'"),
            (Some(group), Some(account)) => format!("account '{account}' in group '{group}'"),
        }
    }
}

/// Resolve the cluster of every account matching `scope`.
///
/// Fails with [`PlacementError::NoAccountsFound`] when the scope matches
/// zero accounts. An account without a reachable endpoint is skipped under
/// [`EndpointPolicy::Lenient`] and fails the resolution under
/// [`EndpointPolicy::Strict`].
pub async fn resolve_clusters<P: StorageProvider>(
    provider: &P,
    config: &PlacementConfig,
    scope: &ResolveScope,
) -> PlacementResult<Vec<ClusterAssignment>> {
    let list_scope = scope.to_list_scope()?;
    let accounts = with_timeout(config.provider_timeout, provider.list_accounts(&list_scope)).await?;
    if accounts.is_empty() {
        return Err(PlacementError::NoAccountsFound {
            scope: scope.describe(),
        });
    }

    let mut assignments = Vec::with_capacity(accounts.len());
    for account in &accounts {
        let host = with_timeout(
            config.provider_timeout,
            provider.resolve_endpoint_host(account),
        )
        .await?;
        let Some(host) = host else {
            match config.endpoint_policy {
                EndpointPolicy::Lenient => {
                    debug!(account = %account.name, "no reachable endpoint, skipping account");
                    continue;
                }
                EndpointPolicy::Strict => {
                    return Err(PlacementError::EndpointUnresolved(account.name.clone()));
                }
            }
        };
        let cluster = with_timeout(
            config.provider_timeout,
            provider.resolve_cluster_from_host(&host),
        )
        .await?;
        assignments.push(ClusterAssignment {
            account_name: account.name.clone(),
            cluster_id: normalize(&cluster),
        });
    }
    Ok(assignments)
}

/// Every assignment whose cluster hosts more than one of the given
/// accounts. Empty means all clusters are distinct.
pub fn find_duplicates(assignments: &[ClusterAssignment]) -> Vec<ClusterAssignment> {
    let mut per_cluster: HashMap<&str, u32> = HashMap::new();
    for assignment in assignments {
        *per_cluster.entry(assignment.cluster_id.as_str()).or_insert(0) += 1;
    }
    assignments
        .iter()
        .filter(|a| per_cluster[a.cluster_id.as_str()] > 1)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use stratus_provider::MockProvider;

    fn config() -> PlacementConfig {
        PlacementConfig::default()
    }

    fn strict_config() -> PlacementConfig {
        PlacementConfig {
            endpoint_policy: EndpointPolicy::Strict,
            ..PlacementConfig::default()
        }
    }

    fn assignment(account: &str, cluster: &str) -> ClusterAssignment {
        ClusterAssignment {
            account_name: account.to_string(),
            cluster_id: cluster.to_string(),
        }
    }

    #[tokio::test]
    async fn resolves_group_accounts() {
        let mock = MockProvider::new()
            .with_existing_account("rg1", "a1", "C-One")
            .with_existing_account("rg1", "a2", "c-two")
            .with_existing_account("rg2", "b1", "c-three");

        let assignments = resolve_clusters(&mock, &config(), &ResolveScope::group("rg1"))
            .await
            .unwrap();

        // Cluster ids come back normalized.
        assert_eq!(
            assignments,
            vec![assignment("a1", "c-one"), assignment("a2", "c-two")]
        );
    }

    #[tokio::test]
    async fn resolves_single_account() {
        let mock = MockProvider::new()
            .with_existing_account("rg1", "a1", "c-one")
            .with_existing_account("rg1", "a2", "c-two");

        let assignments =
            resolve_clusters(&mock, &config(), &ResolveScope::account("rg1", "a2"))
                .await
                .unwrap();
        assert_eq!(assignments, vec![assignment("a2", "c-two")]);
    }

    #[tokio::test]
    async fn account_without_group_is_invalid() {
        let mock = MockProvider::new();
        let scope = ResolveScope {
            group: None,
            account: Some("a1".to_string()),
        };
        let err = resolve_clusters(&mock, &config(), &scope).await.unwrap_err();
        assert!(matches!(err, PlacementError::InvalidScope { .. }));
        // Rejected before any provider call.
        assert_eq!(mock.counts().lists, 0);
    }

    #[tokio::test]
    async fn empty_scope_fails() {
        let mock = MockProvider::new().with_group("rg1", "eastus");
        let err = resolve_clusters(&mock, &config(), &ResolveScope::group("rg1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::NoAccountsFound { .. }));
    }

    #[tokio::test]
    async fn lenient_policy_skips_unreachable_accounts() {
        let mock = MockProvider::new()
            .with_existing_account("rg1", "a1", "c-one")
            .with_unreachable_account("rg1", "a2");

        let assignments = resolve_clusters(&mock, &config(), &ResolveScope::group("rg1"))
            .await
            .unwrap();
        assert_eq!(assignments, vec![assignment("a1", "c-one")]);
    }

    #[tokio::test]
    async fn strict_policy_fails_on_unreachable_account() {
        let mock = MockProvider::new()
            .with_existing_account("rg1", "a1", "c-one")
            .with_unreachable_account("rg1", "a2");

        let err = resolve_clusters(&mock, &strict_config(), &ResolveScope::group("rg1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::EndpointUnresolved(name) if name == "a2"));
    }

    #[test]
    fn find_duplicates_empty_when_all_distinct() {
        let assignments = vec![
            assignment("a1", "c-one"),
            assignment("a2", "c-two"),
            assignment("a3", "c-three"),
        ];
        assert!(find_duplicates(&assignments).is_empty());
    }

    #[test]
    fn find_duplicates_returns_every_sharing_account() {
        let assignments = vec![
            assignment("a1", "c-one"),
            assignment("a2", "c-two"),
            assignment("a3", "c-one"),
            assignment("a4", "c-one"),
        ];
        let duplicates = find_duplicates(&assignments);
        assert_eq!(
            duplicates,
            vec![
                assignment("a1", "c-one"),
                assignment("a3", "c-one"),
                assignment("a4", "c-one"),
            ]
        );
    }

    #[test]
    fn scope_descriptions() {
        assert_eq!(ResolveScope::all().describe(), "subscription");
        assert_eq!(ResolveScope::group("rg1").describe(), "group 'rg1'");
        assert_eq!(
            ResolveScope::account("rg1", "a1").describe(),
            "account 'a1' in group 'rg1'"
        );
    }
}
