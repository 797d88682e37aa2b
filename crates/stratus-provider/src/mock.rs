//! In-memory provider for tests.
//!
//! Deterministic counterpart to a real cloud provider: cluster assignment
//! follows a scripted sequence, name availability and endpoint reachability
//! are scripted per account, and every call is counted so tests can assert
//! exact attempt budgets.
//!
//! The mock is `Clone` over shared state (like a real client handle), so a
//! test can hand one clone to the code under test and keep another to
//! inspect counters and surviving accounts afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::StorageProvider;
use crate::types::{AccountHandle, AccountSpec, Group, ListScope};

/// Number of calls the mock has served, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub group_ensures: u32,
    pub availability_checks: u32,
    pub creates: u32,
    pub deletes: u32,
    pub lists: u32,
    pub endpoint_resolutions: u32,
    pub host_resolutions: u32,
}

#[derive(Debug, Clone)]
struct MockAccount {
    handle: AccountHandle,
    endpoint: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    groups: HashMap<String, Group>,
    /// Insertion-ordered so listings are deterministic.
    accounts: Vec<MockAccount>,
    /// Endpoint hostname → cluster identifier.
    hosts: HashMap<String, String>,
    /// Clusters handed out to newly created accounts, in order. When the
    /// script runs dry, fresh `cluster-N` identifiers are minted.
    cluster_sequence: VecDeque<String>,
    /// Scripted responses for `check_name_available`. When the script runs
    /// dry, a name is available unless an account already holds it.
    availability_responses: VecDeque<bool>,
    /// Scripted outcomes for `create_account`: `true` fails the call with
    /// a transient API error. When the script runs dry, creates succeed.
    create_failures: VecDeque<bool>,
    minted_clusters: u64,
    counts: CallCounts,
}

/// Scripted in-memory [`StorageProvider`].
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a resource group.
    pub fn with_group(self, name: &str, location: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.groups.insert(
                name.to_string(),
                Group {
                    name: name.to_string(),
                    location: location.to_string(),
                },
            );
        }
        self
    }

    /// Pre-create an account on a known cluster with a reachable endpoint.
    /// The containing group is created if absent.
    pub fn with_existing_account(self, group: &str, name: &str, cluster: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .groups
                .entry(group.to_string())
                .or_insert_with(|| Group {
                    name: group.to_string(),
                    location: "eastus".to_string(),
                });
            let endpoint = endpoint_for(name);
            state.hosts.insert(endpoint.clone(), cluster.to_string());
            state.accounts.push(MockAccount {
                handle: AccountHandle {
                    name: name.to_string(),
                    group: group.to_string(),
                    location: "eastus".to_string(),
                },
                endpoint: Some(endpoint),
            });
        }
        self
    }

    /// Pre-create an account with no reachable endpoint.
    pub fn with_unreachable_account(self, group: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .groups
                .entry(group.to_string())
                .or_insert_with(|| Group {
                    name: group.to_string(),
                    location: "eastus".to_string(),
                });
            state.accounts.push(MockAccount {
                handle: AccountHandle {
                    name: name.to_string(),
                    group: group.to_string(),
                    location: "eastus".to_string(),
                },
                endpoint: None,
            });
        }
        self
    }

    /// Script the clusters assigned to newly created accounts, in order.
    pub fn with_cluster_sequence<I, S>(self, clusters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.state.lock().unwrap();
            state
                .cluster_sequence
                .extend(clusters.into_iter().map(Into::into));
        }
        self
    }

    /// Script the next availability-check responses, in order.
    pub fn with_name_availability<I>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        {
            let mut state = self.state.lock().unwrap();
            state.availability_responses.extend(responses);
        }
        self
    }

    /// Script the next create-call outcomes, in order: `true` fails the
    /// call with a transient API error.
    pub fn with_create_failures<I>(self, failures: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        {
            let mut state = self.state.lock().unwrap();
            state.create_failures.extend(failures);
        }
        self
    }

    /// Calls served so far.
    pub fn counts(&self) -> CallCounts {
        self.state.lock().unwrap().counts
    }

    /// Whether an account with `name` currently exists.
    pub fn has_account(&self, name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .any(|a| a.handle.name == name)
    }

    /// Number of accounts currently alive.
    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }
}

fn endpoint_for(name: &str) -> String {
    format!("{name}.blob.mock.net")
}

#[async_trait]
impl StorageProvider for MockProvider {
    async fn ensure_group(&self, name: &str, location: &str) -> ProviderResult<Group> {
        let mut state = self.state.lock().unwrap();
        state.counts.group_ensures += 1;
        let group = state
            .groups
            .entry(name.to_string())
            .or_insert_with(|| Group {
                name: name.to_string(),
                location: location.to_string(),
            });
        Ok(group.clone())
    }

    async fn check_name_available(&self, name: &str) -> ProviderResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.counts.availability_checks += 1;
        if let Some(scripted) = state.availability_responses.pop_front() {
            return Ok(scripted);
        }
        Ok(!state.accounts.iter().any(|a| a.handle.name == name))
    }

    async fn create_account(
        &self,
        name: &str,
        group: &str,
        spec: &AccountSpec,
    ) -> ProviderResult<AccountHandle> {
        let mut state = self.state.lock().unwrap();
        state.counts.creates += 1;
        if state.create_failures.pop_front() == Some(true) {
            return Err(ProviderError::Api(format!(
                "transient failure creating account: {name}"
            )));
        }
        if !state.groups.contains_key(group) {
            return Err(ProviderError::GroupNotFound(group.to_string()));
        }
        if state.accounts.iter().any(|a| a.handle.name == name) {
            return Err(ProviderError::Api(format!(
                "account name already taken: {name}"
            )));
        }
        let cluster = state.cluster_sequence.pop_front().unwrap_or_else(|| {
            state.minted_clusters += 1;
            format!("cluster-{}", state.minted_clusters)
        });
        let endpoint = endpoint_for(name);
        state.hosts.insert(endpoint.clone(), cluster);
        let handle = AccountHandle {
            name: name.to_string(),
            group: group.to_string(),
            location: spec.location.clone(),
        };
        state.accounts.push(MockAccount {
            handle: handle.clone(),
            endpoint: Some(endpoint),
        });
        Ok(handle)
    }

    async fn delete_account(&self, name: &str, group: &str) -> ProviderResult<()> {
        let mut state = self.state.lock().unwrap();
        state.counts.deletes += 1;
        let index = state
            .accounts
            .iter()
            .position(|a| a.handle.name == name && a.handle.group == group)
            .ok_or_else(|| ProviderError::AccountNotFound(name.to_string()))?;
        let removed = state.accounts.remove(index);
        if let Some(endpoint) = removed.endpoint {
            state.hosts.remove(&endpoint);
        }
        Ok(())
    }

    async fn list_accounts(&self, scope: &ListScope) -> ProviderResult<Vec<AccountHandle>> {
        let mut state = self.state.lock().unwrap();
        state.counts.lists += 1;
        let matches = state
            .accounts
            .iter()
            .filter(|a| match scope {
                ListScope::All => true,
                ListScope::Group(group) => a.handle.group == *group,
                ListScope::GroupAccount { group, account } => {
                    a.handle.group == *group && a.handle.name == *account
                }
            })
            .map(|a| a.handle.clone())
            .collect();
        Ok(matches)
    }

    async fn resolve_endpoint_host(
        &self,
        account: &AccountHandle,
    ) -> ProviderResult<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.counts.endpoint_resolutions += 1;
        let found = state
            .accounts
            .iter()
            .find(|a| a.handle.name == account.name)
            .ok_or_else(|| ProviderError::AccountNotFound(account.name.clone()))?;
        Ok(found.endpoint.clone())
    }

    async fn resolve_cluster_from_host(&self, host: &str) -> ProviderResult<String> {
        let mut state = self.state.lock().unwrap();
        state.counts.host_resolutions += 1;
        state
            .hosts
            .get(host)
            .cloned()
            .ok_or_else(|| ProviderError::Api(format!("unknown host: {host}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_accounts_follow_the_cluster_script() {
        let mock = MockProvider::new()
            .with_group("rg1", "eastus")
            .with_cluster_sequence(["c-a", "c-b"]);
        let spec = AccountSpec::new("data", "eastus");

        mock.create_account("one", "rg1", &spec).await.unwrap();
        mock.create_account("two", "rg1", &spec).await.unwrap();
        // Script exhausted — minted cluster.
        mock.create_account("three", "rg1", &spec).await.unwrap();

        let c1 = mock
            .resolve_cluster_from_host(&endpoint_for("one"))
            .await
            .unwrap();
        let c2 = mock
            .resolve_cluster_from_host(&endpoint_for("two"))
            .await
            .unwrap();
        let c3 = mock
            .resolve_cluster_from_host(&endpoint_for("three"))
            .await
            .unwrap();
        assert_eq!(c1, "c-a");
        assert_eq!(c2, "c-b");
        assert_eq!(c3, "cluster-1");
    }

    #[tokio::test]
    async fn availability_script_then_existence_fallback() {
        let mock = MockProvider::new()
            .with_group("rg1", "eastus")
            .with_name_availability([false]);

        assert!(!mock.check_name_available("anything").await.unwrap());
        // Script dry: availability now reflects existing accounts.
        assert!(mock.check_name_available("fresh").await.unwrap());

        let spec = AccountSpec::new("data", "eastus");
        mock.create_account("fresh", "rg1", &spec).await.unwrap();
        assert!(!mock.check_name_available("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_account_and_host() {
        let mock = MockProvider::new().with_existing_account("rg1", "acct", "c-a");
        assert!(mock.has_account("acct"));

        mock.delete_account("acct", "rg1").await.unwrap();
        assert!(!mock.has_account("acct"));
        assert!(
            mock.resolve_cluster_from_host(&endpoint_for("acct"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn delete_missing_account_fails() {
        let mock = MockProvider::new().with_group("rg1", "eastus");
        let err = mock.delete_account("ghost", "rg1").await.unwrap_err();
        assert!(matches!(err, ProviderError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn scripted_create_failures_then_success() {
        let mock = MockProvider::new()
            .with_group("rg1", "eastus")
            .with_create_failures([true]);
        let spec = AccountSpec::new("data", "eastus");

        let err = mock.create_account("x", "rg1", &spec).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api(_)));
        assert!(!mock.has_account("x"));

        // Script dry: the retry succeeds.
        mock.create_account("x", "rg1", &spec).await.unwrap();
        assert!(mock.has_account("x"));
        assert_eq!(mock.counts().creates, 2);
    }

    #[tokio::test]
    async fn create_requires_group() {
        let mock = MockProvider::new();
        let spec = AccountSpec::new("data", "eastus");
        let err = mock.create_account("a", "missing", &spec).await.unwrap_err();
        assert!(matches!(err, ProviderError::GroupNotFound(_)));
    }

    #[tokio::test]
    async fn list_scopes_filter() {
        let mock = MockProvider::new()
            .with_existing_account("rg1", "a1", "c-a")
            .with_existing_account("rg1", "a2", "c-b")
            .with_existing_account("rg2", "b1", "c-c");

        let all = mock.list_accounts(&ListScope::All).await.unwrap();
        assert_eq!(all.len(), 3);

        let rg1 = mock
            .list_accounts(&ListScope::Group("rg1".to_string()))
            .await
            .unwrap();
        assert_eq!(rg1.len(), 2);

        let one = mock
            .list_accounts(&ListScope::GroupAccount {
                group: "rg1".to_string(),
                account: "a2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "a2");
    }

    #[tokio::test]
    async fn counters_track_calls() {
        let mock = MockProvider::new().with_group("rg1", "eastus");
        let spec = AccountSpec::new("data", "eastus");

        mock.ensure_group("rg1", "eastus").await.unwrap();
        mock.check_name_available("x").await.unwrap();
        mock.create_account("x", "rg1", &spec).await.unwrap();
        mock.list_accounts(&ListScope::All).await.unwrap();
        mock.delete_account("x", "rg1").await.unwrap();

        let counts = mock.counts();
        assert_eq!(counts.group_ensures, 1);
        assert_eq!(counts.availability_checks, 1);
        assert_eq!(counts.creates, 1);
        assert_eq!(counts.lists, 1);
        assert_eq!(counts.deletes, 1);
    }
}
