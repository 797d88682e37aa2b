//! Single-account placement.
//!
//! Creates one account, resolves its cluster, and retries with a fresh
//! name when the cluster is excluded. The retry policy is a pure decision
//! function ([`judge_attempt`]); the driver around it performs the
//! side-effecting create/delete calls, so the policy is testable without
//! a provider.

use tracing::{info, warn};

use stratus_provider::{AccountHandle, AccountSpec, StorageProvider, with_timeout};

use crate::config::PlacementConfig;
use crate::error::{PlacementError, PlacementResult};
use crate::exclusion::ExclusionSet;
use crate::name::allocate_name;
use crate::resolver::{ResolveScope, resolve_clusters};

/// A committed placement outcome. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlacedAccount {
    pub name: String,
    /// Normalized physical cluster identifier.
    pub cluster_id: String,
}

/// Verdict on one creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptVerdict {
    /// Cluster not excluded: keep the account.
    Accept,
    /// Cluster excluded, budget remains: delete and recreate.
    Retry,
    /// Cluster excluded, budget exhausted: delete and fail the slot.
    GiveUp,
}

/// Judge one creation attempt. `attempt` starts at 1 for the initial
/// creation, so the very first create consumes budget even when it turns
/// out to be valid.
fn judge_attempt(
    cluster_id: &str,
    exclude: &ExclusionSet,
    attempt: u32,
    budget: u32,
) -> AttemptVerdict {
    if !exclude.contains(cluster_id) {
        AttemptVerdict::Accept
    } else if attempt < budget {
        AttemptVerdict::Retry
    } else {
        AttemptVerdict::GiveUp
    }
}

/// Place one account for `spec` in `group`, avoiding the clusters in
/// `exclude`.
///
/// Each rejected account is deleted before the next attempt starts, so at
/// most one excluded account exists transiently per slot. On budget
/// exhaustion fails with [`PlacementError::ClusterExclusionExhausted`]
/// and leaves no account behind.
pub async fn place_account<P: StorageProvider>(
    provider: &P,
    config: &PlacementConfig,
    spec: &AccountSpec,
    group: &str,
    exclude: &ExclusionSet,
) -> PlacementResult<PlacedAccount> {
    for attempt in 1..=config.attempt_budget {
        let name = allocate_name(provider, config, &spec.suffix).await?;
        let handle = with_timeout(
            config.provider_timeout,
            provider.create_account(&name, group, spec),
        )
        .await?;
        let cluster_id = resolve_account_cluster(provider, config, &handle).await?;

        // Nothing to avoid: skip the collision check entirely.
        if exclude.is_empty() {
            info!(account = %name, cluster = %cluster_id, "account placed");
            return Ok(PlacedAccount { name, cluster_id });
        }

        match judge_attempt(&cluster_id, exclude, attempt, config.attempt_budget) {
            AttemptVerdict::Accept => {
                info!(account = %name, cluster = %cluster_id, attempt, "account placed");
                return Ok(PlacedAccount { name, cluster_id });
            }
            AttemptVerdict::Retry => {
                warn!(
                    account = %name,
                    cluster = %cluster_id,
                    attempt,
                    "cluster excluded, deleting account and retrying"
                );
                with_timeout(
                    config.provider_timeout,
                    provider.delete_account(&name, group),
                )
                .await?;
            }
            AttemptVerdict::GiveUp => {
                warn!(
                    account = %name,
                    cluster = %cluster_id,
                    attempt,
                    "cluster excluded, attempt budget exhausted"
                );
                with_timeout(
                    config.provider_timeout,
                    provider.delete_account(&name, group),
                )
                .await?;
                return Err(PlacementError::ClusterExclusionExhausted { attempts: attempt });
            }
        }
    }

    // attempt_budget == 0: no attempt was permitted.
    Err(PlacementError::ClusterExclusionExhausted {
        attempts: config.attempt_budget,
    })
}

/// Resolve the cluster of a freshly created account (single-account scope).
async fn resolve_account_cluster<P: StorageProvider>(
    provider: &P,
    config: &PlacementConfig,
    handle: &AccountHandle,
) -> PlacementResult<String> {
    let scope = ResolveScope::account(&handle.group, &handle.name);
    let assignments = resolve_clusters(provider, config, &scope).await?;
    assignments
        .into_iter()
        .find(|a| a.account_name == handle.name)
        .map(|a| a.cluster_id)
        .ok_or_else(|| PlacementError::ClusterUnresolved(handle.name.clone()))
}
