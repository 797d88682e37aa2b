//! Fleet orchestration and the public placement surface.
//!
//! Drives the single-account engine once per requested slot, strictly
//! sequentially: the exclusion set must reflect every prior placement
//! before the next placement decision is made, so slots are never created
//! in parallel.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stratus_provider::{AccountSpec, StorageProvider, with_timeout};

use crate::config::PlacementConfig;
use crate::engine::{PlacedAccount, place_account};
use crate::error::{PlacementError, PlacementResult};
use crate::exclusion::ExclusionSet;
use crate::resolver::{ClusterAssignment, ResolveScope, find_duplicates, resolve_clusters};

/// Options for a fleet run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetOptions {
    /// Number of accounts to place.
    pub count: u32,
    /// Fail before creating anything if the group already has two
    /// accounts on one cluster.
    pub validate_existing: bool,
    /// Seed the exclusion set with every cluster already used in the
    /// group.
    pub avoid_existing_clusters: bool,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self {
            count: 3,
            validate_existing: false,
            avoid_existing_clusters: false,
        }
    }
}

/// Outcome of a fleet run.
///
/// A short `placed` list is partial success: slots that exhausted their
/// collision retry budget are skipped, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetReport {
    /// Successfully placed accounts, in placement order.
    pub placed: Vec<PlacedAccount>,
    /// Slots abandoned after exhausting the collision retry budget.
    pub skipped_slots: u32,
}

/// Placement front-end holding the injected provider and configuration.
///
/// All state lives provider-side plus the in-memory exclusion set for the
/// duration of one call; the placer itself keeps nothing between calls.
pub struct FleetPlacer<P> {
    provider: P,
    config: PlacementConfig,
}

impl<P: StorageProvider> FleetPlacer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, PlacementConfig::default())
    }

    pub fn with_config(provider: P, config: PlacementConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Place `options.count` accounts in `group_name`, each on a cluster
    /// distinct from every other account placed in this run (and, with
    /// `avoid_existing_clusters`, from the group's pre-existing clusters).
    ///
    /// Per-slot exhaustion skips the slot; later slots may still find a
    /// free cluster. Pre-existing collisions and name exhaustion abort
    /// the whole run with nothing reported. Any other fatal error stops
    /// the loop and surfaces as [`PlacementError::FleetAborted`], which
    /// carries the accounts already placed.
    pub async fn place_fleet(
        &self,
        spec: &AccountSpec,
        group_name: &str,
        options: &FleetOptions,
    ) -> PlacementResult<FleetReport> {
        let group = with_timeout(
            self.config.provider_timeout,
            self.provider.ensure_group(group_name, &spec.location),
        )
        .await?;

        let existing = if options.validate_existing || options.avoid_existing_clusters {
            self.existing_assignments(&group.name).await?
        } else {
            Vec::new()
        };

        if options.validate_existing {
            let collisions = find_duplicates(&existing);
            if !collisions.is_empty() {
                return Err(PlacementError::PreexistingCollision {
                    group: group.name,
                    collisions,
                });
            }
        }

        let mut exclude = ExclusionSet::new();
        if options.avoid_existing_clusters {
            for assignment in &existing {
                exclude.insert(&assignment.cluster_id);
            }
            info!(
                group = %group.name,
                seeded = exclude.len(),
                "seeded exclusion set from existing clusters"
            );
        }

        let mut report = FleetReport::default();
        for slot in 1..=options.count {
            match place_account(&self.provider, &self.config, spec, &group.name, &exclude).await
            {
                Ok(placed) => {
                    exclude.insert(&placed.cluster_id);
                    info!(
                        slot,
                        account = %placed.name,
                        cluster = %placed.cluster_id,
                        "slot placed"
                    );
                    report.placed.push(placed);
                }
                Err(PlacementError::ClusterExclusionExhausted { attempts }) => {
                    warn!(slot, attempts, "slot skipped, no non-excluded cluster found");
                    report.skipped_slots += 1;
                }
                // Name exhaustion is an eager abort: nothing placed is
                // reported back.
                Err(err @ PlacementError::NameExhausted { .. }) => return Err(err),
                // Any other fatal error stops the loop, but the accounts
                // placed so far are real and travel with the failure.
                Err(other) => {
                    warn!(
                        slot,
                        placed = report.placed.len(),
                        error = %other,
                        "fleet run aborted, reporting earlier placements with the failure"
                    );
                    return Err(PlacementError::FleetAborted {
                        placed: report.placed,
                        skipped_slots: report.skipped_slots,
                        source: Box::new(other),
                    });
                }
            }
        }

        info!(
            group = %group.name,
            placed = report.placed.len(),
            skipped = report.skipped_slots,
            requested = options.count,
            "fleet placement finished"
        );
        Ok(report)
    }

    /// Place a single account in `group_name`, avoiding `exclude`.
    pub async fn place_account(
        &self,
        spec: &AccountSpec,
        group_name: &str,
        exclude: &ExclusionSet,
    ) -> PlacementResult<PlacedAccount> {
        let group = with_timeout(
            self.config.provider_timeout,
            self.provider.ensure_group(group_name, &spec.location),
        )
        .await?;
        place_account(&self.provider, &self.config, spec, &group.name, exclude).await
    }

    /// Cluster of every resolvable account in `group`.
    pub async fn list_clusters_in_group(
        &self,
        group: &str,
    ) -> PlacementResult<Vec<ClusterAssignment>> {
        resolve_clusters(&self.provider, &self.config, &ResolveScope::group(group)).await
    }

    /// Cluster of one named account in `group`.
    pub async fn list_clusters_for_account(
        &self,
        group: &str,
        account: &str,
    ) -> PlacementResult<Vec<ClusterAssignment>> {
        resolve_clusters(
            &self.provider,
            &self.config,
            &ResolveScope::account(group, account),
        )
        .await
    }

    /// Every account in `group` sharing a cluster with at least one other
    /// account there. Empty means no duplicates.
    pub async fn find_duplicate_cluster_assignments(
        &self,
        group: &str,
    ) -> PlacementResult<Vec<ClusterAssignment>> {
        let assignments = self.list_clusters_in_group(group).await?;
        Ok(find_duplicates(&assignments))
    }

    /// Existing assignments in a group, treating an empty or brand-new
    /// group as having none.
    async fn existing_assignments(
        &self,
        group: &str,
    ) -> PlacementResult<Vec<ClusterAssignment>> {
        match resolve_clusters(&self.provider, &self.config, &ResolveScope::group(group)).await
        {
            Ok(assignments) => Ok(assignments),
            Err(PlacementError::NoAccountsFound { .. }) => Ok(Vec::new()),
            Err(other) => Err(other),
        }
    }
}
