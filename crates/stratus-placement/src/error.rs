//! Placement error taxonomy.
//!
//! Fatality is positional: [`PlacementError::ClusterExclusionExhausted`]
//! fails a single placement but only costs the fleet one slot, while
//! everything else aborts the run it occurs in.

use thiserror::Error;

use stratus_provider::ProviderError;

use crate::engine::PlacedAccount;
use crate::resolver::ClusterAssignment;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that can occur during placement operations.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The name allocator exhausted its attempt budget. Fatal for the
    /// whole operation; not recoverable within the same invocation.
    #[error("no available account name for suffix '{suffix}' after {attempts} attempts")]
    NameExhausted { suffix: String, attempts: u32 },

    /// Every creation attempt landed on an excluded cluster. The fleet
    /// loop skips the slot and continues; standalone callers fail.
    #[error("every candidate landed on an excluded cluster after {attempts} attempts")]
    ClusterExclusionExhausted { attempts: u32 },

    /// Two or more accounts in the target group already share a cluster,
    /// detected by the pre-flight validation before anything was created.
    #[error("group '{group}' has pre-existing cluster collisions: {collisions:?}")]
    PreexistingCollision {
        group: String,
        collisions: Vec<ClusterAssignment>,
    },

    /// The resolution scope matched zero accounts.
    #[error("no storage accounts found in scope: {scope}")]
    NoAccountsFound { scope: String },

    /// A single-account scope was given without its containing group.
    #[error("a group is required when resolving single account '{account}'")]
    InvalidScope { account: String },

    /// The suffix cannot produce a valid account name.
    #[error("invalid suffix '{suffix}': {reason}")]
    InvalidSuffix { suffix: String, reason: String },

    /// Strict endpoint policy: a matched account has no reachable endpoint.
    #[error("account '{0}' has no reachable endpoint")]
    EndpointUnresolved(String),

    /// A freshly created account's cluster could not be determined.
    #[error("could not resolve the cluster of newly created account '{0}'")]
    ClusterUnresolved(String),

    /// A fatal error stopped the fleet loop after placement had begun.
    /// The accounts placed before the failure are real and attached;
    /// callers must treat them as partial success, not discard them.
    #[error("fleet run aborted after {} placed account(s): {source}", .placed.len())]
    FleetAborted {
        placed: Vec<PlacedAccount>,
        skipped_slots: u32,
        #[source]
        source: Box<PlacementError>,
    },

    /// Any underlying provider failure, propagated unmasked.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}
