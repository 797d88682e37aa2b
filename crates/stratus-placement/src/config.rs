//! Placement configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to treat accounts whose endpoint hostname cannot be resolved
/// during multi-account cluster resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Skip the account. Accounts mid-provisioning often have no
    /// reachable endpoint yet.
    #[default]
    Lenient,
    /// Fail the whole resolution when any matched account has no
    /// reachable endpoint.
    Strict,
}

/// Tunables for the placement core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Cap for each bounded retry loop. The name allocator and the
    /// placement engine each carry their own counter capped at this
    /// value; the budgets are independent, not shared.
    pub attempt_budget: u32,
    /// Deadline applied to every provider call.
    pub provider_timeout: Duration,
    /// Length of the random alphanumeric prefix prepended to the suffix.
    pub prefix_len: usize,
    /// Endpoint-resolution policy for multi-account scopes.
    pub endpoint_policy: EndpointPolicy,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            attempt_budget: 3,
            provider_timeout: Duration::from_secs(30),
            prefix_len: 8,
            endpoint_policy: EndpointPolicy::default(),
        }
    }
}
