//! Domain types shared across the workspace.
//!
//! These mirror the provider's resource model: account specs (what to
//! create, minus the name), handles to live accounts, resource groups,
//! and listing scopes.

use serde::{Deserialize, Serialize};

/// Replication SKU for a storage account.
///
/// Serialized with the provider's wire spellings (`Standard_LRS`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuName {
    #[default]
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

/// Access-tier kind for a storage account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    #[default]
    Hot,
    Cool,
}

/// Immutable input to a placement: everything about the account except
/// its name, which the allocator picks per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSpec {
    /// Fixed suffix appended to the random name prefix.
    pub suffix: String,
    /// Replication SKU.
    pub sku: SkuName,
    /// Access-tier kind.
    pub kind: AccountKind,
    /// Provider region, e.g. "eastus".
    pub location: String,
}

impl AccountSpec {
    /// Spec with default SKU and kind.
    pub fn new(suffix: &str, location: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            sku: SkuName::default(),
            kind: AccountKind::default(),
            location: location.to_string(),
        }
    }

    pub fn with_sku(mut self, sku: SkuName) -> Self {
        self.sku = sku;
        self
    }

    pub fn with_kind(mut self, kind: AccountKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A resource group containing storage accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub location: String,
}

/// Handle to a provider-side storage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHandle {
    pub name: String,
    /// Containing resource group.
    pub group: String,
    pub location: String,
}

/// Scope for listing accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Every account in the subscription.
    All,
    /// Every account in one resource group.
    Group(String),
    /// One named account in one resource group.
    GroupAccount { group: String, account: String },
}
