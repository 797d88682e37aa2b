//! stratus-provider — the seam between placement logic and a cloud provider.
//!
//! Everything the placement core asks of the cloud lives behind the
//! [`StorageProvider`] trait: group existence, account create/delete,
//! name availability, account listing, and endpoint → cluster resolution.
//! Credentials and session setup belong to the concrete implementation;
//! the core only ever sees an injected provider value.
//!
//! The [`mock`] module ships an in-memory provider with scripted cluster
//! assignments and call counters, shared by tests across the workspace.

pub mod error;
pub mod mock;
pub mod provider;
pub mod types;

pub use error::{ProviderError, ProviderResult};
pub use mock::MockProvider;
pub use provider::{StorageProvider, with_timeout};
pub use types::{AccountHandle, AccountKind, AccountSpec, Group, ListScope, SkuName};
