//! stratus-placement — placement-aware creation of storage accounts.
//!
//! Creates storage accounts whose underlying physical cluster is unique
//! within a deployment group, avoiding the correlated-failure risk of
//! co-locating redundant accounts on one cluster.
//!
//! # Components
//!
//! - **`name`** — candidate name allocation with bounded availability retries
//! - **`resolver`** — account → cluster resolution and duplicate detection
//! - **`engine`** — single-account placement with bounded collision retries
//! - **`fleet`** — fleet orchestration and the public [`FleetPlacer`] surface
//! - **`exclusion`** — normalized, monotonically growing cluster exclusion set
//!
//! The core never talks to a cloud SDK directly; every provider call goes
//! through the injected [`stratus_provider::StorageProvider`] under a
//! per-call deadline.

pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod fleet;
pub mod name;
pub mod resolver;

pub use config::{EndpointPolicy, PlacementConfig};
pub use engine::{PlacedAccount, place_account};
pub use error::{PlacementError, PlacementResult};
pub use exclusion::ExclusionSet;
pub use fleet::{FleetOptions, FleetPlacer, FleetReport};
pub use name::allocate_name;
pub use resolver::{ClusterAssignment, ResolveScope, find_duplicates, resolve_clusters};
