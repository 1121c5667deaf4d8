//! crossplane-spy API façade.
//!
//! [`SpyApi`] is what the HTTP layer depends on. [`Aggregator`] is the real
//! implementation over any [`Cluster`]; [`MockApi`] serves canned answers.

#![forbid(unsafe_code)]

use cspy_core::{NormalizedResource, ResourceKind, Scope};
use serde::{Deserialize, Serialize};

pub use cspy_core; // Re-export domain types
pub use cspy_kubehub::{AccessError, Cluster};

mod aggregate;
mod fanout;
mod mock;

pub use aggregate::{Aggregator, DEFAULT_NAMESPACES};
pub use fanout::{FanOut, Outcome};
pub use mock::MockApi;

/// `{kind, count, items}` envelope for one resource family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceList {
    pub kind: String,
    pub count: usize,
    pub items: Vec<NormalizedResource>,
}

impl ResourceList {
    pub fn new(kind: ResourceKind, items: Vec<NormalizedResource>) -> Self {
        Self { kind: kind.list_kind().to_string(), count: items.len(), items }
    }
}

/// `{scope, count, items}` envelope for the scope-merged views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedList {
    pub scope: Scope,
    pub count: usize,
    pub items: Vec<NormalizedResource>,
}

impl ScopedList {
    pub fn new(scope: Scope, items: Vec<NormalizedResource>) -> Self {
        Self { scope, count: items.len(), items }
    }
}

/// Flat counts per kind. A kind that could not be listed counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub providers: usize,
    pub xrds: usize,
    pub compositions: usize,
    pub functions: usize,
}

/// API errors suitable for transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum SpyError {
    #[error("access: {0}")]
    Access(#[from] AccessError),
    #[error("not_found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
}

pub type SpyResult<T> = Result<T, SpyError>;

/// Read-only views over the cluster's Crossplane resources.
///
/// Every call rescans the cluster; nothing is cached between calls.
#[async_trait::async_trait]
pub trait SpyApi: Send + Sync {
    /// All instances of one kind. Fixed-endpoint kinds fail if their endpoint
    /// does; provider configs and composites tolerate per-endpoint failures.
    async fn list(&self, kind: ResourceKind) -> SpyResult<ResourceList>;

    /// Cluster-scoped objects of every kind, merged.
    async fn cluster_resources(&self) -> SpyResult<ScopedList>;

    /// Namespaced composite instances found in the candidate namespaces.
    async fn namespace_resources(&self) -> SpyResult<ScopedList>;

    async fn summary(&self) -> SpyResult<ResourceSummary>;

    /// One object by kind, namespace (`None` for cluster-scoped) and name.
    async fn get(&self, kind: ResourceKind, namespace: Option<&str>, name: &str) -> SpyResult<NormalizedResource>;
}
