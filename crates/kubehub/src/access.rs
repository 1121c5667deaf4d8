//! Accessor and catalog seams. Everything the engine reads from a cluster
//! goes through these two traits.

use async_trait::async_trait;
use cspy_core::{EndpointCoordinate, RawObject};
use serde::{Deserialize, Serialize};

/// Why a single list/get/discovery call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AccessCause {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("api error {code}: {message}")]
    Api { code: u16, message: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
}

/// A failed call against one endpoint. Never carries a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{coordinate}{}: {cause}", .namespace.as_deref().map(|ns| format!(" in namespace {ns}")).unwrap_or_default())]
pub struct AccessError {
    pub coordinate: EndpointCoordinate,
    pub namespace: Option<String>,
    pub cause: AccessCause,
}

impl AccessError {
    pub fn new(coordinate: &EndpointCoordinate, namespace: Option<&str>, cause: AccessCause) -> Self {
        Self { coordinate: coordinate.clone(), namespace: namespace.map(str::to_string), cause }
    }

    pub fn is_not_found(&self) -> bool { matches!(self.cause, AccessCause::NotFound(_)) }
}

/// One entry of the API-group catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGroupEntry {
    pub name: String,
    pub preferred_version: Option<String>,
    pub versions: Vec<String>,
}

impl ApiGroupEntry {
    /// Preferred version, else the first one advertised.
    pub fn version(&self) -> Option<&str> {
        self.preferred_version.as_deref().or_else(|| self.versions.first().map(String::as_str))
    }
}

/// One resource registered under a group/version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResourceEntry {
    /// Plural name, or `plural/subresource` for subresources.
    pub name: String,
    pub kind: String,
    pub namespaced: bool,
}

impl ApiResourceEntry {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, namespaced: bool) -> Self {
        Self { name: name.into(), kind: kind.into(), namespaced }
    }
}

/// Typed-free list/get against an arbitrary endpoint.
///
/// `namespace` of `None` (or empty) targets the cluster-wide endpoint, anything
/// else the namespaced one. Responses are passed through untouched.
#[async_trait]
pub trait ObjectAccessor: Send + Sync {
    async fn list(&self, coordinate: &EndpointCoordinate, namespace: Option<&str>) -> Result<Vec<RawObject>, AccessError>;

    async fn get(
        &self,
        coordinate: &EndpointCoordinate,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<RawObject, AccessError>;
}

/// Read-only view of the server's discovery documents.
#[async_trait]
pub trait ApiCatalog: Send + Sync {
    async fn api_groups(&self) -> Result<Vec<ApiGroupEntry>, AccessError>;

    async fn group_resources(&self, group: &str, version: &str) -> Result<Vec<ApiResourceEntry>, AccessError>;
}

/// Both halves of a cluster, as the aggregator needs them.
pub trait Cluster: ObjectAccessor + ApiCatalog {}

impl<T: ObjectAccessor + ApiCatalog + ?Sized> Cluster for T {}

pub(crate) fn effective_namespace(namespace: Option<&str>) -> Option<&str> {
    namespace.filter(|ns| !ns.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_mentions_coordinate_and_namespace() {
        let c = EndpointCoordinate::new("platform.example.org", "v1", "xnetworks");
        let e = AccessError::new(&c, Some("default"), AccessCause::NotFound("404".into()));
        assert_eq!(e.to_string(), "platform.example.org/v1/xnetworks in namespace default: not found: 404");
        let e = AccessError::new(&c, None, AccessCause::Forbidden("rbac".into()));
        assert_eq!(e.to_string(), "platform.example.org/v1/xnetworks: forbidden: rbac");
        assert!(!e.is_not_found());
    }

    #[test]
    fn empty_namespace_means_cluster_wide() {
        assert_eq!(effective_namespace(Some("")), None);
        assert_eq!(effective_namespace(Some("team-a")), Some("team-a"));
        assert_eq!(effective_namespace(None), None);
    }

    #[test]
    fn group_version_falls_back_to_first_advertised() {
        let g = ApiGroupEntry { name: "aws.upbound.io".into(), preferred_version: None, versions: vec!["v1beta1".into()] };
        assert_eq!(g.version(), Some("v1beta1"));
    }
}
