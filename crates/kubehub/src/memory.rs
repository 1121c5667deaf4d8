//! In-memory cluster with Kubernetes list/get semantics, for tests and demos.

use std::collections::BTreeMap;

use async_trait::async_trait;
use cspy_core::{EndpointCoordinate, RawObject};
use serde_json::Value;

use crate::access::{
    effective_namespace, AccessCause, AccessError, ApiCatalog, ApiGroupEntry, ApiResourceEntry, ObjectAccessor,
};

#[derive(Debug, Clone, Default)]
struct Endpoint {
    namespaced: bool,
    objects: Vec<RawObject>,
    failure: Option<AccessCause>,
}

/// Fixed cluster contents. Built once, read concurrently.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCluster {
    endpoints: BTreeMap<EndpointCoordinate, Endpoint>,
    groups: Vec<ApiGroupEntry>,
    resources: BTreeMap<(String, String), Result<Vec<ApiResourceEntry>, AccessCause>>,
    catalog_failure: Option<AccessCause>,
}

fn not_found(what: String) -> AccessCause { AccessCause::NotFound(what) }

impl InMemoryCluster {
    pub fn new() -> Self { Self::default() }

    pub fn with_cluster_scoped(mut self, coordinate: EndpointCoordinate, objects: Vec<Value>) -> Self {
        self.endpoints.insert(
            coordinate,
            Endpoint { namespaced: false, objects: objects.into_iter().map(RawObject::new).collect(), failure: None },
        );
        self
    }

    /// Objects carry their own `metadata.namespace`.
    pub fn with_namespaced(mut self, coordinate: EndpointCoordinate, objects: Vec<Value>) -> Self {
        self.endpoints.insert(
            coordinate,
            Endpoint { namespaced: true, objects: objects.into_iter().map(RawObject::new).collect(), failure: None },
        );
        self
    }

    /// Every call against `coordinate` fails with `cause`.
    pub fn with_failing(mut self, coordinate: EndpointCoordinate, cause: AccessCause) -> Self {
        self.endpoints.entry(coordinate).or_default().failure = Some(cause);
        self
    }

    /// Register a catalog group whose single version serves `resources`.
    pub fn with_group(mut self, name: &str, version: &str, resources: Vec<ApiResourceEntry>) -> Self {
        self.push_group(name, version);
        self.resources.insert((name.to_string(), version.to_string()), Ok(resources));
        self
    }

    /// A catalog group whose resource listing fails.
    pub fn with_failing_group(mut self, name: &str, version: &str, cause: AccessCause) -> Self {
        self.push_group(name, version);
        self.resources.insert((name.to_string(), version.to_string()), Err(cause));
        self
    }

    pub fn with_catalog_failure(mut self, cause: AccessCause) -> Self {
        self.catalog_failure = Some(cause);
        self
    }

    fn push_group(&mut self, name: &str, version: &str) {
        self.groups.push(ApiGroupEntry {
            name: name.to_string(),
            preferred_version: Some(version.to_string()),
            versions: vec![version.to_string()],
        });
    }

    fn endpoint(&self, coordinate: &EndpointCoordinate, namespace: Option<&str>) -> Result<&Endpoint, AccessError> {
        let err = |cause| AccessError::new(coordinate, namespace, cause);
        let ep = self
            .endpoints
            .get(coordinate)
            .ok_or_else(|| err(not_found(format!("the server could not find the requested resource {coordinate}"))))?;
        if let Some(cause) = &ep.failure {
            return Err(err(cause.clone()));
        }
        if namespace.is_some() && !ep.namespaced {
            return Err(err(not_found(format!("{} is not namespaced", coordinate.resource))));
        }
        Ok(ep)
    }
}

#[async_trait]
impl ObjectAccessor for InMemoryCluster {
    async fn list(&self, coordinate: &EndpointCoordinate, namespace: Option<&str>) -> Result<Vec<RawObject>, AccessError> {
        let namespace = effective_namespace(namespace);
        let ep = self.endpoint(coordinate, namespace)?;
        Ok(ep
            .objects
            .iter()
            .filter(|o| namespace.is_none() || o.namespace() == namespace)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        coordinate: &EndpointCoordinate,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<RawObject, AccessError> {
        let namespace = effective_namespace(namespace);
        let ep = self.endpoint(coordinate, namespace)?;
        ep.objects
            .iter()
            .find(|o| o.name() == name && (!ep.namespaced || o.namespace() == namespace))
            .cloned()
            .ok_or_else(|| {
                AccessError::new(coordinate, namespace, not_found(format!("{} \"{name}\" not found", coordinate.resource)))
            })
    }
}

#[async_trait]
impl ApiCatalog for InMemoryCluster {
    async fn api_groups(&self) -> Result<Vec<ApiGroupEntry>, AccessError> {
        match &self.catalog_failure {
            Some(cause) => Err(AccessError::new(&EndpointCoordinate::catalog(), None, cause.clone())),
            None => Ok(self.groups.clone()),
        }
    }

    async fn group_resources(&self, group: &str, version: &str) -> Result<Vec<ApiResourceEntry>, AccessError> {
        let gv = EndpointCoordinate::group_version(group, version);
        match self.resources.get(&(group.to_string(), version.to_string())) {
            Some(Ok(resources)) => Ok(resources.clone()),
            Some(Err(cause)) => Err(AccessError::new(&gv, None, cause.clone())),
            None => Err(AccessError::new(&gv, None, not_found(format!("group version {gv} not served")))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coord(resource: &str) -> EndpointCoordinate { EndpointCoordinate::new("platform.example.org", "v1", resource) }

    fn cluster() -> InMemoryCluster {
        InMemoryCluster::new()
            .with_cluster_scoped(coord("xclusters"), vec![json!({ "metadata": { "name": "c1" } })])
            .with_namespaced(
                coord("xapps"),
                vec![
                    json!({ "metadata": { "name": "a1", "namespace": "default" } }),
                    json!({ "metadata": { "name": "a2", "namespace": "team-a" } }),
                ],
            )
    }

    #[tokio::test]
    async fn namespaced_list_filters_and_unfiltered_lists_all() {
        let c = cluster();
        assert_eq!(c.list(&coord("xapps"), None).await.unwrap().len(), 2);
        assert_eq!(c.list(&coord("xapps"), Some("")).await.unwrap().len(), 2);
        let only = c.list(&coord("xapps"), Some("team-a")).await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name(), "a2");
    }

    #[tokio::test]
    async fn namespace_filter_on_cluster_scoped_type_fails() {
        let err = cluster().list(&coord("xclusters"), Some("default")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.namespace.as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn unknown_and_failing_endpoints() {
        let c = cluster().with_failing(coord("xapps"), AccessCause::Forbidden("rbac".into()));
        assert!(c.list(&coord("xmissing"), None).await.unwrap_err().is_not_found());
        let err = c.list(&coord("xapps"), None).await.unwrap_err();
        assert_eq!(err.cause, AccessCause::Forbidden("rbac".into()));
    }

    #[tokio::test]
    async fn get_by_name() {
        let c = cluster();
        assert_eq!(c.get(&coord("xclusters"), None, "c1").await.unwrap().name(), "c1");
        assert_eq!(c.get(&coord("xapps"), Some("default"), "a1").await.unwrap().name(), "a1");
        assert!(c.get(&coord("xapps"), Some("default"), "a2").await.unwrap_err().is_not_found());
    }
}
