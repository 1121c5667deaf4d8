//! kube-rs backed accessor and catalog.

use std::time::Instant;

use async_trait::async_trait;
use cspy_core::{EndpointCoordinate, RawObject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroupList, APIResourceList};
use kube::{
    api::{Api, ListParams},
    core::{ApiResource, DynamicObject},
    Client,
};
use tracing::debug;

use crate::access::{
    effective_namespace, AccessCause, AccessError, ApiCatalog, ApiGroupEntry, ApiResourceEntry, ObjectAccessor,
};

/// Shared, read-only handle on the cluster. Cheap to clone.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self { Self { client } }

    fn api(&self, coordinate: &EndpointCoordinate, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = api_resource(coordinate);
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }
}

/// Only group/version/plural matter for list and get; the kind is left blank
/// since we never know it up front.
fn api_resource(coordinate: &EndpointCoordinate) -> ApiResource {
    ApiResource {
        group: coordinate.group.clone(),
        version: coordinate.version.clone(),
        api_version: coordinate.api_version(),
        kind: String::new(),
        plural: coordinate.resource.clone(),
    }
}

fn cause_from(err: kube::Error) -> AccessCause {
    match err {
        kube::Error::Api(resp) => match resp.code {
            404 => AccessCause::NotFound(resp.message),
            401 | 403 => AccessCause::Forbidden(resp.message),
            code => AccessCause::Api { code, message: resp.message },
        },
        kube::Error::SerdeError(e) => AccessCause::Decode(e.to_string()),
        other => AccessCause::Transport(other.to_string()),
    }
}

/// Preferred version when the server names one, plus every advertised version.
fn group_entries(list: APIGroupList) -> Vec<ApiGroupEntry> {
    list.groups
        .into_iter()
        .map(|g| ApiGroupEntry {
            name: g.name,
            preferred_version: g.preferred_version.map(|v| v.version),
            versions: g.versions.into_iter().map(|v| v.version).collect(),
        })
        .collect()
}

fn resource_entries(list: APIResourceList) -> Vec<ApiResourceEntry> {
    list.resources
        .into_iter()
        .map(|r| ApiResourceEntry { name: r.name, kind: r.kind, namespaced: r.namespaced })
        .collect()
}

fn to_raw(
    obj: DynamicObject,
    coordinate: &EndpointCoordinate,
    namespace: Option<&str>,
) -> Result<RawObject, AccessError> {
    serde_json::to_value(obj)
        .map(RawObject::new)
        .map_err(|e| AccessError::new(coordinate, namespace, AccessCause::Decode(e.to_string())))
}

#[async_trait]
impl ObjectAccessor for KubeCluster {
    async fn list(&self, coordinate: &EndpointCoordinate, namespace: Option<&str>) -> Result<Vec<RawObject>, AccessError> {
        let namespace = effective_namespace(namespace);
        let t0 = Instant::now();
        let list = self
            .api(coordinate, namespace)
            .list(&ListParams::default())
            .await
            .map_err(|e| AccessError::new(coordinate, namespace, cause_from(e)))?;
        debug!(%coordinate, ns = ?namespace, count = list.items.len(), took_ms = %t0.elapsed().as_millis(), "kube: list ok");
        list.items.into_iter().map(|o| to_raw(o, coordinate, namespace)).collect()
    }

    async fn get(
        &self,
        coordinate: &EndpointCoordinate,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<RawObject, AccessError> {
        let namespace = effective_namespace(namespace);
        let obj = self
            .api(coordinate, namespace)
            .get(name)
            .await
            .map_err(|e| AccessError::new(coordinate, namespace, cause_from(e)))?;
        debug!(%coordinate, ns = ?namespace, name, "kube: get ok");
        to_raw(obj, coordinate, namespace)
    }
}

#[async_trait]
impl ApiCatalog for KubeCluster {
    async fn api_groups(&self) -> Result<Vec<ApiGroupEntry>, AccessError> {
        let list = self
            .client
            .list_api_groups()
            .await
            .map_err(|e| AccessError::new(&EndpointCoordinate::catalog(), None, cause_from(e)))?;
        let groups = group_entries(list);
        debug!(count = groups.len(), "kube: api groups listed");
        Ok(groups)
    }

    async fn group_resources(&self, group: &str, version: &str) -> Result<Vec<ApiResourceEntry>, AccessError> {
        let gv = EndpointCoordinate::group_version(group, version);
        let list = self
            .client
            .list_api_group_resources(&gv.api_version())
            .await
            .map_err(|e| AccessError::new(&gv, None, cause_from(e)))?;
        Ok(resource_entries(list))
    }
}
