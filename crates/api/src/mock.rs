use std::collections::HashMap;

use cspy_core::{NormalizedResource, ResourceKind, Scope};

use crate::{ResourceList, ResourceSummary, ScopedList, SpyApi, SpyError, SpyResult};

/// Simple in-memory mock implementation for front-end tests.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    pub lists: HashMap<ResourceKind, Vec<NormalizedResource>>,
    pub cluster: Vec<NormalizedResource>,
    pub namespaced: Vec<NormalizedResource>,
    pub summary: ResourceSummary,
    /// When set, every call fails with this error.
    pub failure: Option<SpyError>,
}

impl MockApi {
    pub fn new() -> Self { Self::default() }

    fn check(&self) -> SpyResult<()> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SpyApi for MockApi {
    async fn list(&self, kind: ResourceKind) -> SpyResult<ResourceList> {
        self.check()?;
        Ok(ResourceList::new(kind, self.lists.get(&kind).cloned().unwrap_or_default()))
    }

    async fn cluster_resources(&self) -> SpyResult<ScopedList> {
        self.check()?;
        Ok(ScopedList::new(Scope::Cluster, self.cluster.clone()))
    }

    async fn namespace_resources(&self) -> SpyResult<ScopedList> {
        self.check()?;
        Ok(ScopedList::new(Scope::Namespace, self.namespaced.clone()))
    }

    async fn summary(&self) -> SpyResult<ResourceSummary> {
        self.check()?;
        Ok(self.summary)
    }

    async fn get(&self, kind: ResourceKind, namespace: Option<&str>, name: &str) -> SpyResult<NormalizedResource> {
        self.check()?;
        self.lists
            .get(&kind)
            .and_then(|items| {
                items.iter().find(|n| n.metadata.name == name && n.metadata.namespace.as_deref() == namespace)
            })
            .cloned()
            .ok_or_else(|| SpyError::NotFound(format!("{kind} {name}")))
    }
}
