//! Discovery + listing + normalization, merged into the dashboard views.
//!
//! Policy: partial failure is normal. Only a kind served at a single fixed
//! endpoint, or the discovery input itself, can fail a whole request.

use std::time::Instant;

use cspy_core::{instance_scope, normalize, EndpointCoordinate, NormalizedResource, RawObject, ResourceKind, Scope};
use cspy_kubehub::{composite_coordinates, provider_config_coordinates, Cluster};
use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::fanout::{FanOut, Outcome};
use crate::{ResourceList, ResourceSummary, ScopedList, SpyApi, SpyError, SpyResult};

/// Namespaces probed by the namespace-scoped view unless configured otherwise.
pub const DEFAULT_NAMESPACES: &[&str] = &["default", "crossplane-system"];

/// Kinds merged into the cluster-scoped view besides composite instances.
const CLUSTER_KINDS: [ResourceKind; 4] = [
    ResourceKind::Provider,
    ResourceKind::CompositeResourceDefinition,
    ResourceKind::Composition,
    ResourceKind::Function,
];

/// How loudly a skipped endpoint is reported.
#[derive(Clone, Copy)]
enum Misses {
    Warn,
    /// Misses are the expected outcome (namespace probing).
    Expected,
}

/// In-process implementation over a live (or in-memory) cluster.
pub struct Aggregator<C> {
    cluster: C,
    namespaces: Vec<String>,
}

fn normalize_as(raw: &RawObject, kind: ResourceKind) -> NormalizedResource {
    let scope = kind.static_scope().unwrap_or_else(|| instance_scope(raw));
    normalize(raw, kind, scope)
}

fn fixed(kind: ResourceKind) -> SpyResult<EndpointCoordinate> {
    kind.fixed_coordinate()
        .ok_or_else(|| SpyError::Validation(format!("{kind} has no fixed endpoint")))
}

fn took_ms(t0: Instant) -> f64 { t0.elapsed().as_secs_f64() * 1000.0 }

impl<C: Cluster> Aggregator<C> {
    pub fn new(cluster: C) -> Self {
        Self { cluster, namespaces: DEFAULT_NAMESPACES.iter().map(|s| s.to_string()).collect() }
    }

    /// Replace the candidate namespaces for the namespace-scoped view.
    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    async fn list_raw(&self, kind: ResourceKind) -> SpyResult<Vec<RawObject>> {
        let coordinate = fixed(kind)?;
        Ok(self.cluster.list(&coordinate, None).await?)
    }

    /// Single fixed-endpoint listing; its failure is the request's failure.
    pub async fn list_fixed(&self, kind: ResourceKind) -> SpyResult<ResourceList> {
        let raws = self.list_raw(kind).await?;
        Ok(ResourceList::new(kind, raws.iter().map(|r| normalize_as(r, kind)).collect()))
    }

    /// Composite endpoints declared by the current definitions.
    pub async fn composite_coordinates(&self) -> SpyResult<Vec<EndpointCoordinate>> {
        let definitions = self.list_raw(ResourceKind::CompositeResourceDefinition).await?;
        Ok(composite_coordinates(&definitions))
    }

    pub async fn provider_config_coordinates(&self) -> SpyResult<Vec<EndpointCoordinate>> {
        Ok(provider_config_coordinates(&self.cluster).await?)
    }

    async fn fan_out(
        &self,
        view: &'static str,
        kind: ResourceKind,
        coordinates: &[EndpointCoordinate],
        namespaces: &[Option<&str>],
        misses: Misses,
    ) -> FanOut {
        let mut out = FanOut::new();
        for coordinate in coordinates {
            for ns in namespaces {
                match self.cluster.list(coordinate, *ns).await {
                    Ok(raws) => out.push(Outcome::Listed {
                        coordinate: coordinate.clone(),
                        namespace: ns.map(str::to_string),
                        items: raws.iter().map(|r| normalize_as(r, kind)).collect(),
                    }),
                    Err(e) => {
                        match misses {
                            Misses::Warn => {
                                warn!(view, %coordinate, error = %e, "api: endpoint skipped");
                                counter!("fanout_skipped_total", 1u64, "view" => view);
                            }
                            Misses::Expected => debug!(view, %coordinate, ns = ?ns, error = %e, "api: probe miss"),
                        }
                        out.push(Outcome::Skipped(e));
                    }
                }
            }
        }
        out
    }

    /// Provider configs from every discovered endpoint.
    pub async fn provider_configs(&self) -> SpyResult<FanOut> {
        let coordinates = self.provider_config_coordinates().await?;
        Ok(self.fan_out("providerconfigs", ResourceKind::ProviderConfig, &coordinates, &[None], Misses::Warn).await)
    }

    /// Composite instances, each endpoint listed without a namespace filter.
    pub async fn composites(&self) -> SpyResult<FanOut> {
        let coordinates = self.composite_coordinates().await?;
        Ok(self.composites_at(&coordinates).await)
    }

    async fn composites_at(&self, coordinates: &[EndpointCoordinate]) -> FanOut {
        self.fan_out("xrs", ResourceKind::CompositeResource, coordinates, &[None], Misses::Warn).await
    }

    /// Composite endpoints probed in each candidate namespace.
    ///
    /// Cluster-scoped types reject a namespace filter; those misses are
    /// expected and only traced at debug level.
    pub async fn namespace_probe(&self) -> SpyResult<FanOut> {
        let coordinates = self.composite_coordinates().await?;
        let namespaces: Vec<Option<&str>> = self.namespaces.iter().map(|ns| Some(ns.as_str())).collect();
        Ok(self
            .fan_out("namespace-resources", ResourceKind::CompositeResource, &coordinates, &namespaces, Misses::Expected)
            .await)
    }

    async fn count(&self, kind: ResourceKind) -> usize {
        match self.list_raw(kind).await {
            Ok(items) => items.len(),
            Err(e) => {
                warn!(%kind, error = %e, "api: summary count degraded to zero");
                0
            }
        }
    }

    async fn get_fixed(&self, kind: ResourceKind, namespace: Option<&str>, name: &str) -> SpyResult<NormalizedResource> {
        let coordinate = fixed(kind)?;
        match self.cluster.get(&coordinate, namespace, name).await {
            Ok(raw) => Ok(normalize_as(&raw, kind)),
            Err(e) if e.is_not_found() => Err(SpyError::NotFound(format!("{kind} {name}"))),
            Err(e) => Err(e.into()),
        }
    }

    /// First endpoint that has the object wins.
    async fn get_probing(
        &self,
        kind: ResourceKind,
        coordinates: &[EndpointCoordinate],
        namespace: Option<&str>,
        name: &str,
    ) -> SpyResult<NormalizedResource> {
        for coordinate in coordinates {
            match self.cluster.get(coordinate, namespace, name).await {
                Ok(raw) => return Ok(normalize_as(&raw, kind)),
                Err(e) => debug!(%kind, name, error = %e, "api: get miss"),
            }
        }
        Err(SpyError::NotFound(format!("{kind} {name}")))
    }
}

#[async_trait::async_trait]
impl<C: Cluster> SpyApi for Aggregator<C> {
    async fn list(&self, kind: ResourceKind) -> SpyResult<ResourceList> {
        let t0 = Instant::now();
        info!(%kind, "api: list start");
        let list = match kind {
            ResourceKind::ProviderConfig | ResourceKind::CompositeResource => {
                let fan = if kind == ResourceKind::ProviderConfig {
                    self.provider_configs().await?
                } else {
                    self.composites().await?
                };
                let skipped = fan.skipped().count();
                let list = ResourceList::new(kind, fan.into_items());
                info!(%kind, count = list.count, skipped, "api: fan-out merged");
                list
            }
            _ => self.list_fixed(kind).await?,
        };
        histogram!("aggregate_ms", took_ms(t0), "view" => kind.list_kind());
        info!(%kind, count = list.count, took_ms = %t0.elapsed().as_millis(), "api: list ok");
        Ok(list)
    }

    async fn cluster_resources(&self) -> SpyResult<ScopedList> {
        let t0 = Instant::now();
        info!("api: cluster_resources start");
        let mut items = Vec::new();
        let mut definitions = Vec::new();
        for kind in CLUSTER_KINDS {
            match self.list_raw(kind).await {
                Ok(raws) => {
                    items.extend(raws.iter().map(|r| normalize_as(r, kind)));
                    if kind == ResourceKind::CompositeResourceDefinition {
                        definitions = raws;
                    }
                }
                Err(e) => {
                    warn!(%kind, error = %e, "api: cluster view skipping kind");
                    counter!("fanout_skipped_total", 1u64, "view" => "cluster-resources");
                }
            }
        }
        let composites = self.composites_at(&composite_coordinates(&definitions)).await;
        items.extend(composites.into_items().into_iter().filter(|n| n.scope == Scope::Cluster));
        histogram!("aggregate_ms", took_ms(t0), "view" => "cluster-resources");
        info!(count = items.len(), took_ms = %t0.elapsed().as_millis(), "api: cluster_resources ok");
        Ok(ScopedList::new(Scope::Cluster, items))
    }

    async fn namespace_resources(&self) -> SpyResult<ScopedList> {
        let t0 = Instant::now();
        info!(namespaces = ?self.namespaces, "api: namespace_resources start");
        let fan = self.namespace_probe().await?;
        let misses = fan.skipped().count();
        let items = fan.into_items();
        histogram!("aggregate_ms", took_ms(t0), "view" => "namespace-resources");
        info!(count = items.len(), misses, took_ms = %t0.elapsed().as_millis(), "api: namespace_resources ok");
        Ok(ScopedList::new(Scope::Namespace, items))
    }

    async fn summary(&self) -> SpyResult<ResourceSummary> {
        let t0 = Instant::now();
        let summary = ResourceSummary {
            providers: self.count(ResourceKind::Provider).await,
            xrds: self.count(ResourceKind::CompositeResourceDefinition).await,
            compositions: self.count(ResourceKind::Composition).await,
            functions: self.count(ResourceKind::Function).await,
        };
        info!(?summary, took_ms = %t0.elapsed().as_millis(), "api: summary ok");
        Ok(summary)
    }

    async fn get(&self, kind: ResourceKind, namespace: Option<&str>, name: &str) -> SpyResult<NormalizedResource> {
        info!(%kind, ns = %namespace.unwrap_or("-"), name, "api: get start");
        match kind {
            ResourceKind::ProviderConfig => {
                let coordinates = self.provider_config_coordinates().await?;
                self.get_probing(kind, &coordinates, namespace, name).await
            }
            ResourceKind::CompositeResource => {
                let coordinates = self.composite_coordinates().await?;
                self.get_probing(kind, &coordinates, namespace, name).await
            }
            _ => self.get_fixed(kind, namespace, name).await,
        }
    }
}
