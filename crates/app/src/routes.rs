//! HTTP routes. Every handler is a thin adapter over [`SpyApi`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use cspy_api::cspy_core::{NormalizedResource, ResourceKind};
use cspy_api::{ResourceList, ResourceSummary, ScopedList, SpyApi, SpyError};
use metrics::counter;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub type SharedApi = Arc<dyn SpyApi>;

/// Namespace path segment meaning "cluster-scoped".
pub const CLUSTER_SCOPED: &str = "-";

/// `SpyError` rendered as `{error}` with a matching status.
#[derive(Debug)]
pub struct ApiError(SpyError);

impl From<SpyError> for ApiError {
    fn from(e: SpyError) -> Self { Self(e) }
}

pub fn status_of(e: &SpyError) -> StatusCode {
    match e {
        SpyError::NotFound(_) => StatusCode::NOT_FOUND,
        SpyError::Validation(_) => StatusCode::BAD_REQUEST,
        SpyError::Access(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_of(&self.0), Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn hit(route: &'static str) { counter!("http_requests_total", 1u64, "route" => route); }

fn reply<T>(route: &'static str, res: Result<T, SpyError>) -> ApiResult<T> {
    res.map(Json).map_err(|e| {
        warn!(route, error = %e, "http: request failed");
        ApiError(e)
    })
}

pub fn router(api: SharedApi) -> Router {
    let v1 = Router::new()
        .route("/resources", get(summary))
        .route("/resources/:kind", get(list_by_segment))
        .route("/resources/:kind/:namespace/:name", get(get_one))
        .route("/providers", get(providers))
        .route("/providerconfigs", get(provider_configs))
        .route("/xrds", get(xrds))
        .route("/compositions", get(compositions))
        .route("/xrs", get(xrs))
        .route("/functions", get(functions))
        .route("/cluster-resources", get(cluster_resources))
        .route("/namespace-resources", get(namespace_resources));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods([Method::GET, Method::OPTIONS]).allow_headers(Any))
        .with_state(api)
}

async fn health() -> Json<serde_json::Value> {
    hit("health");
    Json(json!({ "status": "healthy", "service": "crossplane-spy" }))
}

async fn summary(State(api): State<SharedApi>) -> ApiResult<ResourceSummary> {
    hit("resources");
    reply("resources", api.summary().await)
}

async fn list(api: &SharedApi, route: &'static str, kind: ResourceKind) -> ApiResult<ResourceList> {
    hit(route);
    reply(route, api.list(kind).await)
}

async fn providers(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "providers", ResourceKind::Provider).await
}

async fn provider_configs(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "providerconfigs", ResourceKind::ProviderConfig).await
}

async fn xrds(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "xrds", ResourceKind::CompositeResourceDefinition).await
}

async fn compositions(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "compositions", ResourceKind::Composition).await
}

async fn xrs(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "xrs", ResourceKind::CompositeResource).await
}

async fn functions(State(api): State<SharedApi>) -> ApiResult<ResourceList> {
    list(&api, "functions", ResourceKind::Function).await
}

async fn cluster_resources(State(api): State<SharedApi>) -> ApiResult<ScopedList> {
    hit("cluster-resources");
    reply("cluster-resources", api.cluster_resources().await)
}

async fn namespace_resources(State(api): State<SharedApi>) -> ApiResult<ScopedList> {
    hit("namespace-resources");
    reply("namespace-resources", api.namespace_resources().await)
}

fn parse_kind(segment: &str) -> Result<ResourceKind, SpyError> {
    ResourceKind::from_segment(segment).ok_or_else(|| SpyError::NotFound(format!("unknown resource kind {segment}")))
}

async fn list_by_segment(State(api): State<SharedApi>, Path(kind): Path<String>) -> ApiResult<ResourceList> {
    hit("resources/kind");
    let res = match parse_kind(&kind) {
        Ok(kind) => api.list(kind).await,
        Err(e) => Err(e),
    };
    reply("resources/kind", res)
}

async fn get_one(
    State(api): State<SharedApi>,
    Path((kind, namespace, name)): Path<(String, String, String)>,
) -> ApiResult<NormalizedResource> {
    hit("resources/kind/name");
    let namespace = Some(namespace.as_str()).filter(|ns| *ns != CLUSTER_SCOPED);
    let res = match parse_kind(&kind) {
        Ok(kind) => api.get(kind, namespace, &name).await,
        Err(e) => Err(e),
    };
    reply("resources/kind/name", res)
}
