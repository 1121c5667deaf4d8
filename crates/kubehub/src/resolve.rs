//! Endpoint-coordinate resolution for types whose address is only known at
//! runtime.
//!
//! Two strategies:
//! - composite instances: read off each CompositeResourceDefinition's declared
//!   group, plural and versions;
//! - provider configurations: scan the API-group catalog for groups named
//!   after known provider conventions and pick their ProviderConfig types.
//!
//! The second is a heuristic. A provider whose group doesn't follow one of
//! [`PROVIDER_GROUP_PATTERNS`] is simply invisible to the dashboard.

use cspy_core::{fields, EndpointCoordinate, ExtractionError, RawObject};
use serde_json::Value;
use tracing::{debug, warn};

use crate::access::{AccessError, ApiCatalog, ApiResourceEntry};

/// Substrings identifying provider API groups.
pub const PROVIDER_GROUP_PATTERNS: &[&str] = &[
    ".upbound.io",
    ".crossplane.io",
    "aws.crossplane.io",
    "gcp.crossplane.io",
    "azure.crossplane.io",
];

pub fn is_provider_group(group: &str) -> bool {
    PROVIDER_GROUP_PATTERNS.iter().any(|p| group.contains(p))
}

/// Subresources (`providerconfigs/status`) share the kind but are not listable.
pub fn is_provider_config(resource: &ApiResourceEntry) -> bool {
    !resource.name.contains('/')
        && (resource.name.ends_with("providerconfigs") || resource.kind == "ProviderConfig")
}

/// Coordinate for one definition: `spec.group`, `spec.names.plural` and the
/// first served entry of `spec.versions`, in declared order.
///
/// `Ok(None)` when any of those is absent or nothing is served.
pub fn composite_coordinate(definition: &RawObject) -> Result<Option<EndpointCoordinate>, ExtractionError> {
    let Some(group) = definition.nested_str(&["spec", "group"])? else { return Ok(None) };
    let Some(plural) = definition.nested_str(&["spec", "names", "plural"])? else { return Ok(None) };
    let Some(versions) = definition.nested_seq(&["spec", "versions"])? else { return Ok(None) };

    let (served, malformed) = first_served(versions);
    for e in &malformed {
        warn!(xrd = %definition.name(), error = %e, "resolve: malformed version descriptor skipped");
    }
    Ok(served.map(|version| EndpointCoordinate::new(group, version, plural)))
}

/// First descriptor with `served: true`, scanning in declared order.
///
/// A descriptor whose `name` or `served` has the wrong type only disqualifies
/// itself; its mismatch is returned alongside.
pub fn first_served(versions: &[Value]) -> (Option<&str>, Vec<ExtractionError>) {
    let mut malformed = Vec::new();
    for ver in versions {
        match (fields::nested_str(ver, &["name"]), fields::nested_bool(ver, &["served"])) {
            (Ok(Some(name)), Ok(Some(true))) => return (Some(name), malformed),
            (Err(e), _) | (_, Err(e)) => malformed.push(e),
            _ => {}
        }
    }
    (None, malformed)
}

/// One coordinate per definition with a served version, in input order.
pub fn composite_coordinates(definitions: &[RawObject]) -> Vec<EndpointCoordinate> {
    let mut out = Vec::with_capacity(definitions.len());
    for def in definitions {
        match composite_coordinate(def) {
            Ok(Some(c)) => out.push(c),
            Ok(None) => debug!(xrd = %def.name(), "resolve: definition has no listable endpoint"),
            Err(e) => warn!(xrd = %def.name(), error = %e, "resolve: malformed definition skipped"),
        }
    }
    out
}

/// ProviderConfig coordinates discovered through the catalog.
///
/// Failing to read the catalog at all is an error; failing to read one
/// group's resources only drops that group.
pub async fn provider_config_coordinates<C>(catalog: &C) -> Result<Vec<EndpointCoordinate>, AccessError>
where
    C: ApiCatalog + ?Sized,
{
    let groups = catalog.api_groups().await?;
    let mut out = Vec::new();
    for group in groups.iter().filter(|g| is_provider_group(&g.name)) {
        let Some(version) = group.version() else {
            debug!(group = %group.name, "resolve: provider group advertises no version");
            continue;
        };
        let resources = match catalog.group_resources(&group.name, version).await {
            Ok(r) => r,
            Err(e) => {
                warn!(group = %group.name, error = %e, "resolve: skipping provider group");
                continue;
            }
        };
        out.extend(
            resources
                .iter()
                .filter(|r| is_provider_config(r))
                .map(|r| EndpointCoordinate::new(group.name.as_str(), version, r.name.as_str())),
        );
    }
    debug!(count = out.len(), "resolve: provider config coordinates");
    Ok(out)
}
