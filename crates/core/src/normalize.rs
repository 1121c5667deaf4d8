//! Raw object -> [`NormalizedResource`].

use serde_json::Value;

use crate::fields;
use crate::kind::ResourceKind;
use crate::model::{
    CompositeSpec, CompositionSpec, Condition, ConditionStatus, Controllers, DefinitionSpec, DefinitionStatus,
    KindSpec, Metadata, Names, NormalizedResource, PackageSpec, PackageStatus, ResourceReference, ResourceStatus,
    Scope, StatusDetails, TypeReference,
};
use crate::raw::{parse_time, RawObject};

/// True iff some condition is `Ready=True`. Order and other entries don't matter.
pub fn is_ready(conditions: &[Condition]) -> bool {
    conditions.iter().any(|c| c.type_ == "Ready" && c.status == ConditionStatus::True)
}

/// Scope of a composite instance, read off the object itself.
pub fn instance_scope(raw: &RawObject) -> Scope {
    if raw.namespace().is_some() { Scope::Namespace } else { Scope::Cluster }
}

/// Build the dashboard view of `raw`. `scope` is recorded as given.
pub fn normalize(raw: &RawObject, kind: ResourceKind, scope: Scope) -> NormalizedResource {
    let conditions = conditions(raw);
    let ready = is_ready(&conditions);
    NormalizedResource {
        kind: raw.kind().to_string(),
        api_version: raw.api_version().to_string(),
        metadata: Metadata {
            name: raw.name().to_string(),
            namespace: raw.namespace().map(str::to_string),
            uid: raw.uid().to_string(),
            labels: raw.labels(),
            annotations: raw.annotations(),
            creation_timestamp: raw.creation_timestamp(),
        },
        scope,
        spec: spec(raw, kind),
        status: ResourceStatus { conditions, ready, details: status_details(raw, kind) },
    }
}

/// `status.conditions`; missing or malformed yields an empty set.
pub fn conditions(raw: &RawObject) -> Vec<Condition> {
    let items = match raw.nested_seq(&["status", "conditions"]) {
        Ok(Some(items)) => items,
        _ => return Vec::new(),
    };
    items.iter().filter(|c| c.is_object()).map(condition_from).collect()
}

fn condition_from(v: &Value) -> Condition {
    Condition {
        type_: str_or_empty(v, &["type"]),
        status: ConditionStatus::parse(&str_or_empty(v, &["status"])),
        last_transition_time: opt_str(v, &["lastTransitionTime"]).as_deref().and_then(parse_time),
        reason: str_or_empty(v, &["reason"]),
        message: str_or_empty(v, &["message"]),
    }
}

fn opt_str(v: &Value, path: &[&str]) -> Option<String> {
    fields::nested_str(v, path).ok().flatten().map(str::to_string)
}

fn str_or_empty(v: &Value, path: &[&str]) -> String {
    opt_str(v, path).unwrap_or_default()
}

fn seq_len(v: &Value, path: &[&str]) -> usize {
    fields::nested_seq(v, path).ok().flatten().map_or(0, <[Value]>::len)
}

/// First path that resolves to something; extraction errors count as absent.
fn first_present<'a>(v: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|p| fields::nested_field(v, p).ok().flatten())
}

fn spec(raw: &RawObject, kind: ResourceKind) -> KindSpec {
    let v = raw.as_value();
    match kind {
        ResourceKind::Provider | ResourceKind::Function => {
            KindSpec::Package(PackageSpec { package: opt_str(v, &["spec", "package"]) })
        }
        ResourceKind::CompositeResourceDefinition => KindSpec::Definition(definition(v)),
        ResourceKind::Composition => KindSpec::Composition(CompositionSpec {
            composite_type_ref: type_ref(v, &["spec", "compositeTypeRef"]),
            mode: opt_str(v, &["spec", "mode"]),
            pipeline_count: seq_len(v, &["spec", "pipeline"]),
            resources_count: seq_len(v, &["spec", "resources"]),
        }),
        ResourceKind::CompositeResource => KindSpec::Composite(composite(v)),
        ResourceKind::ProviderConfig => KindSpec::Generic {},
    }
}

fn status_details(raw: &RawObject, kind: ResourceKind) -> StatusDetails {
    let v = raw.as_value();
    match kind {
        ResourceKind::Provider | ResourceKind::Function => StatusDetails::Package(PackageStatus {
            current_revision: opt_str(v, &["status", "currentRevision"]),
            installed_bundle: opt_str(v, &["status", "installedBundle"]),
        }),
        ResourceKind::CompositeResourceDefinition => StatusDetails::Definition(DefinitionStatus {
            controllers: Controllers {
                composite_resource_type_ref: type_ref(v, &["status", "controllers", "compositeResourceTypeRef"]),
                composite_resource_claim_type_ref: type_ref(
                    v,
                    &["status", "controllers", "compositeResourceClaimTypeRef"],
                ),
            },
        }),
        _ => StatusDetails::Plain {},
    }
}

fn names(v: &Value, path: &[&str]) -> Option<Names> {
    let node = fields::nested_field(v, path).ok().flatten().filter(|n| n.is_object())?;
    Some(Names {
        kind: str_or_empty(node, &["kind"]),
        plural: str_or_empty(node, &["plural"]),
        singular: opt_str(node, &["singular"]),
    })
}

fn type_ref(v: &Value, path: &[&str]) -> Option<TypeReference> {
    let node = fields::nested_field(v, path).ok().flatten()?;
    let kind = opt_str(node, &["kind"])?;
    Some(TypeReference { api_version: str_or_empty(node, &["apiVersion"]), kind })
}

fn definition(v: &Value) -> DefinitionSpec {
    let served_versions = fields::nested_seq(v, &["spec", "versions"])
        .ok()
        .flatten()
        .unwrap_or(&[])
        .iter()
        .filter(|ver| matches!(fields::nested_bool(ver, &["served"]), Ok(Some(true))))
        .filter_map(|ver| opt_str(ver, &["name"]))
        .collect();
    DefinitionSpec {
        group: opt_str(v, &["spec", "group"]),
        names: names(v, &["spec", "names"]),
        claim_names: names(v, &["spec", "claimNames"]),
        default_composite_delete_policy: opt_str(v, &["spec", "defaultCompositeDeletePolicy"]),
        served_versions,
    }
}

// Composite instances keep their machinery either at the top of spec or under
// spec.crossplane, depending on the API generation.
fn composite(v: &Value) -> CompositeSpec {
    let composition_ref = first_present(
        v,
        &[&["spec", "compositionRef", "name"], &["spec", "crossplane", "compositionRef", "name"]],
    )
    .and_then(Value::as_str)
    .map(str::to_string);

    let composition_selector = first_present(
        v,
        &[
            &["spec", "compositionSelector", "matchLabels"],
            &["spec", "crossplane", "compositionSelector", "matchLabels"],
        ],
    )
    .and_then(Value::as_object)
    .map(|m| m.iter().filter_map(|(k, val)| val.as_str().map(|s| (k.clone(), s.to_string()))).collect())
    .unwrap_or_default();

    let resource_refs = first_present(v, &[&["spec", "resourceRefs"], &["spec", "crossplane", "resourceRefs"]])
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter(|r| r.is_object())
                .map(|r| ResourceReference {
                    api_version: opt_str(r, &["apiVersion"]),
                    kind: str_or_empty(r, &["kind"]),
                    name: str_or_empty(r, &["name"]),
                    namespace: opt_str(r, &["namespace"]).filter(|ns| !ns.is_empty()),
                })
                .collect()
        })
        .unwrap_or_default();

    CompositeSpec { composition_ref, composition_selector, resource_refs }
}
