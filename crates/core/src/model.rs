//! Uniform representation handed to the dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an instance is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Cluster,
    Namespace,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Cluster => "cluster",
            Scope::Namespace => "namespace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    /// Anything other than the literal "True"/"False" counts as Unknown.
    pub fn parse(s: &str) -> Self {
        match s {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            _ => ConditionStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub uid: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// Conditions plus the derived readiness flag, with any kind-specific status
/// fields alongside.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResourceStatus {
    pub conditions: Vec<Condition>,
    pub ready: bool,
    #[serde(flatten)]
    pub details: StatusDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Names {
    pub kind: String,
    pub plural: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub api_version: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// `spec` of providers and functions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PackageSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// Status fields of providers and functions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_bundle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_composite_delete_policy: Option<String>,
    pub served_versions: Vec<String>,
}

/// Types the definition's controllers currently serve.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controllers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_resource_type_ref: Option<TypeReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_resource_claim_type_ref: Option<TypeReference>,
}

impl Controllers {
    pub fn is_empty(&self) -> bool {
        self.composite_resource_type_ref.is_none() && self.composite_resource_claim_type_ref.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DefinitionStatus {
    #[serde(skip_serializing_if = "Controllers::is_empty")]
    pub controllers: Controllers,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_type_ref: Option<TypeReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub pipeline_count: usize,
    pub resources_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_ref: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub composition_selector: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_refs: Vec<ResourceReference>,
}

/// Kind-specific `spec` fields. Provider configs carry none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KindSpec {
    Package(PackageSpec),
    Definition(DefinitionSpec),
    Composition(CompositionSpec),
    Composite(CompositeSpec),
    Generic {},
}

impl KindSpec {
    pub fn is_generic(&self) -> bool { matches!(self, KindSpec::Generic {}) }
}

/// Kind-specific status fields, flattened beside conditions and readiness.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusDetails {
    Package(PackageStatus),
    Definition(DefinitionStatus),
    Plain {},
}

impl Default for StatusDetails {
    fn default() -> Self { StatusDetails::Plain {} }
}

/// One cluster object in dashboard form. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResource {
    pub kind: String,
    pub api_version: String,
    pub metadata: Metadata,
    pub scope: Scope,
    #[serde(skip_serializing_if = "KindSpec::is_generic")]
    pub spec: KindSpec,
    pub status: ResourceStatus,
}
