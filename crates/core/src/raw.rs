use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{self, ExtractionError};

/// One object as returned by the cluster, untouched.
///
/// No schema is assumed beyond the envelope accessors below; anything else is
/// reached through the typed `nested_*` accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObject(Value);

impl RawObject {
    pub fn new(value: Value) -> Self { Self(value) }

    pub fn as_value(&self) -> &Value { &self.0 }

    pub fn nested_str(&self, path: &[&str]) -> Result<Option<&str>, ExtractionError> {
        fields::nested_str(&self.0, path)
    }

    pub fn nested_bool(&self, path: &[&str]) -> Result<Option<bool>, ExtractionError> {
        fields::nested_bool(&self.0, path)
    }

    pub fn nested_seq(&self, path: &[&str]) -> Result<Option<&[Value]>, ExtractionError> {
        fields::nested_seq(&self.0, path)
    }

    fn envelope_str(&self, path: &[&str]) -> &str {
        self.nested_str(path).ok().flatten().unwrap_or("")
    }

    pub fn kind(&self) -> &str { self.envelope_str(&["kind"]) }

    pub fn api_version(&self) -> &str { self.envelope_str(&["apiVersion"]) }

    pub fn name(&self) -> &str { self.envelope_str(&["metadata", "name"]) }

    pub fn uid(&self) -> &str { self.envelope_str(&["metadata", "uid"]) }

    /// Namespace if present and non-empty.
    pub fn namespace(&self) -> Option<&str> {
        self.nested_str(&["metadata", "namespace"]).ok().flatten().filter(|ns| !ns.is_empty())
    }

    pub fn labels(&self) -> BTreeMap<String, String> { self.string_map(&["metadata", "labels"]) }

    pub fn annotations(&self) -> BTreeMap<String, String> { self.string_map(&["metadata", "annotations"]) }

    pub fn creation_timestamp(&self) -> Option<DateTime<Utc>> {
        self.nested_str(&["metadata", "creationTimestamp"]).ok().flatten().and_then(parse_time)
    }

    /// String-valued entries of a map field; non-string values are dropped.
    pub fn string_map(&self, path: &[&str]) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Ok(Some(map)) = fields::nested_map(&self.0, path) {
            for (k, v) in map {
                if let Some(s) = v.as_str() {
                    out.insert(k.clone(), s.to_string());
                }
            }
        }
        out
    }
}

impl From<Value> for RawObject {
    fn from(v: Value) -> Self { Self(v) }
}

pub(crate) fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_accessors() {
        let raw = RawObject::new(json!({
            "apiVersion": "pkg.crossplane.io/v1",
            "kind": "Provider",
            "metadata": {
                "name": "provider-aws",
                "namespace": "",
                "uid": "0b1c",
                "labels": { "team": "infra", "weird": 3 },
                "creationTimestamp": "2024-05-01T10:00:00Z"
            }
        }));
        assert_eq!(raw.kind(), "Provider");
        assert_eq!(raw.api_version(), "pkg.crossplane.io/v1");
        assert_eq!(raw.name(), "provider-aws");
        assert_eq!(raw.namespace(), None);
        assert_eq!(raw.labels().len(), 1);
        assert!(raw.annotations().is_empty());
        assert_eq!(raw.creation_timestamp().map(|t| t.to_rfc3339()), Some("2024-05-01T10:00:00+00:00".to_string()));
    }

    #[test]
    fn missing_envelope_defaults_to_empty() {
        let raw = RawObject::new(json!({ "metadata": "not-a-map" }));
        assert_eq!(raw.name(), "");
        assert_eq!(raw.kind(), "");
        assert_eq!(raw.creation_timestamp(), None);
    }
}
