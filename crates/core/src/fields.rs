//! Nested-field extraction over loosely-typed JSON.
//!
//! Every accessor has three outcomes:
//! - `Ok(Some(v))`: the path exists and holds the expected type
//! - `Ok(None)`: some segment of the path is missing (or explicitly `null`)
//! - `Err(ExtractionError)`: a segment exists but has the wrong type
//!
//! Callers rely on "missing" and "wrong type" staying distinct: a missing
//! field usually means "skip this candidate", a mismatch means the object is
//! not shaped the way we think it is.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {path}: expected {expected}, found {found}")]
pub struct ExtractionError {
    /// Dotted path up to and including the offending segment.
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &[&str], expected: &'static str, found: &Value) -> ExtractionError {
    let path = if path.is_empty() { "<root>".to_string() } else { path.join(".") };
    ExtractionError { path, expected, found: type_name(found) }
}

/// Walk `path` from `root` and return whatever value sits at the end.
pub fn nested_field<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Value>, ExtractionError> {
    let mut cur = root;
    for (i, key) in path.iter().enumerate() {
        match cur {
            Value::Object(map) => match map.get(*key) {
                None | Some(Value::Null) => return Ok(None),
                Some(v) => cur = v,
            },
            Value::Null => return Ok(None),
            other => return Err(mismatch(&path[..i], "object", other)),
        }
    }
    Ok(Some(cur))
}

pub fn nested_str<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a str>, ExtractionError> {
    match nested_field(root, path)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(mismatch(path, "string", other)),
    }
}

pub fn nested_bool(root: &Value, path: &[&str]) -> Result<Option<bool>, ExtractionError> {
    match nested_field(root, path)? {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(path, "bool", other)),
    }
}

pub fn nested_seq<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a [Value]>, ExtractionError> {
    match nested_field(root, path)? {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(other) => Err(mismatch(path, "array", other)),
    }
}

pub fn nested_map<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Map<String, Value>>, ExtractionError> {
    match nested_field(root, path)? {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(mismatch(path, "object", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn xrd() -> Value {
        json!({
            "spec": {
                "group": "platform.example.org",
                "names": { "plural": "xnetworks" },
                "versions": [{ "name": "v1", "served": true }],
                "broken": "scalar"
            }
        })
    }

    #[test]
    fn present_path_returns_value() {
        let v = xrd();
        assert_eq!(nested_str(&v, &["spec", "group"]), Ok(Some("platform.example.org")));
        assert_eq!(nested_str(&v, &["spec", "names", "plural"]), Ok(Some("xnetworks")));
        assert_eq!(nested_seq(&v, &["spec", "versions"]).map(|s| s.map(|s| s.len())), Ok(Some(1)));
        assert_eq!(nested_bool(&v["spec"]["versions"][0], &["served"]), Ok(Some(true)));
    }

    #[test]
    fn missing_path_is_not_an_error() {
        let v = xrd();
        assert_eq!(nested_str(&v, &["spec", "claimNames", "plural"]), Ok(None));
        assert_eq!(nested_bool(&v, &["status", "ready"]), Ok(None));
        assert_eq!(nested_seq(&json!({}), &["status", "conditions"]), Ok(None));
    }

    #[test]
    fn null_is_treated_as_missing() {
        let v = json!({ "status": null, "spec": { "group": null } });
        assert_eq!(nested_seq(&v, &["status", "conditions"]), Ok(None));
        assert_eq!(nested_str(&v, &["spec", "group"]), Ok(None));
    }

    #[test]
    fn scalar_midway_is_a_mismatch() {
        let v = xrd();
        let err = nested_str(&v, &["spec", "broken", "deeper"]).unwrap_err();
        assert_eq!(err.path, "spec.broken");
        assert_eq!(err.expected, "object");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn wrong_leaf_type_is_a_mismatch() {
        let v = xrd();
        let err = nested_bool(&v, &["spec", "group"]).unwrap_err();
        assert_eq!(err.path, "spec.group");
        assert_eq!(err.expected, "bool");
        assert!(nested_seq(&v, &["spec", "names"]).is_err());
        assert!(nested_str(&v, &["spec", "versions"]).is_err());
    }
}
