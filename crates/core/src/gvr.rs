use std::fmt;

use serde::{Deserialize, Serialize};

/// Addressable identity of a resource type: group, version and plural resource name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointCoordinate {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl EndpointCoordinate {
    pub fn new(group: impl Into<String>, version: impl Into<String>, resource: impl Into<String>) -> Self {
        Self { group: group.into(), version: version.into(), resource: resource.into() }
    }

    /// Coordinate naming a whole group/version (discovery calls have no resource).
    pub fn group_version(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(group, version, String::new())
    }

    /// The API-group catalog itself (`/apis`); only used to label discovery errors.
    pub fn catalog() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }

    /// `group/version`, or just `version` for the core group.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for EndpointCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() && self.version.is_empty() && self.resource.is_empty() {
            f.write_str("/apis")
        } else if self.resource.is_empty() {
            write!(f, "{}", self.api_version())
        } else {
            write!(f, "{}/{}", self.api_version(), self.resource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let c = EndpointCoordinate::new("aws.upbound.io", "v1beta1", "providerconfigs");
        assert_eq!(c.to_string(), "aws.upbound.io/v1beta1/providerconfigs");
        assert_eq!(EndpointCoordinate::group_version("apps", "v1").to_string(), "apps/v1");
        assert_eq!(EndpointCoordinate::new("", "v1", "pods").api_version(), "v1");
        assert_eq!(EndpointCoordinate::catalog().to_string(), "/apis");
    }
}
