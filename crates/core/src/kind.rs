use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gvr::EndpointCoordinate;
use crate::model::Scope;

/// The resource families the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Provider,
    ProviderConfig,
    CompositeResourceDefinition,
    Composition,
    Function,
    CompositeResource,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Provider,
        ResourceKind::ProviderConfig,
        ResourceKind::CompositeResourceDefinition,
        ResourceKind::Composition,
        ResourceKind::Function,
        ResourceKind::CompositeResource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Provider => "Provider",
            ResourceKind::ProviderConfig => "ProviderConfig",
            ResourceKind::CompositeResourceDefinition => "CompositeResourceDefinition",
            ResourceKind::Composition => "Composition",
            ResourceKind::Function => "Function",
            ResourceKind::CompositeResource => "CompositeResource",
        }
    }

    /// `kind` field of the list envelope.
    pub fn list_kind(&self) -> &'static str {
        match self {
            ResourceKind::Provider => "ProviderList",
            ResourceKind::ProviderConfig => "ProviderConfigList",
            ResourceKind::CompositeResourceDefinition => "CompositeResourceDefinitionList",
            ResourceKind::Composition => "CompositionList",
            ResourceKind::Function => "FunctionList",
            ResourceKind::CompositeResource => "CompositeResourceList",
        }
    }

    /// Kinds served at exactly one well-known endpoint.
    pub fn fixed_coordinate(&self) -> Option<EndpointCoordinate> {
        match self {
            ResourceKind::Provider => Some(EndpointCoordinate::new("pkg.crossplane.io", "v1", "providers")),
            ResourceKind::CompositeResourceDefinition => Some(EndpointCoordinate::new(
                "apiextensions.crossplane.io",
                "v1",
                "compositeresourcedefinitions",
            )),
            ResourceKind::Composition => {
                Some(EndpointCoordinate::new("apiextensions.crossplane.io", "v1", "compositions"))
            }
            ResourceKind::Function => Some(EndpointCoordinate::new("pkg.crossplane.io", "v1beta1", "functions")),
            ResourceKind::ProviderConfig | ResourceKind::CompositeResource => None,
        }
    }

    /// Scope known ahead of time. Composite instances have none: it depends on
    /// whether the instance carries a namespace.
    pub fn static_scope(&self) -> Option<Scope> {
        match self {
            ResourceKind::CompositeResource => None,
            _ => Some(Scope::Cluster),
        }
    }

    /// Parse a URL path segment: the short route names (`xrds`, `xrs`, ...) or
    /// the kind name, case-insensitive.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let s = segment.to_ascii_lowercase();
        let kind = match s.as_str() {
            "providers" | "provider" => ResourceKind::Provider,
            "providerconfigs" | "providerconfig" => ResourceKind::ProviderConfig,
            "xrds" | "xrd" | "compositeresourcedefinitions" | "compositeresourcedefinition" => {
                ResourceKind::CompositeResourceDefinition
            }
            "compositions" | "composition" => ResourceKind::Composition,
            "functions" | "function" => ResourceKind::Function,
            "xrs" | "xr" | "compositeresources" | "compositeresource" => ResourceKind::CompositeResource,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_resolve() {
        assert_eq!(ResourceKind::from_segment("xrds"), Some(ResourceKind::CompositeResourceDefinition));
        assert_eq!(ResourceKind::from_segment("Provider"), Some(ResourceKind::Provider));
        assert_eq!(ResourceKind::from_segment("XRs"), Some(ResourceKind::CompositeResource));
        assert_eq!(ResourceKind::from_segment("deployments"), None);
    }

    #[test]
    fn fan_out_kinds_have_no_fixed_coordinate() {
        for kind in ResourceKind::ALL {
            let fanout = matches!(kind, ResourceKind::ProviderConfig | ResourceKind::CompositeResource);
            assert_eq!(kind.fixed_coordinate().is_none(), fanout, "{kind}");
        }
        assert_eq!(
            ResourceKind::Function.fixed_coordinate().map(|c| c.to_string()),
            Some("pkg.crossplane.io/v1beta1/functions".to_string())
        );
    }
}
