use cspy_core::{EndpointCoordinate, NormalizedResource};
use cspy_kubehub::AccessError;

/// What happened when one discovered endpoint was listed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed { coordinate: EndpointCoordinate, namespace: Option<String>, items: Vec<NormalizedResource> },
    /// Kept for diagnostics; never shown to the dashboard.
    Skipped(AccessError),
}

/// Per-endpoint outcomes of one fan-out, in the order they were attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanOut {
    outcomes: Vec<Outcome>,
}

impl FanOut {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, outcome: Outcome) { self.outcomes.push(outcome); }

    pub fn outcomes(&self) -> &[Outcome] { &self.outcomes }

    pub fn skipped(&self) -> impl Iterator<Item = &AccessError> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Skipped(e) => Some(e),
            Outcome::Listed { .. } => None,
        })
    }

    /// Concatenate every successful listing, preserving attempt order.
    pub fn into_items(self) -> Vec<NormalizedResource> {
        self.outcomes
            .into_iter()
            .flat_map(|o| match o {
                Outcome::Listed { items, .. } => items,
                Outcome::Skipped(_) => Vec::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspy_core::{normalize, RawObject, ResourceKind, Scope};
    use cspy_kubehub::AccessCause;
    use serde_json::json;

    fn item(name: &str) -> NormalizedResource {
        let raw = RawObject::new(json!({ "kind": "ProviderConfig", "metadata": { "name": name } }));
        normalize(&raw, ResourceKind::ProviderConfig, Scope::Cluster)
    }

    #[test]
    fn merge_keeps_order_and_drops_skips() {
        let a = EndpointCoordinate::new("aws.upbound.io", "v1beta1", "providerconfigs");
        let b = EndpointCoordinate::new("gcp.upbound.io", "v1beta1", "providerconfigs");
        let c = EndpointCoordinate::new("azure.upbound.io", "v1beta1", "providerconfigs");
        let mut f = FanOut::new();
        f.push(Outcome::Listed { coordinate: a, namespace: None, items: vec![item("a1"), item("a2")] });
        f.push(Outcome::Skipped(AccessError::new(&b, None, AccessCause::Forbidden("no".into()))));
        f.push(Outcome::Listed { coordinate: c, namespace: None, items: vec![item("c1")] });

        assert_eq!(f.outcomes().len(), 3);
        assert_eq!(f.skipped().count(), 1);
        let names: Vec<_> = f.into_items().into_iter().map(|n| n.metadata.name).collect();
        assert_eq!(names, vec!["a1", "a2", "c1"]);
    }
}
