#![forbid(unsafe_code)]

use cspy_core::EndpointCoordinate;
use cspy_kubehub::{provider_config_coordinates, AccessCause, ApiResourceEntry, InMemoryCluster};

fn pc(name: &str, kind: &str) -> ApiResourceEntry { ApiResourceEntry::new(name, kind, false) }

#[tokio::test]
async fn upbound_group_with_provider_config_yields_coordinate() {
    let cluster = InMemoryCluster::new()
        .with_group("apps", "v1", vec![pc("deployments", "Deployment")])
        .with_group(
            "aws.upbound.io",
            "v1beta1",
            vec![
                pc("providerconfigs", "ProviderConfig"),
                pc("providerconfigs/status", "ProviderConfig"),
                pc("providerconfigusages", "ProviderConfigUsage"),
                pc("storeconfigs", "StoreConfig"),
            ],
        );
    let coords = provider_config_coordinates(&cluster).await.unwrap();
    assert_eq!(coords, vec![EndpointCoordinate::new("aws.upbound.io", "v1beta1", "providerconfigs")]);
}

#[tokio::test]
async fn apps_group_yields_nothing() {
    let cluster = InMemoryCluster::new().with_group("apps", "v1", vec![pc("providerconfigs", "ProviderConfig")]);
    assert!(provider_config_coordinates(&cluster).await.unwrap().is_empty());
}

#[tokio::test]
async fn one_broken_group_does_not_hide_the_others() {
    let cluster = InMemoryCluster::new()
        .with_group("aws.upbound.io", "v1beta1", vec![pc("providerconfigs", "ProviderConfig")])
        .with_failing_group("gcp.upbound.io", "v1beta1", AccessCause::Transport("connection reset".into()))
        .with_group("helm.crossplane.io", "v1beta1", vec![pc("providerconfigs", "ProviderConfig")]);
    let coords = provider_config_coordinates(&cluster).await.unwrap();
    let groups: Vec<_> = coords.iter().map(|c| c.group.as_str()).collect();
    assert_eq!(groups, vec!["aws.upbound.io", "helm.crossplane.io"]);
}

#[tokio::test]
async fn unreadable_catalog_is_an_error() {
    let cluster = InMemoryCluster::new().with_catalog_failure(AccessCause::Transport("dial tcp: refused".into()));
    let err = provider_config_coordinates(&cluster).await.unwrap_err();
    assert_eq!(err.coordinate, EndpointCoordinate::catalog());
}
