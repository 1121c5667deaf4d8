//! crossplane-spy kubehub: cluster connection, unstructured object access and
//! endpoint-coordinate resolution.

#![forbid(unsafe_code)]

pub mod access;
pub mod client;
pub mod connect;
pub mod memory;
pub mod resolve;

pub use access::{AccessCause, AccessError, ApiCatalog, ApiGroupEntry, ApiResourceEntry, Cluster, ObjectAccessor};
pub use client::KubeCluster;
pub use connect::{connect, kubeconfig_path, ConnectionError};
pub use memory::InMemoryCluster;
pub use resolve::{composite_coordinates, is_provider_group, provider_config_coordinates};
