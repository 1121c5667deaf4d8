//! Cluster connection: in-cluster credentials first, then a kubeconfig file.

use std::path::{Path, PathBuf};

use kube::{
    config::{KubeConfigOptions, Kubeconfig, KubeconfigError},
    Client, Config,
};
use tracing::{debug, info};

/// Failing to obtain any credential is fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("no kubeconfig path: KUBECONFIG is unset and the home directory is unknown")]
    NoKubeconfigPath,
    #[error("loading kubeconfig {}: {source}", .path.display())]
    Kubeconfig {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },
    #[error("building kube client: {0}")]
    Client(#[from] kube::Error),
}

/// Kubeconfig location: explicit path, else `$KUBECONFIG`, else `~/.kube/config`.
pub fn kubeconfig_path(explicit: Option<&Path>) -> Result<PathBuf, ConnectionError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os("KUBECONFIG").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    dirs::home_dir()
        .map(|home| home.join(".kube").join("config"))
        .ok_or(ConnectionError::NoKubeconfigPath)
}

/// Build the long-lived client used by every request.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<Client, ConnectionError> {
    match Config::incluster() {
        Ok(cfg) => {
            info!(cluster = %cfg.cluster_url, "cluster: using in-cluster credentials");
            return Ok(Client::try_from(cfg)?);
        }
        Err(e) => debug!(error = %e, "cluster: not running in-cluster"),
    }

    let path = kubeconfig_path(kubeconfig)?;
    let kubeconfig = Kubeconfig::read_from(&path)
        .map_err(|source| ConnectionError::Kubeconfig { path: path.clone(), source })?;
    let cfg = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|source| ConnectionError::Kubeconfig { path: path.clone(), source })?;
    info!(path = %path.display(), cluster = %cfg.cluster_url, "cluster: using kubeconfig");
    Ok(Client::try_from(cfg)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let p = kubeconfig_path(Some(Path::new("/etc/cspy/kubeconfig"))).unwrap();
        assert_eq!(p, PathBuf::from("/etc/cspy/kubeconfig"));
    }
}
