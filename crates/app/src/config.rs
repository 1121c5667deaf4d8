use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "crossplane-spy", version, about = "Read-only Crossplane resource dashboard API")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "CSPY_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Kubeconfig used when not running in-cluster (default: $KUBECONFIG, then ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Comma separated namespaces probed for namespaced composite resources
    #[arg(long, env = "CSPY_NAMESPACES", value_delimiter = ',', default_value = "default,crossplane-system")]
    pub namespaces: Vec<String>,

    /// Prometheus exporter listen address (host:port); metrics are off when unset
    #[arg(long = "metrics-addr", env = "CSPY_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl Config {
    /// Candidate namespaces, trimmed, blanks and duplicates dropped.
    pub fn namespaces(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ns in self.namespaces.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !out.iter().any(|seen| seen == ns) {
                out.push(ns.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_list_is_cleaned() {
        let cfg = Config::try_parse_from(["crossplane-spy", "--namespaces", " team-a, ,team-b,team-a"]).unwrap();
        assert_eq!(cfg.namespaces(), vec!["team-a", "team-b"]);
    }

    #[test]
    fn flags_parse() {
        let cfg = Config::try_parse_from([
            "crossplane-spy",
            "--listen",
            "127.0.0.1:9000",
            "--kubeconfig",
            "/tmp/kc",
            "--metrics-addr",
            "127.0.0.1:9100",
        ])
        .unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.kubeconfig, Some(PathBuf::from("/tmp/kc")));
        assert_eq!(cfg.metrics_addr, Some("127.0.0.1:9100".parse().unwrap()));
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        assert!(Config::try_parse_from(["crossplane-spy", "--listen", "not-an-addr"]).is_err());
    }
}
