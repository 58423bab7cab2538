// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `cluster.rs`

#[cfg(test)]
mod tests {
    use crate::cluster::*;
    use crate::errors::DeployerError;
    use crate::imports::{Target, TargetConfig, TargetSpec};

    const KUBECONFIG: &str = r"apiVersion: v1
kind: Config
clusters:
  - name: garden
    cluster:
      server: http://127.0.0.1:6443
contexts:
  - name: garden
    context:
      cluster: garden
      user: admin
current-context: garden
users:
  - name: admin
    user:
      token: test-token
";

    fn target(r#type: &str, kubeconfig: &str) -> Target {
        Target {
            metadata: None,
            spec: TargetSpec {
                r#type: r#type.to_string(),
                config: TargetConfig {
                    kubeconfig: kubeconfig.to_string(),
                },
            },
        }
    }

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(Box::new(kube::core::Status {
            status: Some(kube::core::response::StatusSummary::Failure),
            message: "test".to_string(),
            reason: "Test".to_string(),
            code,
            metadata: None,
            details: None,
        }))
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(&api_error(404)));
        assert!(!is_not_found(&api_error(409)));
        assert!(!is_not_found(&api_error(500)));
    }

    #[tokio::test]
    async fn test_connector_rejects_unknown_target_type() {
        let err = KubeconfigConnector
            .connect(&target("landscaper.gardener.cloud/mock", KUBECONFIG))
            .await
            .err()
            .expect("expected a connection error");

        assert!(matches!(err, DeployerError::Connection { .. }));
        assert!(err.to_string().contains("unsupported target type"));
    }

    #[tokio::test]
    async fn test_connector_rejects_invalid_kubeconfig() {
        let err = KubeconfigConnector
            .connect(&target(
                "landscaper.gardener.cloud/kubernetes-cluster",
                "clusters: [",
            ))
            .await
            .err()
            .expect("expected a connection error");

        assert!(matches!(err, DeployerError::Connection { .. }));
        assert!(err.to_string().contains("invalid kubeconfig"));
    }

    #[tokio::test]
    async fn test_connector_builds_client_without_contacting_cluster() {
        let result = KubeconfigConnector
            .connect(&target(
                "landscaper.gardener.cloud/kubernetes-cluster",
                KUBECONFIG,
            ))
            .await;

        assert!(result.is_ok(), "expected a client, got {:?}", result.err());
    }
}
