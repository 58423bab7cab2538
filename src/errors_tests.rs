// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for deployer error types.

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_config_error_message() {
        let error = DeployerError::Config {
            source_name: "/imports/imports.yaml".to_string(),
            reason: "missing field `cluster`".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Failed to load imports from /imports/imports.yaml: missing field `cluster`"
        );
        assert_eq!(error.category(), "ConfigError");
    }

    #[test]
    fn test_template_error_helper() {
        let error = DeployerError::template("cloud profile", "invalid type: integer");

        assert_eq!(
            error.to_string(),
            "Failed to parse default cloud profile template: invalid type: integer"
        );
        assert_eq!(error.category(), "TemplateError");
    }

    #[test]
    fn test_lookup_error_helper() {
        let error = DeployerError::lookup("example.com/component", "controller", "not found");

        assert_eq!(
            error.to_string(),
            "Failed to resolve resource 'controller' of component 'example.com/component': not found"
        );
        assert_eq!(error.category(), "LookupError");
    }

    #[test]
    fn test_reconcile_error_wraps_api_error() {
        let error = DeployerError::Reconcile {
            action: "create",
            kind: "CloudProfile".to_string(),
            name: "aws".to_string(),
            source: kube::Error::Api(Box::new(kube::core::Status {
                status: Some(kube::core::response::StatusSummary::Failure),
                message: "forbidden".to_string(),
                reason: "Forbidden".to_string(),
                code: 403,
                metadata: None,
                details: None,
            })),
        };

        assert!(error.to_string().starts_with("Failed to create CloudProfile 'aws'"));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.category(), "ReconcileError");
    }

    #[test]
    fn test_unsupported_operation_message() {
        let error = DeployerError::UnsupportedOperation("upgrade".to_string());

        assert_eq!(error.to_string(), "Unknown operation: \"upgrade\"");
        assert_eq!(error.category(), "UnsupportedOperationError");
    }

    #[test]
    fn test_computation_and_connection_categories() {
        assert_eq!(
            DeployerError::computation("conflict").category(),
            "ComputationError"
        );
        assert_eq!(
            DeployerError::Connection {
                reason: "bad kubeconfig".to_string()
            }
            .category(),
            "ConnectionError"
        );
    }
}
