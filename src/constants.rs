// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the provider-aws deployer.
//!
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Gardener API Constants
// ============================================================================

/// API group of the Gardener core resources
pub const GARDENER_API_GROUP: &str = "core.gardener.cloud";

/// API version of the Gardener core resources
pub const GARDENER_API_VERSION: &str = "v1beta1";

/// Fully qualified API version (group/version)
pub const GARDENER_API_GROUP_VERSION: &str = "core.gardener.cloud/v1beta1";

/// Kind name for `CloudProfile` resource
pub const KIND_CLOUD_PROFILE: &str = "CloudProfile";

/// Kind name for `ControllerDeployment` resource
pub const KIND_CONTROLLER_DEPLOYMENT: &str = "ControllerDeployment";

/// Kind name for `ControllerRegistration` resource
pub const KIND_CONTROLLER_REGISTRATION: &str = "ControllerRegistration";

/// Plural name used in the `ControllerDeployment` URL path
pub const PLURAL_CONTROLLER_DEPLOYMENTS: &str = "controllerdeployments";

// ============================================================================
// Resource Identities
// ============================================================================

/// Fixed name of the cloud profile
pub const CLOUD_PROFILE_NAME: &str = "aws";

/// Fixed name of the controller deployment
pub const CONTROLLER_DEPLOYMENT_NAME: &str = "provider-aws";

/// Fixed name of the controller registration
pub const CONTROLLER_REGISTRATION_NAME: &str = "provider-aws";

/// Field manager recorded on every create/replace call
pub const FIELD_MANAGER: &str = "landscaper-provider-aws";

// ============================================================================
// AWS Provider Config Constants
// ============================================================================

/// API version of the AWS `CloudProfileConfig`
pub const AWS_PROVIDER_API_VERSION: &str = "aws.provider.extensions.gardener.cloud/v1alpha1";

/// Kind of the AWS provider config embedded in the cloud profile
pub const KIND_AWS_CLOUD_PROFILE_CONFIG: &str = "CloudProfileConfig";

// ============================================================================
// Controller Deployment Values
// ============================================================================

/// Controllers whose `concurrentSyncs` is set from the concurrency override.
///
/// Names follow the provider-aws chart's `controllers.<name>` keys.
pub const CONTROLLER_SUBSYSTEMS: [&str; 6] = [
    "backupentry",
    "controlplane",
    "dnsrecord",
    "healthcheck",
    "infrastructure",
    "worker",
];

/// Key inside each controller entry that carries the concurrency level
pub const CONCURRENT_SYNCS_KEY: &str = "concurrentSyncs";

// ============================================================================
// Component Descriptor Lookups
// ============================================================================

/// Component that ships the provider-aws extension
pub const PROVIDER_AWS_COMPONENT: &str = "github.com/gardener/gardener-extension-provider-aws";

/// OCI image resource of the extension controller itself
pub const PROVIDER_AWS_IMAGE_RESOURCE: &str = "gardener-extension-provider-aws";

/// Auxiliary images that the chart consumes from `values.images`.
///
/// Each entry is `(values key, component descriptor resource name)`.
pub const AUXILIARY_IMAGES: [(&str, &str); 3] = [
    (
        "machine-controller-manager-provider-aws",
        "machine-controller-manager-provider-aws",
    ),
    ("aws-custom-route-controller", "aws-custom-route-controller"),
    ("terraformer", "terraformer"),
];

// ============================================================================
// Landscaper Constants
// ============================================================================

/// Target type for a Kubernetes cluster handle
pub const TARGET_TYPE_KUBERNETES_CLUSTER: &str = "landscaper.gardener.cloud/kubernetes-cluster";

/// Environment variable holding the imports file path
pub const ENV_IMPORTS_PATH: &str = "IMPORTS_PATH";

/// Environment variable holding the requested operation
pub const ENV_OPERATION: &str = "OPERATION";

/// Environment variable holding the component descriptor location
pub const ENV_COMPONENT_DESCRIPTOR_PATH: &str = "COMPONENT_DESCRIPTOR_PATH";

/// Environment variable selecting the log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";
