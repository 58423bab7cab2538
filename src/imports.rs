// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Import document handed to the deployer by Landscaper.
//!
//! The document is YAML (JSON is accepted too, being a YAML subset):
//!
//! ```yaml
//! cluster:
//!   spec:
//!     type: landscaper.gardener.cloud/kubernetes-cluster
//!     config:
//!       kubeconfig: |
//!         apiVersion: v1
//!         ...
//! cloudProfile:
//!   regions:
//!     - name: eu-west-1
//! controllerDeployment:
//!   concurrentSyncs: 20
//! controllerRegistration: {}
//! ```
//!
//! Every override field is optional; an absent field keeps the default template value.

use crate::errors::{DeployerError, Result};
use crate::gardener::{ControllerResource, ExpirableVersion, Region};
use crate::machine_images::{ImageFilter, MachineImage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Parsed import document, produced once per run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Imports {
    /// Target cluster handle
    pub cluster: Target,

    /// Cloud profile overrides
    #[serde(default)]
    pub cloud_profile: CloudProfileOverrides,

    /// Controller deployment overrides
    #[serde(default)]
    pub controller_deployment: ControllerDeploymentOverrides,

    /// Controller registration overrides
    #[serde(default)]
    pub controller_registration: ControllerRegistrationOverrides,
}

impl Imports {
    /// Parse an import document from memory.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Config`] if the bytes are not a valid import document.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Self::parse(data, "<memory>")
    }

    fn parse(data: &[u8], source_name: &str) -> Result<Self> {
        serde_yaml::from_slice(data).map_err(|e| DeployerError::Config {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Read and parse the import document at `path`.
///
/// # Errors
///
/// Returns [`DeployerError::Config`] if the file cannot be read or parsed.
pub async fn load_imports(path: &Path) -> Result<Imports> {
    let source_name = path.display().to_string();
    debug!(path = %source_name, "Reading imports");

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| DeployerError::Config {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

    Imports::parse(&data, &source_name)
}

/// A Landscaper target pointing at the cluster to deploy into.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Target {
    /// Target metadata (name, namespace); informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Target specification
    pub spec: TargetSpec,
}

/// Specification of a Landscaper target.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetSpec {
    /// Target type, e.g. `landscaper.gardener.cloud/kubernetes-cluster`
    #[serde(rename = "type")]
    pub r#type: String,

    /// Type-specific configuration
    #[serde(default)]
    pub config: TargetConfig,
}

/// Configuration of a Kubernetes cluster target.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// Inline kubeconfig document
    #[serde(default)]
    pub kubeconfig: String,
}

/// Overrides applied to the default cloud profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudProfileOverrides {
    /// Supported Kubernetes versions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kubernetes_versions: Vec<ExpirableVersion>,

    /// General machine images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub machine_images: Vec<MachineImage>,

    /// Landscape-specific machine images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub machine_images_ls: Vec<MachineImage>,

    /// Landscape-specific provider data (AMIs per region)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub machine_images_provider_ls: Vec<MachineImage>,

    /// Keep only images matching one of these filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_filters: Vec<ImageFilter>,

    /// Drop images matching one of these filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_filters: Vec<ImageFilter>,

    /// Image names to remove entirely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable_machine_images: Vec<String>,

    /// Replacement region list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<Region>,
}

impl CloudProfileOverrides {
    /// Whether any machine image related field is set.
    #[must_use]
    pub fn has_machine_image_overrides(&self) -> bool {
        !(self.machine_images.is_empty()
            && self.machine_images_ls.is_empty()
            && self.machine_images_provider_ls.is_empty()
            && self.include_filters.is_empty()
            && self.exclude_filters.is_empty()
            && self.disable_machine_images.is_empty())
    }
}

/// Overrides applied to the default controller deployment.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerDeploymentOverrides {
    /// Base64 encoded, gzipped chart tarball
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,

    /// Concurrent syncs for every controller; ignored unless positive
    #[serde(default)]
    pub concurrent_syncs: i64,

    /// Container resource requests/limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,

    /// Vertical pod autoscaler settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpa: Option<Value>,

    /// Image vector overwrite document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_vector_overwrite: Option<Value>,
}

/// Overrides applied to the default controller registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerRegistrationOverrides {
    /// Replacement resource kind/type list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controller_resources: Vec<ControllerResource>,
}

#[cfg(test)]
#[path = "imports_tests.rs"]
mod imports_tests;
