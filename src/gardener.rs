// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gardener core resource types managed by the deployer.
//!
//! Only the fields this tool reads or writes are modelled explicitly. Everything
//! else in a spec is carried through `extra` so that parsing a default template
//! and serializing it again never drops data.
//!
//! # Resource Types
//!
//! - [`CloudProfile`] - Kubernetes versions, machine images and regions offered on AWS
//! - [`ControllerDeployment`] - How the provider-aws controller chart is deployed
//! - [`ControllerRegistration`] - Extension kinds/types the controller handles
//!
//! All three are cluster-scoped and addressed by a fixed name, see
//! [`ManagedResource::NAME`].

use crate::constants::{
    CLOUD_PROFILE_NAME, CONTROLLER_DEPLOYMENT_NAME, CONTROLLER_REGISTRATION_NAME,
    GARDENER_API_GROUP, GARDENER_API_GROUP_VERSION, GARDENER_API_VERSION,
    KIND_CONTROLLER_DEPLOYMENT, PLURAL_CONTROLLER_DEPLOYMENTS,
};
use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::ClusterResourceScope;
use kube::{CustomResource, Resource};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;

// ============================================================================
// CloudProfile
// ============================================================================

/// Specification of a Gardener `CloudProfile`.
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "CloudProfile",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct CloudProfileSpec {
    /// Supported Kubernetes versions
    #[serde(default)]
    pub kubernetes: KubernetesSettings,

    /// Machine images offered to shoots
    #[serde(default)]
    pub machine_images: Vec<MachineImage>,

    /// Provider-specific configuration (the AWS `CloudProfileConfig`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<Value>,

    /// Regions and their availability zones
    #[serde(default)]
    pub regions: Vec<Region>,

    /// Provider type, `aws` for this profile
    #[serde(default, rename = "type")]
    pub r#type: String,

    /// Remaining spec fields (machine types, volume types, ...) kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Kubernetes settings of a cloud profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct KubernetesSettings {
    /// Offered Kubernetes versions
    #[serde(default)]
    pub versions: Vec<ExpirableVersion>,
}

/// A Kubernetes version with optional expiry and classification.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpirableVersion {
    /// Version string, e.g. `1.29.3`
    pub version: String,

    /// When the version stops being offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// `preview`, `supported` or `deprecated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,

    /// Fields not modelled here, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A machine image in its Gardener representation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineImage {
    /// Image name, e.g. `gardenlinux`
    pub name: String,

    /// Available versions of the image
    #[serde(default)]
    pub versions: Vec<MachineImageVersion>,

    /// Update strategy for shoot workers using this image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_strategy: Option<String>,

    /// Fields not modelled here, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One version of a Gardener machine image.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineImageVersion {
    /// Version string
    pub version: String,

    /// When the version stops being offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// `preview`, `supported` or `deprecated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,

    /// Supported container runtimes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cri: Option<Vec<Value>>,

    /// CPU architectures the version is built for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectures: Option<Vec<String>>,

    /// Fields not modelled here (`kubeletVersionConstraint`, `inPlaceUpdates`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A cloud region offered by the profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Region name, e.g. `eu-west-1`
    pub name: String,

    /// Availability zones of the region
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<AvailabilityZone>,

    /// Region labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Fields not modelled here (`aliases`, `accessRestrictions`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// An availability zone inside a region.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityZone {
    /// Zone name, e.g. `eu-west-1a`
    pub name: String,

    /// Machine types not available in this zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_machine_types: Option<Vec<String>>,

    /// Volume types not available in this zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_volume_types: Option<Vec<String>>,

    /// Fields not modelled here, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ============================================================================
// ControllerRegistration
// ============================================================================

/// Specification of a Gardener `ControllerRegistration`.
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "ControllerRegistration",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct ControllerRegistrationSpec {
    /// Extension kinds and types handled by the controller
    #[serde(default)]
    pub resources: Vec<ControllerResource>,

    /// Deployment policy and references to `ControllerDeployment`s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Value>,

    /// Remaining spec fields kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A resource kind/type pair claimed by the extension.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControllerResource {
    /// Extension kind, e.g. `Infrastructure`
    pub kind: String,

    /// Extension type, e.g. `aws`
    #[serde(rename = "type")]
    pub r#type: String,

    /// Whether the controller is primarily responsible for the kind/type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    /// Whether the extension is enabled for every shoot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globally_enabled: Option<bool>,

    /// Reconcile timeout, e.g. `10m`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconcile_timeout: Option<String>,

    /// Lifecycle ordering hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Value>,

    /// Fields not modelled here (`workerlessSupported`, `autoEnable`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ============================================================================
// ControllerDeployment
// ============================================================================

/// A Gardener `ControllerDeployment`.
///
/// Unlike the other two kinds this one has no `spec`; `type` and
/// `providerConfig` live at the top level, so [`Resource`] is implemented by hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerDeployment {
    /// API version
    #[serde(default = "ControllerDeployment::default_api_version")]
    pub api_version: String,

    /// Resource kind
    #[serde(default = "ControllerDeployment::default_kind")]
    pub kind: String,

    /// Resource metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Deployment type, `helm` for provider-aws
    #[serde(default, rename = "type")]
    pub r#type: String,

    /// Helm chart and values, see [`HelmProviderConfig`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<Value>,

    /// Top-level fields this tool does not own, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ControllerDeployment {
    fn default_api_version() -> String {
        GARDENER_API_GROUP_VERSION.to_string()
    }

    fn default_kind() -> String {
        KIND_CONTROLLER_DEPLOYMENT.to_string()
    }

    /// Create a controller deployment carrying only a name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            r#type: String::new(),
            provider_config: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Default for ControllerDeployment {
    fn default() -> Self {
        Self::new(CONTROLLER_DEPLOYMENT_NAME)
    }
}

impl Resource for ControllerDeployment {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(KIND_CONTROLLER_DEPLOYMENT)
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(GARDENER_API_GROUP)
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(GARDENER_API_VERSION)
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(PLURAL_CONTROLLER_DEPLOYMENTS)
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// The helm provider config nested inside a [`ControllerDeployment`].
///
/// `chart` is the base64 encoded, gzipped chart tarball.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HelmProviderConfig {
    /// Packaged chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,

    /// Chart values, merged key-by-key at the top level
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Value>,

    /// Remaining provider config fields kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ============================================================================
// Managed resource contract
// ============================================================================

/// A cluster-scoped resource owned by the deployer under a fixed name.
///
/// The name never comes from import data, so reconcile and delete always
/// address the same object across runs.
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = ClusterResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Fixed object name
    const NAME: &'static str;

    /// An object carrying only its identity.
    fn empty() -> Self;

    /// Copy the fields owned by this tool from `desired` onto `self`.
    ///
    /// Metadata and any other field stay untouched.
    fn apply_owned_fields(&mut self, desired: &Self);

    /// Resource kind, for logging and errors.
    fn kind_name() -> String {
        Self::kind(&()).into_owned()
    }
}

impl ManagedResource for CloudProfile {
    const NAME: &'static str = CLOUD_PROFILE_NAME;

    fn empty() -> Self {
        CloudProfile::new(Self::NAME, CloudProfileSpec::default())
    }

    fn apply_owned_fields(&mut self, desired: &Self) {
        self.spec = desired.spec.clone();
    }
}

impl ManagedResource for ControllerDeployment {
    const NAME: &'static str = CONTROLLER_DEPLOYMENT_NAME;

    fn empty() -> Self {
        ControllerDeployment::new(Self::NAME)
    }

    fn apply_owned_fields(&mut self, desired: &Self) {
        self.r#type = desired.r#type.clone();
        self.provider_config = desired.provider_config.clone();
    }
}

impl ManagedResource for ControllerRegistration {
    const NAME: &'static str = CONTROLLER_REGISTRATION_NAME;

    fn empty() -> Self {
        ControllerRegistration::new(Self::NAME, ControllerRegistrationSpec::default())
    }

    fn apply_owned_fields(&mut self, desired: &Self) {
        self.spec = desired.spec.clone();
    }
}

/// The three resource kinds, in reconcile order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// [`ControllerDeployment`]
    ControllerDeployment,
    /// [`ControllerRegistration`]
    ControllerRegistration,
    /// [`CloudProfile`]
    CloudProfile,
}

impl ResourceKind {
    /// Order in which resources are applied.
    pub const APPLY_ORDER: [ResourceKind; 3] = [
        ResourceKind::ControllerDeployment,
        ResourceKind::ControllerRegistration,
        ResourceKind::CloudProfile,
    ];

    /// Order in which resources are deleted (reverse of [`Self::APPLY_ORDER`]).
    pub const DELETE_ORDER: [ResourceKind; 3] = [
        ResourceKind::CloudProfile,
        ResourceKind::ControllerRegistration,
        ResourceKind::ControllerDeployment,
    ];

    /// Kubernetes kind name.
    #[must_use]
    pub fn kind_name(self) -> String {
        match self {
            Self::ControllerDeployment => ControllerDeployment::kind_name(),
            Self::ControllerRegistration => ControllerRegistration::kind_name(),
            Self::CloudProfile => CloudProfile::kind_name(),
        }
    }

    /// Fixed object name.
    #[must_use]
    pub fn object_name(self) -> &'static str {
        match self {
            Self::ControllerDeployment => ControllerDeployment::NAME,
            Self::ControllerRegistration => ControllerRegistration::NAME,
            Self::CloudProfile => CloudProfile::NAME,
        }
    }
}

#[cfg(test)]
#[path = "gardener_tests.rs"]
mod gardener_tests;
