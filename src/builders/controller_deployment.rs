// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller deployment construction.
//!
//! The default controller deployment carries a helm provider config: the
//! packaged chart and a values map. Overrides touch the chart and a fixed set
//! of top-level values keys, one per [`ValueOverride`] variant. Sibling keys in
//! the default values are never modified.

use super::set_identity;
use crate::artifacts::ArtifactResolver;
use crate::constants::{
    AUXILIARY_IMAGES, CONCURRENT_SYNCS_KEY, CONTROLLER_SUBSYSTEMS, PROVIDER_AWS_COMPONENT,
    PROVIDER_AWS_IMAGE_RESOURCE,
};
use crate::errors::{DeployerError, Result};
use crate::gardener::{ControllerDeployment, HelmProviderConfig};
use crate::imports::ControllerDeploymentOverrides;
use crate::templates::TemplateStore;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "controller deployment";

/// A recognized chart values override.
///
/// Each variant sets or replaces exactly one top-level key of the values map.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueOverride {
    /// `image`: repository and tag of the extension controller
    Image {
        /// Image repository
        repository: String,
        /// Image tag or digest
        tag: String,
    },
    /// `images`: full references of auxiliary images, keyed by chart name
    Images(BTreeMap<String, String>),
    /// `controllers`: the same `concurrentSyncs` for every controller
    Controllers(i64),
    /// `resources`: container resource requests/limits
    Resources(Value),
    /// `vpa`: vertical pod autoscaler settings
    Vpa(Value),
    /// `imageVectorOverwrite`: image vector overwrite document
    ImageVectorOverwrite(Value),
}

impl ValueOverride {
    /// The values key this override writes.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Images(_) => "images",
            Self::Controllers(_) => "controllers",
            Self::Resources(_) => "resources",
            Self::Vpa(_) => "vpa",
            Self::ImageVectorOverwrite(_) => "imageVectorOverwrite",
        }
    }

    /// The value written under [`Self::key`].
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Image { repository, tag } => json!({ "repository": repository, "tag": tag }),
            Self::Images(images) => Value::Object(
                images
                    .into_iter()
                    .map(|(name, reference)| (name, Value::String(reference)))
                    .collect(),
            ),
            Self::Controllers(concurrent_syncs) => controllers_config(concurrent_syncs),
            Self::Resources(value) | Self::Vpa(value) | Self::ImageVectorOverwrite(value) => value,
        }
    }

    /// Set this override's key in `values`, leaving every other key alone.
    pub fn apply(self, values: &mut BTreeMap<String, Value>) {
        let key = self.key();
        debug!(key, "Overriding chart value");
        values.insert(key.to_string(), self.into_value());
    }
}

/// Per-controller concurrency map with the same value for every controller.
#[must_use]
pub fn controllers_config(concurrent_syncs: i64) -> Value {
    let controllers: Map<String, Value> = CONTROLLER_SUBSYSTEMS
        .iter()
        .map(|name| {
            let mut entry = Map::new();
            entry.insert(CONCURRENT_SYNCS_KEY.to_string(), Value::from(concurrent_syncs));
            ((*name).to_string(), Value::Object(entry))
        })
        .collect();
    Value::Object(controllers)
}

/// Whether an opaque override carries any content.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Value overrides taken directly from the imports.
fn import_value_overrides(overrides: &ControllerDeploymentOverrides) -> Vec<ValueOverride> {
    let mut result = Vec::new();

    if overrides.concurrent_syncs > 0 {
        result.push(ValueOverride::Controllers(overrides.concurrent_syncs));
    }
    if let Some(resources) = overrides.resources.as_ref().filter(|v| !v.is_null()) {
        result.push(ValueOverride::Resources(resources.clone()));
    }
    if let Some(vpa) = overrides.vpa.as_ref().filter(|v| !v.is_null()) {
        result.push(ValueOverride::Vpa(vpa.clone()));
    }
    if let Some(overwrite) = overrides
        .image_vector_overwrite
        .as_ref()
        .filter(|v| is_non_empty(v))
    {
        result.push(ValueOverride::ImageVectorOverwrite(overwrite.clone()));
    }

    result
}

/// Value overrides resolved from the component descriptor.
async fn resolved_image_overrides(resolver: &dyn ArtifactResolver) -> Result<Vec<ValueOverride>> {
    let (repository, tag) = resolver
        .resolve_repository_and_tag(PROVIDER_AWS_COMPONENT, PROVIDER_AWS_IMAGE_RESOURCE)
        .await?;
    debug!(%repository, %tag, "Resolved extension image");

    let mut images = BTreeMap::new();
    for (key, resource) in AUXILIARY_IMAGES {
        let reference = resolver
            .resolve_image_reference(PROVIDER_AWS_COMPONENT, resource)
            .await?;
        images.insert(key.to_string(), reference);
    }

    Ok(vec![
        ValueOverride::Image { repository, tag },
        ValueOverride::Images(images),
    ])
}

/// Build the controller deployment from the default template and `overrides`.
///
/// With a `resolver`, the extension image and the auxiliary images are looked
/// up in the component descriptor and written into the chart values. Without
/// one, the images in the default values are kept.
///
/// The provider config is only re-rendered when something was overridden, so
/// empty overrides yield the default unchanged.
///
/// # Errors
///
/// - [`DeployerError::Template`] if the default or its provider config is malformed
/// - [`DeployerError::Lookup`] if an image cannot be resolved
pub async fn build_controller_deployment(
    templates: &TemplateStore,
    overrides: &ControllerDeploymentOverrides,
    resolver: Option<&dyn ArtifactResolver>,
) -> Result<ControllerDeployment> {
    info!("Constructing controller deployment");

    let mut deployment = templates.parse_controller_deployment()?;
    set_identity(&mut deployment);

    let chart = overrides.chart.as_deref().filter(|c| !c.is_empty());

    let mut value_overrides = Vec::new();
    if let Some(resolver) = resolver {
        value_overrides.extend(resolved_image_overrides(resolver).await?);
    }
    value_overrides.extend(import_value_overrides(overrides));

    if chart.is_none() && value_overrides.is_empty() {
        return Ok(deployment);
    }

    let mut config: HelmProviderConfig = match deployment.provider_config.take() {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DeployerError::template(TEMPLATE_NAME, e))?,
        None => HelmProviderConfig::default(),
    };

    if let Some(chart) = chart {
        debug!("Overriding chart");
        config.chart = Some(chart.to_string());
    }
    for value_override in value_overrides {
        value_override.apply(&mut config.values);
    }

    deployment.provider_config =
        Some(serde_json::to_value(&config).map_err(|e| DeployerError::template(TEMPLATE_NAME, e))?);

    Ok(deployment)
}

#[cfg(test)]
#[path = "controller_deployment_tests.rs"]
mod controller_deployment_tests;
