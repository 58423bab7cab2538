// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Machine image computation for the AWS cloud profile.
//!
//! Machine images arrive from four sources:
//!
//! 1. `machineImages` - general images from the imports
//! 2. `machineImagesLs` - landscape-specific images from the imports
//! 3. the provider catalogue embedded in the deployer (AMIs per region)
//! 4. `machineImagesProviderLs` - landscape-specific provider data from the imports
//!
//! They are merged in that order into one canonical list: images are unioned by
//! name and versions by version string. When a version shows up in several
//! sources, a later source overrides every field it sets and inherits the rest.
//! Include/exclude filters and the disabled-name list are applied afterwards.
//!
//! The canonical list is then rendered twice: as Gardener [`gardener::MachineImage`]s
//! for `spec.machineImages`, and as the AWS `CloudProfileConfig` for
//! `spec.providerConfig`.

use crate::constants::{AWS_PROVIDER_API_VERSION, KIND_AWS_CLOUD_PROFILE_CONFIG};
use crate::errors::{DeployerError, Result};
use crate::gardener;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// A machine image in canonical form, carrying both Gardener and AWS data.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineImage {
    /// Image name, e.g. `gardenlinux`
    pub name: String,

    /// Versions of the image
    #[serde(default)]
    pub versions: Vec<MachineImageVersion>,

    /// Update strategy for shoot workers using this image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_strategy: Option<String>,

    /// Gardener fields not modelled here, passed through to the cloud profile
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One version of a canonical machine image.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
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

    /// CPU architectures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectures: Option<Vec<String>>,

    /// AMI per region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<RegionAmiMapping>>,

    /// Gardener fields not modelled here (`kubeletVersionConstraint`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The AMI of an image version in one region.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionAmiMapping {
    /// Region name
    pub name: String,

    /// AMI id
    pub ami: String,

    /// CPU architecture of the AMI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

/// Selects an image, optionally restricted to some of its versions.
///
/// An empty `versions` list selects every version of the image.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageFilter {
    /// Image name
    pub name: String,

    /// Versions selected; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
}

impl ImageFilter {
    fn matches(&self, image: &str, version: &str) -> bool {
        self.name == image
            && (self.versions.is_empty() || self.versions.iter().any(|v| v == version))
    }

    /// Both filters name the same image and at least one common version.
    ///
    /// A whole-image include with a version exclude ("gardenlinux except
    /// 1443.10.0") is a refinement, not a conflict. A whole-image exclude
    /// removes everything the include could keep, so it always conflicts.
    fn conflicts_with_exclude(&self, exclude: &ImageFilter) -> bool {
        self.name == exclude.name
            && (exclude.versions.is_empty()
                || self.versions.iter().any(|v| exclude.versions.contains(v)))
    }
}

/// Everything the image computation consumes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageSources<'a> {
    /// General images from the imports
    pub machine_images: &'a [MachineImage],
    /// Landscape-specific images from the imports
    pub machine_images_ls: &'a [MachineImage],
    /// Provider catalogue bundled with the deployer
    pub provider_images: &'a [MachineImage],
    /// Landscape-specific provider data from the imports
    pub provider_images_ls: &'a [MachineImage],
    /// Image names to remove
    pub disabled: &'a [String],
    /// Keep only matching images/versions when non-empty
    pub include_filters: &'a [ImageFilter],
    /// Remove matching images/versions
    pub exclude_filters: &'a [ImageFilter],
}

/// Merge and filter the image sources into the canonical image list.
///
/// The result is sorted by image name; versions keep first-seen order.
///
/// # Errors
///
/// Returns [`DeployerError::Computation`] if an include filter overlaps an
/// exclude filter, or if a disabled image name matches no image.
pub fn compute_machine_images(sources: &ImageSources<'_>) -> Result<Vec<MachineImage>> {
    check_filter_conflicts(sources.include_filters, sources.exclude_filters)?;

    let mut merged: BTreeMap<String, MachineImage> = BTreeMap::new();
    for source in [
        sources.machine_images,
        sources.machine_images_ls,
        sources.provider_images,
        sources.provider_images_ls,
    ] {
        for image in source {
            merge_image(&mut merged, image);
        }
    }

    for name in sources.disabled {
        if merged.remove(name).is_none() {
            return Err(DeployerError::computation(format!(
                "cannot disable unknown machine image '{name}'"
            )));
        }
        debug!(image = %name, "Disabled machine image");
    }

    let images = merged
        .into_values()
        .filter_map(|mut image| {
            let name = image.name.clone();
            image.versions.retain(|v| {
                let included = sources.include_filters.is_empty()
                    || sources
                        .include_filters
                        .iter()
                        .any(|f| f.matches(&name, &v.version));
                let excluded = sources
                    .exclude_filters
                    .iter()
                    .any(|f| f.matches(&name, &v.version));
                included && !excluded
            });
            if image.versions.is_empty() {
                debug!(image = %name, "Dropping machine image without versions");
                None
            } else {
                Some(image)
            }
        })
        .collect();

    Ok(images)
}

fn check_filter_conflicts(include: &[ImageFilter], exclude: &[ImageFilter]) -> Result<()> {
    for inc in include {
        if let Some(exc) = exclude.iter().find(|exc| inc.conflicts_with_exclude(exc)) {
            return Err(DeployerError::computation(format!(
                "machine image '{}' is both included and excluded (include versions {:?}, exclude versions {:?})",
                inc.name, inc.versions, exc.versions
            )));
        }
    }
    Ok(())
}

fn merge_image(merged: &mut BTreeMap<String, MachineImage>, overlay: &MachineImage) {
    let image = merged
        .entry(overlay.name.clone())
        .or_insert_with(|| MachineImage {
            name: overlay.name.clone(),
            ..Default::default()
        });

    if overlay.update_strategy.is_some() {
        image.update_strategy.clone_from(&overlay.update_strategy);
    }
    merge_extra(&mut image.extra, &overlay.extra);

    for version in &overlay.versions {
        match image
            .versions
            .iter_mut()
            .find(|v| v.version == version.version)
        {
            Some(existing) => merge_version(existing, version),
            None => image.versions.push(version.clone()),
        }
    }
}

fn merge_version(base: &mut MachineImageVersion, overlay: &MachineImageVersion) {
    if overlay.expiration_date.is_some() {
        base.expiration_date = overlay.expiration_date;
    }
    if overlay.classification.is_some() {
        base.classification.clone_from(&overlay.classification);
    }
    if overlay.cri.is_some() {
        base.cri.clone_from(&overlay.cri);
    }
    if overlay.architectures.is_some() {
        base.architectures.clone_from(&overlay.architectures);
    }
    if overlay.regions.is_some() {
        base.regions.clone_from(&overlay.regions);
    }
    merge_extra(&mut base.extra, &overlay.extra);
}

fn merge_extra(base: &mut BTreeMap<String, Value>, overlay: &BTreeMap<String, Value>) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

/// Render canonical images as Gardener machine images.
#[must_use]
pub fn to_gardener_machine_images(images: &[MachineImage]) -> Vec<gardener::MachineImage> {
    images
        .iter()
        .map(|image| gardener::MachineImage {
            name: image.name.clone(),
            update_strategy: image.update_strategy.clone(),
            extra: image.extra.clone(),
            versions: image
                .versions
                .iter()
                .map(|v| gardener::MachineImageVersion {
                    version: v.version.clone(),
                    expiration_date: v.expiration_date,
                    classification: v.classification.clone(),
                    cri: v.cri.clone(),
                    architectures: v.architectures.clone(),
                    extra: v.extra.clone(),
                })
                .collect(),
        })
        .collect()
}

/// AWS `CloudProfileConfig`, stored as the cloud profile's provider config.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsCloudProfileConfig {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// AMIs of every image version
    pub machine_images: Vec<AwsMachineImages>,
}

/// AMIs of one image.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AwsMachineImages {
    /// Image name
    pub name: String,
    /// Versions with their AMIs
    pub versions: Vec<AwsMachineImageVersion>,
}

/// AMIs of one image version.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AwsMachineImageVersion {
    /// Version string
    pub version: String,
    /// AMI per region
    pub regions: Vec<RegionAmiMapping>,
}

/// Render canonical images as the AWS `CloudProfileConfig` provider config.
///
/// # Errors
///
/// Returns [`DeployerError::Computation`] if the config cannot be serialized.
pub fn to_provider_config(images: &[MachineImage]) -> Result<Value> {
    let config = AwsCloudProfileConfig {
        api_version: AWS_PROVIDER_API_VERSION.to_string(),
        kind: KIND_AWS_CLOUD_PROFILE_CONFIG.to_string(),
        machine_images: images
            .iter()
            .map(|image| AwsMachineImages {
                name: image.name.clone(),
                versions: image
                    .versions
                    .iter()
                    .map(|v| AwsMachineImageVersion {
                        version: v.version.clone(),
                        regions: v.regions.clone().unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_value(config).map_err(|e| DeployerError::computation(e.to_string()))
}

#[cfg(test)]
#[path = "machine_images_tests.rs"]
mod machine_images_tests;
