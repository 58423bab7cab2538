// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloud profile construction.

use super::set_identity;
use crate::errors::Result;
use crate::gardener::CloudProfile;
use crate::imports::CloudProfileOverrides;
use crate::machine_images::{
    compute_machine_images, to_gardener_machine_images, to_provider_config, ImageSources,
};
use crate::templates::TemplateStore;
use tracing::{debug, info};

/// Build the cloud profile from the default template and `overrides`.
///
/// Machine images and the AWS provider config are recomputed only when at
/// least one machine image override is set; otherwise both stay as in the
/// default. Kubernetes versions and regions replace the default lists when
/// non-empty.
///
/// # Errors
///
/// - [`crate::errors::DeployerError::Template`] if the default template or the
///   provider image catalogue cannot be parsed
/// - [`crate::errors::DeployerError::Computation`] if the image merge rejects the overrides
pub fn build_cloud_profile(
    templates: &TemplateStore,
    overrides: &CloudProfileOverrides,
) -> Result<CloudProfile> {
    info!("Constructing cloud profile");

    let mut cloud_profile = templates.parse_cloud_profile()?;
    set_identity(&mut cloud_profile);

    if overrides.has_machine_image_overrides() {
        let provider_images = templates.parse_provider_images()?;
        let images = compute_machine_images(&ImageSources {
            machine_images: &overrides.machine_images,
            machine_images_ls: &overrides.machine_images_ls,
            provider_images: &provider_images,
            provider_images_ls: &overrides.machine_images_provider_ls,
            disabled: &overrides.disable_machine_images,
            include_filters: &overrides.include_filters,
            exclude_filters: &overrides.exclude_filters,
        })?;
        debug!(count = images.len(), "Computed machine images");

        cloud_profile.spec.machine_images = to_gardener_machine_images(&images);
        cloud_profile.spec.provider_config = Some(to_provider_config(&images)?);
    }

    if !overrides.kubernetes_versions.is_empty() {
        cloud_profile
            .spec
            .kubernetes
            .versions
            .clone_from(&overrides.kubernetes_versions);
    }

    if !overrides.regions.is_empty() {
        cloud_profile.spec.regions.clone_from(&overrides.regions);
    }

    Ok(cloud_profile)
}

#[cfg(test)]
#[path = "cloud_profile_tests.rs"]
mod cloud_profile_tests;
