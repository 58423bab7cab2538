// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Default resource templates.
//!
//! The store holds the raw template bytes for the lifetime of the process and
//! hands out a freshly parsed object on every call, so no builder ever sees
//! state left behind by another.

use crate::errors::{DeployerError, Result};
use crate::gardener::{CloudProfile, ControllerDeployment, ControllerRegistration};
use crate::machine_images::MachineImage;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

const EMBEDDED_CLOUD_PROFILE: &[u8] = include_bytes!("../resources/cloudprofile.yaml");
const EMBEDDED_CONTROLLER_DEPLOYMENT: &[u8] =
    include_bytes!("../resources/controllerdeployment.yaml");
const EMBEDDED_CONTROLLER_REGISTRATION: &[u8] =
    include_bytes!("../resources/controllerregistration.yaml");
const EMBEDDED_PROVIDER_IMAGES: &[u8] = include_bytes!("../resources/os_image_config.yaml");

/// Read-only holder of the default template payloads.
#[derive(Clone, Debug)]
pub struct TemplateStore {
    cloud_profile: Cow<'static, [u8]>,
    controller_deployment: Cow<'static, [u8]>,
    controller_registration: Cow<'static, [u8]>,
    provider_images: Cow<'static, [u8]>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::embedded()
    }
}

impl TemplateStore {
    /// Store backed by the templates bundled into the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            cloud_profile: Cow::Borrowed(EMBEDDED_CLOUD_PROFILE),
            controller_deployment: Cow::Borrowed(EMBEDDED_CONTROLLER_DEPLOYMENT),
            controller_registration: Cow::Borrowed(EMBEDDED_CONTROLLER_REGISTRATION),
            provider_images: Cow::Borrowed(EMBEDDED_PROVIDER_IMAGES),
        }
    }

    /// Store backed by caller-supplied payloads.
    pub fn new(
        cloud_profile: impl Into<Cow<'static, [u8]>>,
        controller_deployment: impl Into<Cow<'static, [u8]>>,
        controller_registration: impl Into<Cow<'static, [u8]>>,
        provider_images: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self {
            cloud_profile: cloud_profile.into(),
            controller_deployment: controller_deployment.into(),
            controller_registration: controller_registration.into(),
            provider_images: provider_images.into(),
        }
    }

    /// Replace the cloud profile payload.
    #[must_use]
    pub fn with_cloud_profile(mut self, payload: impl Into<Cow<'static, [u8]>>) -> Self {
        self.cloud_profile = payload.into();
        self
    }

    /// Replace the controller deployment payload.
    #[must_use]
    pub fn with_controller_deployment(mut self, payload: impl Into<Cow<'static, [u8]>>) -> Self {
        self.controller_deployment = payload.into();
        self
    }

    /// Replace the controller registration payload.
    #[must_use]
    pub fn with_controller_registration(
        mut self,
        payload: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.controller_registration = payload.into();
        self
    }

    /// Replace the provider machine image catalogue.
    #[must_use]
    pub fn with_provider_images(mut self, payload: impl Into<Cow<'static, [u8]>>) -> Self {
        self.provider_images = payload.into();
        self
    }

    /// Parse the default cloud profile.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Template`] if the payload is malformed.
    pub fn parse_cloud_profile(&self) -> Result<CloudProfile> {
        parse(&self.cloud_profile, "cloud profile")
    }

    /// Parse the default controller deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Template`] if the payload is malformed.
    pub fn parse_controller_deployment(&self) -> Result<ControllerDeployment> {
        parse(&self.controller_deployment, "controller deployment")
    }

    /// Parse the default controller registration.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Template`] if the payload is malformed.
    pub fn parse_controller_registration(&self) -> Result<ControllerRegistration> {
        parse(&self.controller_registration, "controller registration")
    }

    /// Parse the provider machine image catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Template`] if the payload is malformed.
    pub fn parse_provider_images(&self) -> Result<Vec<MachineImage>> {
        parse(&self.provider_images, "provider machine images")
    }
}

fn parse<T: DeserializeOwned>(payload: &[u8], template: &str) -> Result<T> {
    serde_yaml::from_slice(payload).map_err(|e| DeployerError::template(template, e))
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod templates_tests;
