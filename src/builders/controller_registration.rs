// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller registration construction.

use super::set_identity;
use crate::errors::Result;
use crate::gardener::ControllerRegistration;
use crate::imports::ControllerRegistrationOverrides;
use crate::templates::TemplateStore;
use tracing::info;

/// Build the controller registration from the default template and `overrides`.
///
/// A non-empty override list replaces the default resource list as a whole.
///
/// # Errors
///
/// Returns [`crate::errors::DeployerError::Template`] if the default cannot be parsed.
pub fn build_controller_registration(
    templates: &TemplateStore,
    overrides: &ControllerRegistrationOverrides,
) -> Result<ControllerRegistration> {
    info!("Constructing controller registration");

    let mut registration = templates.parse_controller_registration()?;
    set_identity(&mut registration);

    if !overrides.controller_resources.is_empty() {
        registration
            .spec
            .resources
            .clone_from(&overrides.controller_resources);
    }

    Ok(registration)
}

#[cfg(test)]
#[path = "controller_registration_tests.rs"]
mod controller_registration_tests;
