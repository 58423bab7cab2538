// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Builders for the three provider-aws resources.
//!
//! Each builder parses a fresh copy of its default template and layers the
//! matching import overrides on top of it. The merge policy is the same
//! everywhere:
//!
//! - a scalar or list override replaces the default when it is present and
//!   non-empty, and is ignored otherwise (lists are never merged element-wise);
//! - chart values are merged key-by-key at the top level only.
//!
//! The object name always comes from [`crate::gardener::ManagedResource::NAME`],
//! never from the imports.
//!
//! # Available Builders
//!
//! - [`build_cloud_profile`] - Kubernetes versions, machine images and regions
//! - [`build_controller_deployment`] - chart, values and resolved images
//! - [`build_controller_registration`] - handled extension kinds/types

pub mod cloud_profile;
pub mod controller_deployment;
pub mod controller_registration;

pub use cloud_profile::build_cloud_profile;
pub use controller_deployment::{build_controller_deployment, ValueOverride};
pub use controller_registration::build_controller_registration;

use crate::gardener::ManagedResource;

/// Force the fixed identity of `K` onto a freshly parsed template.
pub(crate) fn set_identity<K: ManagedResource>(resource: &mut K) {
    resource.meta_mut().name = Some(K::NAME.to_string());
}
