// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # landscaper-provider-aws - Gardener AWS Provider Deployer
//!
//! A one-shot Landscaper deployer that installs or removes the Gardener AWS
//! provider extension on a garden cluster.
//!
//! ## Overview
//!
//! A run reads an import document, connects to the target cluster and then
//! either reconciles or deletes three Gardener resources:
//!
//! - `ControllerDeployment` `provider-aws` - the extension's helm chart and values
//! - `ControllerRegistration` `provider-aws` - the extension kinds/types it handles
//! - `CloudProfile` `aws` - Kubernetes versions, machine images and regions
//!
//! Each resource starts from a bundled default template; the imports override
//! individual fields. Reconciling is an idempotent upsert that only touches the
//! fields this tool owns, and deleting tolerates resources that are already gone.
//!
//! ## Modules
//!
//! - [`imports`] - Import document model and loading
//! - [`templates`] - Bundled default templates
//! - [`machine_images`] - Machine image merge for the cloud profile
//! - [`artifacts`] - Image lookups in the component descriptor
//! - [`builders`] - Construction of the three resources
//! - [`cluster`] - Target cluster access
//! - [`reconcilers`] - Upsert and delete against the cluster
//! - [`orchestrator`] - The run state machine
//!
//! ## Example
//!
//! ```rust,no_run
//! use landscaper_provider_aws::cluster::KubeconfigConnector;
//! use landscaper_provider_aws::orchestrator::{ImportSource, Orchestrator};
//! use landscaper_provider_aws::templates::TemplateStore;
//!
//! async fn example() -> landscaper_provider_aws::errors::Result<()> {
//!     let templates = TemplateStore::embedded();
//!     let mut orchestrator = Orchestrator::new(&KubeconfigConnector, None, &templates);
//!     orchestrator
//!         .run(&ImportSource::File("/imports/imports.yaml".into()), "reconcile")
//!         .await
//! }
//! ```

pub mod artifacts;
pub mod builders;
pub mod cluster;
pub mod constants;
pub mod errors;
pub mod gardener;
pub mod imports;
pub mod machine_images;
pub mod orchestrator;
pub mod reconcilers;
pub mod templates;
