// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Generic create-or-replace and delete helpers for the managed resources.
//!
//! These functions work for any [`ManagedResource`] and any [`ClusterClient`],
//! so the three resource kinds share one upsert and one delete path.
//!
//! # Example
//!
//! ```rust,no_run
//! use landscaper_provider_aws::reconcilers::reconcile;
//! use landscaper_provider_aws::gardener::CloudProfile;
//! use landscaper_provider_aws::errors::Result;
//! use kube::Client;
//!
//! async fn example(client: &Client, cloud_profile: &CloudProfile) -> Result<()> {
//!     reconcile(client, cloud_profile).await?;
//!     Ok(())
//! }
//! ```

use crate::cluster::{is_not_found, ClusterClient};
use crate::errors::{DeployerError, Result};
use crate::gardener::{
    CloudProfile, ControllerDeployment, ControllerRegistration, ManagedResource, ResourceKind,
};
use tracing::{debug, info};

/// What [`reconcile`] did to the live object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The object did not exist and was created
    Created,
    /// The existing object was replaced
    Updated,
}

fn reconcile_error<K: ManagedResource>(action: &'static str, source: kube::Error) -> DeployerError {
    DeployerError::Reconcile {
        action,
        kind: K::kind_name(),
        name: K::NAME.to_string(),
        source,
    }
}

/// Create or update a managed resource using the replace strategy.
///
/// The live object is read first. If it exists, the owned fields of `desired`
/// are copied onto it and the result is replaced, keeping the live
/// `resourceVersion` and every field this tool does not own. Otherwise an empty
/// object with the fixed name receives the owned fields and is created.
///
/// # Arguments
///
/// * `client` - Target cluster client
/// * `desired` - The built resource
///
/// # Returns
///
/// Whether the object was created or updated.
///
/// # Errors
///
/// Returns [`DeployerError::Reconcile`] if the get, create or replace call fails.
pub async fn reconcile<K, C>(client: &C, desired: &K) -> Result<ReconcileOutcome>
where
    K: ManagedResource,
    C: ClusterClient,
{
    let kind = K::kind_name();
    let name = K::NAME;

    debug!(kind = %kind, name = %name, "Reconciling resource");

    let existing = client
        .get::<K>(name)
        .await
        .map_err(|e| reconcile_error::<K>("get", e))?;

    match existing {
        Some(mut live) => {
            debug!(kind = %kind, name = %name, "Resource exists, replacing owned fields");
            live.apply_owned_fields(desired);
            client
                .replace(&live)
                .await
                .map_err(|e| reconcile_error::<K>("update", e))?;
            info!("Updated {} {}", kind, name);
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            debug!(kind = %kind, name = %name, "Resource does not exist, creating");
            let mut fresh = K::empty();
            fresh.apply_owned_fields(desired);
            client
                .create(&fresh)
                .await
                .map_err(|e| reconcile_error::<K>("create", e))?;
            info!("Created {} {}", kind, name);
            Ok(ReconcileOutcome::Created)
        }
    }
}

/// Delete the managed resource of type `K` by its fixed name.
///
/// # Returns
///
/// `true` if an object was deleted, `false` if it was already gone.
///
/// # Errors
///
/// Returns [`DeployerError::Reconcile`] for any failure other than "not found".
pub async fn delete_resource<K, C>(client: &C) -> Result<bool>
where
    K: ManagedResource,
    C: ClusterClient,
{
    let kind = K::kind_name();
    let name = K::NAME;

    match client.delete::<K>(name).await {
        Ok(()) => {
            info!("Deleted {} {}", kind, name);
            Ok(true)
        }
        Err(e) if is_not_found(&e) => {
            debug!(kind = %kind, name = %name, "Resource already absent");
            Ok(false)
        }
        Err(e) => Err(reconcile_error::<K>("delete", e)),
    }
}

/// Delete the resource of the given kind.
///
/// # Errors
///
/// Returns [`DeployerError::Reconcile`] for any failure other than "not found".
pub async fn decommission<C: ClusterClient>(client: &C, kind: ResourceKind) -> Result<bool> {
    match kind {
        ResourceKind::ControllerDeployment => {
            delete_resource::<ControllerDeployment, C>(client).await
        }
        ResourceKind::ControllerRegistration => {
            delete_resource::<ControllerRegistration, C>(client).await
        }
        ResourceKind::CloudProfile => delete_resource::<CloudProfile, C>(client).await,
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod resources_tests;
