// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access to the target cluster.
//!
//! [`ClusterClient`] is the narrow set of object operations the reconciler and
//! decommissioner need. It is implemented for [`kube::Client`]; tests plug in an
//! in-memory implementation.
//!
//! [`ClusterConnector`] turns the Landscaper target from the imports into a client.

use crate::constants::{FIELD_MANAGER, TARGET_TYPE_KUBERNETES_CLUSTER};
use crate::errors::{DeployerError, Result};
use crate::gardener::ManagedResource;
use crate::imports::Target;
use async_trait::async_trait;
use kube::api::{DeleteParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use tracing::debug;

/// Object operations against the target cluster.
///
/// All methods address cluster-scoped objects by name and surface API errors
/// unchanged; interpreting them is up to the caller.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fetch the live object, `None` if it does not exist.
    async fn get<K: ManagedResource>(&self, name: &str) -> Result<Option<K>, kube::Error>;

    /// Create a new object.
    async fn create<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error>;

    /// Replace an existing object.
    ///
    /// `obj` must carry the `resourceVersion` it was read with.
    async fn replace<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error>;

    /// Delete an object by name.
    async fn delete<K: ManagedResource>(&self, name: &str) -> Result<(), kube::Error>;
}

fn post_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl ClusterClient for Client {
    async fn get<K: ManagedResource>(&self, name: &str) -> Result<Option<K>, kube::Error> {
        Api::<K>::all(self.clone()).get_opt(name).await
    }

    async fn create<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error> {
        Api::<K>::all(self.clone()).create(&post_params(), obj).await
    }

    async fn replace<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error> {
        Api::<K>::all(self.clone())
            .replace(K::NAME, &post_params(), obj)
            .await
    }

    async fn delete<K: ManagedResource>(&self, name: &str) -> Result<(), kube::Error> {
        Api::<K>::all(self.clone())
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
    }
}

/// Whether an API error means the object does not exist.
#[must_use]
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

/// Turns a cluster handle into a live client.
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    /// Client type produced by this connector
    type Client: ClusterClient;

    /// Build a client for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Connection`] if no client can be built.
    async fn connect(&self, target: &Target) -> Result<Self::Client>;
}

/// Builds a [`kube::Client`] from the target's inline kubeconfig.
#[derive(Clone, Debug, Default)]
pub struct KubeconfigConnector;

#[async_trait]
impl ClusterConnector for KubeconfigConnector {
    type Client = Client;

    async fn connect(&self, target: &Target) -> Result<Client> {
        if target.spec.r#type != TARGET_TYPE_KUBERNETES_CLUSTER {
            return Err(DeployerError::Connection {
                reason: format!(
                    "unsupported target type '{}', expected '{}'",
                    target.spec.r#type, TARGET_TYPE_KUBERNETES_CLUSTER
                ),
            });
        }

        let kubeconfig = Kubeconfig::from_yaml(&target.spec.config.kubeconfig).map_err(|e| {
            DeployerError::Connection {
                reason: format!("invalid kubeconfig: {e}"),
            }
        })?;

        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| DeployerError::Connection {
                reason: format!("failed to load kubeconfig: {e}"),
            })?;
        debug!(cluster_url = %config.cluster_url, "Loaded kubeconfig from target");

        Client::try_from(config).map_err(|e| DeployerError::Connection {
            reason: format!("failed to create client: {e}"),
        })
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
