// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! One deployer run, from imports to a reconciled or decommissioned cluster.
//!
//! A run moves through these stages:
//!
//! ```text
//! Start -> ImportsLoaded -> ClientReady -> Reconciling     -> Done
//!                                       -> Decommissioning -> Done
//! ```
//!
//! Any failure moves the run to [`Stage::Failed`] and ends it. The imports are
//! loaded before the cluster is touched, and the operation selector is checked
//! only once a client exists.

use crate::artifacts::ArtifactResolver;
use crate::builders::{
    build_cloud_profile, build_controller_deployment, build_controller_registration,
};
use crate::cluster::{ClusterClient, ClusterConnector};
use crate::errors::{DeployerError, Result};
use crate::gardener::ResourceKind;
use crate::imports::{load_imports, Imports};
use crate::reconcilers::{decommission, reconcile};
use crate::templates::TemplateStore;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, error, info};

/// Stage of a deployer run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has happened yet
    Start,
    /// The import document was parsed
    ImportsLoaded,
    /// A cluster client was built from the target
    ClientReady,
    /// Resources are being built and applied
    Reconciling,
    /// Resources are being deleted
    Decommissioning,
    /// The run finished successfully
    Done,
    /// The run stopped on an error
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "Start",
            Self::ImportsLoaded => "ImportsLoaded",
            Self::ClientReady => "ClientReady",
            Self::Reconciling => "Reconciling",
            Self::Decommissioning => "Decommissioning",
            Self::Done => "Done",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Requested operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create or update the three resources
    Reconcile,
    /// Delete the three resources
    Delete,
}

impl FromStr for Operation {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reconcile" => Ok(Self::Reconcile),
            "delete" => Ok(Self::Delete),
            other => Err(DeployerError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconcile => f.write_str("reconcile"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Where the import document comes from.
#[derive(Clone, Debug)]
pub enum ImportSource {
    /// A file on disk
    File(PathBuf),
    /// An in-memory document
    Inline(Vec<u8>),
}

impl ImportSource {
    async fn load(&self) -> Result<Imports> {
        match self {
            Self::File(path) => load_imports(path).await,
            Self::Inline(data) => Imports::from_slice(data),
        }
    }
}

/// Drives a single run through its [`Stage`]s.
pub struct Orchestrator<'a, C: ClusterConnector> {
    connector: &'a C,
    resolver: Option<&'a dyn ArtifactResolver>,
    templates: &'a TemplateStore,
    stage: Stage,
}

impl<'a, C: ClusterConnector> Orchestrator<'a, C> {
    /// Create an orchestrator in [`Stage::Start`].
    ///
    /// Without a `resolver`, the images in the default controller deployment are kept.
    pub fn new(
        connector: &'a C,
        resolver: Option<&'a dyn ArtifactResolver>,
        templates: &'a TemplateStore,
    ) -> Self {
        Self {
            connector,
            resolver,
            templates,
            stage: Stage::Start,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "Stage transition");
        self.stage = stage;
    }

    /// Execute `operation` with the imports from `source`.
    ///
    /// On error the orchestrator ends in [`Stage::Failed`]; resources applied
    /// before the failing step are left in place.
    ///
    /// # Errors
    ///
    /// Returns the first error of the run, see [`DeployerError`].
    pub async fn run(&mut self, source: &ImportSource, operation: &str) -> Result<()> {
        match self.execute(source, operation).await {
            Ok(()) => {
                self.enter(Stage::Done);
                info!(operation, "Deployer run finished");
                Ok(())
            }
            Err(e) => {
                error!(
                    stage = %self.stage,
                    category = e.category(),
                    error = %e,
                    "Deployer run failed"
                );
                self.enter(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, source: &ImportSource, operation: &str) -> Result<()> {
        let imports = source.load().await?;
        self.enter(Stage::ImportsLoaded);

        let client = self.connector.connect(&imports.cluster).await?;
        self.enter(Stage::ClientReady);

        match operation.parse::<Operation>()? {
            Operation::Reconcile => {
                self.enter(Stage::Reconciling);
                deploy(&client, &imports, self.templates, self.resolver).await
            }
            Operation::Delete => {
                self.enter(Stage::Decommissioning);
                undeploy(&client).await
            }
        }
    }
}

/// Build the three resources and apply them in [`ResourceKind::APPLY_ORDER`].
///
/// Every resource is built before the first apply, so a build failure leaves
/// the cluster untouched.
///
/// # Errors
///
/// Returns the first build or reconcile error; later steps are skipped.
pub async fn deploy<C: ClusterClient>(
    client: &C,
    imports: &Imports,
    templates: &TemplateStore,
    resolver: Option<&dyn ArtifactResolver>,
) -> Result<()> {
    info!("Building provider-aws resources");

    let controller_deployment =
        build_controller_deployment(templates, &imports.controller_deployment, resolver).await?;
    let controller_registration =
        build_controller_registration(templates, &imports.controller_registration)?;
    let cloud_profile = build_cloud_profile(templates, &imports.cloud_profile)?;

    for kind in ResourceKind::APPLY_ORDER {
        let outcome = match kind {
            ResourceKind::ControllerDeployment => reconcile(client, &controller_deployment).await?,
            ResourceKind::ControllerRegistration => {
                reconcile(client, &controller_registration).await?
            }
            ResourceKind::CloudProfile => reconcile(client, &cloud_profile).await?,
        };
        debug!(kind = %kind.kind_name(), ?outcome, "Applied resource");
    }

    Ok(())
}

/// Delete the three resources in [`ResourceKind::DELETE_ORDER`].
///
/// # Errors
///
/// Returns the first delete error other than "not found"; later steps are skipped.
pub async fn undeploy<C: ClusterClient>(client: &C) -> Result<()> {
    info!("Deleting provider-aws resources");

    for kind in ResourceKind::DELETE_ORDER {
        decommission(client, kind).await?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
