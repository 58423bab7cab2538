// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the provider-aws deployer.
//!
//! Every failure a deployment run can hit maps onto exactly one variant of
//! [`DeployerError`]. The orchestrator never retries or suppresses these; the
//! first error ends the run and is reported by `main`.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T, E = DeployerError> = std::result::Result<T, E>;

/// Errors that can occur while building or applying the provider-aws resources.
#[derive(Error, Debug)]
pub enum DeployerError {
    /// The import document could not be read or deserialized.
    ///
    /// Raised before any cluster call is attempted.
    #[error("Failed to load imports from {source_name}: {reason}")]
    Config {
        /// Where the document came from (file path or `<memory>`)
        source_name: String,
        /// Read or parse failure
        reason: String,
    },

    /// The cluster handle could not be turned into a live client.
    #[error("Failed to create cluster client from target: {reason}")]
    Connection {
        /// Why the client could not be constructed
        reason: String,
    },

    /// An embedded default payload failed to parse.
    ///
    /// Payloads change independently of code, so this is reported instead of panicking.
    #[error("Failed to parse default {template} template: {reason}")]
    Template {
        /// Which payload failed (e.g. "cloud profile")
        template: String,
        /// Deserialization error
        reason: String,
    },

    /// The machine image merge rejected its inputs.
    #[error("Machine image computation failed: {reason}")]
    Computation {
        /// Conflicting filter, unknown disabled image, etc.
        reason: String,
    },

    /// Artifact metadata could not be resolved from the component descriptor.
    #[error("Failed to resolve resource '{resource}' of component '{component}': {reason}")]
    Lookup {
        /// Component name that was searched
        component: String,
        /// Resource name inside the component
        resource: String,
        /// Explanation of the failure
        reason: String,
    },

    /// A create, update or delete against the cluster failed.
    ///
    /// "Not found" during delete never produces this error.
    #[error("Failed to {action} {kind} '{name}': {source}")]
    Reconcile {
        /// The API verb that failed (get, create, update, delete)
        action: &'static str,
        /// Resource kind
        kind: String,
        /// Resource name
        name: String,
        /// Underlying API or transport error
        source: kube::Error,
    },

    /// The operation selector was neither `reconcile` nor `delete`.
    #[error("Unknown operation: \"{0}\"")]
    UnsupportedOperation(String),
}

impl DeployerError {
    /// Build a [`DeployerError::Template`] from any displayable parse error.
    pub fn template(template: &str, err: impl std::fmt::Display) -> Self {
        Self::Template {
            template: template.to_string(),
            reason: err.to_string(),
        }
    }

    /// Build a [`DeployerError::Computation`].
    pub fn computation(reason: impl Into<String>) -> Self {
        Self::Computation {
            reason: reason.into(),
        }
    }

    /// Build a [`DeployerError::Lookup`].
    pub fn lookup(component: &str, resource: &str, reason: impl Into<String>) -> Self {
        Self::Lookup {
            component: component.to_string(),
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }

    /// Short category name, used as a structured logging field.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::Connection { .. } => "ConnectionError",
            Self::Template { .. } => "TemplateError",
            Self::Computation { .. } => "ComputationError",
            Self::Lookup { .. } => "LookupError",
            Self::Reconcile { .. } => "ReconcileError",
            Self::UnsupportedOperation(_) => "UnsupportedOperationError",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
