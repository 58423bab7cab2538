// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Artifact metadata lookups against a Landscaper component descriptor.
//!
//! The controller deployment needs the OCI image of the extension and a few
//! auxiliary images. Landscaper hands the deployer a resolved component
//! descriptor (`COMPONENT_DESCRIPTOR_PATH`); every image is a resource of some
//! component with an `access.imageReference`.
//!
//! The descriptor may be a local file or an `http(s)` URL. It is fetched on the
//! first lookup and kept for the rest of the run.

use crate::errors::{DeployerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

/// Resolves image references of component resources.
#[async_trait]
pub trait ArtifactResolver: Send + Sync {
    /// Resolve a resource's image into `(repository, tag)`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Lookup`] if the resource or its reference cannot be found.
    async fn resolve_repository_and_tag(
        &self,
        component: &str,
        resource: &str,
    ) -> Result<(String, String)>;

    /// Resolve a resource's full image reference.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Lookup`] if the resource or its reference cannot be found.
    async fn resolve_image_reference(&self, component: &str, resource: &str) -> Result<String>;
}

/// A resolved component descriptor as written by Landscaper.
///
/// Both the single-component form (`component: ...`) and the list form
/// (`components: [{component: ...}]`) are accepted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ComponentDescriptorDocument {
    /// The root component
    #[serde(default)]
    pub component: Option<Component>,

    /// Referenced components
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

/// One entry of the `components` list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ComponentEntry {
    /// The component
    pub component: Component,
}

/// A component and its resources.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Component {
    /// Component name, e.g. `github.com/gardener/gardener-extension-provider-aws`
    pub name: String,

    /// Component version
    #[serde(default)]
    pub version: String,

    /// Resources shipped by the component
    #[serde(default)]
    pub resources: Vec<ComponentResource>,
}

/// A resource of a component.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ComponentResource {
    /// Resource name
    pub name: String,

    /// Resource type, e.g. `ociImage`
    #[serde(default, rename = "type")]
    pub r#type: String,

    /// Access specification; `imageReference` for OCI images
    #[serde(default)]
    pub access: Value,
}

impl ComponentDescriptorDocument {
    /// Find the image reference of `resource` inside `component`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Lookup`] if either is missing or the resource has
    /// no image reference.
    pub fn image_reference(&self, component: &str, resource: &str) -> Result<String> {
        let found = self
            .component
            .iter()
            .chain(self.components.iter().map(|entry| &entry.component))
            .find(|c| c.name == component)
            .ok_or_else(|| {
                DeployerError::lookup(component, resource, "component not found in descriptor")
            })?;

        let res = found
            .resources
            .iter()
            .find(|r| r.name == resource)
            .ok_or_else(|| {
                DeployerError::lookup(component, resource, "resource not found in component")
            })?;

        res.access
            .get("imageReference")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                DeployerError::lookup(component, resource, "resource has no imageReference")
            })
    }
}

/// Split an OCI image reference into repository and tag (or digest).
///
/// `registry:5000/repo:v1` -> (`registry:5000/repo`, `v1`);
/// `repo@sha256:abc` -> (`repo`, `sha256:abc`). A tag in front of a digest
/// (`repo:v1@sha256:abc`) is dropped; the digest wins. Returns `None` when there
/// is neither.
#[must_use]
pub fn split_image_reference(reference: &str) -> Option<(String, String)> {
    if let Some((name, digest)) = reference.split_once('@') {
        if name.is_empty() || digest.is_empty() {
            return None;
        }
        let repo = split_tag(name).map_or(name, |(repo, _)| repo);
        return Some((repo.to_string(), digest.to_string()));
    }

    let (repo, tag) = split_tag(reference)?;
    Some((repo.to_string(), tag.to_string()))
}

/// Split `name:tag`, ignoring a registry port before the last `/`.
fn split_tag(reference: &str) -> Option<(&str, &str)> {
    let last_slash = reference.rfind('/').map_or(0, |i| i + 1);
    let colon = reference[last_slash..].rfind(':')? + last_slash;
    let (repo, tag) = (&reference[..colon], &reference[colon + 1..]);
    if repo.is_empty() || tag.is_empty() {
        return None;
    }
    Some((repo, tag))
}

/// [`ArtifactResolver`] backed by a component descriptor file or URL.
pub struct ComponentDescriptorResolver {
    location: String,
    http_client: reqwest::Client,
    descriptor: OnceCell<ComponentDescriptorDocument>,
}

impl ComponentDescriptorResolver {
    /// Create a resolver for the descriptor at `location` (path or `http(s)` URL).
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            http_client: reqwest::Client::new(),
            descriptor: OnceCell::new(),
        }
    }

    /// Create a resolver over an already parsed descriptor.
    #[must_use]
    pub fn from_document(document: ComponentDescriptorDocument) -> Self {
        Self {
            location: "<memory>".to_string(),
            http_client: reqwest::Client::new(),
            descriptor: OnceCell::new_with(Some(document)),
        }
    }

    async fn descriptor(
        &self,
        component: &str,
        resource: &str,
    ) -> Result<&ComponentDescriptorDocument> {
        self.descriptor
            .get_or_try_init(|| async {
                let data = self
                    .fetch()
                    .await
                    .map_err(|reason| DeployerError::lookup(component, resource, reason))?;
                serde_yaml::from_slice(&data).map_err(|e| {
                    DeployerError::lookup(
                        component,
                        resource,
                        format!("invalid component descriptor {}: {e}", self.location),
                    )
                })
            })
            .await
    }

    async fn fetch(&self) -> std::result::Result<Vec<u8>, String> {
        match Url::parse(&self.location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                info!(url = %url, "Fetching component descriptor");
                let response = self
                    .http_client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| format!("failed to fetch component descriptor {url}: {e}"))?;
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| format!("failed to read component descriptor {url}: {e}"))?;
                Ok(body.to_vec())
            }
            _ => {
                info!(path = %self.location, "Reading component descriptor");
                tokio::fs::read(&self.location).await.map_err(|e| {
                    format!(
                        "failed to read component descriptor {}: {e}",
                        self.location
                    )
                })
            }
        }
    }
}

#[async_trait]
impl ArtifactResolver for ComponentDescriptorResolver {
    async fn resolve_repository_and_tag(
        &self,
        component: &str,
        resource: &str,
    ) -> Result<(String, String)> {
        let reference = self.resolve_image_reference(component, resource).await?;
        split_image_reference(&reference).ok_or_else(|| {
            DeployerError::lookup(
                component,
                resource,
                format!("image reference '{reference}' has no tag or digest"),
            )
        })
    }

    async fn resolve_image_reference(&self, component: &str, resource: &str) -> Result<String> {
        let reference = self
            .descriptor(component, resource)
            .await?
            .image_reference(component, resource)?;
        debug!(
            component = %component,
            resource = %resource,
            reference = %reference,
            "Resolved image reference"
        );
        Ok(reference)
    }
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod artifacts_tests;
