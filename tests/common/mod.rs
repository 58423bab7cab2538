// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kube::{Resource, ResourceExt};
use landscaper_provider_aws::cluster::{ClusterClient, ClusterConnector};
use landscaper_provider_aws::errors::{DeployerError, Result};
use landscaper_provider_aws::gardener::ManagedResource;
use landscaper_provider_aws::imports::Target;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Import document with a cluster target and no overrides.
pub const EMPTY_IMPORTS: &str = r"
cluster:
  metadata:
    name: garden
    namespace: landscaper
  spec:
    type: landscaper.gardener.cloud/kubernetes-cluster
    config:
      kubeconfig: |
        apiVersion: v1
        kind: Config
cloudProfile: {}
controllerDeployment: {}
controllerRegistration: {}
";

/// One call received by [`FakeCluster`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub verb: &'static str,
    pub kind: String,
    pub name: String,
}

impl Call {
    pub fn new(verb: &'static str, kind: &str, name: &str) -> Self {
        Self {
            verb,
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<(String, String), Value>,
    calls: Vec<Call>,
    failure: Option<(&'static str, String, u16)>,
}

/// In-memory API server keyed by kind and name.
///
/// Clones share state, so a test can keep one handle while the connector
/// hands another to the orchestrator.
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(Box::new(kube::core::Status {
        status: Some(kube::core::response::StatusSummary::Failure),
        message: format!("{reason} (fake cluster)"),
        reason: reason.to_string(),
        code,
        metadata: None,
        details: None,
    }))
}

impl FakeCluster {
    /// Store an object as if someone else had created it.
    pub fn insert(&self, kind: &str, name: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert((kind.to_string(), name.to_string()), value);
    }

    pub fn object(&self, kind: &str, name: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(kind.to_string(), name.to_string()))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Make every `verb` call on `kind` fail with `code`.
    pub fn fail_on(&self, verb: &'static str, kind: &str, code: u16) {
        self.state.lock().unwrap().failure = Some((verb, kind.to_string(), code));
    }

    fn record(&self, verb: &'static str, kind: &str, name: &str) -> Result<(), kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::new(verb, kind, name));
        match &state.failure {
            Some((v, k, code)) if *v == verb && k == kind => Err(api_error(*code, "Injected")),
            _ => Ok(()),
        }
    }
}

fn resource_version(value: &Value) -> u64 {
    value["metadata"]["resourceVersion"]
        .as_str()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn get<K: ManagedResource>(&self, name: &str) -> Result<Option<K>, kube::Error> {
        let kind = K::kind_name();
        self.record("get", &kind, name)?;
        Ok(self
            .object(&kind, name)
            .map(|v| serde_json::from_value(v).unwrap()))
    }

    async fn create<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error> {
        let kind = K::kind_name();
        let name = obj.name_any();
        self.record("create", &kind, &name)?;
        if self.object(&kind, &name).is_some() {
            return Err(api_error(409, "AlreadyExists"));
        }
        let mut created = obj.clone();
        created.meta_mut().resource_version = Some("1".to_string());
        self.insert(&kind, &name, serde_json::to_value(&created).unwrap());
        Ok(created)
    }

    async fn replace<K: ManagedResource>(&self, obj: &K) -> Result<K, kube::Error> {
        let kind = K::kind_name();
        let name = obj.name_any();
        self.record("replace", &kind, &name)?;
        let Some(current) = self.object(&kind, &name) else {
            return Err(api_error(404, "NotFound"));
        };
        let version = resource_version(&current);
        if obj.resource_version() != Some(version.to_string()) {
            return Err(api_error(409, "Conflict"));
        }
        let mut replaced = obj.clone();
        replaced.meta_mut().resource_version = Some((version + 1).to_string());
        self.insert(&kind, &name, serde_json::to_value(&replaced).unwrap());
        Ok(replaced)
    }

    async fn delete<K: ManagedResource>(&self, name: &str) -> Result<(), kube::Error> {
        let kind = K::kind_name();
        self.record("delete", &kind, name)?;
        self.state
            .lock()
            .unwrap()
            .objects
            .remove(&(kind, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| api_error(404, "NotFound"))
    }
}

/// Hands out a shared [`FakeCluster`] and counts connection attempts.
#[derive(Default)]
pub struct FakeConnector {
    pub cluster: FakeCluster,
    pub connects: AtomicUsize,
    pub refuse: bool,
}

impl FakeConnector {
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterConnector for FakeConnector {
    type Client = FakeCluster;

    async fn connect(&self, _target: &Target) -> Result<FakeCluster> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(DeployerError::Connection {
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.cluster.clone())
    }
}
