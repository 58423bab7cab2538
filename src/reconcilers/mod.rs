// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of the provider-aws resources against the target cluster.
//!
//! # Reconciliation Model
//!
//! Every resource is owned by this tool under a fixed name. Reconciling is a
//! read-before-write upsert:
//!
//! 1. **Fetch** - read the live object, or start from an empty object with the fixed name
//! 2. **Merge** - copy only the fields this tool owns from the built resource
//! 3. **Persist** - create if absent, replace if present
//!
//! Fields owned by other actors (labels, annotations, status, ...) survive
//! because they are taken from the live object. Nothing is retried here.
//!
//! Decommissioning deletes the object by its fixed name and treats "not found"
//! as success, so it can be repeated safely.
//!
//! # Available Operations
//!
//! - [`reconcile`] - Idempotent upsert of a built resource
//! - [`decommission`] - Idempotent delete of one resource kind

pub mod resources;

pub use resources::{decommission, delete_resource, reconcile, ReconcileOutcome};
