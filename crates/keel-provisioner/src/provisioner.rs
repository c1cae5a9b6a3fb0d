use std::future::Future;
use std::pin::Pin;

use keel_core::{ComponentKind, ResourceDescriptor, ResourceRef};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ProvisionerError;
use crate::rbac::RoleAssignmentSpec;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A live resource returned by the provisioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub resource_id: String,
    pub properties: serde_json::Value,
}

/// The boundary to the cloud. Implementations own retries, timeouts and
/// create-if-absent semantics; the executor only orders the calls.
///
/// Methods return boxed futures for dyn compatibility.
pub trait Provisioner: Send + Sync {
    /// Create (or confirm) one resource. Must be idempotent for a
    /// descriptor that already exists.
    fn provision<'a>(
        &'a self,
        resource: &'a ResourceDescriptor,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>>;

    /// Apply one role assignment, keyed by its deterministic id.
    fn assign_role<'a>(
        &'a self,
        assignment: &'a RoleAssignmentSpec,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>>;

    /// Look up an existing dependency of the given component. Never
    /// mutates it.
    fn bind_existing<'a>(
        &'a self,
        component: ComponentKind,
        reference: &'a ResourceRef,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>>;
}

/// Provisioner that touches nothing and fabricates handles. Used to preview
/// execution order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunProvisioner;

impl Provisioner for DryRunProvisioner {
    fn provision<'a>(
        &'a self,
        resource: &'a ResourceDescriptor,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>> {
        Box::pin(async move {
            let resource_id = resource.resource_id();
            tracing::info!(kind = %resource.kind, resource_id = %resource_id, "dry run: provision");
            Ok(ResourceHandle {
                resource_id,
                properties: json!({"dry_run": true, "name": resource.name}),
            })
        })
    }

    fn assign_role<'a>(
        &'a self,
        assignment: &'a RoleAssignmentSpec,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>> {
        Box::pin(async move {
            let resource_id = assignment.resource_id();
            tracing::info!(
                role = %assignment.role_name,
                scope = %assignment.scope,
                "dry run: assign role"
            );
            Ok(ResourceHandle {
                resource_id,
                properties: json!({"dry_run": true, "role": assignment.role_name}),
            })
        })
    }

    fn bind_existing<'a>(
        &'a self,
        component: ComponentKind,
        reference: &'a ResourceRef,
    ) -> BoxFuture<'a, Result<ResourceHandle, ProvisionerError>> {
        Box::pin(async move {
            tracing::info!(
                component = %component,
                resource_group = %reference.resource_group(),
                name = %reference.name(),
                "dry run: bind existing"
            );
            Ok(ResourceHandle {
                resource_id: reference.resource_id(component),
                properties: json!({"dry_run": true, "name": reference.name()}),
            })
        })
    }
}
