//! Role assignments for the workload identity.
//!
//! The policy table is fixed and minimal. Each assignment's id is a UUID v5
//! over `(scope, principal, role definition)` only, so re-planning against
//! an already provisioned environment reproduces the same ids and the
//! provisioner's create-if-absent step stays idempotent.

use std::collections::BTreeMap;
use std::fmt;

use keel_core::{ResourceKind, ResourceRef, scopes};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for role-assignment ids. Changing it re-keys every assignment.
const ASSIGNMENT_NAMESPACE: Uuid = Uuid::from_u128(0x6b65_656c_2d72_6261_6300_0000_0000_0001);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub id: &'static str,
}

pub const STORAGE_BLOB_DATA_OWNER: RoleDefinition = RoleDefinition {
    name: "Storage Blob Data Owner",
    id: "b7e6dc6d-f1e8-4753-8033-0f276bb0955b",
};

pub const AZURE_AI_USER: RoleDefinition = RoleDefinition {
    name: "Azure AI User",
    id: "53ca6127-db72-4b80-b1b0-d745d6d5456d",
};

pub const COGNITIVE_SERVICES_OPENAI_USER: RoleDefinition = RoleDefinition {
    name: "Cognitive Services OpenAI User",
    id: "5e0bd9bd-7b93-4f28-af87-19fc36ad61bd",
};

/// Where a role is granted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scope {
    ResourceGroup {
        name: String,
    },
    Resource {
        resource_group: String,
        kind: ResourceKind,
        name: String,
    },
}

impl Scope {
    pub fn resource_group(name: impl Into<String>) -> Self {
        Self::ResourceGroup { name: name.into() }
    }

    /// Group-level scope for a resolved dependency, created or existing.
    pub fn of_dependency(dependency: &ResourceRef) -> Self {
        Self::resource_group(dependency.resource_group())
    }

    pub fn group_name(&self) -> &str {
        match self {
            Self::ResourceGroup { name } => name,
            Self::Resource { resource_group, .. } => resource_group,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::ResourceGroup { name } => scopes::resource_group(name),
            Self::Resource {
                resource_group,
                kind,
                name,
            } => scopes::resource(resource_group, *kind, name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignmentSpec {
    pub id: Uuid,
    pub principal_id: String,
    pub role_definition_id: String,
    pub role_name: String,
    pub scope: Scope,
    pub purpose: String,
}

impl RoleAssignmentSpec {
    pub fn new(principal_id: &str, role: RoleDefinition, scope: Scope, purpose: &str) -> Self {
        Self {
            id: assignment_id(&scope, principal_id, role.id),
            principal_id: principal_id.to_string(),
            role_definition_id: role.id.to_string(),
            role_name: role.name.to_string(),
            scope,
            purpose: purpose.to_string(),
        }
    }

    /// Full path of the assignment resource.
    pub fn resource_id(&self) -> String {
        scopes::role_assignment(&self.scope.path(), &self.id.to_string())
    }
}

/// Deterministic assignment id. Depends on nothing but the triple.
pub fn assignment_id(scope: &Scope, principal_id: &str, role_definition_id: &str) -> Uuid {
    let key = format!("{}|{principal_id}|{role_definition_id}", scope.path());
    Uuid::new_v5(&ASSIGNMENT_NAMESPACE, key.as_bytes())
}

/// The scopes the policy table grants into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacScopes<'a> {
    /// The workload's own resource group.
    pub workload_group: &'a str,
    /// The platform dependency, wherever it resolved.
    pub platform: &'a ResourceRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    WorkloadGroup,
    Platform,
}

struct PolicyEntry {
    role: RoleDefinition,
    target: Target,
    purpose: &'static str,
}

const POLICY: &[PolicyEntry] = &[
    PolicyEntry {
        role: STORAGE_BLOB_DATA_OWNER,
        target: Target::WorkloadGroup,
        purpose: "function host storage access",
    },
    PolicyEntry {
        role: AZURE_AI_USER,
        target: Target::Platform,
        purpose: "project-level agent access",
    },
    PolicyEntry {
        role: COGNITIVE_SERVICES_OPENAI_USER,
        target: Target::Platform,
        purpose: "model invocation",
    },
];

/// Plan the workload's role assignments, deduplicated by
/// `(scope, role definition)` and ordered by that key.
pub fn plan(principal_id: &str, targets: &RbacScopes<'_>) -> Vec<RoleAssignmentSpec> {
    let mut planned: BTreeMap<(Scope, &str), RoleAssignmentSpec> = BTreeMap::new();

    for entry in POLICY {
        let scope = match entry.target {
            Target::WorkloadGroup => Scope::resource_group(targets.workload_group),
            Target::Platform => Scope::of_dependency(targets.platform),
        };
        planned
            .entry((scope.clone(), entry.role.id))
            .or_insert_with(|| {
                RoleAssignmentSpec::new(principal_id, entry.role, scope, entry.purpose)
            });
    }

    let assignments: Vec<_> = planned.into_values().collect();
    tracing::debug!(
        principal = %principal_id,
        count = assignments.len(),
        "planned role assignments"
    );
    assignments
}
