use std::collections::BTreeMap;

use keel_core::{ComponentNames, NamingWarning};
use serde::Serialize;
use uuid::Uuid;

use crate::graph::{DeploymentStage, StageGraph, StageId};
use crate::rbac::RoleAssignmentSpec;
use crate::topology::{Scenario, Topology};

/// Names of the components this deployment always owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppNames {
    pub frontend: ComponentNames,
    pub backend: ComponentNames,
}

/// Everything the provisioner needs for one deployment invocation.
///
/// Produced once by [`crate::orchestrate::resolve`] and never mutated;
/// resolving the same inputs again yields an identical plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlan {
    pub application_name: String,
    pub environment_name: String,
    pub region: String,
    pub region_code: String,
    pub names: AppNames,
    pub topology: Topology,
    pub scenario: Scenario,
    pub stages: StageGraph,
    /// Principal every role assignment is granted to.
    pub principal_id: String,
    pub role_assignments: Vec<RoleAssignmentSpec>,
    /// Non-fatal naming findings.
    pub warnings: Vec<NamingWarning>,
    /// Named outputs for later pipeline steps (e.g. `backendApiUrl`).
    pub outputs: BTreeMap<String, String>,
}

impl ResolvedPlan {
    pub fn stage(&self, id: &StageId) -> Option<&DeploymentStage> {
        self.stages.get(id)
    }

    pub fn role_assignment(&self, id: &Uuid) -> Option<&RoleAssignmentSpec> {
        self.role_assignments.iter().find(|a| &a.id == id)
    }

    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
