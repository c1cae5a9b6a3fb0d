use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::StageId;
use crate::provisioner::ResourceHandle;

/// What one plan execution produced, keyed by resource id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    pub resources: BTreeMap<String, ResourceState>,
    /// Stages in completion order.
    pub completed_stages: Vec<StageId>,
}

impl Deployment {
    pub fn record(&mut self, handle: ResourceHandle, status: ResourceStatus) {
        self.resources.insert(
            handle.resource_id.clone(),
            ResourceState {
                resource_id: handle.resource_id,
                status,
                properties: handle.properties,
            },
        );
    }

    pub fn count(&self, status: ResourceStatus) -> usize {
        self.resources.values().filter(|r| r.status == status).count()
    }
}

/// State for a single resource touched by the deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_id: String,
    pub status: ResourceStatus,
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Provisioned by this deployment.
    Created,
    /// Existing dependency, bound read-only.
    Bound,
    /// Role assignment applied.
    Assigned,
}

impl ResourceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Bound => "bound",
            Self::Assigned => "assigned",
        }
    }
}
