//! keel-provisioner
//!
//! Turns deployment inputs into a fully resolved, ordered deployment plan
//! for the chat app infrastructure, and executes that plan against a
//! pluggable provisioner.
//!
//! Public API:
//! - `resolve()`: inputs → names, topology, stage graph, role assignments
//! - `graph::build()`: declare stages with explicit edges and sort them
//! - `rbac::plan()`: deterministic, deduplicated role assignments
//! - `execute()`: run a plan's stages concurrently in dependency order

pub mod error;
pub mod execute;
pub mod graph;
pub mod orchestrate;
pub mod plan;
pub mod provisioner;
pub mod rbac;
pub mod state;
pub mod topology;

pub use crate::error::{ProvisionerError, ResolveError, ResolveErrors};
pub use crate::execute::execute;
pub use crate::graph::{DeploymentStage, StageGraph, StageId, StageKind};
pub use crate::orchestrate::{resolve, resolve_with};
pub use crate::plan::{AppNames, ResolvedPlan};
pub use crate::provisioner::{BoxFuture, DryRunProvisioner, Provisioner, ResourceHandle};
pub use crate::rbac::{RoleAssignmentSpec, RoleDefinition, Scope};
pub use crate::state::{Deployment, ResourceState, ResourceStatus};
pub use crate::topology::{Dependency, Scenario, Topology, TopologyInputs};
