//! Explicit deployment stage graph.
//!
//! A tool that infers ordering from data references cannot see a
//! dependency on a resource that is conditionally absent, so every edge
//! here is declared. A stage consuming a `Created` dependency gets an edge
//! from that dependency's stage; an `Existing` dependency adds no edge.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use keel_core::{ComponentKind, ComponentNames, ResourceDescriptor, ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ResolveError;
use crate::plan::AppNames;
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stage that creates the component's resource group.
    pub fn group(component: ComponentKind) -> Self {
        Self(format!("{component}.group"))
    }

    /// Stage that provisions the component's resources.
    pub fn resources(component: ComponentKind) -> Self {
        Self(component.to_string())
    }

    /// Stage that applies role assignments scoped to the component's group.
    pub fn rbac(component: ComponentKind) -> Self {
        Self(format!("{component}.rbac"))
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    ResourceGroup,
    Resources,
    RoleAssignments,
}

/// One unit of provisioning work targeting a single resource group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStage {
    pub id: StageId,
    pub kind: StageKind,
    pub resource_group_target: String,
    pub depends_on: BTreeSet<StageId>,
    pub resources: Vec<ResourceDescriptor>,
    /// Ids of the role assignments this stage applies.
    #[serde(default)]
    pub role_assignments: Vec<Uuid>,
}

impl DeploymentStage {
    pub fn new(id: StageId, kind: StageKind, resource_group_target: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            resource_group_target: resource_group_target.into(),
            depends_on: BTreeSet::new(),
            resources: Vec::new(),
            role_assignments: Vec::new(),
        }
    }

    pub fn after(mut self, dependency: StageId) -> Self {
        self.depends_on.insert(dependency);
        self
    }

    /// Add an edge only when `dependency` is created by this deployment.
    fn after_if_created(self, dependency: &ResourceRef, component: ComponentKind) -> Self {
        if dependency.is_created() {
            self.after(StageId::resources(component))
        } else {
            self
        }
    }

    fn with_resources(mut self, resources: Vec<ResourceDescriptor>) -> Self {
        self.resources = resources;
        self
    }
}

/// Validated, topologically ordered stages.
///
/// `stages()` is a topological order with ties broken by declaration
/// order, so the same topology always yields the same sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageGraph {
    stages: Vec<DeploymentStage>,
}

impl StageGraph {
    /// Validate edges and sort. Fails on an edge to an undeclared stage or
    /// on any cycle.
    pub fn new(declared: Vec<DeploymentStage>) -> Result<Self, Vec<ResolveError>> {
        let index: HashMap<&StageId, usize> = declared
            .iter()
            .enumerate()
            .map(|(i, stage)| (&stage.id, i))
            .collect();

        let unknown: Vec<ResolveError> = declared
            .iter()
            .flat_map(|stage| {
                stage
                    .depends_on
                    .iter()
                    .filter(|dep| !index.contains_key(dep))
                    .map(|dep| ResolveError::UnknownDependency {
                        stage: stage.id.clone(),
                        missing: dep.clone(),
                    })
            })
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }

        // Kahn's algorithm; the ready set is keyed by declaration index.
        let mut indegree: Vec<usize> = declared.iter().map(|s| s.depends_on.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); declared.len()];
        for (i, stage) in declared.iter().enumerate() {
            for dep in &stage.depends_on {
                dependents[index[dep]].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..declared.len())
            .filter(|&i| indegree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(declared.len());
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for &next in &dependents[i] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < declared.len() {
            let stages = (0..declared.len())
                .filter(|&i| indegree[i] > 0)
                .map(|i| declared[i].id.clone())
                .collect();
            return Err(vec![ResolveError::CyclicDependency { stages }]);
        }

        let mut slots: Vec<Option<DeploymentStage>> = declared.into_iter().map(Some).collect();
        let stages = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[DeploymentStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, id: &StageId) -> Option<&DeploymentStage> {
        self.stages.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stages.iter().any(|s| s.id.as_str() == id)
    }

    pub fn dependencies_of(&self, id: &StageId) -> Option<&BTreeSet<StageId>> {
        self.get(id).map(|s| &s.depends_on)
    }

    /// Stages that list `id` as a dependency, in graph order.
    pub fn dependents_of<'a>(&'a self, id: &'a StageId) -> impl Iterator<Item = &'a StageId> {
        self.stages
            .iter()
            .filter(move |s| s.depends_on.contains(id))
            .map(|s| &s.id)
    }

    /// Every `(from, to)` edge: `to` runs after `from`.
    pub fn edges(&self) -> Vec<(&StageId, &StageId)> {
        self.stages
            .iter()
            .flat_map(|s| s.depends_on.iter().map(move |dep| (dep, &s.id)))
            .collect()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.stages
            .iter()
            .any(|s| s.id.as_str() == to && s.depends_on.iter().any(|d| d.as_str() == from))
    }

    /// Group stages into layers. Every stage in a layer depends only on
    /// stages in earlier layers, so a layer may run concurrently.
    pub fn waves(&self) -> Vec<Vec<&StageId>> {
        let mut depth: HashMap<&StageId, usize> = HashMap::new();
        let mut waves: Vec<Vec<&StageId>> = Vec::new();
        // Stages are already topologically ordered.
        for stage in &self.stages {
            let level = stage
                .depends_on
                .iter()
                .filter_map(|dep| depth.get(dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(&stage.id, level);
            if waves.len() <= level {
                waves.resize_with(level + 1, Vec::new);
            }
            waves[level].push(&stage.id);
        }
        waves
    }

    /// Attach role assignment ids to the stages that apply them.
    pub(crate) fn assign_roles(&mut self, id: &StageId, assignments: Vec<Uuid>) {
        if let Some(stage) = self.stages.iter_mut().find(|s| &s.id == id) {
            stage.role_assignments.extend(assignments);
        }
    }
}

/// Declare every stage the topology needs and sort them.
pub fn build(names: &AppNames, topology: &Topology) -> Result<StageGraph, Vec<ResolveError>> {
    use ComponentKind::{Backend, Logging, Platform};

    let mut declared = Vec::new();

    for dependency in [&topology.logging, &topology.platform] {
        if let ResourceRef::Created(created) = dependency {
            declared.extend(component_stages(created));
        }
    }

    declared.push(group_stage(&names.frontend));
    declared.push(group_stage(&names.backend));

    declared.push(
        resource_stage(&names.frontend).after_if_created(&topology.logging, Logging),
    );
    declared.push(
        resource_stage(&names.backend)
            .after_if_created(&topology.logging, Logging)
            .after_if_created(&topology.platform, Platform),
    );

    declared.push(
        DeploymentStage::new(
            StageId::rbac(Backend),
            StageKind::RoleAssignments,
            &names.backend.resource_group,
        )
        .after(StageId::resources(Backend)),
    );
    declared.push(
        DeploymentStage::new(
            StageId::rbac(Platform),
            StageKind::RoleAssignments,
            topology.platform.resource_group(),
        )
        .after(StageId::resources(Backend))
        .after_if_created(&topology.platform, Platform),
    );

    StageGraph::new(declared)
}

fn component_stages(names: &ComponentNames) -> [DeploymentStage; 2] {
    [group_stage(names), resource_stage(names)]
}

fn group_stage(names: &ComponentNames) -> DeploymentStage {
    DeploymentStage::new(
        StageId::group(names.kind),
        StageKind::ResourceGroup,
        &names.resource_group,
    )
    .with_resources(vec![ResourceDescriptor::new(
        ResourceKind::ResourceGroup,
        &names.resource_group,
        &names.resource_group,
    )])
}

fn resource_stage(names: &ComponentNames) -> DeploymentStage {
    let resources = names
        .kind
        .resources()
        .iter()
        .filter_map(|&kind| {
            let name = names.get(kind)?;
            let descriptor = ResourceDescriptor::new(kind, name, &names.resource_group);
            Some(match kind {
                ResourceKind::AiProject => descriptor.with_parent(names.primary()),
                _ => descriptor,
            })
        })
        .collect();

    DeploymentStage::new(
        StageId::resources(names.kind),
        StageKind::Resources,
        &names.resource_group,
    )
    .after(StageId::group(names.kind))
    .with_resources(resources)
}
