use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use keel_core::ResourceDescriptor;
use tokio::task::JoinSet;

use crate::error::{ProvisionerError, format_err_chain};
use crate::graph::{DeploymentStage, StageId};
use crate::plan::ResolvedPlan;
use crate::provisioner::{Provisioner, ResourceHandle};
use crate::rbac::RoleAssignmentSpec;
use crate::state::{Deployment, ResourceStatus};

/// A stage with everything it needs to run on its own task.
struct StageJob {
    id: StageId,
    depends_on: BTreeSet<StageId>,
    resources: Vec<ResourceDescriptor>,
    assignments: Vec<RoleAssignmentSpec>,
}

impl StageJob {
    fn new(plan: &ResolvedPlan, stage: &DeploymentStage) -> Result<Self, ProvisionerError> {
        let assignments = stage
            .role_assignments
            .iter()
            .map(|id| {
                plan.role_assignment(id).cloned().ok_or_else(|| {
                    ProvisionerError::Plan(format!(
                        "stage {} references unknown role assignment {id}",
                        stage.id
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            id: stage.id.clone(),
            depends_on: stage.depends_on.clone(),
            resources: stage.resources.clone(),
            assignments,
        })
    }
}

type StageOutcome = Result<Vec<(ResourceHandle, ResourceStatus)>, ProvisionerError>;

/// Execute a plan against a provisioner.
///
/// Existing dependencies are bound first. Every stage whose dependencies
/// have completed is started on its own task, so independent stages run
/// concurrently while an edge always serializes. Within a stage, resources
/// are provisioned in declaration order, then its role assignments.
///
/// On the first failure no further stages are started; stages already in
/// flight are drained and the failure is returned with its stage id.
pub async fn execute(
    plan: &ResolvedPlan,
    provisioner: Arc<dyn Provisioner>,
) -> Result<Deployment, ProvisionerError> {
    let mut deployment = Deployment::default();

    for (dependency, _) in plan.topology.existing() {
        let reference = plan.topology.get(dependency);
        tracing::info!(
            dependency = ?dependency,
            resource_group = %reference.resource_group(),
            "binding existing dependency"
        );
        let handle = provisioner
            .bind_existing(dependency.component(), reference)
            .await
            .map_err(|e| e.with_resource(&dependency.to_string(), reference.name()))?;
        deployment.record(handle, ResourceStatus::Bound);
    }

    let mut pending = plan
        .stages
        .stages()
        .iter()
        .map(|stage| StageJob::new(plan, stage))
        .collect::<Result<Vec<_>, _>>()?;

    let mut completed: HashSet<StageId> = HashSet::new();
    let mut in_flight: JoinSet<(StageId, StageOutcome)> = JoinSet::new();
    let mut failure: Option<ProvisionerError> = None;

    loop {
        if failure.is_none() {
            let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut pending)
                .into_iter()
                .partition(|job| job.depends_on.iter().all(|d| completed.contains(d)));
            pending = waiting;

            for job in ready {
                tracing::info!(stage = %job.id, "starting stage");
                let provisioner = Arc::clone(&provisioner);
                in_flight.spawn(async move {
                    let outcome = run_stage(provisioner.as_ref(), &job).await;
                    (job.id, outcome)
                });
            }
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        match joined {
            Ok((id, Ok(handles))) => {
                for (handle, status) in handles {
                    deployment.record(handle, status);
                }
                tracing::info!(stage = %id, "stage complete");
                completed.insert(id.clone());
                deployment.completed_stages.push(id);
            }
            Ok((id, Err(e))) => {
                let err = e.in_stage(&id);
                tracing::error!(error = %format_err_chain(&err), "stage failed");
                failure.get_or_insert(err);
            }
            Err(e) => {
                tracing::error!(error = %e, "stage task did not complete");
                failure.get_or_insert(ProvisionerError::Aborted(e.to_string()));
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }
    if !pending.is_empty() {
        return Err(ProvisionerError::Plan(format!(
            "{} stage(s) never became ready",
            pending.len()
        )));
    }

    tracing::info!(
        stages = deployment.completed_stages.len(),
        created = deployment.count(ResourceStatus::Created),
        bound = deployment.count(ResourceStatus::Bound),
        assigned = deployment.count(ResourceStatus::Assigned),
        "deployment complete"
    );
    Ok(deployment)
}

async fn run_stage(provisioner: &dyn Provisioner, job: &StageJob) -> StageOutcome {
    let mut handles = Vec::with_capacity(job.resources.len() + job.assignments.len());

    for resource in &job.resources {
        let handle = provisioner
            .provision(resource)
            .await
            .map_err(|e| e.with_resource(resource.kind.label(), &resource.name))?;
        handles.push((handle, ResourceStatus::Created));
    }

    for assignment in &job.assignments {
        let handle = provisioner
            .assign_role(assignment)
            .await
            .map_err(|e| e.with_resource(&assignment.role_name, &assignment.scope.path()))?;
        handles.push((handle, ResourceStatus::Assigned));
    }

    Ok(handles)
}
