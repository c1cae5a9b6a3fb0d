use std::collections::BTreeMap;

use keel_core::naming::resolve_component;
use keel_core::validate::validate_existing_group;
use keel_core::{
    ComponentKind, ComponentNames, DeploymentInputs, NameError, NamingContext, NamingConvention,
    NamingWarning, ResourceKind, ResourceRef, scopes,
};

use crate::error::{ResolveError, ResolveErrors};
use crate::graph::{self, StageGraph, StageId};
use crate::plan::{AppNames, ResolvedPlan};
use crate::rbac::{self, RbacScopes, RoleAssignmentSpec};
use crate::topology::{self, Dependency, Topology, TopologyInputs};

/// Resolve a deployment plan with the process-wide naming convention.
pub fn resolve(inputs: &DeploymentInputs) -> Result<ResolvedPlan, ResolveErrors> {
    resolve_with(NamingConvention::global(), inputs)
}

/// Resolve names, topology, stage graph and role assignments.
///
/// Every fatal error from every step is collected before failing, so one
/// call surfaces every configuration problem. On failure no partial plan
/// is returned.
pub fn resolve_with(
    convention: &NamingConvention,
    inputs: &DeploymentInputs,
) -> Result<ResolvedPlan, ResolveErrors> {
    let mut errors: Vec<ResolveError> = inputs
        .missing_fields()
        .into_iter()
        .map(|field| ResolveError::MissingInput { field })
        .collect();

    // An unknown region would otherwise be reported once per component.
    let context = inputs.naming_context().and_then(|context| {
        match convention.regions.code(&context.region) {
            Ok(_) => Some(context),
            Err(e) => {
                errors.push(e.into());
                None
            }
        }
    });

    let app_names = context
        .as_ref()
        .and_then(|context| resolve_app_names(convention, context, &mut errors));

    let topology = resolve_topology(convention, context.as_ref(), inputs, &mut errors);

    let (Some(context), Some(names), Some((topology, mut warnings))) =
        (context, app_names, topology)
    else {
        return Err(fail(errors));
    };
    if !errors.is_empty() {
        return Err(fail(errors));
    }

    let mut stages = graph::build(&names, &topology).map_err(fail)?;

    let principal_id = inputs
        .principal_id
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .unwrap_or_else(|| workload_identity_path(&names.backend));

    let role_assignments = rbac::plan(
        &principal_id,
        &RbacScopes {
            workload_group: &names.backend.resource_group,
            platform: &topology.platform,
        },
    );
    attach_role_assignments(&mut stages, &role_assignments);

    for (dependency, existing) in topology.existing() {
        warnings.extend(validate_existing_group(
            convention,
            dependency.component(),
            &existing.resource_group,
        ));
    }
    for warning in &warnings {
        tracing::warn!(subject = %warning.subject, "{}", warning.message);
    }

    let scenario = topology.scenario();
    let outputs = outputs(&names, &topology, scenario.as_str());
    let region_code = convention
        .regions
        .code(&context.region)
        .map_err(|e| fail(vec![e.into()]))?
        .to_string();

    tracing::info!(
        application = %context.application_name,
        environment = %context.environment,
        scenario = %scenario,
        stages = stages.len(),
        role_assignments = role_assignments.len(),
        warnings = warnings.len(),
        "resolved deployment plan"
    );

    Ok(ResolvedPlan {
        application_name: context.application_name.to_lowercase(),
        environment_name: context.environment.to_lowercase(),
        region: context.region,
        region_code,
        names,
        topology,
        scenario,
        stages,
        principal_id,
        role_assignments,
        warnings,
        outputs,
    })
}

fn fail(errors: Vec<ResolveError>) -> ResolveErrors {
    for err in &errors {
        tracing::error!(error = %err, "plan resolution failed");
    }
    ResolveErrors(errors)
}

fn resolve_app_names(
    convention: &NamingConvention,
    context: &NamingContext,
    errors: &mut Vec<ResolveError>,
) -> Option<AppNames> {
    let mut component = |kind: ComponentKind| {
        resolve_component(convention, &context.component(kind))
            .map_err(|errs: Vec<NameError>| errors.extend(errs.into_iter().map(Into::into)))
            .ok()
    };
    let frontend = component(ComponentKind::Frontend);
    let backend = component(ComponentKind::Backend);
    Some(AppNames {
        frontend: frontend?,
        backend: backend?,
    })
}

/// Resolve the topology, or, when naming is impossible, still surface
/// missing existing references for every flag known to be false.
fn resolve_topology(
    convention: &NamingConvention,
    context: Option<&NamingContext>,
    inputs: &DeploymentInputs,
    errors: &mut Vec<ResolveError>,
) -> Option<(Topology, Vec<NamingWarning>)> {
    let references = [
        (
            Dependency::Platform,
            inputs.create_platform_group,
            inputs.existing_platform(),
        ),
        (
            Dependency::Logging,
            inputs.create_logging_group,
            inputs.existing_logging(),
        ),
    ];

    let (Some(create_platform), Some(create_logging), Some(context)) = (
        inputs.create_platform_group,
        inputs.create_logging_group,
        context,
    ) else {
        for (dependency, flag, existing) in &references {
            if *flag == Some(false) {
                if let Err(errs) = topology::existing_reference(*dependency, existing.as_ref()) {
                    errors.extend(errs);
                }
            }
        }
        return None;
    };

    let [(_, _, existing_platform), (_, _, existing_logging)] = references;
    let topology_inputs = TopologyInputs {
        create_platform,
        create_logging,
        existing_platform,
        existing_logging,
    };

    match topology::resolve(convention, context, &topology_inputs) {
        Ok(resolution) => Some((resolution.topology, resolution.warnings)),
        Err(errs) => {
            errors.extend(errs);
            None
        }
    }
}

/// Default principal reference: the workload identity's resource path,
/// which is known before the identity exists.
fn workload_identity_path(backend: &ComponentNames) -> String {
    let identity = backend
        .get(ResourceKind::ManagedIdentity)
        .unwrap_or_default();
    scopes::resource(
        &backend.resource_group,
        ResourceKind::ManagedIdentity,
        identity,
    )
}

/// Hand each assignment to the first role-assignment stage targeting its
/// scope's resource group.
fn attach_role_assignments(stages: &mut StageGraph, assignments: &[RoleAssignmentSpec]) {
    let rbac_stages = [
        StageId::rbac(ComponentKind::Backend),
        StageId::rbac(ComponentKind::Platform),
    ];
    let mut by_stage: BTreeMap<StageId, Vec<_>> = BTreeMap::new();
    for assignment in assignments {
        let target = rbac_stages.iter().find(|id| {
            stages
                .get(id)
                .is_some_and(|s| s.resource_group_target == assignment.scope.group_name())
        });
        if let Some(id) = target {
            by_stage.entry(id.clone()).or_default().push(assignment.id);
        }
    }
    for (id, ids) in by_stage {
        stages.assign_roles(&id, ids);
    }
}

fn outputs(names: &AppNames, topology: &Topology, scenario: &str) -> BTreeMap<String, String> {
    let mut outputs = BTreeMap::new();
    let mut put = |key: &str, value: &str| {
        outputs.insert(key.to_string(), value.to_string());
    };

    let backend = &names.backend;
    let function_app = backend.get(ResourceKind::FunctionApp).unwrap_or_default();
    put("resourceGroupName", &backend.resource_group);
    put("frontendResourceGroupName", &names.frontend.resource_group);
    put("functionAppName", function_app);
    put("backendApiUrl", &scopes::function_api_url(function_app));
    put(
        "staticWebAppName",
        names.frontend.get(ResourceKind::StaticWebApp).unwrap_or_default(),
    );
    put(
        "storageAccountName",
        backend.get(ResourceKind::StorageAccount).unwrap_or_default(),
    );
    put(
        "managedIdentityName",
        backend.get(ResourceKind::ManagedIdentity).unwrap_or_default(),
    );

    // An existing dependency may be known by resource group only.
    let platform = &topology.platform;
    if !platform.name().is_empty() {
        put("aiFoundryName", platform.name());
        put("aiFoundryEndpoint", &scopes::ai_services_endpoint(platform.name()));
    }
    put("aiFoundryResourceGroup", platform.resource_group());
    put("aiFoundryMode", platform.mode());
    if let ResourceRef::Created(created) = platform {
        let project = created.get(ResourceKind::AiProject).unwrap_or_default();
        put("aiProjectName", project);
        put(
            "aiProjectEndpoint",
            &scopes::ai_project_endpoint(platform.name(), project),
        );
    }

    if !topology.logging.name().is_empty() {
        put("logAnalyticsWorkspaceName", topology.logging.name());
    }
    put("logAnalyticsResourceGroup", topology.logging.resource_group());
    put("logAnalyticsMode", topology.logging.mode());
    put("topology", scenario);
    outputs
}
